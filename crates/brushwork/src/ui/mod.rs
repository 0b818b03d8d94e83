//! On-canvas UI: color slots, color picker, hue strip and the brush resize
//! button. Elements are drawn as stamps into the UI target each frame.

mod element;

pub use element::{
    DrawContext, Drawable, Element, ElementKind, HUE_TEXTURE_HEIGHT, HUE_TEXTURE_WIDTH,
    PICKER_TEXTURE_DIM,
};

use crate::color::{lerp_hsv, Color, Hsv};
use crate::error::Result;
use crate::sample::{convert, CanvasExtent};
use crate::staging::StagingBuffer;
use crate::texture::{TextureId, TextureRegistry};
use glam::Vec2;

const COLOR_SLOTS: usize = 4;
const SLOT_STEP: Vec2 = Vec2::new(0.0, 260.0);
const PICKER_LOCATION: Vec2 = Vec2::new(800.0, -2000.0);
const PICKER_SIZE: f32 = 500.0;
const HUE_OFFSET: Vec2 = Vec2::new(900.0, 0.0);
const SLOTS_OFFSET: Vec2 = Vec2::new(-700.0, -400.0);
const RESIZE_BUTTON_LOCATION: Vec2 = Vec2::new(-200.0, -2000.0);
const RESIZE_BUTTON_SIZE: f32 = 128.0;
const BRUSH_INDICATOR_LOCATION: Vec2 = Vec2::new(0.0, -800.0);

/// Share of the active slot kept when a finger taps another slot.
const SLOT_MIX: f32 = 0.9;

/// Owns the UI elements and the color / size state they edit.
#[derive(Debug)]
pub struct UiManager {
    elements: Vec<Element>,
    indicator: usize,
    slots: [usize; COLOR_SLOTS],
    picker: usize,
    hue: usize,
    button: usize,
    active_slot: usize,

    hsv: Hsv,
    brush_color: Color,
    brush_size: f32,
    pending_size: f32,

    button_pressed: bool,
    pick_mode: bool,
    hue_mode: bool,
}

impl UiManager {
    /// Lays out the default UI. The picker and hue strip get their own
    /// textures; everything else is drawn with the `stamp` texture.
    pub fn new(registry: &mut TextureRegistry, stamp: TextureId, brush_size: f32) -> Self {
        let hsv = Hsv::new(200.0, 1.0, 1.0, 1.0);
        let mut elements = Vec::new();

        let mut pos = PICKER_LOCATION + SLOTS_OFFSET;
        let indicator = elements.len();
        elements.push(
            Element::new(
                "activeColorSlotIndicator",
                ElementKind::ColorSlot { hsv: Hsv::default() },
                pos,
                110.0,
                stamp,
            )
            .with_color(Color::new(200, 200, 200, 255))
            .not_hitable(),
        );

        let slot_hsv = Hsv::new(0.0, 0.0, 43.0 / 255.0, 1.0);
        let mut slots = [0; COLOR_SLOTS];
        for (i, slot) in slots.iter_mut().enumerate() {
            *slot = elements.len();
            elements.push(
                Element::new(
                    format!("colorSlot{i}"),
                    ElementKind::ColorSlot { hsv: slot_hsv },
                    pos,
                    100.0,
                    stamp,
                )
                .with_color(slot_hsv.to_rgb()),
            );
            pos += SLOT_STEP;
        }

        let picker_tex = registry.register(PICKER_TEXTURE_DIM, PICKER_TEXTURE_DIM);
        let picker = elements.len();
        elements.push(Element::new(
            "colorPicker",
            ElementKind::ColorPicker { hue: hsv.h as u16 },
            PICKER_LOCATION,
            PICKER_SIZE,
            picker_tex,
        ));

        let hue_tex = registry.register(HUE_TEXTURE_WIDTH, HUE_TEXTURE_HEIGHT);
        let hue = elements.len();
        elements.push(Element::new(
            "colorPickerHue",
            ElementKind::HueStrip,
            PICKER_LOCATION + HUE_OFFSET,
            HUE_TEXTURE_WIDTH as f32,
            hue_tex,
        ));

        let button = elements.len();
        elements.push(Element::new(
            "brushResizeButton",
            ElementKind::ResizeButton {
                first: Vec2::ZERO,
                current: Vec2::ZERO,
            },
            RESIZE_BUTTON_LOCATION,
            RESIZE_BUTTON_SIZE,
            stamp,
        ));

        elements.push(
            Element::new(
                "brushResizeIndicator",
                ElementKind::BrushIndicator,
                BRUSH_INDICATOR_LOCATION,
                brush_size,
                stamp,
            )
            .not_hitable(),
        );

        log::debug!("ui laid out with {} elements", elements.len());

        Self {
            elements,
            indicator,
            slots,
            picker,
            hue,
            button,
            active_slot: slots[0],
            hsv,
            brush_color: hsv.to_rgb(),
            brush_size,
            pending_size: brush_size,
            button_pressed: false,
            pick_mode: false,
            hue_mode: false,
        }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name == name)
    }

    pub fn hsv(&self) -> Hsv {
        self.hsv
    }

    pub fn brush_color(&self) -> Color {
        self.brush_color
    }

    pub fn brush_size(&self) -> f32 {
        self.brush_size
    }

    /// Size the resize button would commit if released now.
    pub fn pending_size(&self) -> f32 {
        self.pending_size
    }

    pub fn resize_button_position(&self) -> Vec2 {
        self.elements[self.button].position
    }

    pub fn active_slot(&self) -> &Element {
        &self.elements[self.active_slot]
    }

    pub fn is_button_pressed(&self) -> bool {
        self.button_pressed
    }

    /// Resolves which UI target, if any, a new touch grabs. The choice holds
    /// until the next touch begins.
    pub fn first_touch(&mut self, pos: Vec2, pencil: bool) {
        if pencil {
            self.set_button_drag(Some(pos), None);
        }
        self.pick_mode = self.elements[self.picker].is_over(pos);
        self.hue_mode = self.elements[self.hue].is_over(pos);
        if self.pick_mode || self.hue_mode {
            log::debug!("color pick: sv={} hue={}", self.pick_mode, self.hue_mode);
        }

        if self.elements[self.button].is_over(pos) {
            self.press_button();
        }

        let Some(hit) = self.slots.iter().copied().find(|&i| self.elements[i].is_over(pos)) else {
            return;
        };
        log::debug!("{} hit", self.elements[hit].name);

        if pencil {
            self.elements[self.indicator].position = self.elements[hit].position;
            self.active_slot = hit;
            self.brush_color = self.elements[hit].color;
            self.hsv = slot_hsv(&self.elements[hit]);
        } else {
            let mixed = lerp_hsv(slot_hsv(&self.elements[self.active_slot]), slot_hsv(&self.elements[hit]), SLOT_MIX);
            self.hsv = Hsv { a: self.hsv.a, ..mixed };
            self.brush_color = self.hsv.to_rgb();
            self.store_active_slot();
        }
        self.set_picker_hue();
    }

    /// Applies the grabbed UI target to a touch and returns the resulting
    /// brush color.
    pub fn process_touch(&mut self, pos: Vec2, pencil: bool) -> Color {
        if self.pick_mode {
            if let Some((s, v)) = self.elements[self.picker].pick_saturation_value(pos) {
                self.hsv.s = s;
                self.hsv.v = v;
            }
        }

        if self.hue_mode {
            if let Some(h) = self.elements[self.hue].pick_hue(pos) {
                self.hsv.h = h;
                self.set_picker_hue();
            }
        }

        if self.button_pressed {
            if pencil {
                self.set_button_drag(None, Some(pos));
            }
            if let Some(size) = self.elements[self.button].resized(self.brush_size) {
                self.pending_size = size;
            }
        }

        if self.pick_mode || self.hue_mode {
            self.brush_color = self.hsv.to_rgb();
            self.store_active_slot();
        }

        self.brush_color
    }

    /// True while a touch is driving the UI instead of painting.
    pub fn cant_draw(&self) -> bool {
        self.button_pressed || self.pick_mode || self.hue_mode
    }

    pub fn press_button(&mut self) {
        if !self.button_pressed {
            log::debug!("resize button pressed");
        }
        self.button_pressed = true;
        self.pending_size = self.brush_size;
    }

    /// Ends a resize drag and returns the brush size to apply.
    pub fn release_button(&mut self) -> f32 {
        if self.button_pressed {
            self.brush_size = self.pending_size;
            log::debug!("brush size set to {:.1}", self.brush_size);
        }
        self.button_pressed = false;
        self.brush_size
    }

    /// Drops whatever the current touch had grabbed. A held resize keeps the
    /// old brush size.
    pub fn cancel_touch(&mut self) {
        if self.cant_draw() {
            log::debug!("ui interaction cancelled");
        }
        self.button_pressed = false;
        self.pick_mode = false;
        self.hue_mode = false;
        self.pending_size = self.brush_size;
    }

    /// Appends one instance per visible element. The brush indicator is only
    /// shown while the resize button is held.
    pub fn collect_instances(&self, extent: CanvasExtent, sink: &mut StagingBuffer) {
        let ctx = DrawContext {
            brush_color: self.brush_color,
            pending_size: self.pending_size,
        };
        for el in &self.elements {
            if el.kind == ElementKind::BrushIndicator && !self.button_pressed {
                continue;
            }
            sink.push(convert(&el.instance(&ctx), el.texture, extent));
        }
    }

    /// Regenerates stale element textures. Returns how many were rewritten.
    pub fn refresh_textures(&mut self, registry: &mut TextureRegistry) -> Result<usize> {
        let mut filled = 0;
        for el in self.elements.iter_mut().filter(|e| e.dirty && e.owns_texture()) {
            if el.fill_texture(registry.get_mut(el.texture)?) {
                filled += 1;
            }
        }
        Ok(filled)
    }

    fn set_picker_hue(&mut self) {
        let picker = &mut self.elements[self.picker];
        picker.kind = ElementKind::ColorPicker {
            hue: self.hsv.h as u16,
        };
        picker.dirty = true;
    }

    fn store_active_slot(&mut self) {
        let slot = &mut self.elements[self.active_slot];
        slot.kind = ElementKind::ColorSlot { hsv: self.hsv };
        slot.color = self.brush_color.opaque();
    }

    fn set_button_drag(&mut self, first: Option<Vec2>, current: Option<Vec2>) {
        if let ElementKind::ResizeButton { first: f, current: c } = &mut self.elements[self.button].kind {
            if let Some(first) = first {
                *f = first;
            }
            if let Some(current) = current {
                *c = current;
            }
        }
    }
}

fn slot_hsv(el: &Element) -> Hsv {
    match el.kind {
        ElementKind::ColorSlot { hsv } => hsv,
        _ => Hsv::default(),
    }
}
