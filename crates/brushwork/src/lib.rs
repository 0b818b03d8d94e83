//! Brushwork: stroke resampling and instanced stamp staging for a touch-driven
//! painting canvas.
//!
//! Pipeline, once per frame:
//!   input  -> [`BrushHandle::append`] (any thread, any rate)
//!   render -> [`FrameDriver::run_frame`]
//!               drain each [`Brush`] through [`interpolate`] into a
//!               [`StagingBuffer`], submit it to a [`FrameSink`], clear.
//!
//! Canvas space spans `[-w, w] x [-h, h]` for a canvas of `w x h`; [`convert`]
//! divides by the extent so stamp instances land directly in clip space.
//!
//! Nothing here touches the GPU. The renderer implements [`FrameSink`] and
//! mirrors the [`TextureRegistry`].

pub mod brush;
pub mod color;
pub mod error;
pub mod frame;
pub mod input;
pub mod interpolate;
pub mod sample;
pub mod settings;
pub mod staging;
pub mod texture;
pub mod ui;

pub use brush::{Brush, BrushHandle, BrushHandles, BrushRole, Brushes, DEFAULT_BRUSH_SIZE};
pub use color::{Color, Hsv, PickerHsv};
pub use error::{Error, Result};
pub use frame::{FrameDriver, FrameSink, FrameStats, RenderTarget};
pub use input::{InputManager, PointerKind, StrokeSource, TouchEvent, TouchPhase, ViewMapping};
pub use interpolate::{interpolate, MAX_SEGMENT_STAMPS};
pub use sample::{convert, BrushSample, CanvasExtent, StampInstance};
pub use settings::{Settings, MAX_INSTANCES, MAX_UI_INSTANCES};
pub use staging::StagingBuffer;
pub use texture::{StampTexture, TextureId, TextureRegistry};
pub use ui::UiManager;
