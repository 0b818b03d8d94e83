//! Instanced stamp drawing into the canvas and UI targets.

use crate::renderer::textures::StampTextures;
use brushwork::{RenderTarget, StampInstance};
use std::ops::Range;
use wgpu::util::DeviceExt;

/// WGSL for textured stamp quads. Canvas space has +y pointing down the
/// view, so y is flipped on the way to clip space.
const STAMP_WGSL: &str = r#"
struct VSOut {
    @builtin(position) clip: vec4<f32>,
    @location(0)         uv: vec2<f32>,
    @location(1)      color: vec4<f32>,
}

@vertex
fn vs_main(
    @location(0) corner: vec2<f32>,
    @location(1) center: vec2<f32>,
    @location(2) half_size: vec2<f32>,
    @location(3) color: vec4<f32>,
) -> VSOut {
    var out: VSOut;
    let p = center + corner * half_size;
    out.clip = vec4<f32>(p.x, -p.y, 0.0, 1.0);
    out.uv = vec2<f32>(0.5 * (corner.x + 1.0), 0.5 * (corner.y + 1.0));
    out.color = color;
    return out;
}

@group(0) @binding(0) var tStamp: texture_2d<f32>;
@group(0) @binding(1) var samp: sampler;

@fragment
fn fs_main(in: VSOut) -> @location(0) vec4<f32> {
    let tex = textureSample(tStamp, samp, in.uv);
    return vec4<f32>(tex.rgb * in.color.rgb, tex.a * in.color.a);
}
"#;

const QUAD_CORNERS: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];

struct InstanceBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
}

impl InstanceBuffer {
    fn new(device: &wgpu::Device, label: &str, capacity: usize) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * std::mem::size_of::<StampInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer, capacity }
    }
}

pub struct StampPipeline {
    pipeline: wgpu::RenderPipeline,
    quad_vb: wgpu::Buffer,
    canvas: InstanceBuffer,
    ui: InstanceBuffer,
}

impl StampPipeline {
    pub fn new(
        device: &wgpu::Device,
        target_fmt: wgpu::TextureFormat,
        stamp_layout: &wgpu::BindGroupLayout,
        canvas_capacity: usize,
        ui_capacity: usize,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("stamp.wgsl"),
            source: wgpu::ShaderSource::Wgsl(STAMP_WGSL.into()),
        });

        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Stamp Quad VB"),
            contents: bytemuck::cast_slice(&QUAD_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let vbuf_layouts = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    shader_location: 0,
                    offset: 0,
                    format: wgpu::VertexFormat::Float32x2,
                }],
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<StampInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        shader_location: 1,
                        offset: 0,
                        format: wgpu::VertexFormat::Float32x2,
                    },
                    wgpu::VertexAttribute {
                        shader_location: 2,
                        offset: 8,
                        format: wgpu::VertexFormat::Float32x2,
                    },
                    wgpu::VertexAttribute {
                        shader_location: 3,
                        offset: 16,
                        format: wgpu::VertexFormat::Float32x4,
                    },
                    // texture_index at offset 32 selects the bind group, not read by the shader
                ],
            },
        ];

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Stamp PipelineLayout"),
            bind_group_layouts: &[stamp_layout],
            push_constant_ranges: &[],
        });

        let blend = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Stamp Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &vbuf_layouts,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_fmt,
                    blend: Some(wgpu::BlendState {
                        color: blend,
                        alpha: blend,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        Self {
            pipeline,
            quad_vb,
            canvas: InstanceBuffer::new(device, "Canvas Instance VB", canvas_capacity),
            ui: InstanceBuffer::new(device, "UI Instance VB", ui_capacity),
        }
    }

    /// Uploads `instances` and draws them into `dst`.
    ///
    /// The canvas target keeps its contents; the UI target is cleared first,
    /// so an empty UI batch still wipes the overlay.
    pub fn draw(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: RenderTarget,
        dst: &wgpu::TextureView,
        textures: &StampTextures,
        instances: &[StampInstance],
    ) {
        let (vb, load, label) = match target {
            RenderTarget::Canvas => (&self.canvas, wgpu::LoadOp::Load, "Canvas Stamp Pass"),
            RenderTarget::Ui => (
                &self.ui,
                wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                "UI Stamp Pass",
            ),
        };

        let instances = if instances.len() > vb.capacity {
            log::warn!(
                "{}: {} instances exceed buffer capacity {}",
                label,
                instances.len(),
                vb.capacity
            );
            &instances[..vb.capacity]
        } else {
            instances
        };
        if !instances.is_empty() {
            queue.write_buffer(&vb.buffer, 0, bytemuck::cast_slice(instances));
        }

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: dst,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if instances.is_empty() {
            return;
        }

        rpass.set_pipeline(&self.pipeline);
        rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
        rpass.set_vertex_buffer(1, vb.buffer.slice(..));
        for (texture, range) in texture_runs(instances) {
            match textures.bind_group(texture) {
                Some(bind) => {
                    rpass.set_bind_group(0, bind, &[]);
                    rpass.draw(0..QUAD_CORNERS.len() as u32, range);
                }
                None => log::warn!("{}: no GPU texture {}, skipping {:?}", label, texture, range),
            }
        }
    }
}

/// Splits `instances` into maximal runs sharing a texture index, in order.
fn texture_runs(instances: &[StampInstance]) -> impl Iterator<Item = (u32, Range<u32>)> + '_ {
    let mut start = 0;
    std::iter::from_fn(move || {
        let first = instances.get(start)?;
        let len = instances[start..]
            .iter()
            .take_while(|i| i.texture_index == first.texture_index)
            .count();
        let run = (first.texture_index, start as u32..(start + len) as u32);
        start += len;
        Some(run)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(texture_index: u32) -> StampInstance {
        StampInstance {
            position: [0.0; 2],
            size: [0.1; 2],
            color: [1.0; 4],
            texture_index,
        }
    }

    #[test]
    fn runs_follow_texture_changes() {
        let instances: Vec<_> = [0, 0, 2, 2, 2, 1, 0].into_iter().map(instance).collect();
        let runs: Vec<_> = texture_runs(&instances).collect();
        assert_eq!(runs, vec![(0, 0..2), (2, 2..5), (1, 5..6), (0, 6..7)]);
    }

    #[test]
    fn empty_batch_has_no_runs() {
        assert_eq!(texture_runs(&[]).count(), 0);
    }
}
