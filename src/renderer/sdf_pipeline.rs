//! SDF-based WebGPU render pipeline
//!
//! Renders the entire scene in fragment shader using signed distance fields.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::scene::Scene;
use crate::settings::Settings;

/// Maximum number of sprites uploaded per frame
const MAX_SPRITES: usize = 128;

/// Layer mask bits (must match shader)
const LAYER_WORLD: u32 = 1;
const LAYER_SNOW: u32 = 1 << 1;
const LAYER_CLOUDS: u32 = 1 << 2;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2],    // offset 0
    world_size: [f32; 2],    // offset 8
    time: f32,               // offset 16
    sprite_count: u32,       // offset 20
    overlay: f32,            // offset 24
    layer_mask: u32,         // offset 28
    layer_offsets: [f32; 4], // offset 32 (16-byte aligned vec4)
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct SpriteData {
    rect: [f32; 4],
    kind: u32,
    variant: u32,
    _pad: [u32; 2], // Pad to 32 bytes for alignment
}

/// Pack a scene into GPU structures
fn pack(
    scene: &Scene,
    settings: &Settings,
    resolution: [f32; 2],
    time: f32,
) -> (Globals, Vec<SpriteData>) {
    let mut sprites = vec![SpriteData::zeroed(); MAX_SPRITES];
    let mut count = 0;
    for (slot, sprite) in sprites.iter_mut().zip(&scene.sprites) {
        let (kind, variant) = sprite.kind.shader_ids();
        *slot = SpriteData {
            rect: [
                sprite.rect.pos.x,
                sprite.rect.pos.y,
                sprite.rect.size.x,
                sprite.rect.size.y,
            ],
            kind,
            variant,
            _pad: [0; 2],
        };
        count += 1;
    }

    let mut layer_mask = 0;
    if scene.shows_world() {
        layer_mask |= LAYER_WORLD;
    }
    if settings.quality.snow_texture() {
        layer_mask |= LAYER_SNOW;
    }
    if settings.quality.clouds_enabled() {
        layer_mask |= LAYER_CLOUDS;
    }

    // Reduced motion pins the backdrop in place
    let layer_offsets = if settings.effective_parallax() {
        scene.layer_offsets
    } else {
        [0.0; 4]
    };

    let globals = Globals {
        resolution,
        world_size: scene.world_size,
        time,
        sprite_count: count,
        overlay: scene.overlay,
        layer_mask,
        layer_offsets,
    };
    (globals, sprites)
}

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    sprites_buffer: wgpu::Buffer,

    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
    start_time: f64,
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);
        log::info!("Surface alpha modes: {:?}", surface_caps.alpha_modes);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .unwrap_or(wgpu::TextureFormat::Bgra8Unorm);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        log::info!("Surface config: {}x{}", width, height);
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&Globals::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let sprites_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sprites"),
            size: (std::mem::size_of::<SpriteData>() * MAX_SPRITES) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: sprites_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            sprites_buffer,
            bind_group,
            size: (width, height),
            start_time: 0.0,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn set_start_time(&mut self, time: f64) {
        self.start_time = time;
    }

    /// Upload the scene and draw one frame
    pub fn render(
        &mut self,
        scene: &Scene,
        settings: &Settings,
        time: f64,
    ) -> Result<(), wgpu::SurfaceError> {
        // time is ms from requestAnimationFrame, convert to seconds
        let elapsed = ((time - self.start_time) / 1000.0) as f32;
        let resolution = [self.size.0 as f32, self.size.1 as f32];

        let (globals, sprites) = pack(scene, settings, resolution, elapsed);
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        self.queue
            .write_buffer(&self.sprites_buffer, 0, bytemuck::cast_slice(&sprites));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Backdrop;
    use crate::settings::QualityPreset;
    use crate::sim::{CrashCause, GameState};

    #[test]
    fn test_gpu_struct_sizes() {
        assert_eq!(std::mem::size_of::<Globals>(), 48);
        assert_eq!(std::mem::size_of::<SpriteData>(), 32);
    }

    #[test]
    fn test_pack_start_screen() {
        let state = GameState::new(1);
        let scene = Scene::capture(&state, &Backdrop::new(600.0));
        let (globals, _) = pack(&scene, &Settings::default(), [800.0, 600.0], 0.0);
        assert_eq!(globals.sprite_count, 0);
        assert_eq!(globals.layer_mask & LAYER_WORLD, 0);
    }

    #[test]
    fn test_pack_respects_quality_and_motion() {
        let mut state = GameState::new(1);
        state.start_session();
        state.end_session(CrashCause::Tree);
        let mut backdrop = Backdrop::new(600.0);
        backdrop.advance(4.0, 10.0);
        let scene = Scene::capture(&state, &backdrop);

        let settings = Settings {
            quality: QualityPreset::High,
            reduced_motion: true,
            ..Settings::default()
        };
        let (globals, sprites) = pack(&scene, &settings, [800.0, 600.0], 0.0);
        assert_eq!(globals.sprite_count, 1);
        assert_eq!(globals.layer_mask, LAYER_WORLD | LAYER_SNOW | LAYER_CLOUDS);
        assert_eq!(globals.layer_offsets, [0.0; 4]);
        assert!(globals.overlay > 0.5);
        assert_eq!(sprites[0].kind, 0);
        assert_eq!(sprites.len(), MAX_SPRITES);
    }
}
