//! Uploads the raster to a texture and draws it over the whole window.

use std::num::NonZeroU32;

use anyhow::Context;
use log::debug;
use winit::window::Window;

use crate::{
    command_encoder::{self, CommandEncoderExt},
    raster::Raster,
    screen,
};

/// Texture format matching the raster's little-endian RGBA cells.
const RASTER_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

struct RasterTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    size: screen::Size,
}

impl RasterTexture {
    fn create(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, size: screen::Size) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("raster-texture"),
            size: extent(size),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: RASTER_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        });

        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("present-bind-group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture_view),
            }],
        });

        Self {
            texture,
            bind_group,
            size,
        }
    }
}

fn extent(size: screen::Size) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: size.width,
        height: size.height,
        depth_or_array_layers: 1,
    }
}

pub struct Presenter {
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_configuration: wgpu::SurfaceConfiguration,
    bind_group_layout: wgpu::BindGroupLayout,
    render_pipeline: wgpu::RenderPipeline,
    raster_texture: Option<RasterTexture>,
}

impl Presenter {
    pub fn new(window: &Window) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(wgpu::Backends::all());
        let size = screen::Size::from(window.inner_size());

        // SAFETY: the window outlives the presenter; both live in the event loop closure.
        let surface = unsafe { instance.create_surface(window) };

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: Default::default(),
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        }))
        .context("no graphics adapter can present to this window")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("device"),
                features: wgpu::Features::empty(),
                limits: wgpu::Limits::default(),
            },
            None,
        ))
        .context("could not open graphics device")?;

        let format = surface
            .get_supported_formats(&adapter)
            .first()
            .copied()
            .context("surface has no formats supported by the adapter")?;

        let surface_configuration = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
        };

        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("present-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("present.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("present-bind-group-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: false },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("present-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("present-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vertex_main",
                buffers: &[],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fragment_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
        });

        let mut presenter = Self {
            surface,
            device,
            queue,
            surface_configuration,
            bind_group_layout,
            render_pipeline,
            raster_texture: None,
        };
        presenter.reconfigure();
        Ok(presenter)
    }

    pub fn resize(&mut self, size: screen::Size) {
        debug!("resizing surface to {:?}", size);
        self.surface_configuration.width = size.width;
        self.surface_configuration.height = size.height;
        self.reconfigure();
    }

    /// Reapplies the surface configuration, e.g. after the surface was lost.
    pub fn reconfigure(&mut self) {
        if self.surface_configuration.width > 0 && self.surface_configuration.height > 0 {
            self.surface.configure(&self.device, &self.surface_configuration);
        }
    }

    /// Uploads `raster` and presents it.
    ///
    /// Nothing is drawn while the raster or the surface is zero-sized.
    pub fn present(&mut self, raster: &Raster) -> Result<(), wgpu::SurfaceError> {
        let size = raster.size();
        let surface_is_empty =
            self.surface_configuration.width == 0 || self.surface_configuration.height == 0;
        if size.is_empty() || surface_is_empty {
            return Ok(());
        }

        if self.raster_texture.as_ref().map(|texture| texture.size) != Some(size) {
            self.raster_texture = Some(RasterTexture::create(
                &self.device,
                &self.bind_group_layout,
                size,
            ));
        }
        let Some(raster_texture) = self.raster_texture.as_ref() else {
            return Ok(());
        };

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &raster_texture.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            raster.as_bytes(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: NonZeroU32::new(raster.stride_bytes()),
                rows_per_image: NonZeroU32::new(size.height),
            },
            extent(size),
        );

        let surface_texture = self.surface.get_current_texture()?;
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let render_pipeline = &self.render_pipeline;
        let command_buffer = command_encoder::record(&self.device, "present", |command_encoder| {
            command_encoder.with_debug_group("render-pass", |command_encoder| {
                command_encoder.with_render_pass(
                    &wgpu::RenderPassDescriptor {
                        label: Some("render-pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &surface_texture_view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                store: true,
                            },
                        })],
                        depth_stencil_attachment: None,
                    },
                    |render_pass| {
                        render_pass.set_pipeline(render_pipeline);
                        render_pass.set_bind_group(0, &raster_texture.bind_group, &[]);
                        render_pass.draw(0..4, 0..1);
                    },
                )
            })
        });

        self.queue.submit([command_buffer]);
        surface_texture.present();
        Ok(())
    }
}
