//! Forward renderer
//!
//! One pipeline draws every mesh-bearing node of the scene graph. Each
//! frame the engine lazily creates GPU resources for new meshes, textures,
//! and nodes, rewrites the per-node uniforms from the propagated world
//! matrices, packs the lights into the global uniform, and records a single
//! render pass.

use std::{iter, sync::Arc};

use cgmath::{Matrix, SquareMatrix};
use wgpu::util::DeviceExt;
use wgpu::{DepthStencilState, RenderPipeline, TextureFormat};

use crate::gfx::camera::CameraUniform;
use crate::gfx::texture::TextureResource;
use crate::gfx::vertex::Vertex3D;
use crate::scene::lights::{Lights, MAX_POINT_LIGHTS};
use crate::scene::Scene;

/// Global per-frame data. MUST match the Globals struct in shader.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct GlobalUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    ambient: [f32; 4],
    // Directional light: xyz direction, w = enabled.
    sun_direction: [f32; 4],
    // rgb color, w = intensity.
    sun_color: [f32; 4],
    // Point lights: xyz position, w = intensity (zero slots are off).
    point_position: [[f32; 4]; MAX_POINT_LIGHTS],
    point_color: [[f32; 4]; MAX_POINT_LIGHTS],
    // Spot light: position (w = enabled), axis (w = cos cutoff), color (w = intensity).
    spot_position: [f32; 4],
    spot_direction: [f32; 4],
    spot_color: [f32; 4],
}

impl GlobalUniform {
    fn pack(camera: CameraUniform, lights: &Lights) -> Self {
        let mut point_position = [[0.0; 4]; MAX_POINT_LIGHTS];
        let mut point_color = [[0.0; 4]; MAX_POINT_LIGHTS];
        for (i, light) in lights.points.iter().take(MAX_POINT_LIGHTS).enumerate() {
            let intensity = if light.enabled { light.intensity } else { 0.0 };
            point_position[i] = [
                light.position.x,
                light.position.y,
                light.position.z,
                intensity,
            ];
            point_color[i] = [light.color[0], light.color[1], light.color[2], 0.0];
        }

        let (spot_position, spot_direction, spot_color) = match &lights.spot {
            Some(spot) => (
                [
                    spot.position.x,
                    spot.position.y,
                    spot.position.z,
                    spot.enabled as u32 as f32,
                ],
                [
                    spot.direction.x,
                    spot.direction.y,
                    spot.direction.z,
                    spot.cos_cutoff,
                ],
                [spot.color[0], spot.color[1], spot.color[2], spot.intensity],
            ),
            None => ([0.0; 4], [0.0, -1.0, 0.0, 1.0], [0.0; 4]),
        };

        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            ambient: [lights.ambient[0], lights.ambient[1], lights.ambient[2], 0.0],
            sun_direction: [
                lights.sun.direction.x,
                lights.sun.direction.y,
                lights.sun.direction.z,
                lights.sun.enabled as u32 as f32,
            ],
            sun_color: [
                lights.sun.color[0],
                lights.sun.color[1],
                lights.sun.color[2],
                lights.sun.intensity,
            ],
            point_position,
            point_color,
            spot_position,
            spot_direction,
            spot_color,
        }
    }
}

/// Per-node data. MUST match the NodeData struct in shader.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct NodeUniform {
    model: [[f32; 4]; 4],
    // Inverse-transpose of the model matrix, for normals under
    // non-uniform scale.
    normal: [[f32; 4]; 4],
    base_color: [f32; 4],
    // rgb emissive, w = specular exponent.
    emissive: [f32; 4],
    // [shading mode, textured, unused, unused]
    flags: [u32; 4],
}

/// GPU buffers of one mesh asset.
pub struct MeshGpu {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

/// Uniform buffer and bind group of one scene node.
pub struct NodeGpu {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,

    pipeline: RenderPipeline,

    global_buffer: wgpu::Buffer,
    global_bind_group: wgpu::BindGroup,
    node_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    default_texture: TextureResource,
}

impl RenderEngine {
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> RenderEngine {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to request adapter!");

        let (device, queue) = {
            adapter
                .request_device(&wgpu::DeviceDescriptor {
                    label: Some("WGPU Device"),
                    required_features: wgpu::Features::default(),
                    required_limits: wgpu::Limits {
                        max_texture_dimension_2d: 4096,
                        ..wgpu::Limits::downlevel_defaults()
                    },
                    memory_hints: wgpu::MemoryHints::default(),
                    trace: wgpu::Trace::Off,
                })
                .await
                .expect("Failed to request a device!")
        };

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: surface_capabilities.present_modes[0],
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let uniform_layout_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let global_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
            entries: &[uniform_layout_entry(0)],
        });

        let node_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Node Bind Group Layout"),
            entries: &[uniform_layout_entry(0)],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let global_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Global Uniform Buffer"),
            size: std::mem::size_of::<GlobalUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let global_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global Bind Group"),
            layout: &global_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: global_buffer.as_entire_binding(),
            }],
        });

        // Untextured nodes sample a single white texel.
        let mut default_texture = TextureResource::create_from_rgba_data(
            &device,
            &queue,
            &[255, 255, 255, 255],
            1,
            1,
            "Default White",
        );
        default_texture.bind_group = Some(Self::texture_bind_group(
            &device,
            &texture_layout,
            &default_texture,
        ));

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[&global_layout, &node_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: None,
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex3D::desc()],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // The skydome is seen from the inside.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
                unclipped_depth: false,
            },
            depth_stencil: Some(DepthStencilState {
                format: depth_texture.texture.format(),
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        });

        RenderEngine {
            device: device.into(),
            config,
            format,
            surface,
            queue: queue.into(),
            pipeline,
            depth_texture,
            global_buffer,
            global_bind_group,
            node_layout,
            texture_layout,
            default_texture,
        }
    }

    fn texture_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        texture: &TextureResource,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Texture Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        })
    }

    /// Creates missing GPU resources and refreshes per-node uniforms.
    fn sync_scene(&self, scene: &mut Scene) {
        for mesh in scene.meshes_mut() {
            if mesh.gpu.is_none() {
                let vertex_buffer =
                    self.device
                        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                            label: Some("Vertex Buffer"),
                            contents: bytemuck::cast_slice(&mesh.geometry.to_vertices()),
                            usage: wgpu::BufferUsages::VERTEX,
                        });
                let index_buffer =
                    self.device
                        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                            label: Some("Index Buffer"),
                            contents: bytemuck::cast_slice(&mesh.geometry.indices),
                            usage: wgpu::BufferUsages::INDEX,
                        });
                mesh.gpu = Some(MeshGpu {
                    vertex_buffer,
                    index_buffer,
                    index_count: mesh.geometry.indices.len() as u32,
                });
            }
        }

        for painted in scene.textures_mut() {
            match painted.gpu.as_ref() {
                None => {
                    let mut resource = TextureResource::create_from_rgba_data(
                        &self.device,
                        &self.queue,
                        &painted.pixels,
                        painted.width,
                        painted.height,
                        "Painted Texture",
                    );
                    resource.bind_group = Some(Self::texture_bind_group(
                        &self.device,
                        &self.texture_layout,
                        &resource,
                    ));
                    painted.gpu = Some(resource);
                    painted.dirty = false;
                }
                Some(resource) if painted.dirty => {
                    resource.upload(&self.queue, &painted.pixels, painted.width, painted.height);
                    painted.dirty = false;
                }
                Some(_) => {}
            }
        }

        for node in scene.nodes_mut() {
            if node.mesh.is_none() {
                continue;
            }

            if node.gpu.is_none() {
                let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("Node Uniform Buffer"),
                    size: std::mem::size_of::<NodeUniform>() as u64,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Node Bind Group"),
                    layout: &self.node_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                });
                node.gpu = Some(NodeGpu { buffer, bind_group });
            }

            let world = node.world_matrix();
            let normal = world.invert().map(|m| m.transpose()).unwrap_or(world);
            let uniform = NodeUniform {
                model: world.into(),
                normal: normal.into(),
                base_color: node.material.base_color,
                emissive: [
                    node.material.emissive[0],
                    node.material.emissive[1],
                    node.material.emissive[2],
                    node.material.shininess,
                ],
                flags: [
                    node.material.shading_index(),
                    node.texture.is_some() as u32,
                    0,
                    0,
                ],
            };
            let gpu = node.gpu.as_ref().unwrap();
            self.queue
                .write_buffer(&gpu.buffer, 0, bytemuck::bytes_of(&uniform));
        }
    }

    /// Draws the scene through its active camera.
    pub fn render_frame(&self, scene: &mut Scene) {
        let globals = GlobalUniform::pack(scene.camera.uniform(), &scene.lights);
        self.queue
            .write_buffer(&self.global_buffer, 0, bytemuck::bytes_of(&globals));

        self.sync_scene(scene);

        let surface_texture = self
            .surface
            .get_current_texture()
            .expect("Failed to get surface texture!");

        let surface_texture_view =
            surface_texture
                .texture
                .create_view(&wgpu::TextureViewDescriptor {
                    format: Some(self.format),
                    ..Default::default()
                });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let [r, g, b] = scene.background;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.global_bind_group, &[]);

            for node in scene.nodes() {
                if !node.visible {
                    continue;
                }
                let (Some(mesh_id), Some(gpu)) = (node.mesh, node.gpu.as_ref()) else {
                    continue;
                };
                let Some(mesh_gpu) = scene.mesh(mesh_id).gpu.as_ref() else {
                    continue;
                };

                let texture_bind_group = node
                    .texture
                    .and_then(|id| scene.texture(id).gpu.as_ref())
                    .and_then(|resource| resource.bind_group.as_ref())
                    .unwrap_or_else(|| self.default_texture.bind_group.as_ref().unwrap());

                render_pass.set_bind_group(1, &gpu.bind_group, &[]);
                render_pass.set_bind_group(2, texture_bind_group, &[]);
                render_pass.set_vertex_buffer(0, mesh_gpu.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(mesh_gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh_gpu.index_count, 0, 0..1);
            }
        }

        self.queue.submit(iter::once(encoder.finish()));
        surface_texture.present();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}
