use crate::geometry::{self, Mesh, Vertex};
use tree_core::constants::*;
use tree_core::{
    check_instance_count, pot_instance, Camera, Category, FoliageInstance, OrnamentInstance, Scene,
    SceneUniforms,
};
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

// Soft glow: colour added on top of what is already there.
const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::Zero,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

const ORNAMENT_INSTANCE_ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    2 => Float32x4,
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
    6 => Float32x4,
];

const MESH_VERTEX_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

struct MeshBuffers {
    vb: wgpu::Buffer,
    ib: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn upload(device: &wgpu::Device, label: &str, mesh: &Mesh) -> Self {
        let vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ib = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vb,
            ib,
            index_count: mesh.indices.len() as u32,
        }
    }
}

/// GPU side of one ornament category: its mesh and a fixed-size instance buffer.
struct OrnamentBatch {
    category: Category,
    mesh: MeshBuffers,
    instance_vb: wgpu::Buffer,
    capacity: usize,
}

pub struct GpuState<'w> {
    pub window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    foliage_pipeline: wgpu::RenderPipeline,
    quad_vb: wgpu::Buffer,
    foliage_vb: wgpu::Buffer,
    foliage_capacity: usize,
    lit_pipeline: wgpu::RenderPipeline,
    unlit_pipeline: wgpu::RenderPipeline,
    batches: Vec<OrnamentBatch>,
    pot_mesh: MeshBuffers,
    pot_vb: wgpu::Buffer,
    clear_color: wgpu::Color,
}

impl<'w> GpuState<'w> {
    pub async fn new(window: &'w winit::window::Window, scene: &Scene) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, config.width, config.height);
        log::info!(
            "[gpu] adapter={} format={:?} size={}x{}",
            adapter.get_info().name,
            format,
            config.width,
            config.height
        );

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        // ---------------- Foliage: instanced quads ----------------
        let quad_vertices: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        scene.check_instance_counts()?;
        let (foliage_capacity, counts) = scene.expected_counts();
        let foliage_vb = create_instance_buffer::<FoliageInstance>(&device, "foliage_vb", foliage_capacity);

        let foliage_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("foliage"),
            source: wgpu::ShaderSource::Wgsl(tree_core::FOLIAGE_WGSL.into()),
        });
        let foliage_buffers = [
            // slot 0: quad corners
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: per-point instance data
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<FoliageInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 1,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 12,
                        shader_location: 2,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x4,
                        offset: 16,
                        shader_location: 3,
                    },
                ],
            },
        ];
        let foliage_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("foliage_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &foliage_shader,
                entry_point: Some("vs_main"),
                buffers: &foliage_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &foliage_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(ADDITIVE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        // ---------------- Ornaments: instanced meshes ----------------
        let ornament_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ornament"),
            source: wgpu::ShaderSource::Wgsl(tree_core::ORNAMENT_WGSL.into()),
        });
        let ornament_buffers = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &MESH_VERTEX_ATTRS,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<OrnamentInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &ORNAMENT_INSTANCE_ATTRS,
            },
        ];
        let ornament_pipeline = |label: &str, fs_entry: &str| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &ornament_shader,
                    entry_point: Some("vs_main"),
                    buffers: &ornament_buffers,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &ornament_shader,
                    entry_point: Some(fs_entry),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                cache: None,
                multiview: None,
            })
        };
        let lit_pipeline = ornament_pipeline("ornament_lit", "fs_lit");
        let unlit_pipeline = ornament_pipeline("ornament_unlit", "fs_unlit");

        let mut batches = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let mesh = match category {
                Category::Ball => geometry::uv_sphere(16, 16),
                Category::Gift => geometry::cube(),
                Category::Light => geometry::uv_sphere(8, 8),
            };
            let capacity = counts.get(category);
            let label = format!("{category:?}_instances");
            batches.push(OrnamentBatch {
                category,
                mesh: MeshBuffers::upload(&device, &format!("{category:?}_mesh"), &mesh),
                instance_vb: create_instance_buffer::<OrnamentInstance>(&device, &label, capacity),
                capacity,
            });
        }

        let pot_mesh = MeshBuffers::upload(
            &device,
            "pot_mesh",
            &geometry::cylinder(POT_RADIUS_TOP, POT_RADIUS_BOTTOM, POT_HEIGHT, POT_SEGMENTS),
        );
        let pot_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("pot_instance"),
            contents: bytemuck::bytes_of(&pot_instance()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let bg = srgb_to_linear_vec3(BACKGROUND);
        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            depth_view,
            uniform_buffer,
            bind_group,
            foliage_pipeline,
            quad_vb,
            foliage_vb,
            foliage_capacity,
            lit_pipeline,
            unlit_pipeline,
            batches,
            pot_mesh,
            pot_vb,
            clear_color: wgpu::Color {
                r: bg.x as f64,
                g: bg.y as f64,
                b: bg.z as f64,
                a: 1.0,
            },
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, new_size.width, new_size.height);
    }

    pub fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    pub fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&scene.uniforms(camera)),
        );
        // A buffer whose instance count no longer matches is skipped whole.
        let foliage = scene.foliage();
        let draw_foliage =
            match check_instance_count("foliage", self.foliage_capacity, foliage.len()) {
                Ok(()) => self.foliage_capacity > 0,
                Err(err) => {
                    log::error!("[gpu] {err}; foliage not drawn");
                    false
                }
            };
        if draw_foliage {
            self.queue
                .write_buffer(&self.foliage_vb, 0, bytemuck::cast_slice(foliage));
        }
        let mut draw_batch = [false; 3];
        for (batch, draw) in self.batches.iter().zip(draw_batch.iter_mut()) {
            let instances = scene.ornaments(batch.category);
            let label = batch.category.label();
            *draw = match check_instance_count(label, batch.capacity, instances.len()) {
                Ok(()) => batch.capacity > 0,
                Err(err) => {
                    log::error!("[gpu] {err}; {label} ornaments not drawn");
                    false
                }
            };
            if *draw {
                self.queue
                    .write_buffer(&batch.instance_vb, 0, bytemuck::cast_slice(instances));
            }
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.bind_group, &[]);

            // Opaque pot and ornaments first so the additive foliage is depth tested against them.
            rpass.set_pipeline(&self.lit_pipeline);
            rpass.set_vertex_buffer(0, self.pot_mesh.vb.slice(..));
            rpass.set_vertex_buffer(1, self.pot_vb.slice(..));
            rpass.set_index_buffer(self.pot_mesh.ib.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..self.pot_mesh.index_count, 0, 0..1);

            for (batch, draw) in self.batches.iter().zip(draw_batch) {
                if !draw {
                    continue;
                }
                let pipeline = if batch.category.is_emissive() {
                    &self.unlit_pipeline
                } else {
                    &self.lit_pipeline
                };
                rpass.set_pipeline(pipeline);
                rpass.set_vertex_buffer(0, batch.mesh.vb.slice(..));
                rpass.set_vertex_buffer(1, batch.instance_vb.slice(..));
                rpass.set_index_buffer(batch.mesh.ib.slice(..), wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(0..batch.mesh.index_count, 0, 0..batch.capacity as u32);
            }

            if draw_foliage {
                rpass.set_pipeline(&self.foliage_pipeline);
                rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
                rpass.set_vertex_buffer(1, self.foliage_vb.slice(..));
                rpass.draw(0..6, 0..self.foliage_capacity as u32);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn create_instance_buffer<T>(device: &wgpu::Device, label: &str, count: usize) -> wgpu::Buffer {
    // never zero-sized: empty categories still get a valid (unused) buffer
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (std::mem::size_of::<T>() * count.max(1)) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
