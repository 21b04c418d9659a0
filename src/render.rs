use crate::constants::*;
use glam::Mat4;
use stage_core::geometry;
use stage_core::{
    SceneRegistry, SceneRig, FLOOR_HALF_SIZE, MARKER_MAJOR_RADIUS, MARKER_RADIAL_SEGMENTS,
    MARKER_TUBE_RADIUS, MARKER_TUBULAR_SEGMENTS,
};
use web_sys as web;

mod helpers;
use helpers::GpuMesh;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    light_pos: [f32; 4],
    light_color: [f32; 4],
    key_dir: [f32; 4],
    params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Instance {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

const INSTANCE_SIZE: u64 = std::mem::size_of::<Instance>() as u64;

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,

    torus: GpuMesh,
    marker_instances: wgpu::Buffer,
    marker_capacity: u64,
    floor: GpuMesh,
    floor_instance: wgpu::Buffer,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let (_, depth_view) = helpers::create_depth_texture(&device, width, height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = helpers::make_scene_pipeline(&device, &pl, &shader, format, INSTANCE_SIZE);
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let torus = helpers::upload_mesh(
            &device,
            "torus",
            &geometry::torus(
                MARKER_MAJOR_RADIUS,
                MARKER_TUBE_RADIUS,
                MARKER_RADIAL_SEGMENTS,
                MARKER_TUBULAR_SEGMENTS,
            ),
        );
        let floor = helpers::upload_mesh(&device, "floor", &geometry::floor(FLOOR_HALF_SIZE));
        let marker_capacity = 8;
        let marker_instances =
            helpers::create_instance_buffer(&device, "marker_instances", marker_capacity * INSTANCE_SIZE);
        let floor_instance = helpers::create_instance_buffer(&device, "floor_instance", INSTANCE_SIZE);
        queue.write_buffer(
            &floor_instance,
            0,
            bytemuck::bytes_of(&Instance {
                model: Mat4::IDENTITY.to_cols_array_2d(),
                color: FLOOR_COLOR,
            }),
        );
        log::info!("[gpu] ready {}x{} {:?}", width, height, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            pipeline,
            globals_buffer,
            globals_bind_group,
            torus,
            marker_instances,
            marker_capacity,
            floor,
            floor_instance,
            width,
            height,
            clear_color: wgpu::Color {
                r: CLEAR_COLOR[0],
                g: CLEAR_COLOR[1],
                b: CLEAR_COLOR[2],
                a: 1.0,
            },
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            let (_, depth_view) = helpers::create_depth_texture(&self.device, width, height);
            self.depth_view = depth_view;
        }
    }

    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn write_markers(&mut self, registry: &SceneRegistry) -> u32 {
        let instances: Vec<Instance> = registry
            .list_pickable()
            .map(|(_, o)| Instance {
                model: o.transform.matrix().to_cols_array_2d(),
                color: MARKER_COLOR,
            })
            .collect();
        let needed = instances.len() as u64;
        if needed > self.marker_capacity {
            self.marker_capacity = needed.next_power_of_two();
            self.marker_instances = helpers::create_instance_buffer(
                &self.device,
                "marker_instances",
                self.marker_capacity * INSTANCE_SIZE,
            );
        }
        if !instances.is_empty() {
            self.queue
                .write_buffer(&self.marker_instances, 0, bytemuck::cast_slice(&instances));
        }
        instances.len() as u32
    }

    pub fn render(
        &mut self,
        rig: &SceneRig,
        registry: &SceneRegistry,
    ) -> Result<(), wgpu::SurfaceError> {
        let cam = &rig.camera;
        let light = &rig.light;
        let globals = Globals {
            view_proj: cam.view_projection().to_cols_array_2d(),
            eye: cam.eye.extend(1.0).to_array(),
            light_pos: light.position.extend(light.range).to_array(),
            light_color: [
                light.color[0],
                light.color[1],
                light.color[2],
                ACCENT_LIGHT_INTENSITY,
            ],
            key_dir: [
                KEY_LIGHT_DIR[0],
                KEY_LIGHT_DIR[1],
                KEY_LIGHT_DIR[2],
                KEY_LIGHT_INTENSITY,
            ],
            params: [AMBIENT_LEVEL, 0.0, 0.0, 0.0],
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        let marker_count = self.write_markers(registry);

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
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
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.globals_bind_group, &[]);

            rpass.set_vertex_buffer(0, self.floor.vertices.slice(..));
            rpass.set_vertex_buffer(1, self.floor_instance.slice(..));
            rpass.set_index_buffer(self.floor.indices.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..self.floor.index_count, 0, 0..1);

            if marker_count > 0 {
                rpass.set_vertex_buffer(0, self.torus.vertices.slice(..));
                rpass.set_vertex_buffer(1, self.marker_instances.slice(..));
                rpass.set_index_buffer(self.torus.indices.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..self.torus.index_count, 0, 0..marker_count);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
