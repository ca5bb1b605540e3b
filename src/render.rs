use crate::core::camera::Camera;
use crate::core::constants::WIREFRAME_RGB;
use crate::core::mesh::HeadMesh;
use crate::core::rig::FaceRig;
use crate::core::viewport::ViewportChange;
use web_sys as web;

mod helpers;
mod post;
mod scene;
mod targets;
use scene::{HeadBuffers, SceneResources};
use targets::RenderTargets;

// ===================== WebGPU state =====================

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    scene: SceneResources,
    head: Option<HeadBuffers>,
    // Post-processing resources
    targets: RenderTargets,
    linear_sampler: wgpu::Sampler,
    post: post::PostResources,
    bind_groups: post::PostBindGroups,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
    camera: Camera,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement, background: [f32; 3]) -> anyhow::Result<Self> {
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
                    // Default limits keep older WebGPU implementations happy
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

        let targets = RenderTargets::new(&device, width, height);
        let scene = scene::create_scene_resources(&device);

        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::POST_WGSL.into()),
        });
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let post = post::create_post_resources(&device, &post_shader, helpers::HDR_FORMAT, format);
        let bind_groups = post::rebuild_bind_groups(
            &device,
            &post,
            &linear_sampler,
            &targets.hdr_view,
            &targets.bloom_a_view,
            &targets.bloom_b_view,
        );

        let [r, g, b] = background;
        Ok(Self {
            surface,
            device,
            queue,
            config,
            scene,
            head: None,
            targets,
            linear_sampler,
            post,
            bind_groups,
            width,
            height,
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            },
            camera: Camera::new(width as f32 / height as f32),
        })
    }

    /// Upload head geometry. Until this runs only the background is drawn.
    pub fn upload_head(&mut self, mesh: &HeadMesh) {
        let buffers = scene::upload_head(&self.device, mesh);
        log::info!(
            "[gpu] head uploaded: {} triangles, {} wire edges",
            buffers.triangle_count / 3,
            buffers.line_count / 2
        );
        self.head = Some(buffers);
    }

    pub fn apply_viewport(&mut self, change: ViewportChange) {
        self.camera.aspect = change.aspect;
        self.resize_if_needed(change.width_px, change.height_px);
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

            // Recreate offscreen render targets and dependent bind groups
            self.targets.recreate(&self.device, width, height);
            self.bind_groups = post::rebuild_bind_groups(
                &self.device,
                &self.post,
                &self.linear_sampler,
                &self.targets.hdr_view,
                &self.targets.bloom_a_view,
                &self.targets.bloom_b_view,
            );
        }
    }

    /// Reapply the current surface configuration after a lost or outdated frame.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Draw one frame. With no rig (still loading or failed) the scene pass
    /// only clears to the background.
    pub fn render(&mut self, rig: Option<&FaceRig>) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        let drawable = rig.zip(self.head.as_ref());
        if let Some((rig, _)) = drawable {
            self.camera.pose = rig.camera;
            let uniforms =
                scene::head_uniforms(self.camera.view_projection(), rig, WIREFRAME_RGB);
            self.queue.write_buffer(
                &self.scene.uniform_buffer,
                0,
                bytemuck::bytes_of(&uniforms),
            );
            let discs = scene::pack_discs(rig);
            self.queue
                .write_buffer(&self.scene.disc_buffer, 0, bytemuck::cast_slice(&discs[..]));
        }

        // Pass 1: scene into HDR
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.hdr_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if let Some((_, head)) = drawable {
                rpass.set_bind_group(0, &self.scene.bind_group, &[]);
                rpass.set_vertex_buffer(0, head.vertices.slice(..));

                rpass.set_pipeline(&self.scene.occluder_pipeline);
                rpass.set_index_buffer(head.triangles.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..head.triangle_count, 0, 0..1);

                rpass.set_pipeline(&self.scene.wire_pipeline);
                rpass.set_index_buffer(head.lines.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..head.line_count, 0, 0..1);

                rpass.set_pipeline(&self.scene.disc_pipeline);
                rpass.set_vertex_buffer(0, self.scene.disc_buffer.slice(..));
                rpass.draw(0..6, 0..scene::DISC_CAPACITY as u32);
            }
        }

        let bloom = rig.map(|r| r.bloom_strength).unwrap_or(0.0);
        post::write_post_uniforms(&self.queue, &self.post, self.width, self.height, bloom);

        // Pass 2: bright pass → bloom_a
        post::blit(
            &mut encoder,
            "bright_pass",
            &self.targets.bloom_a_view,
            wgpu::Color::BLACK,
            &self.post.bright_pipeline,
            &self.bind_groups.hdr,
            None,
        );
        // Pass 3: blur horizontal bloom_a -> bloom_b
        post::blit(
            &mut encoder,
            "blur_h",
            &self.targets.bloom_b_view,
            wgpu::Color::BLACK,
            &self.post.blur_pipeline,
            &self.bind_groups.from_bloom_a,
            None,
        );
        // Pass 4: blur vertical bloom_b -> bloom_a
        post::blit(
            &mut encoder,
            "blur_v",
            &self.targets.bloom_a_view,
            wgpu::Color::BLACK,
            &self.post.blur_pipeline,
            &self.bind_groups.from_bloom_b,
            None,
        );
        // Pass 5: composite to swapchain
        post::blit(
            &mut encoder,
            "composite",
            &view,
            self.clear_color,
            &self.post.composite_pipeline,
            &self.bind_groups.hdr,
            Some(&self.bind_groups.bloom_a_only),
        );

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
