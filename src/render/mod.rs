use std::sync::Arc;

use anyhow::{Result, anyhow};
use vello::peniko::Color;
use vello::util::{RenderContext as VelloRenderContext, RenderSurface};
use vello::wgpu;
use vello::{AaConfig, AaSupport, RenderParams, Renderer, RendererOptions, Scene};
use winit::window::Window;

/// Window background behind the component tree.
pub const BASE_COLOR: Color = Color::from_rgb8(20, 20, 20);

/// GPU surface plus the vello renderer driving it.
///
/// Scenes are rendered into an intermediate texture and blitted to the
/// surface; vello's compute pipeline cannot target the swapchain format
/// directly.
pub struct RenderContext {
    context: VelloRenderContext,
    renderers: Vec<Option<Renderer>>,
    surface: RenderSurface<'static>,
    target: Option<RenderTarget>,
    blitter: wgpu::util::TextureBlitter,
    use_cpu: bool,
}

struct RenderTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl RenderContext {
    pub async fn new(window: Arc<Window>, use_cpu: bool) -> Result<Self> {
        let mut context = VelloRenderContext::new();

        let size = window.inner_size();
        let surface = context
            .create_surface(
                window,
                size.width,
                size.height,
                wgpu::PresentMode::AutoVsync,
            )
            .await
            .map_err(|e| anyhow!("failed to create surface: {e}"))?;

        let device = &context.devices[surface.dev_id].device;
        let renderer = Renderer::new(
            device,
            RendererOptions {
                antialiasing_support: AaSupport::all(),
                num_init_threads: None,
                pipeline_cache: None,
                use_cpu,
            },
        )
        .map_err(|e| anyhow!("failed to create renderer: {e}"))?;
        let blitter = wgpu::util::TextureBlitter::new(device, surface.config.format);

        let mut renderers: Vec<Option<Renderer>> = Vec::new();
        renderers.resize_with(surface.dev_id + 1, || None);
        renderers[surface.dev_id] = Some(renderer);

        Ok(Self {
            context,
            renderers,
            surface,
            target: None,
            blitter,
            use_cpu,
        })
    }

    pub fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.context
            .resize_surface(&mut self.surface, size.width, size.height);
        // The intermediate texture no longer matches the surface.
        self.target = None;
    }

    pub fn render(&mut self, scene: &Scene) {
        let width = self.surface.config.width;
        let height = self.surface.config.height;
        if width == 0 || height == 0 {
            return;
        }

        let device_handle = &self.context.devices[self.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let target = self.target.get_or_insert_with(|| {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("render target"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::STORAGE_BINDING
                    | wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            });
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            RenderTarget {
                _texture: texture,
                view,
            }
        });

        if self.renderers.len() <= self.surface.dev_id {
            self.renderers.resize_with(self.surface.dev_id + 1, || None);
        }
        let use_cpu = self.use_cpu;
        let renderer = self.renderers[self.surface.dev_id].get_or_insert_with(|| {
            Renderer::new(
                device,
                RendererOptions {
                    antialiasing_support: AaSupport::all(),
                    num_init_threads: None,
                    pipeline_cache: None,
                    use_cpu,
                },
            )
            .expect("failed to create renderer")
        });

        renderer
            .render_to_texture(
                device,
                queue,
                scene,
                &target.view,
                &RenderParams {
                    base_color: BASE_COLOR,
                    width,
                    height,
                    antialiasing_method: AaConfig::Area,
                },
            )
            .expect("failed to render scene");

        let frame = match self.surface.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface timeout, skipping frame");
                return;
            }
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                // The next resize reconfigures the surface.
                log::warn!("surface outdated, skipping frame");
                return;
            }
            Err(e) => panic!("failed to get surface texture: {e:?}"),
        };
        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("surface blit"),
        });
        self.blitter
            .copy(device, &mut encoder, &target.view, &frame_view);
        queue.submit(Some(encoder.finish()));
        frame.present();
    }
}

pub trait PollsterBlockOn {
    type Output;
    fn pollster_block_on(self) -> Self::Output;
}

impl<F: std::future::Future> PollsterBlockOn for F {
    type Output = F::Output;
    fn pollster_block_on(self) -> Self::Output {
        pollster::block_on(self)
    }
}
