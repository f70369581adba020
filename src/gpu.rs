use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

pub struct GpuContext<'a> {
    pub surface: wgpu::Surface<'a>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub surface_format: wgpu::TextureFormat,
}

impl<'a> GpuContext<'a> {
    /// Fallible end-to-end: the effect is decorative, so a machine without a
    /// usable adapter or surface degrades to "draw nothing" at the call site.
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let window_size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .context("no compatible gpu adapter")?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .context("failed to create device")?;

        let config = surface
            .get_default_config(&adapter, window_size.width.max(1), window_size.height.max(1))
            .context("surface is incompatible with the adapter")?;
        surface.configure(&device, &config);
        let surface_format = config.format;

        Ok(Self {
            surface,
            device,
            queue,
            config,
            surface_format,
        })
    }

    pub fn reconfigure_surface(&self) {
        self.surface.configure(&self.device, &self.config);
    }
}
