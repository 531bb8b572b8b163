use std::time::Duration;

use foxhole::data_structures::texture::Texture;

// Multiple of 256 so rows need no padding for the readback copy
pub const SIZE: u32 = 256;
pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

pub struct Headless {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub target: wgpu::Texture,
    pub depth: Texture,
}

impl Headless {
    pub async fn new() -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .expect("no graphics adapter available for the headless test");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("headless test device"),
                ..Default::default()
            })
            .await
            .expect("could not open the test device");

        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Headless Output Texture"),
            size: extent(),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FORMAT,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth = Texture::create_depth_texture(&device, [SIZE, SIZE], "headless_depth");

        Self {
            device,
            queue,
            target,
            depth,
        }
    }

    pub fn view(&self) -> wgpu::TextureView {
        self.target
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Copy the target back to the CPU.
    pub async fn read_back(&self) -> image::RgbaImage {
        let u32_size = std::mem::size_of::<u32>() as u32;
        let output_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            size: (u32_size * SIZE * SIZE) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            label: None,
            mapped_at_creation: false,
        });
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &self.target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(u32_size * SIZE),
                    rows_per_image: Some(SIZE),
                },
            },
            extent(),
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        let buffer_slice = output_buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            tx.send(result).unwrap();
        });
        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: Some(Duration::from_secs(3)),
            })
            .unwrap();
        rx.receive().await.unwrap().unwrap();
        let data = buffer_slice.get_mapped_range().to_vec();
        image::RgbaImage::from_raw(SIZE, SIZE, data).unwrap()
    }
}

fn extent() -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: SIZE,
        height: SIZE,
        depth_or_array_layers: 1,
    }
}
