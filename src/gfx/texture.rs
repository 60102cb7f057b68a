//! Texture resources and procedural painters
//!
//! GPU texture/view/sampler bundles for the depth buffer and for the
//! CPU-painted scene textures, plus the painters themselves: a starry
//! night gradient for the skydome and a flower field for the terrain.
//! Both can be repainted at runtime and re-uploaded.

use rand::Rng;

/// GPU texture resource containing texture, view, and sampler
///
/// The color-texture variant also carries the bind group the forward
/// pipeline samples it through; it is created lazily once the pipeline
/// layout exists.
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub(crate) bind_group: Option<wgpu::BindGroup>,
}

impl TextureResource {
    /// Standard depth buffer format used throughout the engine
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth texture matching the surface configuration
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };

        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        };

        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            bind_group: None,
        }
    }

    /// Creates a 2D color texture from raw RGBA data
    pub fn create_from_rgba_data(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let resource = Self {
            texture,
            view,
            sampler,
            bind_group: None,
        };
        resource.upload(queue, data, width, height);
        resource
    }

    /// Re-uploads pixel data into the existing texture.
    pub fn upload(&self, queue: &wgpu::Queue, data: &[u8], width: u32, height: u32) {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }
}

/// An RGBA canvas painted on the CPU.
pub struct Canvas {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; (width * height * 4) as usize],
            width,
            height,
        }
    }

    pub fn fill(&mut self, color: [u8; 3]) {
        for px in self.pixels.chunks_exact_mut(4) {
            px[0] = color[0];
            px[1] = color[1];
            px[2] = color[2];
            px[3] = 255;
        }
    }

    /// Vertical gradient from `top` to `bottom`.
    pub fn fill_vertical_gradient(&mut self, top: [u8; 3], bottom: [u8; 3]) {
        for y in 0..self.height {
            let t = y as f32 / (self.height - 1).max(1) as f32;
            let color = [
                (top[0] as f32 + (bottom[0] as f32 - top[0] as f32) * t) as u8,
                (top[1] as f32 + (bottom[1] as f32 - top[1] as f32) * t) as u8,
                (top[2] as f32 + (bottom[2] as f32 - top[2] as f32) * t) as u8,
            ];
            for x in 0..self.width {
                let i = ((y * self.width + x) * 4) as usize;
                self.pixels[i] = color[0];
                self.pixels[i + 1] = color[1];
                self.pixels[i + 2] = color[2];
                self.pixels[i + 3] = 255;
            }
        }
    }

    /// Filled circle, clipped at the canvas edges.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: [u8; 3]) {
        let x0 = ((cx - radius).floor() as i64).max(0);
        let x1 = ((cx + radius).ceil() as i64).min(self.width as i64 - 1);
        let y0 = ((cy - radius).floor() as i64).max(0);
        let y1 = ((cy + radius).ceil() as i64).min(self.height as i64 - 1);
        if x1 < x0 || y1 < y0 {
            return;
        }
        let (x0, x1, y0, y1) = (x0 as u32, x1 as u32, y0 as u32, y1 as u32);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if dx * dx + dy * dy <= radius * radius {
                    let i = ((y * self.width + x) * 4) as usize;
                    self.pixels[i] = color[0];
                    self.pixels[i + 1] = color[1];
                    self.pixels[i + 2] = color[2];
                    self.pixels[i + 3] = 255;
                }
            }
        }
    }
}

/// Number of stars scattered over the sky canvas.
pub const STAR_COUNT: usize = 1500;
/// Number of flower dots scattered over the field canvas.
pub const FLOWER_COUNT: usize = 1500;

/// Paints the night-sky texture: a dark blue to dark violet gradient
/// sprinkled with white stars.
pub fn paint_star_field<R: Rng>(width: u32, height: u32, rng: &mut R) -> Vec<u8> {
    let mut canvas = Canvas::new(width, height);
    canvas.fill_vertical_gradient([0x0b, 0x14, 0x41], [0x3b, 0x0f, 0x70]);

    for _ in 0..STAR_COUNT {
        let x = rng.random_range(0.0..width as f32);
        let y = rng.random_range(0.0..height as f32);
        let radius = rng.random_range(0.4..0.8) * width as f32 / 1024.0;
        canvas.fill_circle(x, y, radius, [255, 255, 255]);
    }

    canvas.pixels
}

/// Paints the flower-field texture: a light green ground scattered with
/// white, khaki, violet, and light blue dots.
pub fn paint_flower_field<R: Rng>(width: u32, height: u32, rng: &mut R) -> Vec<u8> {
    let mut canvas = Canvas::new(width, height);
    canvas.fill([0xca, 0xff, 0xc4]);

    let colors: [[u8; 3]; 4] = [
        [255, 255, 255],
        [240, 230, 140],
        [238, 130, 238],
        [173, 216, 230],
    ];

    for _ in 0..FLOWER_COUNT {
        let x = rng.random_range(0.0..width as f32);
        let y = rng.random_range(0.0..height as f32);
        let radius = rng.random_range(1.5..3.0) * width as f32 / 1024.0;
        let color = colors[rng.random_range(0..colors.len())];
        canvas.fill_circle(x, y, radius, color);
    }

    canvas.pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_canvas_fill_sets_every_pixel() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill([10, 20, 30]);
        for px in canvas.pixels.chunks_exact(4) {
            assert_eq!(px, &[10, 20, 30, 255]);
        }
    }

    #[test]
    fn test_circle_clips_at_edges() {
        let mut canvas = Canvas::new(8, 8);
        canvas.fill([0, 0, 0]);
        // Center outside the canvas; only the overlap may be painted.
        canvas.fill_circle(-1.0, -1.0, 3.0, [255, 0, 0]);
        assert_eq!(&canvas.pixels[0..3], &[255, 0, 0]);
    }

    #[test]
    fn test_painters_produce_full_rgba_buffers() {
        let mut rng = StdRng::seed_from_u64(7);
        let sky = paint_star_field(64, 64, &mut rng);
        let field = paint_flower_field(64, 64, &mut rng);
        assert_eq!(sky.len(), 64 * 64 * 4);
        assert_eq!(field.len(), 64 * 64 * 4);
        // The gradient keeps the sky dark at the top.
        assert_eq!(sky[3], 255);
        assert!(sky[0] < 0x20 || sky[0] == 255);
    }
}
