use winit::dpi::PhysicalSize;

use super::common::DepthTarget;

/// Number of G-buffer color attachments.
pub const GBUFFER_TARGETS: usize = 5;

/// Attachment formats, in binding order: world position, world normal,
/// diffuse, specular, ambient+shininess.
///
/// Position and normal need sign and range, so they get half-float
/// targets; the three material attachments hold [0,1] colors and fit in
/// 8-bit. The mix keeps the total at 28 bytes per sample, under the
/// 32-byte default limit a 5x half-float layout would blow through.
pub fn gbuffer_color_formats() -> [wgpu::TextureFormat; GBUFFER_TARGETS] {
    [
        wgpu::TextureFormat::Rgba16Float,
        wgpu::TextureFormat::Rgba16Float,
        wgpu::TextureFormat::Rgba8Unorm,
        wgpu::TextureFormat::Rgba8Unorm,
        wgpu::TextureFormat::Rgba8Unorm,
    ]
}

/// Offscreen target set for the deferred geometry pass: five color
/// attachments plus a depth buffer, all sized to the drawable.
pub struct GBuffer {
    views: [wgpu::TextureView; GBUFFER_TARGETS],
    depth: DepthTarget,
    size: PhysicalSize<u32>,
}

impl GBuffer {
    pub fn new(device: &wgpu::Device, size: PhysicalSize<u32>) -> Self {
        let extent = wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        };

        let views = gbuffer_color_formats().map(|format| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some("prism gbuffer attachment"),
                    size: extent,
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                        | wgpu::TextureUsages::TEXTURE_BINDING,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        });

        let depth = DepthTarget::new(device, size, "prism gbuffer depth");

        Self { views, depth, size }
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn views(&self) -> &[wgpu::TextureView; GBUFFER_TARGETS] {
        &self.views
    }

    /// Color attachments for the geometry pass. All five clear to
    /// (0,0,0,1); the zero normal is what the resolve pass keys
    /// background detection on.
    pub fn color_attachments(&self) -> [Option<wgpu::RenderPassColorAttachment<'_>>; GBUFFER_TARGETS] {
        self.views.each_ref().map(|view| {
            Some(wgpu::RenderPassColorAttachment {
                view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.0,
                        g: 0.0,
                        b: 0.0,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })
        })
    }

    pub fn depth_attachment(&self) -> wgpu::RenderPassDepthStencilAttachment<'_> {
        self.depth.attachment()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_attachments() {
        assert_eq!(gbuffer_color_formats().len(), GBUFFER_TARGETS);
    }

    fn bytes_per_sample(format: wgpu::TextureFormat) -> u32 {
        match format {
            wgpu::TextureFormat::Rgba16Float => 8,
            wgpu::TextureFormat::Rgba8Unorm => 4,
            other => panic!("unexpected gbuffer format {other:?}"),
        }
    }

    #[test]
    fn fits_default_color_attachment_byte_budget() {
        let total: u32 = gbuffer_color_formats().iter().map(|&f| bytes_per_sample(f)).sum();
        assert!(total <= wgpu::Limits::default().max_color_attachment_bytes_per_sample);
    }

    #[test]
    fn position_and_normal_keep_sign_and_range() {
        let formats = gbuffer_color_formats();
        assert_eq!(formats[0], wgpu::TextureFormat::Rgba16Float);
        assert_eq!(formats[1], wgpu::TextureFormat::Rgba16Float);
    }
}
