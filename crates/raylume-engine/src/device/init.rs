/// Device and surface preferences, resolved against what the adapter offers.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends to try; `Backends::all()` lets wgpu pick per platform.
    pub backends: wgpu::Backends,

    /// Tracing is GPU-bound, so a discrete adapter is preferred.
    pub power_preference: wgpu::PowerPreference,

    /// Present into an sRGB surface so the linear composite is gamma encoded
    /// on write.
    pub prefer_srgb: bool,

    /// Falls back to FIFO when the surface does not offer it.
    pub present_mode: wgpu::PresentMode,

    /// Core features suffice: one write-only `Rgba32Float` storage image plus
    /// six read-only storage buffers in the compute stage.
    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Hint only; backends may clamp it.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
