use anyhow::Result;

/// A compiled vertex + fragment stage pair.
///
/// Invariant: a `ShaderProgram` only exists if both stages compiled; a
/// stage failure is logged and surfaced as `Err`, and the partially
/// created module is dropped. Pipelines built from the program wrap
/// creation in [`link_scope`] so link-time validation failures are caught
/// the same way.
pub struct ShaderProgram {
    pub vertex: wgpu::ShaderModule,
    pub fragment: wgpu::ShaderModule,
}

impl ShaderProgram {
    /// Compiles both stages from WGSL source text.
    ///
    /// Each stage is created inside its own validation error scope so a
    /// diagnostic can be reported per stage. No retries: a failure means
    /// the render path is unavailable.
    pub fn compile(
        device: &wgpu::Device,
        vs_src: &str,
        fs_src: &str,
        label: &str,
    ) -> Result<Self> {
        let vertex = compile_stage(device, vs_src, &format!("{label} vertex stage"))?;
        let fragment = compile_stage(device, fs_src, &format!("{label} fragment stage"))?;
        Ok(Self { vertex, fragment })
    }
}

fn compile_stage(device: &wgpu::Device, src: &str, label: &str) -> Result<wgpu::ShaderModule> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(src.into()),
    });

    if let Some(err) = pollster::block_on(scope.pop()) {
        log::error!("{label} failed to compile: {err}");
        anyhow::bail!("{label} failed to compile");
    }

    Ok(module)
}

/// Runs `build` (typically pipeline creation) inside a validation error
/// scope and converts a captured error into a setup-fatal `Err`.
pub fn link_scope<T>(
    device: &wgpu::Device,
    label: &str,
    build: impl FnOnce() -> T,
) -> Result<T> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let value = build();

    if let Some(err) = pollster::block_on(scope.pop()) {
        log::error!("{label} failed to link: {err}");
        anyhow::bail!("{label} failed to link");
    }

    Ok(value)
}
