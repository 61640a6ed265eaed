use std::sync::Arc;

/// Routes device errors nobody captured to the log instead of panicking.
///
/// Without a handler wgpu aborts the process on the first validation error.
pub fn log_uncaptured_errors(device: &wgpu::Device) {
    device.on_uncaptured_error(Arc::new(|err: wgpu::Error| {
        log::error!("wgpu: {err}");
    }));
}

/// Runs `op` inside a validation error scope.
///
/// Returns the value together with the validation message, if any.
pub fn scoped<T>(device: &wgpu::Device, op: impl FnOnce() -> T) -> (T, Option<String>) {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = op();
    let err = pollster::block_on(scope.pop());
    (value, err.map(|e| e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_device() -> wgpu::Device {
        wgpu::Device::noop(&wgpu::DeviceDescriptor::default()).0
    }

    fn oversized_texture(device: &wgpu::Device) -> wgpu::Texture {
        let side = device.limits().max_texture_dimension_2d + 1;
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("oversized"),
            size: wgpu::Extent3d {
                width: side,
                height: 1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        })
    }

    #[test]
    fn scope_captures_validation_error() {
        let device = noop_device();
        let (_tex, err) = scoped(&device, || oversized_texture(&device));
        assert!(err.is_some());
    }

    #[test]
    fn scope_is_empty_for_valid_work() {
        let device = noop_device();
        let (_buf, err) = scoped(&device, || {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: None,
                size: 64,
                usage: wgpu::BufferUsages::VERTEX,
                mapped_at_creation: false,
            })
        });
        assert!(err.is_none());
    }

    #[test]
    fn uncaptured_errors_are_logged_not_raised() {
        let device = noop_device();
        log_uncaptured_errors(&device);
        let _tex = oversized_texture(&device);
    }
}
