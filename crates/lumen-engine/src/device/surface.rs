use super::error::GpuError;

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = caps.formats.first().copied()?;

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| caps.formats.contains(f)) {
            return Some(f);
        }
    }

    Some(first)
}

/// Requested mode if the surface supports it, otherwise vsync.
pub(crate) fn choose_present_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: wgpu::PresentMode,
) -> wgpu::PresentMode {
    if caps.present_modes.contains(&requested) {
        requested
    } else {
        log::warn!("present mode {requested:?} unsupported; using Fifo");
        wgpu::PresentMode::Fifo
    }
}

pub(crate) fn choose_alpha_mode(caps: &wgpu::SurfaceCapabilities) -> wgpu::CompositeAlphaMode {
    caps.alpha_modes
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// `Lost`/`Outdated` mean the surface must be rebuilt; everything else is fatal for
/// the frame.
pub(crate) fn map_surface_error(call: &'static str, err: wgpu::SurfaceError) -> GpuError {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            GpuError::DeviceLost(super::LossReason::Reset)
        }
        other => GpuError::api(call, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lost_and_outdated_are_resets() {
        assert!(map_surface_error("acquire", wgpu::SurfaceError::Lost).is_device_lost());
        assert!(map_surface_error("acquire", wgpu::SurfaceError::Outdated).is_device_lost());
    }

    #[test] fn timeout_is_fatal() { assert!(!map_surface_error("acquire", wgpu::SurfaceError::Timeout).is_device_lost()); }
}
