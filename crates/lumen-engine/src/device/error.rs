use std::fmt;

/// Why a device stopped being usable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LossReason {
    /// The device was removed (driver update, adapter unplugged, hang).
    Removed,
    /// The device or its presentation surface was reset.
    Reset,
    /// The system default adapter is no longer the one the device was created on.
    AdapterChanged,
}

impl fmt::Display for LossReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Removed => "device removed",
            Self::Reset => "device reset",
            Self::AdapterChanged => "adapter changed",
        })
    }
}

/// Errors from the GPU layer.
///
/// `DeviceLost` is produced by backends and absorbed by
/// [`GraphicsDevice`](super::GraphicsDevice), which turns it into a recovery cycle.
/// The other two kinds reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    /// No feature level in the requested list is supported by any adapter.
    #[error("GPU device creation failed: {0}")]
    DeviceCreation(String),

    #[error("GPU device lost: {0}")]
    DeviceLost(LossReason),

    /// Any other non-success result from the graphics API.
    #[error("{call} failed: {message}")]
    Api { call: &'static str, message: String },
}

impl GpuError {
    pub fn api(call: &'static str, message: impl fmt::Display) -> Self {
        Self::Api {
            call,
            message: message.to_string(),
        }
    }

    #[inline]
    pub fn is_device_lost(&self) -> bool {
        matches!(self, Self::DeviceLost(_))
    }

    #[inline]
    pub fn loss_reason(&self) -> Option<LossReason> {
        match self {
            Self::DeviceLost(reason) => Some(*reason),
            _ => None,
        }
    }
}

pub type GpuResult<T> = Result<T, GpuError>;
