use thiserror::Error;

/// Starting size of a query buffer; good for a few dozen access points.
pub const INITIAL_BUFFER_SIZE: usize = 1 << 12;
/// Hard ceiling for a query buffer (2 MiB).
pub const MAXIMUM_BUFFER_SIZE: usize = 2 << 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("initial buffer size must be greater than zero")]
    ZeroInitialBuffer,
    #[error("initial buffer size {initial} exceeds the maximum of {max} bytes")]
    InitialExceedsMax { initial: usize, max: usize },
}

/// Size bounds for the buffer the driver writes scan results into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferLimits {
    initial: usize,
    max: usize,
}

impl BufferLimits {
    pub fn new(initial: usize, max: usize) -> Result<Self, ConfigError> {
        if initial == 0 {
            return Err(ConfigError::ZeroInitialBuffer);
        }
        if initial > max {
            return Err(ConfigError::InitialExceedsMax { initial, max });
        }
        Ok(Self { initial, max })
    }

    pub fn initial(&self) -> usize {
        self.initial
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

impl Default for BufferLimits {
    fn default() -> Self {
        Self {
            initial: INITIAL_BUFFER_SIZE,
            max: MAXIMUM_BUFFER_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Hides the banner printed on startup.
    pub no_banner: bool,
    /// Output verbosity reduction, 0 prints everything.
    pub quiet: u8,
    /// Skips the OUI vendor lookup for each BSSID.
    pub no_vendor: bool,
    /// Queries every interface on its own worker instead of one after another.
    pub parallel: bool,
    pub buffer: BufferLimits,
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
