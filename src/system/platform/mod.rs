use super::error::AcquisitionError;
use super::snapshot::CoreTicks;

pub trait PlatformExtensions {
    /// Cumulative idle/total counters of every online core, ordered by core index.
    fn core_ticks() -> Result<Vec<CoreTicks>, AcquisitionError>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
mod unsupported;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(not(any(target_os = "linux", target_os = "macos")))]
use unsupported as platform_impl;

#[cfg(target_os = "linux")]
pub use linux::parse_proc_stat;

pub fn core_ticks() -> Result<Vec<CoreTicks>, AcquisitionError> {
    platform_impl::Platform::core_ticks()
}
