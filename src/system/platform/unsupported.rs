use super::PlatformExtensions;
use crate::system::error::AcquisitionError;
use crate::system::snapshot::CoreTicks;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn core_ticks() -> Result<Vec<CoreTicks>, AcquisitionError> {
        Err(AcquisitionError::Unsupported(std::env::consts::OS))
    }
}
