pub mod collector;
pub mod error;
pub mod platform;
pub mod snapshot;

pub use collector::{Collector, TickSource};
pub use error::AcquisitionError;
pub use snapshot::{CoreTicks, MemoryReading, TickSnapshot};
