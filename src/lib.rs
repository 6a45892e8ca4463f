pub mod config;
pub mod format;
pub mod graph;
pub mod logging;
pub mod sampler;
pub mod system;
