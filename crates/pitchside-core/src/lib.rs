// Shared infrastructure for the pitchside workspace: configuration loading
// and tracing setup.

pub mod config;
pub mod logging;
