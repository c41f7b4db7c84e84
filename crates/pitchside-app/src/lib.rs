// Pitchside application layer: request validation, the shared ledger cache,
// report assembly and the CLI definition.

pub mod app;
pub mod cli;
pub mod ledger_cache;
pub mod report;
pub mod request;
