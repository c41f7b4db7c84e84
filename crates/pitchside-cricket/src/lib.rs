// Cricket analytics engine: pitch physics, tactical scoring, and the
// ball-by-ball history pipeline.

pub mod history;
pub mod physics;
pub mod tactics;
