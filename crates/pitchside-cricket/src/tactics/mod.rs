// Player DNA and rule-based tactical scoring.

pub mod player;
pub mod rules;
pub mod scorer;
