// Ball-by-ball history: ingestion into a delivery ledger and the matchup,
// phase and scouting queries over it.

pub mod delivery;
pub mod matchup;
pub mod normalize;
pub mod scouting;
