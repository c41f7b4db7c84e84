// Pitch physics: venue catalog and the weather-driven coefficient model.

pub mod model;
pub mod venue;
