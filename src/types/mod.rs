mod coord;
mod quake;

pub use coord::*;
pub use quake::*;
