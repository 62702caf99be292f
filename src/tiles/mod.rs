mod provider;
mod tile_map;
mod ui;

pub use provider::*;
pub use tile_map::*;
