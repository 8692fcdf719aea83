pub mod grid;
pub mod physics;
pub mod rules;
pub mod tile;
