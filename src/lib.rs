pub mod forest_core;
pub mod renderer;
