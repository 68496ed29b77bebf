pub mod archetype;
pub mod config;
pub mod context;
pub mod layer;
pub mod placement;
pub mod random;
pub mod scene;
pub mod stage;
