pub mod geometry;
pub mod mesh;
