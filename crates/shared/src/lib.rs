pub mod geometry;
pub mod models;
pub mod scale;

pub use models::{Domain, Flat, Point, ScaleConfig};
