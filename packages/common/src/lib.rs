pub mod geometry;
pub mod locator;

pub use geometry::*;
pub use locator::*;
