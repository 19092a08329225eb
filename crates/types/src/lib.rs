//! Foundation types shared across the trellis workspace: geometry, color and
//! element identity. Deliberately free of any layout logic.

pub mod color;
pub mod geometry;
pub mod ids;

pub use color::Color;
pub use geometry::{BoundingBox, CornerRadius, Dimensions, Padding, Vector2};
pub use ids::{ElementId, hash_number, hash_string, hash_string_indexed};
