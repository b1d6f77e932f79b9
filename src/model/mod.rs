//! Data models for quadmark.

mod geometry;
mod label;

pub use geometry::{Point, Quad, Rect};
pub(crate) use geometry::to_i32;
pub use label::{AnnotationRecord, Field, LabelUpdate, LabelView};
