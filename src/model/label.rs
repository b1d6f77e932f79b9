//! Per-image label records and the field set used to query and update them.

use std::fmt;
use std::str::FromStr;

use super::geometry::Quad;
use crate::error::LabelError;

/// The persisted annotation for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationRecord {
    /// `false` once the labeler has voided the image.
    pub valid: bool,
    /// Corner coordinates in image space, in raw handle order.
    pub points: Quad,
    /// Epoch seconds of the last write.
    pub modified_at: i64,
}

/// A queryable column group of the label table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The `valid` column
    Valid,
    /// The eight `x1..y4` columns
    Points,
}

impl Field {
    /// Every supported field.
    pub fn all() -> &'static [Field] {
        &[Field::Valid, Field::Points]
    }

    /// Field name as accepted by [`Field::from_str`].
    pub fn name(&self) -> &'static str {
        match self {
            Field::Valid => "valid",
            Field::Points => "points",
        }
    }

    /// Table columns backing this field, in storage order.
    pub(crate) fn columns(&self) -> &'static [&'static str] {
        match self {
            Field::Valid => &["valid"],
            Field::Points => &["x1", "y1", "x2", "y2", "x3", "y3", "x4", "y4"],
        }
    }
}

impl FromStr for Field {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "valid" => Ok(Field::Valid),
            // older label tools call the corner group `point_list`
            "points" | "point_list" => Ok(Field::Points),
            other => Err(LabelError::invalid_field(other)),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The subset of a record returned by a field query.
///
/// Only the requested fields are populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelView {
    pub valid: Option<bool>,
    pub points: Option<Quad>,
}

/// A partial write to a label record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelUpdate {
    pub valid: Option<bool>,
    pub points: Option<Quad>,
}

impl LabelUpdate {
    /// A full record, as required when the image has no row yet.
    pub fn full(valid: bool, points: Quad) -> Self {
        Self {
            valid: Some(valid),
            points: Some(points),
        }
    }

    /// Update only the validity flag.
    pub fn valid(valid: bool) -> Self {
        Self {
            valid: Some(valid),
            points: None,
        }
    }

    /// Update only the corner points.
    pub fn points(points: Quad) -> Self {
        Self {
            valid: None,
            points: Some(points),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.valid.is_none() && self.points.is_none()
    }

    pub fn is_full(&self) -> bool {
        self.valid.is_some() && self.points.is_some()
    }
}
