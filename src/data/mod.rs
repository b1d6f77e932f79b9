//! Image metadata sources.
//!
//! The session only needs each image's pixel size: it decides where the
//! seeded quad goes and how the image is scaled into the display box.
//! Decoding pixels for painting belongs to the front end.

mod loader;

pub use loader::{DiskImages, ImageSource};
#[cfg(test)]
pub(crate) use loader::FixedDimensions;
