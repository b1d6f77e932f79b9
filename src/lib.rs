//! quadmark - quadrilateral region labeling
//!
//! Walks a directory of images and records one four-corner region of
//! interest per image, plus a validity flag, in a SQLite file next to the
//! images. The crate holds everything except painting: coordinate mapping
//! between image and display space, boundary ordering for the overlay, the
//! label store and the navigation session.

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod mapper;
pub mod message;
pub mod model;
pub mod ordering;
pub mod scan;
pub mod session;
pub mod store;

pub use config::AppConfig;
pub use error::{LabelError, Result};
pub use mapper::{CoordinateMapper, Layout};
pub use model::{AnnotationRecord, Field, LabelUpdate, LabelView, Point, Quad, Rect};
pub use ordering::order_points;
pub use session::{AnnotationSession, CurrentImage, Overlay, SessionState};
pub use store::{LabelStore, StoreSummary};
