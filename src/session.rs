//! Annotation session over one directory of images.
//!
//! The session owns the ordered image list, the cursor and the label store
//! for the open directory. Every user action goes straight to the store;
//! the cached [`CurrentImage`] only mirrors what was last written or read.

use std::path::{Path, PathBuf};

use crate::config::{AppConfig, LabelConfig};
use crate::data::{DiskImages, ImageSource};
use crate::error::{LabelError, Result};
use crate::mapper::{CoordinateMapper, Layout};
use crate::model::{Field, LabelUpdate, LabelView, Point, Quad, Rect};
use crate::ordering::order_points;
use crate::scan;
use crate::store::{LabelStore, StoreSummary};

/// Status line shown before any directory is open.
pub const NO_DIRECTORY: &str = "no directory chosen";

/// The image under the cursor, as last loaded or written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentImage {
    pub width: u32,
    pub height: u32,
    pub layout: Layout,
    pub valid: bool,
    /// Corners in image space, in raw handle order.
    pub points: Quad,
    /// Handle positions in display space.
    pub handles: Quad,
}

/// What the front end draws over the current image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlay {
    pub image_rect: Rect,
    pub valid: bool,
    /// Handle positions; hidden while the image is voided.
    pub handles: Option<Quad>,
    /// Handle centers in top-left, top-right, bottom-right, bottom-left
    /// order; hidden while the image is voided.
    pub boundary: Option<Quad>,
}

/// An open directory and its cursor.
#[derive(Debug)]
pub struct OpenDirectory {
    directory: PathBuf,
    images: Vec<String>,
    index: usize,
    store: LabelStore,
    current: Option<CurrentImage>,
}

impl OpenDirectory {
    fn current_name(&self) -> &str {
        &self.images[self.index]
    }
}

/// Cursor state of a session.
#[derive(Debug, Default)]
pub enum SessionState {
    /// No directory open.
    #[default]
    Empty,
    /// A directory is open with the cursor on one of its images.
    AtImage(OpenDirectory),
}

/// Walks a directory of images, one quad annotation per image.
#[derive(Debug)]
pub struct AnnotationSession<S: ImageSource = DiskImages> {
    mapper: CoordinateMapper,
    labels: LabelConfig,
    source: S,
    state: SessionState,
}

impl AnnotationSession<DiskImages> {
    /// Session reading image sizes from disk, configured from `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.display.mapper(), config.labels.clone(), DiskImages)
    }
}

impl<S: ImageSource> AnnotationSession<S> {
    pub fn new(mapper: CoordinateMapper, labels: LabelConfig, source: S) -> Self {
        Self {
            mapper,
            labels,
            source,
            state: SessionState::Empty,
        }
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SessionState::AtImage(_))
    }

    fn open_dir(&self) -> Option<&OpenDirectory> {
        match &self.state {
            SessionState::AtImage(open) => Some(open),
            SessionState::Empty => None,
        }
    }

    /// Scan `directory` for images and open it.
    pub fn open(&mut self, directory: &Path) -> Result<&CurrentImage> {
        self.close();
        let images = scan::list_images(directory)?;
        self.open_listing(directory, images)
    }

    /// Open `directory` with an already ordered list of image filenames.
    ///
    /// Any previously open directory is released first. An empty list
    /// leaves the session empty.
    pub fn open_listing(&mut self, directory: &Path, images: Vec<String>) -> Result<&CurrentImage> {
        self.close();
        if images.is_empty() {
            log::info!("No images found in {:?}", directory);
            return Err(LabelError::EmptyDirectory {
                path: directory.to_path_buf(),
            });
        }

        let store = LabelStore::open_in_dir(directory, &self.labels.store_filename)?;
        log::info!("Opened {:?} with {} images", directory, images.len());
        self.state = SessionState::AtImage(OpenDirectory {
            directory: directory.to_path_buf(),
            images,
            index: 0,
            store,
            current: None,
        });
        self.load_current()
    }

    /// Release the open directory and its label store.
    pub fn close(&mut self) {
        if let SessionState::AtImage(open) = std::mem::take(&mut self.state) {
            log::debug!("Closed {:?}", open.directory);
        }
    }

    /// Load the record for the image under the cursor, seeding it if absent.
    ///
    /// A missing record becomes `valid` with corners inset from the image
    /// edges, and is written to the store before this returns. On failure
    /// the cached image is left as it was.
    pub fn load_current(&mut self) -> Result<&CurrentImage> {
        let Self {
            mapper,
            labels,
            source,
            state,
        } = self;
        let SessionState::AtImage(open) = state else {
            return Err(LabelError::NoImageOpen);
        };

        let current = read_image(mapper, labels, &*source, open, open.index)?;
        Ok(&*open.current.insert(current))
    }

    /// Move the cursor by `delta` and load that image.
    ///
    /// Moving past either end is a no-op and returns `Ok(false)`. The cursor
    /// only moves once the target image has loaded.
    pub fn navigate(&mut self, delta: isize) -> Result<bool> {
        let Self {
            mapper,
            labels,
            source,
            state,
        } = self;
        let SessionState::AtImage(open) = state else {
            return Err(LabelError::NoImageOpen);
        };

        let Some(target) = open
            .index
            .checked_add_signed(delta)
            .filter(|&i| i < open.images.len())
        else {
            log::debug!("Navigation by {} from {} ignored", delta, open.index);
            return Ok(false);
        };

        let current = read_image(mapper, labels, &*source, open, target)?;
        open.index = target;
        open.current = Some(current);
        Ok(true)
    }

    pub fn next_image(&mut self) -> Result<bool> {
        self.navigate(1)
    }

    pub fn prev_image(&mut self) -> Result<bool> {
        self.navigate(-1)
    }

    pub fn can_prev(&self) -> bool {
        self.open_dir().is_some_and(|open| open.index > 0)
    }

    pub fn can_next(&self) -> bool {
        self.open_dir()
            .is_some_and(|open| open.index + 1 < open.images.len())
    }

    /// Flip the current image's validity. Points are left untouched.
    ///
    /// Returns the new value.
    pub fn toggle_valid(&mut self) -> Result<bool> {
        let SessionState::AtImage(open) = &mut self.state else {
            return Err(LabelError::NoImageOpen);
        };
        let name = open.current_name().to_string();

        let stored = open
            .store
            .get(&name, &[Field::Valid])?
            .and_then(|view| view.valid)
            .ok_or_else(|| LabelError::IncompleteRecord {
                image: name.clone(),
            })?;

        let valid = !stored;
        open.store.upsert(&name, LabelUpdate::valid(valid))?;
        if let Some(current) = open.current.as_mut() {
            current.valid = valid;
        }
        log::debug!("{} is now {}", name, if valid { "valid" } else { "voided" });
        Ok(valid)
    }

    /// Persist handle positions for the current image.
    ///
    /// Each handle is mapped back to image space with the current layout.
    /// Called on every drag tick. Returns the stored image-space corners.
    pub fn commit_points(&mut self, handles: Quad) -> Result<Quad> {
        let SessionState::AtImage(open) = &mut self.state else {
            return Err(LabelError::NoImageOpen);
        };
        let name = open.current_name().to_string();
        let current = open.current.as_mut().ok_or(LabelError::NoImageOpen)?;

        let points = self.mapper.quad_to_image(&handles, current.layout.ratio);
        open.store.upsert(&name, LabelUpdate::points(points))?;
        current.points = points;
        current.handles = handles;
        log::trace!("Committed {:?} for {}", points, name);
        Ok(points)
    }

    /// Move one handle to `to`, clamped to the display box, and commit.
    ///
    /// Handles of a voided image are hidden and cannot be dragged.
    pub fn drag_handle(&mut self, index: usize, to: Point) -> Result<Quad> {
        if index >= 4 {
            return Err(LabelError::HandleOutOfRange { index });
        }
        let current = self.current().ok_or(LabelError::NoImageOpen)?;
        if !current.valid {
            return Err(LabelError::ImageVoided {
                image: self.current_name().unwrap_or_default().to_string(),
            });
        }
        let mut handles = current.handles;
        handles[index] = self.mapper.clamp_handle(to);
        self.commit_points(handles)
    }

    pub fn current(&self) -> Option<&CurrentImage> {
        self.open_dir().and_then(|open| open.current.as_ref())
    }

    pub fn current_name(&self) -> Option<&str> {
        self.open_dir().map(OpenDirectory::current_name)
    }

    /// Cursor position, `None` while empty.
    pub fn index(&self) -> Option<usize> {
        self.open_dir().map(|open| open.index)
    }

    pub fn images(&self) -> &[String] {
        self.open_dir()
            .map(|open| open.images.as_slice())
            .unwrap_or_default()
    }

    pub fn directory(&self) -> Option<&Path> {
        self.open_dir().map(|open| open.directory.as_path())
    }

    pub fn store(&self) -> Option<&LabelStore> {
        self.open_dir().map(|open| &open.store)
    }

    /// Record counts for the open directory.
    pub fn summary(&self) -> Result<StoreSummary> {
        self.store().ok_or(LabelError::NoImageOpen)?.summary()
    }

    /// `"{index+1}/{total} {filename}"`, or a placeholder while empty.
    pub fn status(&self) -> String {
        match self.open_dir() {
            Some(open) => format!(
                "{}/{} {}",
                open.index + 1,
                open.images.len(),
                open.current_name()
            ),
            None => NO_DIRECTORY.to_string(),
        }
    }

    /// Label for the validity toggle.
    pub fn toggle_label(&self) -> &'static str {
        match self.current() {
            Some(current) if !current.valid => "restore",
            _ => "void",
        }
    }

    /// Handles and boundary to draw over the current image.
    pub fn overlay(&self) -> Option<Overlay> {
        let current = self.current()?;
        let visible = current.valid.then_some(current.handles);
        Some(Overlay {
            image_rect: current.layout.image_rect,
            valid: current.valid,
            handles: visible,
            boundary: visible.map(|h| order_points(h.map(|p| self.mapper.handle_center(p)))),
        })
    }
}

/// Read (or seed) the record for `images[index]` without touching the cursor.
fn read_image(
    mapper: &CoordinateMapper,
    labels: &LabelConfig,
    source: &impl ImageSource,
    open: &OpenDirectory,
    index: usize,
) -> Result<CurrentImage> {
    let name = &open.images[index];
    let (width, height) = source.dimensions(&open.directory.join(name))?;
    let layout = mapper.compute_layout(width, height);

    let (valid, points) = match open.store.get(name, Field::all())? {
        Some(LabelView {
            valid: Some(valid),
            points: Some(points),
        }) => (valid, points),
        Some(_) => return Err(LabelError::schema(format!("partial row for '{name}'"))),
        None => {
            let points = Rect::new(0, 0, width, height).inset_corners(labels.default_inset);
            open.store.upsert(name, LabelUpdate::full(true, points))?;
            log::info!("Seeded default label for {}", name);
            (true, points)
        }
    };

    log::debug!("Loaded {} ({}x{}, valid={})", name, width, height, valid);
    Ok(CurrentImage {
        width,
        height,
        layout,
        valid,
        points,
        handles: mapper.quad_to_display(&points, layout.ratio),
    })
}
