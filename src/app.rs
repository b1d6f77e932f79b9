//! Terminal front end state.
//!
//! Stands in for the windowed surface: it turns [`Message`]s into session
//! calls and renders the session as text.

use std::fmt::Write as _;

use crate::data::ImageSource;
use crate::error::Result;
use crate::message::{HELP, Message};
use crate::ordering::boundary_edges;
use crate::session::AnnotationSession;

/// Whether the input loop should keep going after a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Front end state: the session plus what to print next.
pub struct QuadmarkApp<S: ImageSource> {
    session: AnnotationSession<S>,
}

impl<S: ImageSource> QuadmarkApp<S> {
    pub fn new(session: AnnotationSession<S>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &AnnotationSession<S> {
        &self.session
    }

    /// Apply one message. Output for the user is appended to `out`.
    ///
    /// Store and image errors are returned untouched; the caller decides
    /// whether the session can go on.
    pub fn update(&mut self, message: Message, out: &mut String) -> Result<Flow> {
        match message {
            Message::OpenFolder(dir) => {
                self.session.open(&dir)?;
                self.write_status(out);
            }
            Message::NextImage => {
                if !self.session.next_image()? {
                    out.push_str("already at the last image\n");
                }
                self.write_status(out);
            }
            Message::PrevImage => {
                if !self.session.prev_image()? {
                    out.push_str("already at the first image\n");
                }
                self.write_status(out);
            }
            Message::ToggleValid => {
                let valid = self.session.toggle_valid()?;
                let _ = writeln!(out, "{}", if valid { "restored" } else { "voided" });
                self.write_status(out);
            }
            Message::DragHandle { index, to } => {
                let points = self.session.drag_handle(index, to)?;
                let _ = writeln!(out, "saved {}", format_quad(&points));
            }
            Message::Show => self.write_view(out),
            Message::Summary => {
                let summary = self.session.summary()?;
                let _ = writeln!(
                    out,
                    "{} labeled, {} valid, {} voided",
                    summary.total, summary.valid, summary.voided
                );
            }
            Message::Help => {
                out.push_str(HELP);
                out.push('\n');
            }
            Message::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Status line plus the available controls.
    pub fn write_status(&self, out: &mut String) {
        let _ = write!(out, "{}", self.session.status());
        if self.session.is_open() {
            let _ = write!(
                out,
                "  [{}] [prev{}] [next{}]",
                self.session.toggle_label(),
                if self.session.can_prev() { "" } else { " -" },
                if self.session.can_next() { "" } else { " -" },
            );
        }
        out.push('\n');
    }

    /// Full text rendering of the current image and overlay.
    pub fn write_view(&self, out: &mut String) {
        self.write_status(out);
        let (Some(current), Some(overlay)) = (self.session.current(), self.session.overlay())
        else {
            return;
        };

        let rect = overlay.image_rect;
        let _ = writeln!(
            out,
            "image {}x{} drawn at ({}, {}) size {}x{} ratio {:.4}",
            current.width,
            current.height,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            current.layout.ratio
        );
        let _ = writeln!(out, "points  {}", format_quad(&current.points));

        match (overlay.handles, overlay.boundary) {
            (Some(handles), Some(boundary)) => {
                let _ = writeln!(out, "handles {}", format_quad(&handles));
                for (from, to) in boundary_edges(boundary) {
                    let _ = writeln!(out, "  edge ({}, {}) -> ({}, {})", from.x, from.y, to.x, to.y);
                }
            }
            _ => out.push_str("VOIDED\n"),
        }
    }
}

fn format_quad(points: &crate::model::Quad) -> String {
    points
        .iter()
        .map(|p| format!("({}, {})", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LabelConfig;
    use crate::data::FixedDimensions;
    use crate::mapper::CoordinateMapper;
    use crate::model::Point;

    fn app() -> QuadmarkApp<FixedDimensions> {
        QuadmarkApp::new(AnnotationSession::new(
            CoordinateMapper::new(700, 600, 50, 50, 5),
            LabelConfig::default(),
            FixedDimensions::new(800, 600),
        ))
    }

    #[test]
    fn test_status_before_open() {
        let mut out = String::new();
        app().write_status(&mut out);
        assert_eq!(out, "no directory chosen\n");
    }

    #[test]
    fn test_message_flow() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.png"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        let mut app = app();
        let mut out = String::new();

        app.update(Message::OpenFolder(dir.path().to_path_buf()), &mut out)
            .unwrap();
        assert_eq!(out, "1/2 a.png  [void] [prev -] [next]\n");

        out.clear();
        app.update(Message::PrevImage, &mut out).unwrap();
        assert!(out.starts_with("already at the first image\n"));

        out.clear();
        app.update(
            Message::DragHandle {
                index: 0,
                to: Point::new(345, 270),
            },
            &mut out,
        )
        .unwrap();
        assert!(out.starts_with("saved (401, 301)"));

        out.clear();
        app.update(Message::ToggleValid, &mut out).unwrap();
        app.update(Message::Show, &mut out).unwrap();
        assert!(out.contains("voided\n"));
        assert!(out.contains("VOIDED\n"));

        assert_eq!(app.update(Message::Quit, &mut out).unwrap(), Flow::Quit);
    }
}
