//! Front-end messages.
//!
//! Every user action is a message, parsed from one line of terminal input.

use std::path::PathBuf;

use crate::model::Point;

/// Messages that can be sent to update application state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Open a directory of images
    OpenFolder(PathBuf),
    /// Navigate to previous image
    PrevImage,
    /// Navigate to next image
    NextImage,
    /// Void or restore the current image
    ToggleValid,
    /// Move one handle to a display-space position
    DragHandle { index: usize, to: Point },
    /// Print the current image and overlay
    Show,
    /// Print record counts for the directory
    Summary,
    /// Print the command list
    Help,
    /// Leave the application
    Quit,
}

/// A line that is not a valid command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Command summary printed by `help`.
pub const HELP: &str = "\
commands:
  open <dir>            open a directory of images
  next | n | right      next image
  prev | p | left       previous image
  toggle | t            void or restore the current image
  drag <0-3> <x> <y>    move a handle (display pixels) and save
  show                  print the current image and overlay
  summary               count valid and voided labels
  help                  this text
  quit | q              exit";

impl Message {
    /// Parse one line of terminal input.
    pub fn parse(line: &str) -> Result<Message, CommandError> {
        let mut words = line.split_whitespace();
        let command = words.next().ok_or(CommandError::Empty)?;

        let message = match command.to_lowercase().as_str() {
            "open" => {
                let rest = line.trim_start()[command.len()..].trim();
                if rest.is_empty() {
                    return Err(CommandError::Usage("open <dir>"));
                }
                Message::OpenFolder(PathBuf::from(rest))
            }
            "next" | "n" | "right" => Message::NextImage,
            "prev" | "p" | "left" => Message::PrevImage,
            "toggle" | "t" => Message::ToggleValid,
            "drag" => {
                const USAGE: &str = "drag <0-3> <x> <y>";
                let mut number = || words.next().and_then(|w| w.parse::<i64>().ok());
                let (Some(index), Some(x), Some(y)) = (number(), number(), number()) else {
                    return Err(CommandError::Usage(USAGE));
                };
                let (Ok(index), Ok(x), Ok(y)) =
                    (usize::try_from(index), i32::try_from(x), i32::try_from(y))
                else {
                    return Err(CommandError::Usage(USAGE));
                };
                Message::DragHandle {
                    index,
                    to: Point::new(x, y),
                }
            }
            "show" => Message::Show,
            "summary" => Message::Summary,
            "help" | "?" => Message::Help,
            "quit" | "q" | "exit" => Message::Quit,
            _ => return Err(CommandError::Unknown(command.to_string())),
        };
        Ok(message)
    }
}
