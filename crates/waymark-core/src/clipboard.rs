//! Clipboard access and copy-button feedback.

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex, PoisonError};

use crate::flag::TransientFlag;

/// Label shown on a copy button while its flag is set.
pub const COPIED_LABEL: &str = "Copied!";

/// Label shown on a copy button otherwise.
pub const COPY_LABEL: &str = "Copy";

/// Errors that can occur when writing to the clipboard.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("No clipboard is available")]
    Unavailable,

    #[error("Clipboard access denied: {0}")]
    Denied(String),

    #[error("Failed to run clipboard command {program}: {message}")]
    Command { program: String, message: String },
}

/// Platform facility that copies text to the system clipboard.
pub trait Clipboard: Send + Sync {
    /// Copy `text`, replacing the clipboard contents.
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

impl<C: Clipboard + ?Sized> Clipboard for Arc<C> {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        (**self).write_text(text)
    }
}

impl<C: Clipboard + ?Sized> Clipboard for Box<C> {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        (**self).write_text(text)
    }
}

/// Clipboard held in process memory.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text most recently copied.
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
        Ok(())
    }
}

/// Clipboard that is never available.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}

/// Clipboard backed by an external program reading text on stdin,
/// such as `wl-copy`, `pbcopy` or `xclip -selection clipboard`.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// Create a clipboard from a command line (program followed by arguments).
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    fn command_error(&self, message: impl ToString) -> ClipboardError {
        ClipboardError::Command {
            program: self.program.clone(),
            message: message.to_string(),
        }
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.command_error(e))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.command_error("stdin was not captured"))?;
        // The program may exit before reading; its status decides the outcome
        if let Err(e) = stdin.write_all(text.as_bytes()) {
            if e.kind() != ErrorKind::BrokenPipe {
                return Err(self.command_error(e));
            }
        }
        drop(stdin);

        let output = child
            .wait_with_output()
            .map_err(|e| self.command_error(e))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ClipboardError::Denied(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )))
        }
    }
}

/// Copy buttons for a page's code blocks.
#[derive(Debug)]
pub struct CopyButtons<C> {
    clipboard: C,
    flag: TransientFlag,
}

impl<C: Clipboard> CopyButtons<C> {
    /// Create copy buttons writing to `clipboard` with feedback from `flag`.
    pub fn new(clipboard: C, flag: TransientFlag) -> Self {
        Self { clipboard, flag }
    }

    /// Copy `text` for the block `id`.
    ///
    /// The block is flagged as copied even when the clipboard write fails so
    /// the button still acknowledges the click; the write result is returned
    /// for the caller to surface.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn copy(&self, id: &str, text: &str) -> Result<(), ClipboardError> {
        let result = self.clipboard.write_text(text);
        self.flag.trigger(id);

        if let Err(e) = &result {
            tracing::warn!(block = id, "Failed to copy to clipboard: {}", e);
        }

        result
    }

    /// Check whether block `id` was copied recently.
    pub fn is_copied(&self, id: &str) -> bool {
        self.flag.is_active(id)
    }

    /// Button label for block `id`.
    pub fn label(&self, id: &str) -> &'static str {
        if self.is_copied(id) {
            COPIED_LABEL
        } else {
            COPY_LABEL
        }
    }

    /// The flag store behind the buttons.
    pub fn flag(&self) -> &TransientFlag {
        &self.flag
    }

    /// The clipboard the buttons write to.
    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }
}
