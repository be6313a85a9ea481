//! Best-effort writes to the system clipboard.

use arboard::Clipboard;
use tracing::{debug, warn};

pub struct ClipboardBridge {
    clipboard: Option<Clipboard>,
    enabled: bool,
}

impl ClipboardBridge {
    pub fn new() -> Self {
        Self {
            clipboard: None,
            enabled: true,
        }
    }

    /// A bridge that never touches the system clipboard.
    pub fn disabled() -> Self {
        Self {
            clipboard: None,
            enabled: false,
        }
    }

    /// Write `text` to the clipboard. Failures are logged, never returned.
    pub fn copy(&mut self, text: &str) {
        if !self.enabled {
            debug!(len = text.len(), "clipboard disabled, skipping copy");
            return;
        }

        // Opened lazily: headless sessions have no clipboard at all
        if self.clipboard.is_none() {
            match Clipboard::new() {
                Ok(clipboard) => self.clipboard = Some(clipboard),
                Err(e) => {
                    warn!(error = %e, "clipboard unavailable");
                    return;
                }
            }
        }

        if let Some(clipboard) = self.clipboard.as_mut() {
            if let Err(e) = clipboard.set_text(text.to_string()) {
                warn!(error = %e, "clipboard write failed");
                // Drop the handle so the next copy reopens it
                self.clipboard = None;
            }
        }
    }
}

impl Default for ClipboardBridge {
    fn default() -> Self {
        Self::new()
    }
}
