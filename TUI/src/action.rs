use chrono::{DateTime, Local};
use std::time::Duration;

use crate::generation::GenerationError;

/// Identifies one outstanding generation request and the prompt that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTag {
    pub request_id: u64,
    pub prompt_id: u32,
}

/// Everything that can change the UI state, from key presses or background tasks.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Switch the gallery filter
    SelectCategory(String),
    /// Cycle to the next category tab
    NextCategory,
    /// Cycle to the previous category tab
    PrevCategory,
    /// Move the highlighted card up
    CursorUp,
    /// Move the highlighted card down
    CursorDown,
    /// Open a prompt in the generator
    SelectPrompt(u32),
    /// Open the highlighted card in the generator
    OpenHighlighted,
    /// Return to the gallery
    Back,
    /// Submit the selected prompt
    Generate,
    /// Copy a prompt body to the clipboard
    Copy(u32),
    /// Copy the highlighted card, or the open prompt on the generator screen
    CopyHighlighted,
    ScrollOutputUp,
    ScrollOutputDown,
    /// Toggle markdown preview / raw text for the output
    ToggleRawOutput,
    /// A generation request completed
    GenerationFinished {
        tag: RequestTag,
        outcome: Result<String, GenerationError>,
        received_at: DateTime<Local>,
    },
    /// The copy feedback delay for a prompt elapsed
    CopyFeedbackExpired { prompt_id: u32, token: u64 },
    /// Quit application
    Quit,
}

/// Side effects requested by a state transition. The App executes them.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    StartGeneration { tag: RequestTag, prompt: String },
    CopyToClipboard { text: String },
    /// Send `CopyFeedbackExpired` for this token once `after` has elapsed
    ScheduleCopyReset {
        prompt_id: u32,
        token: u64,
        after: Duration,
    },
}
