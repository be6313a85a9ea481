use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::time::Duration;

use crate::action::{Action, Effect, RequestTag};
use crate::catalog::{PromptCatalog, PromptRecord, ALL_CATEGORY};

/// Label shown on a card right after its prompt was copied.
pub const COPIED_LABEL: &str = "Copied!";
/// Label shown on a card with no pending copy feedback.
pub const COPY_LABEL: &str = "Copy";
/// Shown in place of the output when generation fails.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Sorry, something went wrong. Please check the log for details.";
/// How long a card keeps the copied label unless overridden.
pub const COPY_FEEDBACK_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Gallery,
    Generator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyFeedback {
    pub label: String,
    /// Most recent copy of this prompt; older resets carry a smaller token.
    pub token: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UIState {
    pub screen: Screen,
    pub active_category: String,
    pub selected_prompt: Option<PromptRecord>,
    pub generated_text: String,
    pub generated_at: Option<DateTime<Local>>,
    pub is_loading: bool,
    pub copy_feedback: HashMap<u32, CopyFeedback>,

    // Highlighted card within the filtered gallery list
    pub cursor: usize,

    /// The outstanding generation request, if any. Survives `Back` and is
    /// only cleared when that request finishes, so at most one is ever open.
    pub in_flight: Option<RequestTag>,

    // Output panel
    pub output_scroll: u16,
    pub show_raw_output: bool,

    pub should_quit: bool,

    copy_feedback_delay: Duration,
    next_request_id: u64,
    next_copy_token: u64,
}

impl Default for UIState {
    fn default() -> Self {
        Self::new()
    }
}

impl UIState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Gallery,
            active_category: ALL_CATEGORY.to_string(),
            selected_prompt: None,
            generated_text: String::new(),
            generated_at: None,
            is_loading: false,
            copy_feedback: HashMap::new(),
            cursor: 0,
            in_flight: None,
            output_scroll: 0,
            show_raw_output: false,
            should_quit: false,
            copy_feedback_delay: COPY_FEEDBACK_DELAY,
            next_request_id: 0,
            next_copy_token: 0,
        }
    }

    pub fn with_copy_feedback_delay(delay: Duration) -> Self {
        Self {
            copy_feedback_delay: delay,
            ..Self::new()
        }
    }

    /// Label for a card's copy button.
    pub fn copy_label(&self, prompt_id: u32) -> &str {
        self.copy_feedback
            .get(&prompt_id)
            .map(|f| f.label.as_str())
            .unwrap_or(COPY_LABEL)
    }

    /// Prompt under the cursor on the gallery screen.
    pub fn highlighted<'a>(&self, catalog: &'a PromptCatalog) -> Option<&'a PromptRecord> {
        catalog
            .filter(&self.active_category)
            .get(self.cursor)
            .copied()
    }

    /// Apply one action. Pure: the returned effects describe the I/O to run.
    pub fn apply(mut self, action: Action, catalog: &PromptCatalog) -> (Self, Vec<Effect>) {
        let mut effects = Vec::new();

        match (self.screen, action) {
            (_, Action::Quit) => {
                self.should_quit = true;
            }

            (Screen::Gallery, Action::SelectCategory(category)) => {
                self.select_category(category, catalog);
            }
            (Screen::Gallery, Action::NextCategory) => {
                self.cycle_category(catalog, true);
            }
            (Screen::Gallery, Action::PrevCategory) => {
                self.cycle_category(catalog, false);
            }
            (Screen::Gallery, Action::CursorUp) => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            (Screen::Gallery, Action::CursorDown) => {
                let len = catalog.filter(&self.active_category).len();
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
            }
            (Screen::Gallery, Action::SelectPrompt(id)) => {
                if let Some(prompt) = catalog.get(id) {
                    self.open_prompt(prompt.clone());
                }
            }
            (Screen::Gallery, Action::OpenHighlighted) => {
                if let Some(prompt) = self.highlighted(catalog).cloned() {
                    self.open_prompt(prompt);
                }
            }
            (Screen::Gallery, Action::CopyHighlighted) => {
                if let Some(id) = self.highlighted(catalog).map(|p| p.id) {
                    self.copy(id, catalog, &mut effects);
                }
            }

            (Screen::Generator, Action::Back) => {
                self.screen = Screen::Gallery;
                self.selected_prompt = None;
                self.generated_text.clear();
                self.generated_at = None;
                // The request keeps running; only the spinner goes away
                self.is_loading = false;
                self.output_scroll = 0;
            }
            (Screen::Generator, Action::Generate) => {
                if let Some(effect) = self.start_generation() {
                    effects.push(effect);
                }
            }
            (Screen::Generator, Action::CopyHighlighted) => {
                if let Some(id) = self.selected_prompt.as_ref().map(|p| p.id) {
                    self.copy(id, catalog, &mut effects);
                }
            }
            (Screen::Generator, Action::ScrollOutputUp) => {
                self.output_scroll = self.output_scroll.saturating_sub(1);
            }
            (Screen::Generator, Action::ScrollOutputDown) => {
                self.output_scroll = self.output_scroll.saturating_add(1);
            }
            (Screen::Generator, Action::ToggleRawOutput) => {
                self.show_raw_output = !self.show_raw_output;
            }

            (_, Action::Copy(id)) => {
                self.copy(id, catalog, &mut effects);
            }
            (_, Action::GenerationFinished { tag, outcome, received_at }) => {
                self.finish_generation(tag, outcome, received_at);
            }
            (_, Action::CopyFeedbackExpired { prompt_id, token }) => {
                let latest = self.copy_feedback.get(&prompt_id).map(|f| f.token);
                if latest == Some(token) {
                    self.copy_feedback.remove(&prompt_id);
                }
            }

            // Everything else is not valid on the current screen
            _ => {}
        }

        (self, effects)
    }

    fn select_category(&mut self, category: String, catalog: &PromptCatalog) {
        if category == self.active_category {
            return;
        }
        if !catalog.categories().contains(&category) {
            return;
        }
        self.active_category = category;
        self.cursor = 0;
    }

    fn cycle_category(&mut self, catalog: &PromptCatalog, forward: bool) {
        let categories = catalog.categories();
        let current = categories
            .iter()
            .position(|c| *c == self.active_category)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % categories.len()
        } else {
            (current + categories.len() - 1) % categories.len()
        };
        self.select_category(categories[next].clone(), catalog);
    }

    fn open_prompt(&mut self, prompt: PromptRecord) {
        self.screen = Screen::Generator;
        self.selected_prompt = Some(prompt);
        self.generated_text.clear();
        self.generated_at = None;
        self.output_scroll = 0;
        self.is_loading = self.in_flight.is_some();
    }

    fn start_generation(&mut self) -> Option<Effect> {
        if self.in_flight.is_some() {
            return None;
        }
        let prompt = self.selected_prompt.as_ref()?;

        self.next_request_id += 1;
        let tag = RequestTag {
            request_id: self.next_request_id,
            prompt_id: prompt.id,
        };
        let body = prompt.body.clone();

        self.is_loading = true;
        self.generated_text.clear();
        self.generated_at = None;
        self.output_scroll = 0;
        self.in_flight = Some(tag);

        Some(Effect::StartGeneration { tag, prompt: body })
    }

    fn finish_generation(
        &mut self,
        tag: RequestTag,
        outcome: Result<String, crate::generation::GenerationError>,
        received_at: DateTime<Local>,
    ) {
        if self.in_flight != Some(tag) {
            return;
        }
        self.in_flight = None;
        self.is_loading = false;

        let selected_id = self.selected_prompt.as_ref().map(|p| p.id);
        if self.screen != Screen::Generator || selected_id != Some(tag.prompt_id) {
            // The user moved on to another prompt; drop the result
            return;
        }

        self.generated_text = match outcome {
            Ok(text) => text,
            Err(_) => GENERATION_FAILED_MESSAGE.to_string(),
        };
        self.generated_at = Some(received_at);
    }

    fn copy(&mut self, prompt_id: u32, catalog: &PromptCatalog, effects: &mut Vec<Effect>) {
        let Some(prompt) = catalog.get(prompt_id) else {
            return;
        };

        self.next_copy_token += 1;
        let token = self.next_copy_token;
        self.copy_feedback.insert(
            prompt_id,
            CopyFeedback {
                label: COPIED_LABEL.to_string(),
                token,
            },
        );

        effects.push(Effect::CopyToClipboard {
            text: prompt.body.clone(),
        });
        effects.push(Effect::ScheduleCopyReset {
            prompt_id,
            token,
            after: self.copy_feedback_delay,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::GenerationError;

    fn catalog() -> PromptCatalog {
        PromptCatalog::embedded().unwrap()
    }

    fn run(state: UIState, actions: Vec<Action>) -> (UIState, Vec<Effect>) {
        let catalog = catalog();
        let mut state = state;
        let mut all_effects = Vec::new();
        for action in actions {
            let (next, effects) = state.apply(action, &catalog);
            state = next;
            all_effects.extend(effects);
        }
        (state, all_effects)
    }

    fn finished(tag: RequestTag, outcome: Result<String, GenerationError>) -> Action {
        Action::GenerationFinished {
            tag,
            outcome,
            received_at: Local::now(),
        }
    }

    fn started_tag(effects: &[Effect]) -> RequestTag {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::StartGeneration { tag, .. } => Some(*tag),
                _ => None,
            })
            .expect("no generation started")
    }

    #[test]
    fn test_initial_state() {
        let state = UIState::new();

        assert_eq!(state.screen, Screen::Gallery);
        assert_eq!(state.active_category, "All");
        assert!(state.selected_prompt.is_none());
        assert!(state.generated_text.is_empty());
        assert!(!state.is_loading);
        assert_eq!(state.copy_label(1), COPY_LABEL);
    }

    #[test]
    fn test_select_prompt_opens_generator() {
        let (state, effects) = run(UIState::new(), vec![Action::SelectPrompt(3)]);

        assert_eq!(state.screen, Screen::Generator);
        assert_eq!(state.selected_prompt.as_ref().map(|p| p.id), Some(3));
        assert!(state.generated_text.is_empty());
        assert!(effects.is_empty());
    }

    #[test]
    fn test_select_then_back_restores_gallery() {
        let (state, _) = run(
            UIState::new(),
            vec![Action::SelectPrompt(3), Action::Back],
        );

        assert_eq!(state.screen, Screen::Gallery);
        assert!(state.selected_prompt.is_none());
        assert!(state.generated_text.is_empty());
    }

    #[test]
    fn test_select_unknown_prompt_is_noop() {
        let (state, _) = run(UIState::new(), vec![Action::SelectPrompt(42)]);

        assert_eq!(state, UIState::new());
    }

    #[test]
    fn test_select_category() {
        let (state, _) = run(
            UIState::new(),
            vec![
                Action::CursorDown,
                Action::SelectCategory("Coding".to_string()),
            ],
        );

        assert_eq!(state.active_category, "Coding");
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_select_active_category_is_noop() {
        let (state, _) = run(
            UIState::new(),
            vec![
                Action::SelectCategory("Coding".to_string()),
                Action::CursorDown,
                Action::SelectCategory("Coding".to_string()),
            ],
        );

        // Cursor is not reset when re-selecting the active category
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn test_select_unknown_category_is_ignored() {
        let (state, _) = run(
            UIState::new(),
            vec![Action::SelectCategory("Cooking".to_string())],
        );

        assert_eq!(state.active_category, "All");
    }

    #[test]
    fn test_category_cycling_wraps() {
        let (state, _) = run(UIState::new(), vec![Action::PrevCategory]);
        assert_eq!(state.active_category, "Productivity");

        let (state, _) = run(state, vec![Action::NextCategory, Action::NextCategory]);
        assert_eq!(state.active_category, "Creative");
    }

    #[test]
    fn test_cursor_is_clamped_to_filtered_list() {
        let (state, _) = run(
            UIState::new(),
            vec![
                Action::SelectCategory("Coding".to_string()),
                Action::CursorDown,
                Action::CursorDown,
                Action::CursorDown,
            ],
        );
        assert_eq!(state.cursor, 1);

        let (state, _) = run(state, vec![Action::CursorUp, Action::CursorUp]);
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_open_highlighted_uses_filtered_list() {
        let (state, _) = run(
            UIState::new(),
            vec![
                Action::SelectCategory("Coding".to_string()),
                Action::CursorDown,
                Action::OpenHighlighted,
            ],
        );

        assert_eq!(state.selected_prompt.as_ref().map(|p| p.id), Some(7));
    }

    #[test]
    fn test_generate_on_gallery_is_noop() {
        let (state, effects) = run(UIState::new(), vec![Action::Generate]);

        assert!(effects.is_empty());
        assert!(!state.is_loading);
    }

    #[test]
    fn test_generate_starts_request() {
        let (state, effects) = run(
            UIState::new(),
            vec![Action::SelectPrompt(5), Action::Generate],
        );

        assert!(state.is_loading);
        assert!(state.generated_text.is_empty());
        assert_eq!(effects.len(), 1);
        match &effects[0] {
            Effect::StartGeneration { tag, prompt } => {
                assert_eq!(tag.prompt_id, 5);
                assert_eq!(
                    prompt,
                    "Write a haiku about the feeling of a city street after a rainstorm."
                );
            }
            other => panic!("unexpected effect: {:?}", other),
        }
    }

    #[test]
    fn test_generate_while_loading_is_noop() {
        let (state, effects) = run(
            UIState::new(),
            vec![Action::SelectPrompt(5), Action::Generate, Action::Generate],
        );

        assert!(state.is_loading);
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn test_generation_success_sets_text() {
        let (state, effects) = run(
            UIState::new(),
            vec![Action::SelectPrompt(5), Action::Generate],
        );
        let tag = started_tag(&effects);

        let (state, _) = run(state, vec![finished(tag, Ok("Puddles hold the sky".to_string()))]);

        assert_eq!(state.generated_text, "Puddles hold the sky");
        assert!(!state.is_loading);
        assert!(state.in_flight.is_none());
        assert!(state.generated_at.is_some());
    }

    #[test]
    fn test_generation_failure_sets_fixed_message() {
        let (state, effects) = run(
            UIState::new(),
            vec![Action::SelectPrompt(5), Action::Generate],
        );
        let tag = started_tag(&effects);

        let (state, _) = run(
            state,
            vec![finished(
                tag,
                Err(GenerationError::Network("connection refused".to_string())),
            )],
        );

        assert_eq!(state.generated_text, GENERATION_FAILED_MESSAGE);
        assert!(!state.is_loading);
    }

    #[test]
    fn test_regenerate_clears_previous_text() {
        let (state, effects) = run(
            UIState::new(),
            vec![Action::SelectPrompt(5), Action::Generate],
        );
        let tag = started_tag(&effects);
        let (state, effects) = run(
            state,
            vec![finished(tag, Ok("first".to_string())), Action::Generate],
        );

        assert!(state.is_loading);
        assert!(state.generated_text.is_empty());
        assert_ne!(started_tag(&effects), tag);
    }

    #[test]
    fn test_stale_result_after_back_is_discarded() {
        let (state, effects) = run(
            UIState::new(),
            vec![Action::SelectPrompt(5), Action::Generate],
        );
        let tag = started_tag(&effects);

        let (state, _) = run(
            state,
            vec![
                Action::Back,
                Action::SelectPrompt(1),
                finished(tag, Ok("haiku".to_string())),
            ],
        );

        assert_eq!(state.selected_prompt.as_ref().map(|p| p.id), Some(1));
        assert!(state.generated_text.is_empty());
        assert!(!state.is_loading);
        assert!(state.in_flight.is_none());
    }

    #[test]
    fn test_other_prompt_cannot_generate_while_request_outstanding() {
        let (state, effects) = run(
            UIState::new(),
            vec![Action::SelectPrompt(5), Action::Generate],
        );
        let tag = started_tag(&effects);

        let (state, effects) = run(
            state,
            vec![Action::Back, Action::SelectPrompt(1), Action::Generate],
        );
        assert!(effects.is_empty());
        assert!(state.is_loading);

        let (_, effects) = run(state, vec![finished(tag, Ok("haiku".to_string())), Action::Generate]);
        assert_eq!(started_tag(&effects).prompt_id, 1);
    }

    #[test]
    fn test_reopened_prompt_waits_for_outstanding_request() {
        let (state, effects) = run(
            UIState::new(),
            vec![Action::SelectPrompt(5), Action::Generate],
        );
        let first = started_tag(&effects);

        let (state, effects) = run(
            state,
            vec![Action::Back, Action::SelectPrompt(5), Action::Generate],
        );
        assert!(effects.is_empty());
        assert!(state.is_loading);
        assert_eq!(state.in_flight, Some(first));

        let (state, _) = run(state, vec![finished(first, Ok("Puddles hold the sky".to_string()))]);
        assert_eq!(state.generated_text, "Puddles hold the sky");
        assert!(!state.is_loading);

        let (state, effects) = run(state, vec![Action::Generate]);
        assert!(state.is_loading);
        assert_ne!(started_tag(&effects), first);
    }

    #[test]
    fn test_back_hides_spinner_but_keeps_request_outstanding() {
        let (state, effects) = run(
            UIState::new(),
            vec![Action::SelectPrompt(5), Action::Generate, Action::Back],
        );

        assert!(!state.is_loading);
        assert_eq!(state.in_flight, Some(started_tag(&effects)));
    }

    #[test]
    fn test_copy_sets_feedback_and_schedules_reset() {
        let (state, effects) = run(UIState::new(), vec![Action::Copy(2)]);

        assert_eq!(state.copy_label(2), COPIED_LABEL);
        assert_eq!(state.copy_label(7), COPY_LABEL);
        assert_eq!(effects.len(), 2);
        assert_eq!(
            effects[0],
            Effect::CopyToClipboard {
                text: "Generate a regular expression that validates an email address according to RFC 5322."
                    .to_string()
            }
        );
        assert!(matches!(
            effects[1],
            Effect::ScheduleCopyReset { prompt_id: 2, after, .. } if after == COPY_FEEDBACK_DELAY
        ));
    }

    #[test]
    fn test_copy_feedback_expires_per_item() {
        let (state, effects) = run(UIState::new(), vec![Action::Copy(2), Action::Copy(7)]);
        let token_for_2 = effects
            .iter()
            .find_map(|e| match e {
                Effect::ScheduleCopyReset { prompt_id: 2, token, .. } => Some(*token),
                _ => None,
            })
            .unwrap();

        let (state, _) = run(
            state,
            vec![Action::CopyFeedbackExpired {
                prompt_id: 2,
                token: token_for_2,
            }],
        );

        assert_eq!(state.copy_label(2), COPY_LABEL);
        assert_eq!(state.copy_label(7), COPIED_LABEL);
    }

    #[test]
    fn test_older_copy_reset_does_not_clear_newer_feedback() {
        let (state, first) = run(UIState::new(), vec![Action::Copy(2)]);
        let (state, _second) = run(state, vec![Action::Copy(2)]);
        let old_token = match first[1] {
            Effect::ScheduleCopyReset { token, .. } => token,
            _ => unreachable!(),
        };

        let (state, _) = run(
            state,
            vec![Action::CopyFeedbackExpired {
                prompt_id: 2,
                token: old_token,
            }],
        );

        assert_eq!(state.copy_label(2), COPIED_LABEL);
    }

    #[test]
    fn test_copy_reset_carries_configured_delay() {
        let state = UIState::with_copy_feedback_delay(Duration::from_millis(500));
        let (_, effects) = run(state, vec![Action::Copy(4)]);

        assert!(matches!(
            effects[1],
            Effect::ScheduleCopyReset { prompt_id: 4, after, .. } if after == Duration::from_millis(500)
        ));
    }

    #[test]
    fn test_copy_unknown_prompt_is_noop() {
        let (state, effects) = run(UIState::new(), vec![Action::Copy(99)]);

        assert!(effects.is_empty());
        assert!(state.copy_feedback.is_empty());
    }

    #[test]
    fn test_copy_highlighted_on_generator_copies_selected() {
        let (state, effects) = run(
            UIState::new(),
            vec![Action::SelectPrompt(6), Action::CopyHighlighted],
        );

        assert_eq!(state.copy_label(6), COPIED_LABEL);
        assert_eq!(effects.len(), 2);
    }

    #[test]
    fn test_gallery_actions_ignored_on_generator() {
        let (state, _) = run(
            UIState::new(),
            vec![
                Action::SelectPrompt(1),
                Action::SelectCategory("Coding".to_string()),
                Action::SelectPrompt(2),
            ],
        );

        assert_eq!(state.active_category, "All");
        assert_eq!(state.selected_prompt.as_ref().map(|p| p.id), Some(1));
    }

    #[test]
    fn test_output_scroll_and_raw_toggle() {
        let (state, _) = run(
            UIState::new(),
            vec![
                Action::SelectPrompt(1),
                Action::ScrollOutputDown,
                Action::ScrollOutputDown,
                Action::ScrollOutputUp,
                Action::ToggleRawOutput,
            ],
        );

        assert_eq!(state.output_scroll, 1);
        assert!(state.show_raw_output);
    }

    #[test]
    fn test_quit_from_any_screen() {
        let (state, _) = run(UIState::new(), vec![Action::SelectPrompt(1), Action::Quit]);

        assert!(state.should_quit);
    }
}
