use chrono::Local;
use std::collections::HashMap;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::action::{Action, Effect, RequestTag};
use crate::catalog::PromptCatalog;
use crate::clipboard::ClipboardBridge;
use crate::config::Config;
use crate::generation::GenerationClient;
use crate::ui_state::UIState;

/// Owns the UI state and runs the effects its transitions request.
///
/// All state changes happen on the thread that calls [`App::dispatch`] and
/// [`App::drain_background`]. Background tasks only send actions back.
pub struct App {
    pub catalog: PromptCatalog,
    pub ui: UIState,
    pub config: Config,
    pub animation_frame: usize,
    client: GenerationClient,
    clipboard: ClipboardBridge,
    runtime: Handle,
    tx: UnboundedSender<Action>,
    rx: UnboundedReceiver<Action>,
    copy_resets: HashMap<u32, JoinHandle<()>>,
}

impl App {
    pub fn new(
        catalog: PromptCatalog,
        config: Config,
        client: GenerationClient,
        clipboard: ClipboardBridge,
        runtime: Handle,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            catalog,
            ui: UIState::with_copy_feedback_delay(Duration::from_millis(config.copy_feedback_ms)),
            config,
            animation_frame: 0,
            client,
            clipboard,
            runtime,
            tx,
            rx,
            copy_resets: HashMap::new(),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.client.has_credential()
    }

    pub fn should_quit(&self) -> bool {
        self.ui.should_quit
    }

    pub fn tick(&mut self) {
        self.animation_frame = (self.animation_frame + 1) % self.config.animation_frame_mod;
    }

    /// Apply an action and run whatever effects it produced.
    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.ui);
        let (next, effects) = state.apply(action, &self.catalog);
        self.ui = next;

        for effect in effects {
            self.run_effect(effect);
        }
    }

    /// Apply every action that background tasks have sent so far.
    /// Returns how many were applied.
    pub fn drain_background(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(action) = self.rx.try_recv() {
            self.dispatch(action);
            applied += 1;
        }
        applied
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::StartGeneration { tag, prompt } => self.spawn_generation(tag, prompt),
            Effect::CopyToClipboard { text } => self.clipboard.copy(&text),
            Effect::ScheduleCopyReset {
                prompt_id,
                token,
                after,
            } => self.schedule_copy_reset(prompt_id, token, after),
        }
    }

    fn spawn_generation(&mut self, tag: RequestTag, prompt: String) {
        let client = self.client.clone();
        let tx = self.tx.clone();

        info!(prompt_id = tag.prompt_id, request_id = tag.request_id, "starting generation");

        self.runtime.spawn(async move {
            let outcome = client.generate(&prompt).await;
            match &outcome {
                Ok(text) => info!(
                    prompt_id = tag.prompt_id,
                    request_id = tag.request_id,
                    chars = text.chars().count(),
                    "generation finished"
                ),
                Err(e) => error!(
                    prompt_id = tag.prompt_id,
                    request_id = tag.request_id,
                    error = %e,
                    "generation failed"
                ),
            }
            // The receiver only goes away when the app is shutting down
            let _ = tx.send(Action::GenerationFinished {
                tag,
                outcome,
                received_at: Local::now(),
            });
        });
    }

    fn schedule_copy_reset(&mut self, prompt_id: u32, token: u64, delay: Duration) {
        if let Some(previous) = self.copy_resets.remove(&prompt_id) {
            previous.abort();
        }

        let tx = self.tx.clone();
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Action::CopyFeedbackExpired { prompt_id, token });
        });
        self.copy_resets.insert(prompt_id, handle);
    }
}
