use ratatui::widgets::ListState;

use crate::app::{App, InputMode};
use crate::app_event::StorageEvent;
use crate::explorer::{Effect, Explorer};
use crate::models::{Entry, EntryKey};

impl App {
    pub fn new(explorer: Explorer) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            should_quit: false,
            explorer,
            input_mode: InputMode::Normal,
            input: String::new(),
            cursor: 0,
            list_state,
            help_scroll_position: 0,
        }
    }

    pub fn current_entry(&self) -> Option<&Entry> {
        self.explorer.listing().entries.get(self.cursor)
    }

    pub fn current_key(&self) -> Option<EntryKey> {
        self.current_entry().map(Entry::key)
    }

    pub fn select_next(&mut self) {
        let total = self.explorer.listing().len();
        if total == 0 {
            return;
        }
        self.cursor = (self.cursor + 1) % total;
        self.list_state.select(Some(self.cursor));
    }

    pub fn select_previous(&mut self) {
        let total = self.explorer.listing().len();
        if total == 0 {
            return;
        }
        self.cursor = (self.cursor + total - 1) % total;
        self.list_state.select(Some(self.cursor));
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
        self.list_state.select(Some(0));
    }

    /// Feeds a finished storage request into the explorer.
    pub fn on_storage_event(&mut self, event: StorageEvent) -> Vec<Effect> {
        let effects = self.explorer.complete(event);
        self.sync();
        effects
    }

    /// Keeps the cursor inside the listing and opens or closes the
    /// confirmation box as the delete coordinator changes phase. The box
    /// never takes over an open prompt, filter or menu.
    pub fn sync(&mut self) {
        let total = self.explorer.listing().len();
        if self.cursor >= total {
            self.cursor = total.saturating_sub(1);
        }
        self.list_state.select(Some(self.cursor));

        let awaiting = self.explorer.pending_confirmation().is_some();
        match (&self.input_mode, awaiting) {
            (InputMode::Confirm, false) => {
                self.input_mode = InputMode::Normal;
                self.input.clear();
            }
            (InputMode::Confirm, true) => {}
            // Text being typed is kept; the box opens once the prompt closes
            (InputMode::Prompt(_) | InputMode::Filter | InputMode::ContextMenu { .. }, true) => {}
            (InputMode::Normal | InputMode::Help, true) => {
                tracing::debug!("Waiting for delete confirmation");
                self.input_mode = InputMode::Confirm;
                self.input.clear();
            }
            _ => {}
        }
    }
}
