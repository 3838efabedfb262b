use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, InputMode, MenuAction, PromptKind};
use crate::explorer::{Command, Effect};
use crate::models::EntryKey;

impl App {
    /// Translates a key press into explorer commands and returns the
    /// effects they produced.
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Vec::new();
        }

        let effects = match self.input_mode.clone() {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Filter => self.handle_filter_key(key),
            InputMode::Prompt(kind) => self.handle_prompt_key(kind, key),
            InputMode::ContextMenu { target, selected } => {
                self.handle_menu_key(target, selected, key)
            }
            InputMode::Confirm => self.handle_confirm_key(key),
            InputMode::Help => {
                self.handle_help_key(key);
                Vec::new()
            }
        };
        self.sync();
        effects
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                Vec::new()
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.select_next();
                Vec::new()
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.select_previous();
                Vec::new()
            }
            KeyCode::Enter => {
                let Some(entry_key) = self.current_key() else {
                    return Vec::new();
                };
                let entering = entry_key.is_dir && !self.explorer.selection().is_selecting();
                let effects = self.explorer.dispatch(Command::Activate(entry_key));
                if entering && !effects.is_empty() {
                    self.reset_cursor();
                }
                effects
            }
            KeyCode::Char(' ') => match self.current_key() {
                Some(entry_key) if self.explorer.selection().is_selecting() => {
                    self.explorer.dispatch(Command::Activate(entry_key))
                }
                _ => Vec::new(),
            },
            KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => {
                if self.explorer.path().is_root() {
                    return Vec::new();
                }
                self.reset_cursor();
                self.explorer.dispatch(Command::Ascend)
            }
            KeyCode::Char('/') => {
                self.input = self.explorer.filter().to_string();
                self.input_mode = InputMode::Filter;
                Vec::new()
            }
            KeyCode::Char('v') => self.explorer.dispatch(Command::ToggleSelectMode),
            KeyCode::Char('m') => {
                if let Some(target) = self.current_key() {
                    self.input_mode = InputMode::ContextMenu {
                        target,
                        selected: 0,
                    };
                }
                Vec::new()
            }
            KeyCode::Char('d') => self.on_current(Command::RequestDelete),
            KeyCode::Char('D') => self.explorer.dispatch(Command::RequestBulkDelete),
            KeyCode::Char('r') => {
                if let Some(target) = self.current_key() {
                    self.open_prompt(PromptKind::Rename(target.clone()), &target.name);
                }
                Vec::new()
            }
            KeyCode::Char('n') => {
                self.open_prompt(PromptKind::CreateDirectory, "");
                Vec::new()
            }
            KeyCode::Char('u') => {
                self.open_prompt(PromptKind::Upload, "");
                Vec::new()
            }
            KeyCode::Char('o') => self.on_current(Command::Download),
            KeyCode::Char('O') => self.explorer.dispatch(Command::DownloadSelected),
            KeyCode::Char('y') => self.on_current(Command::CopyLink),
            KeyCode::Char('R') => self.explorer.dispatch(Command::Refresh),
            KeyCode::Char('?') => {
                self.help_scroll_position = 0;
                self.input_mode = InputMode::Help;
                Vec::new()
            }
            KeyCode::Esc => self.explorer.dispatch(Command::DismissNotice),
            _ => Vec::new(),
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.input.clear();
                Vec::new()
            }
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input.clear();
                if self.explorer.filter().is_empty() {
                    return Vec::new();
                }
                self.reset_cursor();
                self.explorer.dispatch(Command::SetFilter(String::new()))
            }
            KeyCode::Backspace => {
                if self.input.pop().is_none() {
                    return Vec::new();
                }
                self.reset_cursor();
                self.explorer.dispatch(Command::SetFilter(self.input.clone()))
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                self.reset_cursor();
                self.explorer.dispatch(Command::SetFilter(self.input.clone()))
            }
            _ => Vec::new(),
        }
    }

    fn handle_prompt_key(&mut self, kind: PromptKind, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Esc => {
                self.close_prompt();
                Vec::new()
            }
            KeyCode::Enter => {
                let text = std::mem::take(&mut self.input);
                self.input_mode = InputMode::Normal;
                let command = match kind {
                    PromptKind::CreateDirectory => Command::CreateDirectory(text),
                    PromptKind::Rename(target) => Command::Rename {
                        target,
                        new_name: text,
                    },
                    PromptKind::Upload => {
                        let path = text.trim();
                        if path.is_empty() {
                            return Vec::new();
                        }
                        Command::Upload(PathBuf::from(path))
                    }
                };
                self.explorer.dispatch(command)
            }
            KeyCode::Backspace => {
                self.input.pop();
                Vec::new()
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_menu_key(
        &mut self,
        target: EntryKey,
        selected: usize,
        key: KeyEvent,
    ) -> Vec<Effect> {
        let total = MenuAction::ALL.len();
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('m') | KeyCode::Char('q') => {
                self.input_mode = InputMode::Normal;
                return Vec::new();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.input_mode = InputMode::ContextMenu {
                    target,
                    selected: (selected + 1) % total,
                };
                return Vec::new();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.input_mode = InputMode::ContextMenu {
                    target,
                    selected: (selected + total - 1) % total,
                };
                return Vec::new();
            }
            KeyCode::Enter => MenuAction::ALL[selected % total],
            KeyCode::Char(c) => match MenuAction::ALL.iter().find(|a| a.hotkey() == c) {
                Some(action) => *action,
                None => return Vec::new(),
            },
            _ => return Vec::new(),
        };

        self.input_mode = InputMode::Normal;
        match action {
            MenuAction::Delete => self.explorer.dispatch(Command::RequestDelete(target)),
            MenuAction::Rename => {
                let name = target.name.clone();
                self.open_prompt(PromptKind::Rename(target), &name);
                Vec::new()
            }
            MenuAction::Download => self.explorer.dispatch(Command::Download(target)),
            MenuAction::CopyLink => self.explorer.dispatch(Command::CopyLink(target)),
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Enter => {
                let typed = std::mem::take(&mut self.input);
                self.explorer.dispatch(Command::ConfirmDelete(typed))
            }
            KeyCode::Esc => {
                self.input.clear();
                self.explorer.dispatch(Command::CancelDelete)
            }
            KeyCode::Backspace => {
                self.input.pop();
                Vec::new()
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.help_scroll_position = self.help_scroll_position.saturating_add(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.help_scroll_position = self.help_scroll_position.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn on_current(&mut self, command: fn(EntryKey) -> Command) -> Vec<Effect> {
        match self.current_key() {
            Some(target) => self.explorer.dispatch(command(target)),
            None => Vec::new(),
        }
    }

    fn open_prompt(&mut self, kind: PromptKind, initial: &str) {
        self.input = initial.to_string();
        self.input_mode = InputMode::Prompt(kind);
    }

    fn close_prompt(&mut self) {
        self.input.clear();
        self.input_mode = InputMode::Normal;
    }
}
