use ratatui::widgets::ListState;

use crate::explorer::Explorer;
use crate::models::EntryKey;

/// What the text prompt is collecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    CreateDirectory,
    Rename(EntryKey),
    /// Local path of a file to upload.
    Upload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Delete,
    Rename,
    Download,
    CopyLink,
}

impl MenuAction {
    pub const ALL: [MenuAction; 4] = [
        MenuAction::Delete,
        MenuAction::Rename,
        MenuAction::Download,
        MenuAction::CopyLink,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Delete => "Delete",
            MenuAction::Rename => "Rename",
            MenuAction::Download => "Download",
            MenuAction::CopyLink => "Copy link",
        }
    }

    pub fn hotkey(self) -> char {
        match self {
            MenuAction::Delete => 'd',
            MenuAction::Rename => 'r',
            MenuAction::Download => 'o',
            MenuAction::CopyLink => 'y',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    Prompt(PromptKind),
    ContextMenu { target: EntryKey, selected: usize },
    /// Typing the confirmation phrase of a pending delete.
    Confirm,
    Help,
}

#[derive(Debug)]
pub struct App {
    pub should_quit: bool,
    pub explorer: Explorer,
    pub input_mode: InputMode,
    /// Text typed into the filter, prompt or confirmation box.
    pub input: String,
    pub cursor: usize,
    pub list_state: ListState,
    pub help_scroll_position: u16,
}
