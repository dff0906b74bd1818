pub mod dispatcher;
pub mod handler;
pub mod registry;

use crate::chat::{ModelSelection, Turn};
pub use dispatcher::create_command_registry;

/// Mutable session state the slash commands operate on.
pub struct ChatState {
    pub history: Vec<Turn>,
    pub selection: ModelSelection,
    pub should_continue: bool,
}

impl ChatState {
    pub fn new(selection: ModelSelection) -> Self {
        Self {
            history: Vec::new(),
            selection,
            should_continue: true,
        }
    }
}
