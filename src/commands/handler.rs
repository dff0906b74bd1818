use super::ChatState;
use crate::chat::ModelSelection;
use crate::core::error::DuochatError;

use console::style;

pub trait CommandHandler {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, DuochatError>;
    fn help(&self) -> &'static str;
}

pub struct QuitCommand;
pub struct HelpCommand;
pub struct ClearCommand;
pub struct ModelCommand;

impl CommandHandler for QuitCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, DuochatError> {
        state.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the chat session"
    }
}

impl CommandHandler for HelpCommand {
    fn execute(
        &self,
        _state: &mut ChatState,
        _args: &[&str],
    ) -> Result<Option<String>, DuochatError> {
        let title = style("Available Commands").bold().underlined();
        let help_text = vec![
            title.to_string(),
            style(QuitCommand.help()).to_string(),
            style(HelpCommand.help()).to_string(),
            style(ClearCommand.help()).to_string(),
            style(ModelCommand.help()).to_string(),
        ]
        .join("\n");

        Ok(Some(help_text))
    }

    fn help(&self) -> &'static str {
        "/help - Show available commands"
    }
}

impl CommandHandler for ClearCommand {
    fn execute(&self, state: &mut ChatState, _args: &[&str]) -> Result<Option<String>, DuochatError> {
        state.history.clear();
        Ok(Some("Chat history cleared.".to_string()))
    }

    fn help(&self) -> &'static str {
        "/clear - Clear conversation history"
    }
}

impl CommandHandler for ModelCommand {
    fn execute(&self, state: &mut ChatState, args: &[&str]) -> Result<Option<String>, DuochatError> {
        if args.is_empty() {
            let mut lines = vec![format!("Current model: {}", state.selection.id())];
            for selection in [ModelSelection::Gpt35Turbo, ModelSelection::Gemini15Pro] {
                let marker = if selection == state.selection { "*" } else { " " };
                lines.push(format!(
                    " {} {:<16} {}",
                    marker,
                    selection.id(),
                    selection.label()
                ));
            }
            Ok(Some(lines.join("\n")))
        } else {
            match ModelSelection::from_str(args[0]) {
                Some(selection) => {
                    state.selection = selection;
                    Ok(Some(format!("Model changed to: {}", selection.id())))
                }
                None => Ok(Some(format!(
                    "Invalid model: {}. Valid models: gpt-3.5-turbo, gemini-1.5-pro",
                    args[0]
                ))),
            }
        }
    }

    fn help(&self) -> &'static str {
        "/model <name> - Show or change the current model"
    }
}
