use crate::chat::{Dispatcher, ModelSelection, Turn};
use crate::cli::Args;
use crate::commands::{ChatState, dispatcher::CommandDispatcher};
use crate::config::Config;
use crate::core::error::DuochatError;
use crate::display;
use crate::input;
use is_terminal::IsTerminal;
use std::io::{self, Read};

pub struct Application {
    pub args: Args,
    pub config: Config,
    pub dispatcher: Dispatcher,
    pub command_dispatcher: CommandDispatcher,
}

impl Application {
    pub fn new(
        args: Args,
        config: Config,
        dispatcher: Dispatcher,
        command_dispatcher: CommandDispatcher,
    ) -> Self {
        Self {
            args,
            config,
            dispatcher,
            command_dispatcher,
        }
    }

    pub async fn run(&self) -> Result<(), DuochatError> {
        let context = if !std::io::stdin().is_terminal() {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| DuochatError::Input(format!("Failed to read from stdin: {}", e)))?;
            Some(buffer)
        } else {
            None
        };

        // CLI flag wins over the config default
        let selection_id = self
            .args
            .model
            .clone()
            .or_else(|| self.config.default_model.map(|m| m.id().to_string()))
            .unwrap_or_else(|| ModelSelection::default().id().to_string());

        if self.args.query.is_some() || context.is_some() {
            self.handle_one_shot(context, &selection_id).await
        } else {
            self.handle_chat_loop(&selection_id).await
        }
    }

    /// One-shot mode takes the selector as an unvalidated string; an unknown
    /// model prints the fixed invalid-selection reply instead of erroring.
    async fn handle_one_shot(
        &self,
        context: Option<String>,
        selection: &str,
    ) -> Result<(), DuochatError> {
        let final_query = match (self.args.query.as_deref(), context) {
            (Some(arg_q), Some(stdin_ctx)) => format!("{}\n\n{}", stdin_ctx, arg_q),
            (None, Some(stdin_ctx)) => stdin_ctx,
            (Some(arg_q), None) => arg_q.to_string(),
            (None, None) => {
                return Err(DuochatError::Input("No message provided".to_string()));
            }
        };

        let reply = self.dispatcher.dispatch(&final_query, &[], selection).await;
        display_reply(&reply);

        Ok(())
    }

    async fn handle_chat_loop(&self, selection_id: &str) -> Result<(), DuochatError> {
        let selection = ModelSelection::from_str(selection_id).ok_or_else(|| {
            DuochatError::Input(format!(
                "Invalid model: {}. Valid models: gpt-3.5-turbo, gemini-1.5-pro",
                selection_id
            ))
        })?;

        let mut state = ChatState::new(selection);
        display::display_banner(selection.label());

        let mut editor = input::create_editor(self.command_dispatcher.clone())?;

        loop {
            let input_result = input::read_input(&mut editor)?;

            let input = match input_result {
                Some(input) => input.trim().to_string(),
                None => break,
            };

            if input.is_empty() {
                continue;
            }

            if input.starts_with('/') {
                let parts: Vec<&str> = input[1..].split_whitespace().collect();
                if !parts.is_empty() {
                    let command = parts[0];
                    let args = if parts.len() > 1 { &parts[1..] } else { &[] };

                    match self.command_dispatcher.execute(command, args, &mut state) {
                        Ok(Some(output)) => {
                            println!("{}", output);
                        }
                        Ok(None) => {}
                        Err(e) => {
                            eprintln!("Error executing command: {}", e);
                        }
                    }

                    if !state.should_continue {
                        break;
                    }
                }
                continue;
            }

            let reply = self
                .dispatcher
                .dispatch_selected(&input, &state.history, state.selection)
                .await;
            display_reply(&reply);

            // The transcript is owned here, not by the providers. Failure
            // replies are recorded like any other turn.
            state.history.push(Turn::new(input, reply));
        }

        input::save_history(&mut editor)?;

        Ok(())
    }
}

fn display_reply(reply: &str) {
    if reply.contains("```")
        || reply.contains('*')
        || reply.contains('`')
        || reply.contains('#')
    {
        display::display_markdown(reply);
    } else {
        display::display_response(reply);
    }
}
