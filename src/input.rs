use crate::commands::dispatcher::CommandDispatcher;
use crate::config::Config as AppConfig;
use crate::core::error::DuochatError;

use console::style;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{Highlighter, MatchingBracketHighlighter};
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, EditMode, Editor, Helper};
use std::borrow::Cow;

/// Completes slash commands at the start of a line, filenames elsewhere
pub struct ChatCompleter {
    filename_completer: FilenameCompleter,
    command_registry: CommandDispatcher,
}

impl ChatCompleter {
    pub fn new(command_registry: CommandDispatcher) -> Self {
        Self {
            filename_completer: FilenameCompleter::new(),
            command_registry,
        }
    }
}

impl Completer for ChatCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if line.starts_with('/') && pos >= 1 {
            let command_part = &line[1..pos];

            let commands = self.command_registry.get_command_names();
            let matches: Vec<Pair> = commands
                .iter()
                .filter(|cmd| cmd.starts_with(command_part))
                .map(|cmd| Pair {
                    display: cmd.to_string(),
                    replacement: cmd.to_string(),
                })
                .collect();

            if !matches.is_empty() {
                return Ok((1, matches)); // 1 is the position after '/'
            }
        }

        self.filename_completer.complete(line, pos, ctx)
    }
}

/// Helper struct that combines all rustyline components
pub struct ChatHelper {
    completer: ChatCompleter,
    highlighter: MatchingBracketHighlighter,
    hinter: HistoryHinter,
}

impl ChatHelper {
    pub fn new(command_registry: CommandDispatcher) -> Self {
        Self {
            completer: ChatCompleter::new(command_registry),
            highlighter: MatchingBracketHighlighter::new(),
            hinter: HistoryHinter {},
        }
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        self.completer.complete(line, pos, ctx)
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        self.highlighter.highlight_hint(hint)
    }

    fn highlight_candidate<'c>(
        &self,
        candidate: &'c str,
        completion: rustyline::CompletionType,
    ) -> Cow<'c, str> {
        self.highlighter.highlight_candidate(candidate, completion)
    }
}

// Chat messages are free text; never hold a line back for unmatched brackets
impl Validator for ChatHelper {}

/// Creates a configured rustyline editor
pub fn create_editor(
    command_registry: CommandDispatcher,
) -> Result<Editor<ChatHelper, FileHistory>, DuochatError> {
    let config = Config::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor = Editor::with_config(config)
        .map_err(|e| DuochatError::Input(format!("Failed to create line editor: {}", e)))?;

    let helper = ChatHelper::new(command_registry);
    editor.set_helper(Some(helper));

    let history_path = AppConfig::input_history_path();
    let _ = editor.load_history(&history_path);

    Ok(editor)
}

/// Reads a line of input using rustyline
pub fn read_input(
    editor: &mut Editor<ChatHelper, FileHistory>,
) -> Result<Option<String>, DuochatError> {
    let prompt = if cfg!(windows) && std::env::var("PSModulePath").is_ok() {
        "> ".to_string()
    } else {
        style("> ").bold().cyan().to_string()
    };
    match editor.readline(&prompt) {
        Ok(line) => {
            if !line.trim().is_empty() {
                if let Err(e) = editor.add_history_entry(&line) {
                    return Err(DuochatError::Input(format!(
                        "Failed to add history entry: {}",
                        e
                    )));
                }
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) => {
            // Ctrl-C pressed
            println!("Exiting...");
            Ok(None)
        }
        Err(ReadlineError::Eof) => {
            // Ctrl-D pressed
            println!("Exiting...");
            Ok(None)
        }
        Err(err) => Err(DuochatError::Input(format!("Input error: {}", err))),
    }
}

/// Saves the editor history
pub fn save_history(editor: &mut Editor<ChatHelper, FileHistory>) -> Result<(), DuochatError> {
    let history_path = AppConfig::input_history_path();

    if let Some(parent) = history_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DuochatError::Input(format!("Failed to create history directory: {}", e))
            })?;
        }
    }

    editor
        .save_history(&history_path)
        .map_err(|e| DuochatError::Input(format!("Failed to save history: {}", e)))
}
