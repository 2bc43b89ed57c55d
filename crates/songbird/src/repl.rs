//! Terminal chat with the receptionist.

use std::path::PathBuf;
use std::sync::Arc;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use songbird_memory::Summary;
use songbird_orchestrator::Orchestrator;

use crate::error::Result;

/// One line of chat input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// A message for the receptionist.
    Message(String),
    /// Close the session and show its summary.
    End,
    /// Leave the chat.
    Quit,
    /// Show the available commands.
    Help,
    /// Blank line.
    Empty,
    /// Unrecognised slash command.
    Unknown(String),
}

impl ChatCommand {
    /// Parse a line of input.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        match line.strip_prefix('/') {
            Some(cmd) => match cmd.to_lowercase().as_str() {
                "end" => Self::End,
                "quit" | "exit" | "q" => Self::Quit,
                "help" | "?" => Self::Help,
                _ => Self::Unknown(line.to_string()),
            },
            None => Self::Message(line.to_string()),
        }
    }
}

/// Chat loop bound to one session.
pub struct ChatRepl {
    editor: DefaultEditor,
    orchestrator: Arc<Orchestrator>,
    runtime: tokio::runtime::Runtime,
    session_id: String,
    history_path: PathBuf,
}

impl ChatRepl {
    /// Create a chat for `session_id`.
    pub fn new(orchestrator: Arc<Orchestrator>, session_id: impl Into<String>) -> Result<Self> {
        let mut editor = DefaultEditor::new()?;
        let runtime = tokio::runtime::Runtime::new()?;

        let history_path = songbird_core::state_dir().join("chat_history.txt");
        if history_path.exists() {
            let _ = editor.load_history(&history_path);
        }

        Ok(Self {
            editor,
            orchestrator,
            runtime,
            session_id: session_id.into(),
            history_path,
        })
    }

    /// Runs the chat loop until `/quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        println!("Songbird v{}", env!("CARGO_PKG_VERSION"));
        println!("Session {}. Type /end to finish, /quit to exit.", self.session_id);
        println!();

        let greeting = self
            .runtime
            .block_on(self.orchestrator.start(&self.session_id))?;
        println!("Receptionist: {greeting}");

        loop {
            match self.editor.readline("You: ") {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        self.editor.add_history_entry(line.as_str())?;
                    }
                    let cmd = ChatCommand::parse(&line);
                    debug!(?cmd, "Parsed chat input");

                    match self.handle(cmd) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => eprintln!("Error: {}", e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => {
                    println!("^D");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        let _ = self.editor.save_history(&self.history_path);
        println!("Goodbye!");
        Ok(())
    }

    /// Handles one command. Returns Ok(true) if the chat should stop.
    fn handle(&mut self, cmd: ChatCommand) -> Result<bool> {
        match cmd {
            ChatCommand::Empty => {}
            ChatCommand::Quit => return Ok(true),
            ChatCommand::Help => {
                println!("  /end   Close the session and show its summary");
                println!("  /quit  Leave the chat");
            }
            ChatCommand::Unknown(cmd) => {
                println!("Unknown command: {cmd} (try /help)");
            }
            ChatCommand::End => {
                let summary = self
                    .runtime
                    .block_on(self.orchestrator.end_session(&self.session_id))?;
                print_summary(&summary);
            }
            ChatCommand::Message(text) => {
                let reply = self
                    .runtime
                    .block_on(self.orchestrator.handle_message(&self.session_id, &text))?;
                println!("Receptionist: {}", reply.message);
                if let Some(summary) = &reply.summary {
                    print_summary(summary);
                }
            }
        }
        Ok(false)
    }
}

fn print_summary(summary: &Summary) {
    println!();
    println!("Session closed after {} turns.", summary.turn_count);
    println!("Summary: {}", summary.text);
    println!("Send another message to start a new visit, or /quit to exit.");
}
