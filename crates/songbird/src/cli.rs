//! Command-line interface definition using clap.

use clap::{Parser, Subcommand};

use songbird_api::config::{DEFAULT_HOST, DEFAULT_PORT};

/// Songbird - restaurant booking assistant
#[derive(Parser, Debug)]
#[command(name = "songbird")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Host to bind to
        #[arg(long, env = "SONGBIRD_HOST", default_value = DEFAULT_HOST)]
        host: String,

        /// Port to bind to
        #[arg(short, long, env = "SONGBIRD_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },

    /// Chat with the receptionist in the terminal
    Chat {
        /// Session identifier (a new one is generated if omitted)
        #[arg(short, long)]
        session: Option<String>,

        /// Use the in-process booking service instead of the HTTP API
        #[arg(long)]
        mock_booking: bool,
    },
}

impl Cli {
    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_help() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_level() {
        assert_eq!(Cli::parse_from(["songbird"]).log_level(), tracing::Level::WARN);
        assert_eq!(Cli::parse_from(["songbird", "-v"]).log_level(), tracing::Level::INFO);
        assert_eq!(Cli::parse_from(["songbird", "-vvvv"]).log_level(), tracing::Level::TRACE);
    }

    #[test]
    fn test_chat_args() {
        let cli = Cli::parse_from(["songbird", "chat", "--session", "guest-1", "--mock-booking"]);
        match cli.command {
            Some(Commands::Chat {
                session,
                mock_booking,
            }) => {
                assert_eq!(session.as_deref(), Some("guest-1"));
                assert!(mock_booking);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_serve_port() {
        let cli = Cli::parse_from(["songbird", "serve", "--port", "9000"]);
        match cli.command {
            Some(Commands::Serve { port, .. }) => assert_eq!(port, 9000),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
