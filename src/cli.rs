//! CLI argument parsing
//!
//! Uses clap for argument parsing with derive macros.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

/// Transactions dashboard driven by the curtain modal host
#[derive(Parser, Debug)]
#[command(name = "curtain")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: ~/.config/curtain/config.toml)
    #[arg(short, long, env = "CURTAIN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Tick rate in ticks per second
    #[arg(short = 't', long, default_value_t = 4.0, global = true)]
    pub tick_rate: f64,

    /// Frame rate in frames per second
    #[arg(short = 'F', long, default_value_t = 30.0, global = true)]
    pub frame_rate: f64,

    /// Mirror toasts as desktop notifications (overrides config)
    #[arg(long, default_value_t = false, global = true)]
    pub desktop_notify: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print an example config file
    ExampleConfig,
}

/// Generate shell completions and print to stdout
pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "curtain", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["curtain"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
        assert!(!cli.desktop_notify);
        assert!((cli.frame_rate - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["curtain", "completions", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Completions { shell: Shell::Zsh })
        ));

        let cli =
            Cli::try_parse_from(["curtain", "example-config", "--config", "/tmp/c.toml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::ExampleConfig)));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }
}
