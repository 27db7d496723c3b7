//! Command-line interface for oracle_chess.

use clap::{Parser, Subcommand, ValueEnum};
use oracle_chess::Color;
use std::path::PathBuf;

/// Oracle Chess - play chess in the terminal against a remote move oracle
#[derive(Parser, Debug)]
#[command(name = "oracle_chess")]
#[command(about = "Terminal chess against a remote move oracle", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game in the terminal UI
    Play {
        /// Path to the TOML config file
        #[arg(long, default_value = oracle_chess::DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Oracle base URL (overrides config and ORACLE_URL)
        #[arg(long)]
        oracle_url: Option<String>,

        /// Side the human plays
        #[arg(long, value_enum)]
        color: Option<SideArg>,

        /// Strength offset sent to the oracle
        #[arg(long)]
        difficulty: Option<u32>,
    },

    /// Run the local stand-in oracle over HTTP
    Oracle {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },

    /// Check that an oracle is reachable
    Health {
        /// Path to the TOML config file
        #[arg(long, default_value = oracle_chess::DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Oracle base URL (overrides config and ORACLE_URL)
        #[arg(long)]
        oracle_url: Option<String>,
    },
}

/// Side selectable on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideArg {
    /// Play white and move first
    White,
    /// Play black; the oracle opens
    Black,
}

impl From<SideArg> for Color {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::White => Color::White,
            SideArg::Black => Color::Black,
        }
    }
}
