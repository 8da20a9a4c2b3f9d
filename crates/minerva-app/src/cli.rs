use clap::{Parser, Subcommand};

/// Minerva — administrative client for a remote inference service.
#[derive(Parser, Debug)]
#[command(name = "minerva", version, about)]
pub struct Args {
    /// Log level override (e.g. "minerva=debug").
    #[arg(long)]
    pub log_level: Option<String>,

    /// Server base URL override.
    #[arg(long)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Authenticate and persist a session.
    Login {
        username: String,
    },
    /// Clear the persisted session.
    Logout,
    /// Show the current session, if any.
    Whoami,
    /// Open an interactive chat thread against a project.
    Chat {
        project: String,
    },
    /// Open an interactive question thread against a project.
    Question {
        project: String,
        /// System instruction override.
        #[arg(long)]
        system: Option<String>,
        /// Retrieval breadth.
        #[arg(long)]
        k: Option<u32>,
        /// Similarity threshold.
        #[arg(long)]
        score: Option<f32>,
    },
}

pub fn parse() -> Args {
    Args::parse()
}
