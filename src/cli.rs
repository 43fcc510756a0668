use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "epicast",
    version,
    about = "Browse the character cast of Rick and Morty episodes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Cast { episode_id: u32 },
    Tui,
}
