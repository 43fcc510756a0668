mod cast;
mod episode;
mod tui;


use anyhow::Result;

use crate::cli::{Cli, Command};
use crate::http::UreqFetcher;

use self::cast::fetch_episode_cast;
use self::episode::{
    DEFAULT_API_BASE, LOADING_CAPTION, format_cast_failure, format_cast_header, truncate,
};

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Command::Cast { episode_id }) => run_cast(episode_id),
        Some(Command::Tui) | None => tui::run_tui(),
    }
}

fn run_cast(episode_id: u32) -> Result<()> {
    println!("{LOADING_CAPTION}");

    let fetcher = UreqFetcher::new();
    match fetch_episode_cast(&fetcher, DEFAULT_API_BASE, episode_id) {
        Ok(cast) => {
            println!(
                "{}",
                format_cast_header(cast.episode.character_urls.len(), &cast.episode.name)
            );
            for character in &cast.characters {
                println!(
                    "  {:<5} {:<28} {}",
                    character.id,
                    truncate(&character.name, 28),
                    character.image
                );
            }
        }
        Err(message) => println!("{}", format_cast_failure(&message)),
    }
    Ok(())
}
