use std::sync::mpsc;
use std::thread;

use crate::http::Fetch;

use super::episode::{
    Character, Episode, episode_url, format_cast_header, parse_character, parse_episode,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EpisodeCast {
    pub(crate) episode: Episode,
    pub(crate) characters: Vec<Character>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct CycleToken {
    pub(crate) generation: u64,
    pub(crate) episode_id: u32,
}

#[derive(Debug, Clone)]
pub(crate) struct CastFetchEvent {
    pub(crate) generation: u64,
    pub(crate) update: CastUpdate,
}

#[derive(Debug, Clone)]
pub(crate) enum CastUpdate {
    EpisodeResolved {
        name: String,
        character_urls: Vec<String>,
    },
    Finished(Result<Vec<Character>, String>),
}

pub(crate) fn fetch_episode(
    fetcher: &dyn Fetch,
    base: &str,
    episode_id: u32,
) -> Result<Episode, String> {
    let body = fetcher
        .get(&episode_url(base, episode_id))
        .map_err(|err| format!("episode fetch failed: {err}"))?;
    parse_episode(&body)
}

fn fetch_character(fetcher: &dyn Fetch, url: &str) -> Result<Character, String> {
    let body = fetcher
        .get(url)
        .map_err(|err| format!("character fetch failed: {err}"))?;
    parse_character(&body)
}

// All locators are requested concurrently and joined in spawn order, so the
// resolved cast keeps the locator order no matter which response lands first.
// The batch is all-or-nothing: one failure discards every partial success.
pub(crate) fn fetch_characters(
    fetcher: &dyn Fetch,
    urls: &[String],
) -> Result<Vec<Character>, String> {
    if urls.is_empty() {
        return Ok(Vec::new());
    }

    thread::scope(|scope| {
        let handles: Vec<_> = urls
            .iter()
            .map(|url| scope.spawn(move || fetch_character(fetcher, url)))
            .collect();

        let mut characters = Vec::with_capacity(handles.len());
        let mut first_error: Option<String> = None;
        for handle in handles {
            match handle.join() {
                Ok(Ok(character)) => characters.push(character),
                Ok(Err(message)) => {
                    if first_error.is_none() {
                        first_error = Some(message);
                    }
                }
                Err(_) => {
                    if first_error.is_none() {
                        first_error = Some("character fetch worker panicked".to_string());
                    }
                }
            }
        }

        match first_error {
            Some(message) => Err(message),
            None => Ok(characters),
        }
    })
}

pub(crate) fn fetch_episode_cast(
    fetcher: &dyn Fetch,
    base: &str,
    episode_id: u32,
) -> Result<EpisodeCast, String> {
    let episode = fetch_episode(fetcher, base, episode_id)?;
    let characters = fetch_characters(fetcher, &episode.character_urls)?;
    Ok(EpisodeCast {
        episode,
        characters,
    })
}

// One full fetch cycle for the interactive browser, run on a worker thread.
// The episode header goes out as soon as it resolves so the view can show an
// accurate count and title while the character fan-out is still in flight.
pub(crate) fn run_fetch_cycle(
    fetcher: &dyn Fetch,
    base: &str,
    token: CycleToken,
    tx: &mpsc::Sender<CastFetchEvent>,
) {
    let episode = match fetch_episode(fetcher, base, token.episode_id) {
        Ok(episode) => episode,
        Err(message) => {
            let _ = tx.send(CastFetchEvent {
                generation: token.generation,
                update: CastUpdate::Finished(Err(message)),
            });
            return;
        }
    };

    let _ = tx.send(CastFetchEvent {
        generation: token.generation,
        update: CastUpdate::EpisodeResolved {
            name: episode.name.clone(),
            character_urls: episode.character_urls.clone(),
        },
    });

    let result = fetch_characters(fetcher, &episode.character_urls);
    let _ = tx.send(CastFetchEvent {
        generation: token.generation,
        update: CastUpdate::Finished(result),
    });
}

// View state for one episode selection. Loading, error, and a non-empty cast
// are mutually exclusive rendering modes; loading wins, then error.
#[derive(Debug, Clone, Default)]
pub(crate) struct CastView {
    generation: u64,
    selected: Option<u32>,
    pub(crate) characters: Vec<Character>,
    pub(crate) loading: bool,
    pub(crate) error: Option<String>,
    pub(crate) episode_name: Option<String>,
    pub(crate) character_urls: Vec<String>,
}

impl CastView {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn selected(&self) -> Option<u32> {
        self.selected
    }

    // Every call bumps the generation, so events from any cycle started
    // before this one no longer match and get dropped in `apply`.
    pub(crate) fn select(&mut self, episode_id: Option<u32>) -> Option<CycleToken> {
        self.generation += 1;
        self.selected = episode_id;
        self.characters.clear();
        self.error = None;
        self.episode_name = None;
        self.character_urls.clear();

        match episode_id {
            Some(episode_id) => {
                self.loading = true;
                Some(CycleToken {
                    generation: self.generation,
                    episode_id,
                })
            }
            None => {
                self.loading = false;
                None
            }
        }
    }

    pub(crate) fn apply(&mut self, event: CastFetchEvent) {
        if event.generation != self.generation || self.selected.is_none() {
            return;
        }

        match event.update {
            CastUpdate::EpisodeResolved {
                name,
                character_urls,
            } => {
                self.episode_name = Some(name);
                self.character_urls = character_urls;
            }
            CastUpdate::Finished(Ok(characters)) => {
                self.characters = characters;
                self.error = None;
                self.loading = false;
            }
            CastUpdate::Finished(Err(message)) => {
                self.characters.clear();
                self.error = Some(message);
                self.loading = false;
            }
        }
    }

    pub(crate) fn header_line(&self) -> Option<String> {
        self.episode_name
            .as_ref()
            .map(|name| format_cast_header(self.character_urls.len(), name))
    }
}
