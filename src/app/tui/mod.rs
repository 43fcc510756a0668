mod render;
mod session;

use std::io;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::http::UreqFetcher;

use super::cast::{CastFetchEvent, CastView, run_fetch_cycle};
use super::episode::DEFAULT_API_BASE;

use self::render::draw_tui;
use self::session::TuiSession;

const EPISODE_ID_INPUT_MAX: usize = 5;

pub(crate) fn run_tui() -> Result<()> {
    let mut session = TuiSession::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("failed to initialize terminal backend")?;
    terminal.clear()?;

    let mut view = CastView::new();
    let mut id_input = String::new();
    let (fetch_tx, fetch_rx) = mpsc::channel::<CastFetchEvent>();
    let mut status =
        status_info("No episode selected. Use Up/Down or type an episode number, then Enter.");

    loop {
        drain_fetch_events(&fetch_rx, &mut view);
        terminal.draw(|frame| draw_tui(frame, &view, &id_input, &status))?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') => break,
            KeyCode::Up => {
                let next = view.selected().map_or(1, |id| id.saturating_add(1));
                start_cycle(&mut view, Some(next), &fetch_tx, &mut status);
            }
            KeyCode::Down => {
                let next = view.selected().filter(|id| *id > 1).map(|id| id - 1);
                start_cycle(&mut view, next, &fetch_tx, &mut status);
            }
            KeyCode::Char(digit @ '0'..='9') => {
                if id_input.len() < EPISODE_ID_INPUT_MAX {
                    id_input.push(digit);
                }
            }
            KeyCode::Backspace => {
                id_input.pop();
            }
            KeyCode::Enter => {
                if id_input.is_empty() {
                    continue;
                }
                match id_input.parse::<u32>() {
                    Ok(episode_id) if episode_id > 0 => {
                        id_input.clear();
                        start_cycle(&mut view, Some(episode_id), &fetch_tx, &mut status);
                    }
                    _ => {
                        status = status_error(&format!("Invalid episode number: {id_input}"));
                        id_input.clear();
                    }
                }
            }
            KeyCode::Char('r') => {
                if let Some(current) = view.selected() {
                    start_cycle(&mut view, Some(current), &fetch_tx, &mut status);
                }
            }
            KeyCode::Esc => {
                start_cycle(&mut view, None, &fetch_tx, &mut status);
            }
            _ => {}
        }
    }

    terminal.show_cursor()?;
    session.leave()?;
    Ok(())
}

fn start_cycle(
    view: &mut CastView,
    episode_id: Option<u32>,
    tx: &mpsc::Sender<CastFetchEvent>,
    status: &mut String,
) {
    match view.select(episode_id) {
        Some(token) => {
            *status = status_info(&format!("Loading episode {}...", token.episode_id));
            let tx = tx.clone();
            std::thread::spawn(move || {
                let fetcher = UreqFetcher::new();
                run_fetch_cycle(&fetcher, DEFAULT_API_BASE, token, &tx);
            });
        }
        None => *status = status_info("Selection cleared."),
    }
}

fn drain_fetch_events(rx: &mpsc::Receiver<CastFetchEvent>, view: &mut CastView) {
    while let Ok(event) = rx.try_recv() {
        view.apply(event);
    }
}

fn status_info(msg: &str) -> String {
    format!("INFO: {msg}")
}

fn status_error(msg: &str) -> String {
    format!("ERROR: {msg}")
}
