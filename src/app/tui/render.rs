use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Wrap};

use super::super::cast::CastView;
use super::super::episode::{LOADING_CAPTION, format_cast_failure, truncate};

pub(super) fn draw_tui(frame: &mut Frame, view: &CastView, id_input: &str, status: &str) {
    let bg = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(bg, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let episode_text = match view.selected() {
        Some(episode_id) => format!("episode {episode_id}"),
        None => "episode -".to_string(),
    };
    let input_text = if id_input.is_empty() {
        String::new()
    } else {
        format!("jump to {id_input}_")
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "EPICAST",
            Style::default()
                .fg(Color::Rgb(110, 170, 255))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(episode_text, Style::default().fg(Color::Rgb(185, 195, 210))),
        Span::styled("   ", Style::default()),
        Span::styled(input_text, Style::default().fg(Color::Yellow)),
    ]))
    .alignment(Alignment::Center)
    .block(panel_block("Browser"));
    frame.render_widget(header, chunks[0]);

    let summary_text = match (view.selected(), view.header_line()) {
        (None, _) => Span::styled(
            "No episode selected.",
            Style::default().fg(Color::Rgb(125, 135, 150)),
        ),
        (Some(_), Some(line)) => Span::styled(
            line,
            Style::default()
                .fg(Color::Rgb(110, 170, 255))
                .add_modifier(Modifier::BOLD),
        ),
        (Some(episode_id), None) => Span::styled(
            format!("Episode {episode_id}"),
            Style::default().fg(Color::Rgb(185, 195, 210)),
        ),
    };
    let summary = Paragraph::new(Line::from(summary_text))
        .alignment(Alignment::Center)
        .block(panel_block("Episode"));
    frame.render_widget(summary, chunks[1]);

    draw_cast_panel(frame, view, chunks[2]);

    let controls = Paragraph::new(Line::from(Span::styled(
        "↑/↓ episode  0-9 + Enter jump  r reload  Esc clear  q quit",
        Style::default().fg(Color::Rgb(185, 195, 210)),
    )))
    .alignment(Alignment::Center)
    .block(panel_block("Controls"));
    frame.render_widget(controls, chunks[3]);

    let status_widget = Paragraph::new(status.to_string())
        .style(status_style(status))
        .block(panel_block("Status"));
    frame.render_widget(status_widget, chunks[4]);
}

// Loading suppresses both the grid and any error; an error suppresses the
// grid; with nothing selected the panel stays empty.
fn draw_cast_panel(frame: &mut Frame, view: &CastView, area: ratatui::layout::Rect) {
    let block = panel_block("Cast");

    if view.selected().is_none() {
        frame.render_widget(block, area);
        return;
    }

    if view.loading {
        let loading = Paragraph::new(LOADING_CAPTION)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(loading, area);
        return;
    }

    if let Some(error) = view.error.as_ref() {
        let failure = Paragraph::new(format_cast_failure(error))
            .style(
                Style::default()
                    .fg(Color::Rgb(255, 145, 120))
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(failure, area);
        return;
    }

    let rows: Vec<Row> = view
        .characters
        .iter()
        .map(|character| {
            Row::new(vec![
                Cell::from(character.id.to_string()),
                Cell::from(truncate(&character.name, 30)),
                Cell::from(character.image.clone()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(32),
            Constraint::Min(20),
        ],
    )
    .header(
        Row::new(vec!["#", "Name", "Image"]).style(
            Style::default()
                .fg(Color::Rgb(110, 170, 255))
                .add_modifier(Modifier::BOLD),
        ),
    )
    .block(block);
    frame.render_widget(table, area);
}

fn panel_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(125, 135, 150)))
        .title(title)
}

fn status_style(status: &str) -> Style {
    if status.starts_with("ERROR:") {
        Style::default()
            .fg(Color::Rgb(255, 145, 120))
            .add_modifier(Modifier::BOLD)
    } else if status.starts_with("INFO:") {
        Style::default().fg(Color::Rgb(205, 165, 255))
    } else {
        Style::default().fg(Color::Rgb(230, 235, 242))
    }
}
