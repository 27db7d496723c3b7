//! Stateless UI rendering for the chess board.

use super::app::App;
use oracle_chess_rules::Square;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const BOARD_WIDTH: u16 = 8 * 3 + 4;
const BOARD_HEIGHT: u16 = 8 + 3;

/// Renders the board, title and status line.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(BOARD_HEIGHT),
            Constraint::Length(3), // Status
            Constraint::Length(1), // Help
        ])
        .split(area);

    let title = Paragraph::new("Oracle Chess")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    draw_board(frame, chunks[1], app);

    let status = Paragraph::new(app.status_message())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[2]);

    let help = Paragraph::new("arrows move  enter select  esc clear  r retry  n new  q quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);
}

fn draw_board(frame: &mut Frame, area: Rect, app: &App) {
    let board_area = center_rect(area, BOARD_WIDTH, BOARD_HEIGHT);

    let ranks: Vec<u8> = if app.flipped() {
        (0..8).collect()
    } else {
        (0..8).rev().collect()
    };
    let files: Vec<u8> = if app.flipped() {
        (0..8).rev().collect()
    } else {
        (0..8).collect()
    };

    let mut lines: Vec<Line> = Vec::with_capacity(BOARD_HEIGHT as usize);
    for &rank in &ranks {
        let mut spans = vec![Span::styled(
            format!(" {} ", rank + 1),
            Style::default().fg(Color::DarkGray),
        )];
        for &file in &files {
            if let Some(square) = Square::new(file, rank) {
                spans.push(square_span(app, square));
            }
        }
        lines.push(Line::from(spans));
    }

    let file_labels: String = files
        .iter()
        .map(|f| format!(" {} ", (b'a' + f) as char))
        .collect();
    lines.push(Line::from(Span::styled(
        format!("   {}", file_labels),
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines), board_area);
}

fn square_span(app: &App, square: Square) -> Span<'static> {
    let light = (square.file() + square.rank()) % 2 == 1;
    let mut bg = if light {
        Color::Rgb(181, 136, 99)
    } else {
        Color::Rgb(120, 83, 56)
    };

    if app
        .last_move()
        .is_some_and(|(from, to)| from == square || to == square)
    {
        bg = Color::Rgb(170, 162, 58);
    }
    if app.selected() == Some(square) {
        bg = Color::Rgb(90, 140, 200);
    }
    if app.cursor() == square {
        bg = Color::Rgb(220, 220, 220);
    }

    let piece = app.grid()[square.index()];
    let symbol = match piece {
        Some(letter) => format!(" {} ", letter.to_ascii_uppercase()),
        None if app.is_target(square) => " · ".to_string(),
        None => "   ".to_string(),
    };

    let mut style = Style::default().bg(bg);
    style = match piece {
        Some(letter) if letter.is_ascii_uppercase() => {
            style.fg(Color::White).add_modifier(Modifier::BOLD)
        }
        Some(_) => style.fg(Color::Black).add_modifier(Modifier::BOLD),
        None => style.fg(Color::Green),
    };
    if piece.is_some() && app.is_target(square) {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if app.selected().is_none() && app.is_movable(square) && app.cursor() == square {
        style = style.add_modifier(Modifier::REVERSED);
    }

    Span::styled(symbol, style)
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}
