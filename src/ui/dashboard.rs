// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Header (statut du marché) / watchlist + news / footer (raccourcis)
// Le panneau de détail et les alertes sont dessinés par-dessus.
//
// CONCEPTS RATATUI :
// 1. Layout : découpage de l'écran en zones
// 2. List / Paragraph : widgets de base
// 3. Clear : efface une zone avant d'y dessiner une popup
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Screen};
use crate::market_clock::MarketSession;
use crate::models::{NewsFeed, Quote};
use crate::ui::details;

/// Couleurs partagées avec le panneau de détail
pub const UP_COLOR: Color = Color::Rgb(0, 255, 136);
pub const DOWN_COLOR: Color = Color::Rgb(255, 77, 77);
pub const LAST_CLOSE_COLOR: Color = Color::Rgb(255, 165, 0);
pub const ACCENT_COLOR: Color = Color::Rgb(0, 212, 255);

/// Dessine l'interface complète
pub fn render(frame: &mut Frame, app: &App) {
    render_with_session(frame, app, MarketSession::current());
}

/// Dessine l'interface pour une session de marché donnée
pub fn render_with_session(frame: &mut Frame, app: &App, session: MarketSession) {
    let size = frame.size();
    let chunks = create_layout(size);
    let body = split_body(chunks[1]);

    render_header(frame, session, chunks[0]);
    render_watchlist(frame, app, body[0]);
    render_news(frame, app, body[1]);
    render_footer(frame, app, chunks[2]);

    if app.current_screen == Screen::Details {
        if let Some(view) = app.details() {
            details::render_details(frame, view, details_area(size));
        }
    }

    if let Some(message) = &app.alert {
        render_alert(frame, message, size);
    }
}

// ============================================================================
// Layout (partagé avec la gestion des clics)
// ============================================================================

fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Watchlist + news
            Constraint::Length(3), // Footer
        ])
        .split(area)
        .to_vec()
}

fn split_body(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area)
        .to_vec()
}

/// Zone de la watchlist (bordures comprises) pour un terminal de taille `size`
pub fn list_area(size: Rect) -> Rect {
    split_body(create_layout(size)[1])[0]
}

/// Index de la ligne de watchlist sous le point (column, row), s'il y en a une
///
/// Chaque cotation occupe exactement une ligne, juste sous la bordure.
pub fn row_at(size: Rect, column: u16, row: u16, rows: usize) -> Option<usize> {
    let area = list_area(size);
    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };

    let inside = column >= inner.x
        && column < inner.x + inner.width
        && row >= inner.y
        && row < inner.y + inner.height;
    if !inside {
        return None;
    }

    let index = (row - inner.y) as usize;
    (index < rows).then_some(index)
}

/// Zone du panneau de détail : 80% de l'écran, centrée
pub fn details_area(size: Rect) -> Rect {
    centered_rect(80, 80, size)
}

/// Vrai si (column, row) tombe dans `area`
pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

// ============================================================================
// Header : titre + statut du marché
// ============================================================================

fn render_header(frame: &mut Frame, session: MarketSession, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" NiftyWatch ")
        .title_alignment(Alignment::Center);

    let status_color = if session.is_open() { UP_COLOR } else { LAST_CLOSE_COLOR };
    let text = Line::from(vec![
        Span::raw("● "),
        Span::styled(
            session.label(),
            Style::default()
                .fg(Color::Black)
                .bg(status_color)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Watchlist
// ============================================================================

fn render_watchlist(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Watchlist ");

    let placeholder = if app.watchlist().is_empty() {
        Some("Watchlist empty")
    } else if app.is_loading() {
        Some("Loading...")
    } else {
        None
    };

    if let Some(message) = placeholder {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(message, Style::default().fg(Color::Gray))),
        ])
        .block(block)
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .quotes()
        .iter()
        .enumerate()
        .map(|(index, quote)| {
            let line = quote_line(quote);
            if index == app.selected_index {
                ListItem::new(line).style(Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD))
            } else {
                ListItem::new(line)
            }
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// Une ligne de la watchlist : nom, prix, variation, "Last Close", bouton
fn quote_line(quote: &Quote) -> Line<'static> {
    let change_color = if quote.is_up() { UP_COLOR } else { DOWN_COLOR };

    let mut spans = vec![
        Span::styled(
            format!(" {:<32}", format!("{} - {}", quote.symbol, quote.company)),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:>11}", quote.price_display()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{:>9}", quote.change_display()), Style::default().fg(change_color)),
    ];

    if quote.is_last_close() {
        spans.push(Span::styled("  Last Close", Style::default().fg(LAST_CLOSE_COLOR)));
    }
    spans.push(Span::styled("  [📈]", Style::default().fg(ACCENT_COLOR)));

    Line::from(spans)
}

// ============================================================================
// News
// ============================================================================

fn render_news(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Market News ");

    let lines: Vec<Line> = match &app.news {
        NewsFeed::Articles(articles) => articles
            .iter()
            .flat_map(|article| {
                [
                    Line::from(Span::styled(
                        article.title.clone(),
                        Style::default().fg(ACCENT_COLOR).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(article.description.clone()),
                    Line::from(Span::styled(article.published.clone(), Style::default().fg(Color::Gray))),
                    Line::from(""),
                ]
            })
            .collect(),
        NewsFeed::Loading | NewsFeed::Unavailable => {
            vec![Line::from(Span::styled(NewsFeed::PLACEHOLDER, Style::default().fg(Color::Gray)))]
        }
    };

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Footer : raccourcis, saisie, confirmations
// ============================================================================

fn key_span(label: &'static str, color: Color) -> Span<'static> {
    Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut border = Color::Cyan;

    let lines = match app.current_screen {
        Screen::InputMode => {
            border = Color::Green;
            vec![Line::from(vec![
                Span::styled(
                    app.input_prompt.as_str(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::styled(app.input_buffer.as_str(), Style::default().fg(Color::White)),
                Span::styled("█", Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK)),
                Span::raw("   "),
                key_span("[Enter]", Color::Green),
                Span::raw(" Add  "),
                key_span("[ESC]", Color::Red),
                Span::raw(" Cancel"),
            ])]
        }
        Screen::ConfirmClear => {
            border = Color::Yellow;
            vec![Line::from(vec![
                Span::styled("⚠  Clear all? ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                key_span("[y]", Color::Red),
                Span::styled(" Yes, any other key cancels", Style::default().fg(Color::Yellow)),
            ])]
        }
        _ if app.is_awaiting_quit_confirmation() => vec![Line::from(vec![
            Span::styled("⚠  Press ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            key_span("[q]", Color::Red),
            Span::styled(
                " again to quit, any other key cancels ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])],
        Screen::Details => vec![Line::from(vec![
            key_span("[ESC / Space]", Color::Yellow),
            Span::raw(" Close details"),
        ])],
        Screen::Dashboard => vec![Line::from(vec![
            key_span("[q]", Color::Yellow),
            Span::raw(" Quit  "),
            key_span("[↑↓ / j k]", Color::Yellow),
            Span::raw(" Navigate  "),
            key_span("[Enter / v / click]", Color::Yellow),
            Span::raw(" Details  "),
            key_span("[a]", Color::Green),
            Span::raw(" Add  "),
            key_span("[c]", Color::Red),
            Span::raw(" Clear  "),
            key_span("[r]", Color::Yellow),
            Span::raw(" Refresh"),
        ])],
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let paragraph = Paragraph::new(lines).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Alerte bloquante
// ============================================================================

fn render_alert(frame: &mut Frame, message: &str, size: Rect) {
    let area = centered_rect(60, 30, size);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DOWN_COLOR))
        .title(" ⚠ Alert ");

    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::White))),
        Line::from(""),
        Line::from(Span::styled("[any key] OK", Style::default().fg(Color::Gray))),
    ])
    .block(block)
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
