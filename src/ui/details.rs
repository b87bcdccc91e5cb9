// ============================================================================
// Details - Panneau de détail d'un symbole
// ============================================================================
// Popup par-dessus le dashboard : grille d'infos + graphique ligne 30 jours
//
// CONCEPTS RATATUI :
// 1. Chart widget : graphique ligne
// 2. Dataset : série de données à afficher
// 3. Axis : configuration des axes X et Y
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::detail::DetailView;
use crate::models::{format_rupees, HistoryPoint, Quote};
use crate::ui::dashboard::{ACCENT_COLOR, DOWN_COLOR, UP_COLOR};

/// Dessine le panneau de détail dans `area`
pub fn render_details(frame: &mut Frame, view: &DetailView, area: Rect) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT_COLOR))
        .title(format!(" 📈 {} ", view.title()))
        .title_alignment(Alignment::Center);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Pas de données : le panneau reste ouvert avec le message d'erreur
    let quote = match (&view.quote, &view.error) {
        (Some(quote), None) => quote,
        (_, error) => {
            render_error(frame, inner, error.as_deref().unwrap_or_default());
            return;
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Grille d'infos
            Constraint::Min(0),    // Graphique
        ])
        .split(inner);

    render_info_grid(frame, quote, chunks[0]);
    render_history_chart(frame, view, quote, chunks[1]);
}

// ============================================================================
// Grille d'infos
// ============================================================================

fn info_cell(label: &'static str, value: String, color: Color) -> Vec<Span<'static>> {
    vec![
        Span::styled(label, Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw("    "),
    ]
}

fn render_info_grid(frame: &mut Frame, quote: &Quote, area: Rect) {
    let change_color = if quote.is_up() { UP_COLOR } else { DOWN_COLOR };
    let arrow = if quote.is_up() { "▲" } else { "▼" };

    let mut first = info_cell("Last Price: ", quote.price_display(), Color::White);
    first.extend(info_cell("Change: ", format!("{} {}", arrow, quote.change_display()), change_color));

    let volume = quote.volume.clone().unwrap_or_else(|| "N/A".to_string());
    let high = quote.high_52w.map(format_rupees).unwrap_or_else(|| "N/A".to_string());
    let close = quote.close_date.clone().unwrap_or_else(|| "N/A".to_string());

    let mut second = info_cell("Volume: ", volume, Color::White);
    second.extend(info_cell("52W High: ", high, Color::White));
    second.extend(info_cell("Close Date: ", close, Color::White));

    let paragraph = Paragraph::new(vec![Line::from(""), Line::from(first), Line::from(second)])
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Graphique
// ============================================================================

/// Bornes de l'axe Y : min/max de la série avec 5% de marge
fn y_bounds(points: &[(f64, f64)]) -> (f64, f64) {
    let (min_price, max_price) = points
        .iter()
        .fold((f64::MAX, f64::MIN), |(min, max), &(_x, y)| (min.min(y), max.max(y)));

    let margin = (max_price - min_price) * 0.05;
    ((min_price - margin).max(0.0), max_price + margin)
}

/// Labels de l'axe X : première, milieu et dernière date
fn x_labels(history: &[HistoryPoint]) -> Vec<Span<'static>> {
    let label = |index: usize| {
        history
            .get(index)
            .map(|p| Span::raw(p.label.clone()))
            .unwrap_or_else(|| Span::raw(""))
    };
    let last = history.len().saturating_sub(1);
    vec![label(0), label(last / 2), label(last)]
}

fn render_history_chart(frame: &mut Frame, view: &DetailView, quote: &Quote, area: Rect) {
    let points = view.chart_points();
    if points.is_empty() {
        render_error(frame, area, "No history to display");
        return;
    }

    let (y_min, y_max) = y_bounds(&points);
    let color = if quote.is_up() { UP_COLOR } else { DOWN_COLOR };
    let series_name = view.series_name();

    let datasets = vec![Dataset::default()
        .name(series_name.as_str())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&points)];

    let x_axis = Axis::default()
        .title("Date")
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, (points.len() - 1) as f64])
        .labels(x_labels(&view.history));

    let y_axis = Axis::default()
        .title("Price (₹)")
        .style(Style::default().fg(Color::Gray))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format!("₹{:.0}", y_min)),
            Span::raw(format!("₹{:.0}", (y_min + y_max) / 2.0)),
            Span::raw(format!("₹{:.0}", y_max)),
        ]);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" 30 days "),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled("[ESC] Close", Style::default().fg(Color::Gray))),
    ];

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::DETAIL_ERROR;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn draw(view: &DetailView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal
            .draw(|frame| render_details(frame, view, frame.size()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    fn view(symbol: &str) -> DetailView {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        DetailView::build(symbol, today, &mut StdRng::seed_from_u64(5))
    }

    #[test]
    fn test_renders_grid_and_dates() {
        let text = draw(&view("TCS"));
        assert!(text.contains("TCS Details"));
        assert!(text.contains("Last Price:"));
        assert!(text.contains("52W High:"));
        assert!(text.contains("27-Dec"));
        assert!(text.contains("16/10/2026"));
    }

    #[test]
    fn test_renders_error_view() {
        let text = draw(&view("WIPRO"));
        assert!(text.contains("WIPRO Details"));
        assert!(text.contains(DETAIL_ERROR));
        assert!(!text.contains("Last Price:"));
    }

    #[test]
    fn test_y_bounds_margin() {
        let (low, high) = y_bounds(&[(0.0, 100.0), (1.0, 200.0)]);
        assert_eq!(low, 95.0);
        assert_eq!(high, 205.0);
    }
}
