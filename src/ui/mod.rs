mod components;

use std::sync::OnceLock;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Popup};
use crate::dashboard::{Content, Status, PROMPT_MESSAGE};
use crate::theme::Theme;

pub use components::RevenueSummary;

// Load theme colors once at startup
static THEME: OnceLock<Theme> = OnceLock::new();

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::load)
}

fn accent() -> Color { theme().accent }
fn inactive() -> Color { theme().inactive }
fn danger() -> Color { theme().danger }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg_selected() -> Color { theme().bg_selected }
fn header() -> Color { theme().header }

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1),   // Title / info line
            Constraint::Length(5),   // Overview + property selector
            Constraint::Min(6),      // Content area
            Constraint::Length(1),   // Footer
        ])
        .split(area);

    draw_info_line(f, app, chunks[0]);
    draw_overview(f, app, chunks[1]);
    draw_content(f, app, chunks[2]);
    draw_footer(f, app, chunks[3]);

    match app.popup {
        Popup::None => {}
        Popup::Selector => draw_selector_popup(f, app),
        Popup::Help => draw_help_popup(f),
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(ref status) = app.status_message {
        Line::from(Span::styled(status, Style::default().fg(text_dim())))
    } else {
        Line::from(Span::styled(
            "Property Management Dashboard",
            Style::default().fg(header()).add_modifier(Modifier::BOLD),
        ))
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_overview(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" Revenue Overview ", Style::default().fg(accent()).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(inactive()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    // Narrow terminals drop the description and give the selector the row
    let constraints = if inner.width < 70 {
        [Constraint::Length(0), Constraint::Percentage(100)]
    } else {
        [Constraint::Percentage(50), Constraint::Percentage(50)]
    };
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(inner);

    let description = Paragraph::new(Line::from(Span::styled(
        "Monthly performance insights for your properties",
        Style::default().fg(text_dim()),
    )))
    .wrap(Wrap { trim: true });
    f.render_widget(description, cols[0]);

    draw_selector(f, app, cols[1]);
}

/// Dropdown value plus the single status line under it
fn draw_selector(f: &mut Frame, app: &App, area: Rect) {
    let dashboard = &app.dashboard;
    let enabled = dashboard.selector_enabled();

    let value = dashboard
        .selected_property()
        .map(|p| p.name.as_str())
        .unwrap_or_else(|| dashboard.selected());

    let (value_color, arrow_color) = if enabled { (text(), accent()) } else { (inactive(), inactive()) };

    let select_line = Line::from(vec![
        Span::styled("Select Property ", Style::default().fg(text_dim())),
        Span::styled("[ ", Style::default().fg(arrow_color)),
        Span::styled(format!("{:<24}", value), Style::default().fg(value_color)),
        Span::styled(" ▾ ]", Style::default().fg(arrow_color)),
    ]);

    let status_line = match dashboard.status() {
        Some(status @ Status::Error(_)) => {
            Line::from(Span::styled(status.message().to_string(), Style::default().fg(danger())))
        }
        Some(status) => Line::from(Span::styled(status.message().to_string(), Style::default().fg(text_dim()))),
        None => Line::from(""),
    };

    let selector = Paragraph::new(vec![select_line, status_line]).alignment(Alignment::Right);
    f.render_widget(selector, area);
}

fn draw_content(f: &mut Frame, app: &App, area: Rect) {
    match app.dashboard.content() {
        Content::Summary { property_id } => {
            let summary = RevenueSummary::new(property_id, app.dashboard.selected_property(), theme());
            f.render_widget(summary, area);
        }
        Content::Prompt => {
            let prompt = Paragraph::new(Line::from(Span::styled(PROMPT_MESSAGE, Style::default().fg(text_dim()))))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(inactive())),
                );
            f.render_widget(prompt, area);
        }
    }
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints: Vec<(&str, &str)> = match app.popup {
        Popup::Selector => vec![("↑↓", "Nav"), ("Enter", "Select"), ("Esc", "Close")],
        _ if app.dashboard.selector_enabled() => vec![
            ("Enter", "Choose property"),
            ("R", "Reload"),
            ("h", "Help"),
            ("q", "Quit"),
        ],
        _ => vec![("R", "Reload"), ("h", "Help"), ("q", "Quit")],
    };

    let hint_spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(accent())),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_dim())),
            ]
        })
        .collect();

    f.render_widget(Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center), area);
}

fn draw_selector_popup(f: &mut Frame, app: &App) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 90 } else { 50 },
        if area.height < 30 { 80 } else { 60 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let selected = app.dashboard.selected();
    let lines: Vec<Line> = app
        .dashboard
        .properties()
        .iter()
        .enumerate()
        .map(|(i, property)| {
            let marker = if property.id == selected { "● " } else { "  " };
            let style = if i == app.highlighted {
                Style::default().bg(bg_selected()).fg(text())
            } else {
                Style::default().fg(text())
            };
            Line::from(vec![
                Span::styled(marker, Style::default().fg(accent())),
                Span::styled(property.name.clone(), style),
            ])
        })
        .collect();

    // Keep the highlighted row in view
    let visible = popup_area.height.saturating_sub(2) as usize;
    let scroll = app.highlighted.saturating_sub(visible.saturating_sub(1));

    let list = Paragraph::new(lines)
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
        .block(
            Block::default()
                .title(Span::styled(" Select Property ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        );

    f.render_widget(list, popup_area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 90 } else { 60 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let key = |k: &'static str| Span::styled(k, Style::default().fg(accent()));
    let section = |s: &'static str| {
        Line::from(Span::styled(s, Style::default().fg(header()).add_modifier(Modifier::BOLD)))
    };

    let help_text = vec![
        section("═══ Properties ═══"),
        Line::from(vec![key("  Enter/Space "), Span::raw("Open the property dropdown")]),
        Line::from(vec![key("  ↑/↓ j/k     "), Span::raw("Move within the dropdown")]),
        Line::from(vec![key("  Esc         "), Span::raw("Close the dropdown")]),
        Line::from(""),
        section("═══ General ═══"),
        Line::from(vec![key("  R           "), Span::raw("Reload the property list")]),
        Line::from(vec![key("  h/?         "), Span::raw("Toggle this help")]),
        Line::from(vec![key("  q/Ctrl-C    "), Span::raw("Quit")]),
        Line::from(""),
        section("═══ Command Line ═══"),
        Line::from(vec![key("  propdash --list     "), Span::raw("Print properties as JSON")]),
        Line::from(vec![key("  propdash --api-url  "), Span::raw("Override the backend URL")]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            key("h"),
            Span::styled("/", Style::default().fg(text_dim())),
            key("?"),
            Span::styled("/", Style::default().fg(text_dim())),
            key("Esc"),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" propdash Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, Property, PropertyEnvelope, PropertySource, UnavailableSource};
    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    struct Listing(Vec<Property>);

    #[async_trait]
    impl PropertySource for Listing {
        async fn list_properties(&self) -> Result<PropertyEnvelope, ApiError> {
            Ok(PropertyEnvelope { data: Some(self.0.clone()) })
        }
    }

    fn alpha_beta() -> Arc<Listing> {
        Arc::new(Listing(vec![
            Property { id: "p1".to_string(), name: "Alpha".to_string(), timezone: "UTC".to_string() },
            Property { id: "p2".to_string(), name: "Beta".to_string(), timezone: "UTC".to_string() },
        ]))
    }

    async fn settle(app: &mut App) {
        for _ in 0..100 {
            app.tick();
            if !app.dashboard.is_loading() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("load never finished");
    }

    /// Draw the app on a 100x30 screen and return it as text
    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();

        let buf = terminal.backend().buffer();
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_loading_status_shown_before_load() {
        let app = App::new(alpha_beta());
        let out = screen(&app);

        assert!(out.contains("Loading properties…"));
        assert!(out.contains(PROMPT_MESSAGE));
    }

    #[tokio::test]
    async fn test_dropdown_lists_both_properties() {
        let mut app = App::new(alpha_beta());
        settle(&mut app).await;

        let out = screen(&app);
        assert!(out.contains("Alpha"));
        assert!(!out.contains("Loading properties…"));
        assert!(!out.contains("No properties available"));

        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)).unwrap();
        let out = screen(&app);
        assert!(out.contains("Select Property"));
        assert!(out.contains("Alpha"));
        assert!(out.contains("Beta"));
    }

    #[tokio::test]
    async fn test_selected_property_shown_in_summary() {
        let mut app = App::new(alpha_beta());
        settle(&mut app).await;
        app.dashboard.select("p2");

        let out = screen(&app);
        assert!(out.contains("Revenue Summary"));
        assert!(out.contains("Beta"));
        assert!(!out.contains(PROMPT_MESSAGE));
    }

    #[tokio::test]
    async fn test_empty_list_shows_status_and_prompt() {
        let mut app = App::new(Arc::new(Listing(Vec::new())));
        settle(&mut app).await;

        let out = screen(&app);
        assert!(out.contains("No properties available"));
        assert!(out.contains("Select a property to view revenue."));
    }

    #[tokio::test]
    async fn test_failed_load_shows_error_and_prompt() {
        let error = ApiError::InvalidUrl { url: "::".to_string(), reason: "bad".to_string() };
        let mut app = App::new(Arc::new(UnavailableSource::new(&error)));
        settle(&mut app).await;

        let out = screen(&app);
        assert!(out.contains("Failed to load properties"));
        assert!(!out.contains("No properties available"));
        assert!(out.contains("Select a property to view revenue."));
    }
}
