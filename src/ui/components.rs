//! Revenue summary pane for one property.
//!
//! Keyed only by the property id; the dashboard hands over the matching
//! `Property` when it has one so the pane can show a name.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::api::Property;
use crate::theme::Theme;

pub struct RevenueSummary<'a> {
    property_id: &'a str,
    property: Option<&'a Property>,
    theme: &'a Theme,
}

impl<'a> RevenueSummary<'a> {
    pub fn new(property_id: &'a str, property: Option<&'a Property>, theme: &'a Theme) -> Self {
        Self { property_id, property, theme }
    }
}

impl Widget for RevenueSummary<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = self.theme;
        let name = self.property.map(|p| p.name.as_str()).unwrap_or(self.property_id);
        let timezone = self
            .property
            .map(|p| p.timezone.as_str())
            .filter(|tz| !tz.is_empty())
            .unwrap_or("-");

        let label = |s: &'static str| Span::styled(s, Style::default().fg(theme.text_dim));

        let lines = vec![
            Line::from(Span::styled(
                name.to_string(),
                Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                label("Property ID  "),
                Span::styled(self.property_id.to_string(), Style::default().fg(theme.text)),
            ]),
            Line::from(vec![
                label("Timezone     "),
                Span::styled(timezone.to_string(), Style::default().fg(theme.text)),
            ]),
        ];

        let block = Block::default()
            .title(Span::styled(" Revenue Summary ", Style::default().fg(theme.accent)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
