use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

static KEYS: &[(&str, &str)] = &[
    ("h, j, k, l", "Move the cursor"),
    ("ARROW KEYS", "Move the cursor"),
    ("[, PAGE UP", "Scroll back one week"),
    ("], PAGE DOWN", "Scroll forward one week"),
    ("0, HOME", "Return to the starting date"),
    ("v, SPACE", "Start or finish a selection"),
    ("ESC", "Cancel a selection, else quit"),
    ("?", "Show this help"),
    ("q", "Quit"),
];

/// Popup listing the key bindings, drawn centered over whatever is below
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = KEYS
            .iter()
            .map(|(keys, action)| Line::raw(format!(" {keys:<14}  {action} ")))
            .collect::<Text<'_>>();
        let block = Block::bordered()
            .title(Line::raw(" Keys ").centered())
            .title_bottom(Line::raw(" Press any key to dismiss ").centered());
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        let [popup] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(area);
        let [popup] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(popup);
        Clear.render(popup, buf);
        Paragraph::new(text)
            .block(block)
            .style(self.0)
            .render(popup, buf);
    }
}
