use color_eyre::Result;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Stylize,
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Padding},
};

use super::Component;

use crate::{
    action::{Action, RelevantKey},
    layout::LayoutSlot,
};

#[derive(Debug, Clone, PartialEq)]
pub struct StatusBar {
    status_line: String,
    theme: String,
    keys: Vec<RelevantKey>,
}

impl Default for StatusBar {
    fn default() -> Self {
        Self {
            status_line: "Pick a fish!".to_owned(),
            theme: String::new(),
            keys: vec![RelevantKey::new("q", "Quit")],
        }
    }
}

impl Component for StatusBar {
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::SetStatusLine(msg) => self.status_line = msg,
            Action::Error(msg) => self.status_line = format!("⛔ {msg}"),
            Action::SetRelevantKeys(keys) => self.keys = keys,
            Action::ThemeChanged(theme) => {
                self.status_line = format!("Theme: {theme}");
                self.theme = theme;
            }
            _ => {}
        };
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let area = crate::layout::main_vert(LayoutSlot::StatusBar, area);

        let mut block = Block::new()
            .borders(!Borders::BOTTOM)
            .border_type(BorderType::Rounded)
            .padding(Padding::horizontal(2))
            .title(self.status_line.clone())
            .title_alignment(Alignment::Center);
        if !self.theme.is_empty() {
            block = block.title(Line::from(format!(" 🎨 {} ", self.theme)).right_aligned());
        }
        frame.render_widget(&block, area);

        let mut keys_text = Text::default();
        let mut first = true;
        for key in self.keys.iter() {
            if !first {
                keys_text.push_span("  ");
            } else {
                first = false;
            }
            keys_text.push_span(format!("<{}> ", key.key).blue().bold());
            keys_text.push_span(Span::from(key.text.clone()));
        }
        frame.render_widget(keys_text, block.inner(area));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_theme_change_updates_both_lines() {
        let mut bar = StatusBar::default();

        bar.update(Action::ThemeChanged("paper".into())).unwrap();

        assert_eq!(bar.theme, "paper");
        assert_eq!(bar.status_line, "Theme: paper");
    }

    #[test]
    fn test_errors_replace_status_line() {
        let mut bar = StatusBar::default();

        bar.update(Action::Error("boom".into())).unwrap();

        assert_eq!(bar.status_line, "⛔ boom");
    }
}
