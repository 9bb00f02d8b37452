use std::collections::BTreeMap;

use ratatui::style::{Color, Modifier, Style, palette::tailwind};
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub accent: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub muted: Color,
    pub border: Color,
    pub group_header: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: tailwind::SLATE.c950,
            foreground: tailwind::SLATE.c200,
            accent: tailwind::INDIGO.c400,
            highlight_bg: tailwind::SLATE.c700,
            highlight_fg: tailwind::SLATE.c50,
            muted: tailwind::SLATE.c500,
            border: tailwind::SLATE.c600,
            group_header: tailwind::INDIGO.c300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub palette: Palette,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".into(),
            palette: Palette::default(),
        }
    }
}

impl Theme {
    pub fn base(&self) -> Style {
        Style::new()
            .fg(self.palette.foreground)
            .bg(self.palette.background)
    }

    pub fn highlight(&self) -> Style {
        Style::new()
            .fg(self.palette.highlight_fg)
            .bg(self.palette.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn disabled(&self) -> Style {
        Style::new()
            .fg(self.palette.muted)
            .add_modifier(Modifier::CROSSED_OUT)
    }

    pub fn group_header(&self) -> Style {
        Style::new()
            .fg(self.palette.group_header)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC)
    }

    pub fn border(&self) -> Style {
        Style::new().fg(self.palette.border)
    }

    pub fn accent(&self) -> Style {
        Style::new().fg(self.palette.accent)
    }

    pub fn muted(&self) -> Style {
        Style::new().fg(self.palette.muted)
    }
}

/// Cycles through the configured themes, like a toolbar toggle in a component browser.
#[derive(Debug, Clone)]
pub struct ThemeSwitcher {
    themes: Vec<Theme>,
    active: usize,
}

impl Default for ThemeSwitcher {
    fn default() -> Self {
        Self {
            themes: vec![Theme::default()],
            active: 0,
        }
    }
}

impl ThemeSwitcher {
    pub fn new(palettes: &BTreeMap<String, Palette>, default_theme: &str) -> Self {
        let themes: Vec<Theme> = palettes
            .iter()
            .map(|(name, palette)| Theme {
                name: name.clone(),
                palette: *palette,
            })
            .collect();
        if themes.is_empty() {
            warn!("No themes configured, falling back to the built-in palette");
            return Self::default();
        }
        let mut switcher = Self { themes, active: 0 };
        if !default_theme.is_empty() && !switcher.select(default_theme) {
            warn!("Default theme {default_theme} is not configured");
        }
        switcher
    }

    pub fn active(&self) -> &Theme {
        &self.themes[self.active]
    }

    pub fn next(&mut self) -> &Theme {
        self.active = (self.active + 1) % self.themes.len();
        debug!("Switched theme to {}", self.active().name);
        self.active()
    }

    /// Returns whether a theme with that name exists.
    pub fn select(&mut self, name: &str) -> bool {
        match self.themes.iter().position(|it| it.name == name) {
            Some(idx) => {
                self.active = idx;
                true
            }
            None => false,
        }
    }
}
