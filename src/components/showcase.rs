use std::{path::Path, time::Instant};

use color_eyre::Result;
use crossterm::event::KeyEvent;
use popselect::{config::Config, options::GroupedOptions, popover::Placement};
use ratatui::{Frame, layout::Rect};
use tokio::sync::mpsc::UnboundedSender;

use super::Component;
use crate::{action::Action, components::showcase::state::ShowcaseState};

mod draw;
mod key_handling;
mod state;

/// A select box made of an anchor button, a popover and a virtualized option list, plus a
/// toolbar to flip through themes and popover settings.
pub struct Showcase {
    state: ShowcaseState,
    theme_override: Option<String>,
    placement_override: Option<Placement>,
    action_tx: Option<UnboundedSender<Action>>,
}

impl Showcase {
    pub fn new(
        options_file: Option<&Path>,
        theme_override: Option<String>,
        placement_override: Option<Placement>,
    ) -> Result<Self> {
        let options = match options_file {
            Some(path) => state::load_options(path)?,
            None => state::demo_options(),
        };
        Ok(Self {
            theme_override,
            placement_override,
            ..Self::with_options(options)
        })
    }

    fn with_options(options: GroupedOptions) -> Self {
        Self {
            state: ShowcaseState::new(options),
            theme_override: None,
            placement_override: None,
            action_tx: None,
        }
    }
}

impl Component for Showcase {
    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(tx);
        Ok(())
    }

    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        self.state.apply_config(
            &config,
            self.theme_override.as_deref(),
            self.placement_override,
        );
        if let Some(tx) = &self.action_tx {
            tx.send(Action::ThemeChanged(self.state.themes.active().name.clone()))?;
            tx.send(Action::SetRelevantKeys(key_handling::closed_keys()))?;
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        key_handling::handle(self, key)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if action == Action::Tick {
            self.state.popover.tick(Instant::now());
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        draw::draw(self, frame, area)
    }
}
