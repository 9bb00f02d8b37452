use color_eyre::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use popselect::config::Config;
use ratatui::{
    Frame,
    layout::{Rect, Size},
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{action::Action, tui::Event};

pub mod showcase;
pub mod statusbar;

/// A piece of the showcase screen: the select box or the status bar.
///
/// `App` wires every component to the action channel and the config, feeds it
/// terminal events and actions, then draws all of them into the full frame in order.
pub trait Component {
    /// Keeps a sender for actions raised outside of event handling, like a pick notice.
    fn register_action_handler(&mut self, _tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }
    /// Called once with the merged config, after the action sender.
    fn register_config_handler(&mut self, _config: Config) -> Result<()> {
        Ok(())
    }
    fn init(&mut self, _area: Size) -> Result<()> {
        Ok(())
    }
    /// Routes key and mouse events to the dedicated handlers.
    fn handle_events(&mut self, event: Option<Event>) -> Result<Option<Action>> {
        let action = match event {
            Some(Event::Key(key_event)) => self.handle_key_event(key_event)?,
            Some(Event::Mouse(mouse_event)) => self.handle_mouse_event(mouse_event)?,
            _ => None,
        };
        Ok(action)
    }
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }
    fn handle_mouse_event(&mut self, _mouse: MouseEvent) -> Result<Option<Action>> {
        Ok(None)
    }
    /// Reacts to an action from the loop. A returned action is queued behind the current ones.
    fn update(&mut self, _action: Action) -> Result<Option<Action>> {
        Ok(None)
    }
    /// Draws into `area`, the whole frame. Popovers go through a portal on top of it.
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}
