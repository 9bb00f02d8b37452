use std::time::Instant;

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use super::Showcase;
use crate::action::{Action, RelevantKey};

pub fn closed_keys() -> Vec<RelevantKey> {
    vec![
        RelevantKey::new("Enter", "Open"),
        RelevantKey::new("t", "Theme"),
        RelevantKey::new("p", "Placement"),
        RelevantKey::new("a", "Arrow"),
        RelevantKey::new("w", "Anchor width"),
        RelevantKey::new("q", "Quit"),
    ]
}

fn open_keys() -> Vec<RelevantKey> {
    vec![
        RelevantKey::new("↑↓", "Move"),
        RelevantKey::new("Home/End", "Jump"),
        RelevantKey::new("Enter", "Pick"),
        RelevantKey::new("Esc", "Close"),
    ]
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

pub fn handle(showcase: &mut Showcase, key: KeyEvent) -> Result<Option<Action>> {
    if key.kind != KeyEventKind::Press {
        return Ok(None);
    }
    let now = Instant::now();
    if showcase.state.is_open() {
        return handle_open(showcase, key, now);
    }
    let state = &mut showcase.state;

    let action = match key.code {
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down => {
            state.open(now);
            Action::SetRelevantKeys(open_keys())
        }
        KeyCode::Char('t') => Action::ThemeChanged(state.themes.next().name.clone()),
        KeyCode::Char('p') => {
            Action::SetStatusLine(format!("Placement: {}", state.cycle_placement(now)))
        }
        KeyCode::Char('a') => {
            Action::SetStatusLine(format!("Arrow: {}", on_off(state.toggle_arrow(now))))
        }
        KeyCode::Char('w') => Action::SetStatusLine(format!(
            "Anchor width: {}",
            on_off(state.toggle_anchor_width(now))
        )),
        KeyCode::Char('q') => Action::Quit,
        _ => return Ok(None),
    };
    Ok(Some(action))
}

fn handle_open(showcase: &mut Showcase, key: KeyEvent, now: Instant) -> Result<Option<Action>> {
    let state = &mut showcase.state;
    match key.code {
        KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => state.move_highlight(true),
        KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k') => state.move_highlight(false),
        KeyCode::Home => state.highlight_edge(true),
        KeyCode::End => state.highlight_edge(false),
        KeyCode::Esc => {
            state.close(now);
            return Ok(Some(Action::SetRelevantKeys(closed_keys())));
        }
        KeyCode::Enter => {
            let Some(picked) = state.pick(now).map(|it| it.label.clone()) else {
                return Ok(None);
            };
            if let Some(tx) = &showcase.action_tx {
                tx.send(Action::SetStatusLine(format!("Picked {picked}")))?;
            }
            return Ok(Some(Action::SetRelevantKeys(closed_keys())));
        }
        _ => {}
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    use super::*;
    use crate::components::showcase::state::demo_options;

    fn press(showcase: &mut Showcase, code: KeyCode) -> Option<Action> {
        handle(showcase, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    #[test]
    fn test_open_move_and_pick() {
        let mut showcase = Showcase::with_options(demo_options());

        assert_eq!(
            press(&mut showcase, KeyCode::Enter),
            Some(Action::SetRelevantKeys(open_keys()))
        );
        assert_eq!(press(&mut showcase, KeyCode::Down), None);
        assert_eq!(
            press(&mut showcase, KeyCode::Enter),
            Some(Action::SetRelevantKeys(closed_keys()))
        );
        assert!(!showcase.state.is_open());
        assert_eq!(showcase.state.selected_label(), Some("Trout"));
    }

    #[test]
    fn test_pick_reports_label_and_restores_closed_keys() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut showcase = Showcase::with_options(demo_options());
        showcase.action_tx = Some(tx);

        press(&mut showcase, KeyCode::Enter);
        press(&mut showcase, KeyCode::Down);
        assert_eq!(
            press(&mut showcase, KeyCode::Enter),
            Some(Action::SetRelevantKeys(closed_keys()))
        );
        assert_eq!(rx.try_recv().ok(), Some(Action::SetStatusLine("Picked Trout".into())));
        assert!(rx.try_recv().is_err());

        // Back to the closed key map: `t` switches the theme instead of doing nothing.
        assert_eq!(
            press(&mut showcase, KeyCode::Char('t')),
            Some(Action::ThemeChanged("default".into()))
        );
    }

    #[test]
    fn test_escape_closes_without_picking() {
        let mut showcase = Showcase::with_options(demo_options());
        press(&mut showcase, KeyCode::Enter);

        assert_eq!(
            press(&mut showcase, KeyCode::Esc),
            Some(Action::SetRelevantKeys(closed_keys()))
        );
        assert_eq!(showcase.state.selected, None);
    }

    #[test]
    fn test_toolbar_keys_when_closed() {
        let mut showcase = Showcase::with_options(demo_options());

        assert_eq!(
            press(&mut showcase, KeyCode::Char('t')),
            Some(Action::ThemeChanged("default".into()))
        );
        assert_eq!(
            press(&mut showcase, KeyCode::Char('a')),
            Some(Action::SetStatusLine("Arrow: on".into()))
        );
        assert_eq!(press(&mut showcase, KeyCode::Char('q')), Some(Action::Quit));
    }
}
