use lazy_static::lazy_static;
use ratatui::layout::{Constraint, Flex, Layout, Rect};

lazy_static! {
    static ref MAIN_LAYOUT: Layout = Layout::vertical([Constraint::Min(5), Constraint::Length(2)]);
    static ref CANVAS_LAYOUT: Layout =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Fill(1)]);
}

pub enum LayoutSlot {
    MainCanvas = 0,
    StatusBar = 1,
}

pub fn main_vert(slot: LayoutSlot, area: Rect) -> Rect {
    MAIN_LAYOUT.areas::<2>(area)[slot as usize]
}

/// Splits the inside of the canvas into the toolbar line and the stage below it.
pub fn canvas(area: Rect) -> (Rect, Rect) {
    let [toolbar, _, stage] = CANVAS_LAYOUT.areas(area);
    (toolbar, stage)
}

/// A `width` x `height` area horizontally centered at the top third of `stage`.
pub fn anchor_slot(stage: Rect, width: u16, height: u16) -> Rect {
    let [_, row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(2),
    ])
    .areas(stage);
    let [slot] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    slot
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_status_bar_takes_bottom_lines() {
        let area = Rect::new(0, 0, 40, 20);

        assert_eq!(main_vert(LayoutSlot::StatusBar, area), Rect::new(0, 18, 40, 2));
        assert_eq!(main_vert(LayoutSlot::MainCanvas, area), Rect::new(0, 0, 40, 18));
    }

    #[test]
    fn test_anchor_slot_centered() {
        let slot = anchor_slot(Rect::new(0, 0, 40, 12), 20, 3);

        assert_eq!((slot.x, slot.width, slot.height), (10, 20, 3));
    }
}
