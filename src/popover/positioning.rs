use enum_dispatch::enum_dispatch;
use itertools::Itertools;
use ratatui::layout::{Rect, Size};
use tracing::debug;

use super::placement::{Alignment, Placement, Side};

/// Modifiers run ordered by phase; within a phase in the order given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Prepare,
    Main,
    Adjust,
    Finalize,
}

/// Where the arrow glyph goes: a cell on the panel edge facing the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrowPosition {
    pub x: u16,
    pub y: u16,
    /// Edge of the panel the arrow sits on.
    pub edge: Side,
}

impl ArrowPosition {
    pub fn symbol(&self) -> &'static str {
        match self.edge {
            Side::Top => "▲",
            Side::Bottom => "▼",
            Side::Left => "◀",
            Side::Right => "▶",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedPosition {
    /// Placement after flipping.
    pub placement: Placement,
    /// Panel area, clipped to the bounds.
    pub area: Rect,
    pub arrow: Option<ArrowPosition>,
}

/// Working state threaded through the modifiers. Coordinates may leave the bounds until the end.
#[derive(Debug, Clone)]
pub struct PositionState {
    pub anchor: Rect,
    pub floating: Size,
    pub bounds: Rect,
    pub placement: Placement,
    /// `(skidding, distance)`
    pub offset: (i32, i32),
    pub x: i32,
    pub y: i32,
    pub arrow: Option<ArrowPosition>,
}

impl PositionState {
    fn new(anchor: Rect, floating: Size, bounds: Rect, placement: Placement) -> Self {
        let mut state = Self {
            anchor,
            floating,
            bounds,
            placement,
            offset: (0, 0),
            x: 0,
            y: 0,
            arrow: None,
        };
        state.place();
        state
    }

    /// Coordinates of the panel for `placement`, including the offset.
    pub fn coords_for(&self, placement: Placement) -> (i32, i32) {
        let anchor = self.anchor;
        let (ax, ay) = (anchor.x as i32, anchor.y as i32);
        let (aw, ah) = (anchor.width as i32, anchor.height as i32);
        let (w, h) = (self.floating.width as i32, self.floating.height as i32);
        let (skidding, distance) = self.offset;

        let side = placement.side();
        let cross = |start: i32, anchor_len: i32, len: i32| match placement.alignment() {
            Alignment::Start => start,
            Alignment::Center => start + (anchor_len - len) / 2,
            Alignment::End => start + anchor_len - len,
        };
        match side {
            Side::Top => (cross(ax, aw, w) + skidding, ay - h - distance),
            Side::Bottom => (cross(ax, aw, w) + skidding, ay + ah + distance),
            Side::Left => (ax - w - distance, cross(ay, ah, h) + skidding),
            Side::Right => (ax + aw + distance, cross(ay, ah, h) + skidding),
        }
    }

    /// Whether the panel fits inside the bounds on the side it would be placed on.
    pub fn fits(&self, placement: Placement) -> bool {
        let (x, y) = self.coords_for(placement);
        let bounds = self.bounds;
        match placement.side() {
            Side::Top => y >= bounds.top() as i32,
            Side::Bottom => y + self.floating.height as i32 <= bounds.bottom() as i32,
            Side::Left => x >= bounds.left() as i32,
            Side::Right => x + self.floating.width as i32 <= bounds.right() as i32,
        }
    }

    pub fn place(&mut self) {
        (self.x, self.y) = self.coords_for(self.placement);
    }

    fn clipped_area(&self) -> Rect {
        let bounds = self.bounds;
        let left = self.x.max(bounds.left() as i32);
        let top = self.y.max(bounds.top() as i32);
        let right = (self.x + self.floating.width as i32).min(bounds.right() as i32);
        let bottom = (self.y + self.floating.height as i32).min(bounds.bottom() as i32);
        if right <= left || bottom <= top {
            let x = left.min(bounds.right() as i32) as u16;
            let y = top.min(bounds.bottom() as i32) as u16;
            return Rect::new(x, y, 0, 0);
        }
        Rect::new(
            left as u16,
            top as u16,
            (right - left) as u16,
            (bottom - top) as u16,
        )
    }
}

#[enum_dispatch]
pub trait ModifierBehavior {
    fn name(&self) -> &'static str;
    fn phase(&self) -> Phase;
    fn apply(&self, state: &mut PositionState);
}

/// Moves the panel `distance` away from the anchor and `skidding` along it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub skidding: i16,
    pub distance: i16,
}

impl ModifierBehavior for Offset {
    fn name(&self) -> &'static str {
        "offset"
    }

    fn phase(&self) -> Phase {
        Phase::Prepare
    }

    fn apply(&self, state: &mut PositionState) {
        state.offset = (self.skidding as i32, self.distance as i32);
        state.place();
    }
}

/// Tries the preferred placement, then the fallbacks in order, and takes the first that fits.
/// If nothing fits the preferred placement stays. `None` falls back to the opposite placement;
/// an empty list never flips.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Flip {
    pub fallback_placements: Option<Vec<Placement>>,
}

impl ModifierBehavior for Flip {
    fn name(&self) -> &'static str {
        "flip"
    }

    fn phase(&self) -> Phase {
        Phase::Main
    }

    fn apply(&self, state: &mut PositionState) {
        let preferred = state.placement;
        let fallbacks = match &self.fallback_placements {
            Some(placements) => placements.clone(),
            None => vec![preferred.opposite()],
        };
        let chosen = std::iter::once(preferred)
            .chain(fallbacks)
            .find(|it| state.fits(*it))
            .unwrap_or(preferred);
        if chosen != preferred {
            debug!("Popover flipped from {preferred} to {chosen}");
        }
        state.placement = chosen;
        state.place();
    }
}

/// Shifts the panel along its alignment axis to keep it inside the bounds. With `alt_axis` the
/// panel is also pushed back in on the main axis, possibly covering the anchor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PreventOverflow {
    pub padding: u16,
    pub alt_axis: bool,
}

fn clamp_axis(pos: i32, len: u16, min: u16, max: u16, padding: u16) -> i32 {
    let low = (min + padding) as i32;
    let high = max as i32 - padding as i32 - len as i32;
    if high < low { low } else { pos.clamp(low, high) }
}

impl ModifierBehavior for PreventOverflow {
    fn name(&self) -> &'static str {
        "prevent-overflow"
    }

    fn phase(&self) -> Phase {
        Phase::Adjust
    }

    fn apply(&self, state: &mut PositionState) {
        let (bounds, size, pad) = (state.bounds, state.floating, self.padding);
        let clamp_x = |x| clamp_axis(x, size.width, bounds.left(), bounds.right(), pad);
        let clamp_y = |y| clamp_axis(y, size.height, bounds.top(), bounds.bottom(), pad);
        if state.placement.side().is_vertical() {
            state.x = clamp_x(state.x);
            if self.alt_axis {
                state.y = clamp_y(state.y);
            }
        } else {
            state.y = clamp_y(state.y);
            if self.alt_axis {
                state.x = clamp_x(state.x);
            }
        }
    }
}

/// Points at the anchor's center from the panel edge facing it, kept off the panel corners.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Arrow {
    pub padding: u16,
}

impl ModifierBehavior for Arrow {
    fn name(&self) -> &'static str {
        "arrow"
    }

    fn phase(&self) -> Phase {
        Phase::Finalize
    }

    fn apply(&self, state: &mut PositionState) {
        let area = state.clipped_area();
        if area.width < 3 || area.height < 3 {
            state.arrow = None;
            return;
        }
        let edge = state.placement.side().opposite();
        let inset = 1 + self.padding;
        let anchor = state.anchor;
        let along = |center: u16, start: u16, len: u16| {
            let low = start + inset.min(len / 2);
            let high = (start + len - 1).saturating_sub(inset).max(low);
            center.clamp(low, high)
        };
        let (x, y) = match edge {
            Side::Top | Side::Bottom => {
                let center = anchor.x + anchor.width / 2;
                let y = if edge == Side::Top { area.top() } else { area.bottom() - 1 };
                (along(center, area.x, area.width), y)
            }
            Side::Left | Side::Right => {
                let center = anchor.y + anchor.height / 2;
                let x = if edge == Side::Left { area.left() } else { area.right() - 1 };
                (x, along(center, area.y, area.height))
            }
        };
        state.arrow = Some(ArrowPosition { x, y, edge });
    }
}

#[enum_dispatch(ModifierBehavior)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modifier {
    Offset,
    Flip,
    PreventOverflow,
    Arrow,
}

/// Positions a panel of size `floating` next to `anchor`, inside `bounds`.
pub fn compute_position(
    anchor: Rect,
    floating: Size,
    bounds: Rect,
    placement: Placement,
    modifiers: &[Modifier],
) -> ComputedPosition {
    let mut state = PositionState::new(anchor, floating, bounds, placement);
    for modifier in modifiers.iter().sorted_by_key(|it| it.phase()) {
        modifier.apply(&mut state);
    }
    ComputedPosition {
        placement: state.placement,
        area: state.clipped_area(),
        arrow: state.arrow,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const BOUNDS: Rect = Rect::new(0, 0, 80, 24);

    fn flip(fallbacks: Option<Vec<Placement>>) -> Modifier {
        Flip {
            fallback_placements: fallbacks,
        }
        .into()
    }

    #[test]
    fn test_bottom_start_sits_under_anchor() {
        let anchor = Rect::new(10, 5, 20, 1);
        let computed =
            compute_position(anchor, Size::new(20, 7), BOUNDS, Placement::BottomStart, &[]);

        assert_eq!(computed.area, Rect::new(10, 6, 20, 7));
    }

    #[test]
    fn test_centered_placements() {
        let anchor = Rect::new(30, 10, 10, 2);

        let top = compute_position(anchor, Size::new(4, 3), BOUNDS, Placement::Top, &[]);
        assert_eq!(top.area, Rect::new(33, 7, 4, 3));

        let right = compute_position(anchor, Size::new(4, 4), BOUNDS, Placement::RightEnd, &[]);
        assert_eq!(right.area, Rect::new(40, 8, 4, 4));
    }

    #[test]
    fn test_top_without_room_flips_to_bottom() {
        let anchor = Rect::new(10, 1, 20, 1);
        let computed =
            compute_position(anchor, Size::new(20, 5), BOUNDS, Placement::Top, &[flip(None)]);

        assert_eq!(computed.placement, Placement::Bottom);
        assert_eq!(computed.area, Rect::new(10, 2, 20, 5));
    }

    #[test]
    fn test_empty_fallbacks_never_flip() {
        let anchor = Rect::new(10, 1, 20, 1);
        let computed = compute_position(
            anchor,
            Size::new(20, 5),
            BOUNDS,
            Placement::Top,
            &[flip(Some(vec![]))],
        );

        assert_eq!(computed.placement, Placement::Top);
        assert_eq!(computed.area, Rect::new(10, 0, 20, 1));
    }

    #[test]
    fn test_explicit_fallbacks_tried_in_order() {
        let anchor = Rect::new(0, 1, 10, 1);
        let fallbacks = vec![Placement::Left, Placement::Right, Placement::Bottom];
        let computed = compute_position(
            anchor,
            Size::new(10, 3),
            BOUNDS,
            Placement::Top,
            &[flip(Some(fallbacks))],
        );

        assert_eq!(computed.placement, Placement::Right);
    }

    #[test]
    fn test_offset_applies_before_flip_check() {
        let anchor = Rect::new(10, 4, 20, 1);
        let modifiers: [Modifier; 2] = [
            flip(None),
            Offset {
                skidding: 2,
                distance: 1,
            }
            .into(),
        ];
        let computed =
            compute_position(anchor, Size::new(10, 4), BOUNDS, Placement::TopStart, &modifiers);

        assert_eq!(computed.placement, Placement::BottomStart);
        assert_eq!(computed.area, Rect::new(12, 6, 10, 4));
    }

    #[test]
    fn test_prevent_overflow_shifts_along_alignment_axis() {
        let anchor = Rect::new(70, 5, 8, 1);
        let modifiers: [Modifier; 1] = [PreventOverflow::default().into()];
        let computed =
            compute_position(anchor, Size::new(20, 3), BOUNDS, Placement::BottomStart, &modifiers);

        assert_eq!(computed.area, Rect::new(60, 6, 20, 3));
    }

    #[test]
    fn test_arrow_points_at_anchor_center() {
        let anchor = Rect::new(10, 5, 6, 1);
        let modifiers: [Modifier; 1] = [Arrow::default().into()];
        let computed =
            compute_position(anchor, Size::new(20, 5), BOUNDS, Placement::BottomStart, &modifiers);

        let arrow = computed.arrow.unwrap();
        assert_eq!((arrow.x, arrow.y, arrow.edge), (13, 6, Side::Top));
        assert_eq!(arrow.symbol(), "▲");
    }

    #[test]
    fn test_arrow_stays_off_corners() {
        let anchor = Rect::new(0, 5, 2, 1);
        let modifiers: [Modifier; 1] = [Arrow::default().into()];
        let computed =
            compute_position(anchor, Size::new(20, 5), BOUNDS, Placement::TopStart, &modifiers);

        let arrow = computed.arrow.unwrap();
        assert_eq!((arrow.x, arrow.y, arrow.edge), (1, 4, Side::Bottom));
    }

    #[test]
    fn test_prevent_overflow_keeps_padding_from_bounds() {
        let anchor = Rect::new(70, 5, 8, 1);
        let modifiers: [Modifier; 1] = [PreventOverflow {
            padding: 2,
            alt_axis: false,
        }
        .into()];
        let computed =
            compute_position(anchor, Size::new(20, 3), BOUNDS, Placement::BottomStart, &modifiers);

        assert_eq!(computed.area, Rect::new(58, 6, 20, 3));
    }

    #[test]
    fn test_prevent_overflow_alt_axis_pushes_back_over_anchor() {
        let anchor = Rect::new(10, 22, 10, 1);
        let clamp = |alt_axis| {
            let modifiers: [Modifier; 1] = [PreventOverflow {
                padding: 0,
                alt_axis,
            }
            .into()];
            compute_position(anchor, Size::new(10, 5), BOUNDS, Placement::Bottom, &modifiers).area
        };

        assert_eq!(clamp(false), Rect::new(10, 23, 10, 1));
        assert_eq!(clamp(true), Rect::new(10, 19, 10, 5));
    }

    #[test]
    fn test_arrow_padding_widens_corner_gap() {
        let anchor = Rect::new(0, 5, 2, 1);
        let modifiers: [Modifier; 1] = [Arrow { padding: 3 }.into()];
        let computed =
            compute_position(anchor, Size::new(20, 5), BOUNDS, Placement::TopStart, &modifiers);

        let arrow = computed.arrow.unwrap();
        assert_eq!((arrow.x, arrow.y, arrow.edge), (4, 4, Side::Bottom));
    }
}
