use strum::Display;

use super::virtualizer::{Align, Virtualizer};
use crate::options::GroupedOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ScrollReason {
    Opened,
    WrapToEnd,
    WrapToStart,
    FollowHighlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub index: usize,
    pub align: Align,
    pub reason: ScrollReason,
}

/// Keeps the highlighted option in view by comparing open flag and highlight against the values
/// seen on the previous frame.
#[derive(Debug, Default, Clone)]
pub struct ScrollSync {
    was_open: bool,
    /// `None` until the first sync, so the very first highlight counts as a change.
    last_highlight: Option<Option<usize>>,
}

impl ScrollSync {
    /// For owners that stop rendering the list while closed, so the next open is seen as one.
    pub fn mark_closed(&mut self) {
        self.was_open = false;
    }

    pub fn sync<P>(
        &mut self,
        open: bool,
        highlight: Option<usize>,
        options: &GroupedOptions<P>,
        virtualizer: &Virtualizer,
    ) -> Vec<ScrollRequest> {
        let highlight = highlight.filter(|it| *it < options.len());
        let mut requests = Vec::new();

        let opened = open && !self.was_open;
        self.was_open = open;
        if opened && let Some(index) = highlight {
            requests.push(ScrollRequest {
                index,
                align: Align::End,
                reason: ScrollReason::Opened,
            });
        }

        let changed = self.last_highlight != Some(highlight);
        let previous = self.last_highlight.flatten();
        self.last_highlight = Some(highlight);
        if changed
            && let Some(current) = highlight
            && let Some(request) = follow(previous, current, options, virtualizer)
        {
            requests.push(request);
        }

        requests
    }
}

/// A jump onto the last index coming from at or before the first enabled option is a wrap from
/// top to bottom (and vice versa). Only the previous position is inspected, not the direction.
fn follow<P>(
    previous: Option<usize>,
    current: usize,
    options: &GroupedOptions<P>,
    virtualizer: &Virtualizer,
) -> Option<ScrollRequest> {
    let previous = previous.map_or(-1, |it| it as isize);
    let last = options.len().checked_sub(1)?;

    if let Some(first_enabled) = options.first_enabled()
        && let Some(last_enabled) = options.last_enabled()
    {
        if previous <= first_enabled as isize && current == last {
            return Some(ScrollRequest {
                index: last_enabled,
                align: Align::Auto,
                reason: ScrollReason::WrapToEnd,
            });
        }
        if previous >= last_enabled as isize && current == 0 {
            return Some(ScrollRequest {
                index: 0,
                align: Align::Auto,
                reason: ScrollReason::WrapToStart,
            });
        }
    }

    if virtualizer.is_visible(current) {
        return None;
    }
    Some(ScrollRequest {
        index: current,
        align: Align::End,
        reason: ScrollReason::FollowHighlight,
    })
}
