use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Rect, Size},
    style::{Modifier as TextModifier, Style},
    text::Line,
    widgets::{Block, BorderType, Clear, StatefulWidget, Widget},
};
use serde::{Deserialize, Deserializer};
use tracing::{debug, trace};

use crate::theme::Theme;

mod placement;
mod portal;
mod positioning;
mod resize;
mod transition;

pub use self::{
    placement::{Alignment, Placement, Side},
    portal::{Layer, PortalHost, StackingContext},
    positioning::{
        Arrow, ArrowPosition, ComputedPosition, Flip, Modifier, ModifierBehavior, Offset, Phase,
        PositionState, PreventOverflow, compute_position,
    },
    resize::ResizeObserver,
    transition::{Transition, TransitionStage},
};

/// The element a popover is attached to. The key is its identity; the area may change freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub key: String,
    pub area: Rect,
}

impl Anchor {
    pub fn new(key: impl Into<String>, area: Rect) -> Self {
        Self {
            key: key.into(),
            area,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PopoverOptions {
    pub placement: Placement,
    /// Never flip to another placement, even without room.
    pub prevent_flip: bool,
    /// Do not shift the panel back into the bounds.
    pub allow_overflow: bool,
    pub with_arrow: bool,
    /// `(skidding, distance)` in cells.
    pub offset: (i16, i16),
    /// Tried in order when the placement does not fit. Defaults to the opposite placement.
    pub fallback_placements: Option<Vec<Placement>>,
    /// Pin the panel width to the anchor width.
    pub use_anchor_width: bool,
    pub with_transition: bool,
    #[serde(deserialize_with = "deserialize_duration")]
    pub transition_timeout: Duration,
    pub z_index: u32,
}

impl Default for PopoverOptions {
    fn default() -> Self {
        Self {
            placement: Placement::default(),
            prevent_flip: false,
            allow_overflow: false,
            with_arrow: false,
            offset: (0, 0),
            fallback_placements: None,
            use_anchor_width: false,
            with_transition: true,
            transition_timeout: Duration::from_millis(150),
            z_index: 10,
        }
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
}

impl PopoverOptions {
    /// The modifier list handed to the positioning engine.
    pub fn modifiers(&self) -> Vec<Modifier> {
        let (skidding, distance) = self.offset;
        let mut modifiers: Vec<Modifier> = vec![Offset { skidding, distance }.into()];
        if self.with_arrow {
            modifiers.push(Arrow::default().into());
        }
        let fallback_placements = if self.prevent_flip {
            Some(vec![])
        } else {
            self.fallback_placements.clone()
        };
        modifiers.push(Flip { fallback_placements }.into());
        if !self.allow_overflow {
            modifiers.push(PreventOverflow::default().into());
        }
        modifiers
    }
}

/// Lets the owner force a position recompute on the next layout.
#[derive(Debug, Clone, Default)]
pub struct UpdateHandle(Rc<Cell<bool>>);

impl UpdateHandle {
    pub fn update(&self) {
        self.0.set(true);
    }

    /// Whether an update was requested and not yet consumed by a layout.
    pub fn is_pending(&self) -> bool {
        self.0.get()
    }

    fn take(&self) -> bool {
        self.0.replace(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PositionInputs {
    anchor: Anchor,
    floating: Size,
    bounds: Rect,
    placement: Placement,
    modifiers: Vec<Modifier>,
}

const BORDER: u16 = 2;

/// Per-instance state of a [Popover]: anchor tracking, resize observation, transition and the
/// last computed position.
#[derive(Debug)]
pub struct PopoverState {
    options: PopoverOptions,
    stacking: StackingContext,
    open: bool,
    anchor: Option<Anchor>,
    observer: ResizeObserver,
    update: UpdateHandle,
    transition: Transition,
    layer: Option<Layer>,
    inputs: Option<PositionInputs>,
    computed: Option<ComputedPosition>,
    revision: u64,
}

impl PopoverState {
    pub fn new(options: PopoverOptions, stacking: StackingContext) -> Self {
        let transition = Transition::new(options.with_transition, options.transition_timeout);
        Self {
            options,
            stacking,
            open: false,
            anchor: None,
            observer: ResizeObserver::default(),
            update: UpdateHandle::default(),
            transition,
            layer: None,
            inputs: None,
            computed: None,
            revision: 0,
        }
    }

    pub fn options(&self) -> &PopoverOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: PopoverOptions, now: Instant) {
        let transition_changed = options.with_transition != self.options.with_transition
            || options.transition_timeout != self.options.transition_timeout;
        self.options = options;
        if transition_changed {
            self.transition =
                Transition::new(self.options.with_transition, self.options.transition_timeout);
            self.transition.set_in(self.open, now);
            self.sync_layer();
        }
    }

    pub fn update_handle(&self) -> UpdateHandle {
        self.update.clone()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool, now: Instant) {
        self.open = open;
        self.transition.set_in(open, now);
        self.sync_layer();
    }

    /// Advances the transition; call on every tick.
    pub fn tick(&mut self, now: Instant) {
        self.transition.tick(now);
        self.sync_layer();
    }

    pub fn stage(&self) -> TransitionStage {
        self.transition.stage()
    }

    pub fn is_mounted(&self) -> bool {
        self.transition.is_mounted()
    }

    pub fn z_index(&self) -> Option<u32> {
        self.layer.as_ref().map(Layer::z_index)
    }

    fn sync_layer(&mut self) {
        match (self.transition.is_mounted(), self.layer.is_some()) {
            (true, false) => self.layer = Some(self.stacking.allocate(self.options.z_index)),
            (false, true) => self.layer = None,
            _ => {}
        }
    }

    pub fn anchor(&self) -> Option<&Anchor> {
        self.anchor.as_ref()
    }

    /// Swaps the resize observation over to a new anchor identity; area changes of the same
    /// anchor keep the observation. A resize requests an update when the panel follows the anchor
    /// width.
    pub fn set_anchor(&mut self, anchor: Option<Anchor>) {
        let previous_key = self.anchor.as_ref().map(|it| it.key.as_str());
        let next_key = anchor.as_ref().map(|it| it.key.as_str());
        if previous_key != next_key {
            self.observer.disconnect();
            if let Some(anchor) = &anchor {
                self.observer.observe(anchor);
            }
        } else if let Some(anchor) = &anchor
            && self.observer.check(anchor)
            && self.options.use_anchor_width
        {
            debug!("Anchor {} resized, re-syncing popover width", anchor.key);
            self.update.update();
        }
        self.anchor = anchor;
    }

    pub fn computed(&self) -> Option<&ComputedPosition> {
        self.computed.as_ref()
    }

    /// How often the position has been computed.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn floating_size(&self, anchor: &Anchor, content: Size) -> Size {
        let width = if self.options.use_anchor_width {
            anchor.area.width
        } else {
            content.width.saturating_add(BORDER)
        };
        Size::new(width, content.height.saturating_add(BORDER))
    }

    /// Recomputes the position when the anchor, the content size, the bounds, the modifiers
    /// changed or an update was requested through the handle.
    pub fn layout(&mut self, content: Size, bounds: Rect) -> Option<&ComputedPosition> {
        let Some(anchor) = self.anchor.clone() else {
            self.inputs = None;
            self.computed = None;
            return None;
        };
        let inputs = PositionInputs {
            floating: self.floating_size(&anchor, content),
            anchor,
            bounds,
            placement: self.options.placement,
            modifiers: self.options.modifiers(),
        };
        let forced = self.update.take();
        if forced || self.inputs.as_ref() != Some(&inputs) {
            trace!(
                "Positioning popover with {}",
                inputs.modifiers.iter().map(|it| it.name()).join(", ")
            );
            self.computed = Some(compute_position(
                inputs.anchor.area,
                inputs.floating,
                inputs.bounds,
                inputs.placement,
                &inputs.modifiers,
            ));
            self.inputs = Some(inputs);
            self.revision += 1;
        }
        self.computed.as_ref()
    }
}

type Content<'a> = Box<dyn FnOnce(Rect, &mut Buffer) + 'a>;

/// A bordered floating panel next to the anchor of its [PopoverState].
///
/// The area it is rendered into is the container the panel is kept inside; render it through a
/// [PortalHost] to draw it on top of the regular tree.
pub struct Popover<'a> {
    content_size: Size,
    title: Option<Line<'a>>,
    style: Style,
    border_style: Style,
    arrow_style: Style,
    content: Option<Content<'a>>,
}

impl<'a> Popover<'a> {
    /// `content_size` is the size of the area inside the border.
    pub fn new(content_size: Size) -> Self {
        Self {
            content_size,
            title: None,
            style: Style::default(),
            border_style: Style::default(),
            arrow_style: Style::default(),
            content: None,
        }
    }

    pub fn title<T: Into<Line<'a>>>(mut self, title: T) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn theme(mut self, theme: &Theme) -> Self {
        self.style = theme.base();
        self.border_style = theme.border();
        self.arrow_style = theme.accent();
        self
    }

    pub fn content<F>(mut self, content: F) -> Self
    where
        F: FnOnce(Rect, &mut Buffer) + 'a,
    {
        self.content = Some(Box::new(content));
        self
    }
}

impl StatefulWidget for Popover<'_> {
    type State = PopoverState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if !state.is_mounted() {
            return;
        }
        let animating = state.transition.is_animating();
        let Some(computed) = state.layout(self.content_size, area).cloned() else {
            return;
        };
        if computed.area.is_empty() {
            return;
        }

        let mut style = self.style;
        if animating {
            style = style.add_modifier(TextModifier::DIM);
        }
        let mut block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(self.border_style)
            .style(style);
        if let Some(title) = self.title {
            block = block.title(title);
        }
        let inner = block.inner(computed.area);
        Clear.render(computed.area, buf);
        block.render(computed.area, buf);

        if let Some(arrow) = computed.arrow
            && let Some(cell) = buf.cell_mut((arrow.x, arrow.y))
        {
            cell.set_symbol(arrow.symbol()).set_style(self.arrow_style);
        }
        if let Some(content) = self.content {
            content(inner, buf);
        }
    }
}
