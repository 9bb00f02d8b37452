use educe::Educe;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Text},
    widgets::{Paragraph, StatefulWidget, Widget},
};
use tracing::debug;

use crate::{
    config::ListConfig,
    options::{GroupedOptions, OptionGroup, SelectOption},
    theme::Theme,
};

mod height;
mod scroll_sync;
mod virtualizer;

pub use self::{
    height::HeightTracker,
    scroll_sync::{ScrollReason, ScrollRequest, ScrollSync},
    virtualizer::{Align, VirtualRow, Virtualizer},
};

const GROUP_HEADER_HEIGHT: u16 = 1;
/// Measuring can change the height, which changes the viewport, which changes the rows.
const SETTLE_PASSES: usize = 3;

/// What the row renderer gets to know about the row besides the option itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowContext {
    pub index: usize,
    pub highlighted: bool,
    pub disabled: bool,
}

type RowRenderer<'a, P> = Box<dyn Fn(&SelectOption<P>, RowContext) -> Line<'a> + 'a>;
type HeaderRenderer<'a, P> = Box<dyn Fn(&OptionGroup<P>) -> Line<'a> + 'a>;

/// Per-instance state of a [VirtualOptionsList], kept across frames.
#[derive(Debug, Clone)]
pub struct VirtualListState {
    virtualizer: Virtualizer,
    scroll_sync: ScrollSync,
    height: HeightTracker,
    visible_rows: usize,
}

impl Default for VirtualListState {
    fn default() -> Self {
        Self::new(&ListConfig::default())
    }
}

impl VirtualListState {
    pub fn new(config: &ListConfig) -> Self {
        Self {
            virtualizer: Virtualizer::new(0, 1, config.overscan),
            scroll_sync: ScrollSync::default(),
            height: HeightTracker::default(),
            visible_rows: config.visible_rows.max(1),
        }
    }

    pub fn scroll_offset(&self) -> u32 {
        self.virtualizer.scroll_offset()
    }

    pub fn virtualizer(&self) -> &Virtualizer {
        &self.virtualizer
    }

    pub fn mark_closed(&mut self) {
        self.scroll_sync.mark_closed();
    }

    /// Height the list wants for its rows, once known.
    pub fn height(&self) -> Option<u16> {
        self.height.height()
    }

    /// Runs one frame worth of change detection and returns the rows to draw.
    ///
    /// Safe to call more than once per frame: a second call with the same inputs changes nothing.
    pub fn prepare<P>(
        &mut self,
        options: &GroupedOptions<P>,
        open: bool,
        highlight: Option<usize>,
        max_height: u16,
    ) -> Vec<VirtualRow> {
        self.virtualizer.set_count(options.len());
        let mut rows = self.materialize(options);

        for _ in 0..SETTLE_PASSES {
            let Some(height) = self.height.observe(&rows, &self.virtualizer, self.visible_rows)
            else {
                break;
            };
            let height = height.min(max_height);
            if self.virtualizer.viewport() == Some(height) {
                break;
            }
            self.virtualizer.set_viewport(Some(height));
            rows = self.materialize(options);
        }

        let requests = self
            .scroll_sync
            .sync(open, highlight, options, &self.virtualizer);
        if requests.is_empty() {
            return rows;
        }
        for request in requests {
            debug!("Scrolling options list to {} ({})", request.index, request.reason);
            self.virtualizer.scroll_to_index(request.index, request.align);
        }
        self.materialize(options)
    }

    /// Produces the virtual rows and measures them; rows starting a group are one header taller.
    fn materialize<P>(&mut self, options: &GroupedOptions<P>) -> Vec<VirtualRow> {
        let rows = self.virtualizer.virtual_rows();
        let mut changed = false;
        for row in rows.iter() {
            let header = if options.group_starts().contains_key(&row.index) {
                GROUP_HEADER_HEIGHT
            } else {
                0
            };
            changed |= self.virtualizer.measure(row.index, 1 + header);
        }
        if changed {
            self.virtualizer.virtual_rows()
        } else {
            rows
        }
    }
}

/// Renders the visible slice of a grouped option list.
#[derive(Educe)]
#[educe(Debug)]
pub struct VirtualOptionsList<'a, P = ()> {
    options: &'a GroupedOptions<P>,
    highlight: Option<usize>,
    open: bool,
    style: Style,
    highlight_style: Style,
    disabled_style: Style,
    header_style: Style,
    #[educe(Debug(ignore))]
    render_row: RowRenderer<'a, P>,
    #[educe(Debug(ignore))]
    render_group_header: Option<HeaderRenderer<'a, P>>,
    placeholder: Option<Text<'a>>,
}

impl<'a, P> VirtualOptionsList<'a, P> {
    pub fn new(options: &'a GroupedOptions<P>) -> Self {
        Self {
            options,
            highlight: None,
            open: true,
            style: Style::default(),
            highlight_style: Style::default(),
            disabled_style: Style::default(),
            header_style: Style::default(),
            render_row: Box::new(|option, _| Line::from(option.label.clone())),
            render_group_header: None,
            placeholder: None,
        }
    }

    pub fn highlight(mut self, highlight: Option<usize>) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    pub fn theme(mut self, theme: &Theme) -> Self {
        self.style = theme.base();
        self.highlight_style = theme.highlight();
        self.disabled_style = theme.disabled();
        self.header_style = theme.group_header();
        self
    }

    pub fn row_renderer<F>(mut self, render_row: F) -> Self
    where
        F: Fn(&SelectOption<P>, RowContext) -> Line<'a> + 'a,
    {
        self.render_row = Box::new(render_row);
        self
    }

    pub fn group_header_renderer<F>(mut self, render_group_header: F) -> Self
    where
        F: Fn(&OptionGroup<P>) -> Line<'a> + 'a,
    {
        self.render_group_header = Some(Box::new(render_group_header));
        self
    }

    pub fn placeholder<T: Into<Text<'a>>>(mut self, placeholder: T) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    fn header_line(&self, group: &OptionGroup<P>) -> Line<'a> {
        match &self.render_group_header {
            Some(render) => render(group),
            None => Line::from(group.label.clone()),
        }
    }

    fn row_style(&self, ctx: RowContext) -> Style {
        if ctx.highlighted {
            self.highlight_style
        } else if ctx.disabled {
            self.disabled_style
        } else {
            Style::default()
        }
    }
}

/// Draws a single line at `y` lines below the top of `area`, clipping anything outside.
fn draw_line(area: Rect, buf: &mut Buffer, y: i64, line: &Line, style: Style) {
    if y < 0 || y >= area.height as i64 {
        return;
    }
    let y = area.y + y as u16;
    buf.set_style(Rect::new(area.x, y, area.width, 1), style);
    buf.set_line(area.x, y, line, area.width);
}

impl<P> StatefulWidget for VirtualOptionsList<'_, P> {
    type State = VirtualListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        buf.set_style(area, self.style);
        if self.options.is_empty() {
            if let Some(placeholder) = &self.placeholder {
                Paragraph::new(placeholder.clone())
                    .style(self.disabled_style)
                    .render(area, buf);
            }
            return;
        }

        let rows = state.prepare(self.options, self.open, self.highlight, area.height);
        let scroll_offset = state.scroll_offset() as i64;
        for row in rows {
            let Some(option) = self.options.get(row.index) else {
                continue;
            };
            let mut y = row.start as i64 - scroll_offset;
            if let Some(group) = self.options.group_starting_at(row.index) {
                draw_line(area, buf, y, &self.header_line(group), self.header_style);
                y += GROUP_HEADER_HEIGHT as i64;
            }
            let ctx = RowContext {
                index: row.index,
                highlighted: self.highlight == Some(row.index),
                disabled: option.disabled,
            };
            draw_line(area, buf, y, &(self.render_row)(option, ctx), self.row_style(ctx));
        }
    }
}
