use color_eyre::Result;
use popselect::{
    options::SelectOption,
    popover::{Anchor, Popover, PortalHost},
    theme::Theme,
    virtual_list::{RowContext, VirtualOptionsList},
};
use ratatui::{
    Frame,
    layout::{Alignment, Rect, Size},
    style::Stylize,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, StatefulWidget},
};

use super::{Showcase, state::ShowcaseState};
use crate::layout::{self, LayoutSlot};

pub const ANCHOR_KEY: &str = "select";
const ANCHOR_WIDTH: u16 = 32;
const ANCHOR_HEIGHT: u16 = 3;

pub fn draw(showcase: &mut Showcase, frame: &mut Frame, area: Rect) -> Result<()> {
    let area = layout::main_vert(LayoutSlot::MainCanvas, area);
    let state = &mut showcase.state;
    let theme = state.themes.active().clone();

    let block = Block::new()
        .borders(!Borders::BOTTOM)
        .border_type(BorderType::Rounded)
        .border_style(theme.border())
        .style(theme.base())
        .title(" 🐟 popselect ".bold());
    frame.render_widget(&block, area);
    let (toolbar, stage) = layout::canvas(block.inner(area));
    frame.render_widget(toolbar_line(state, &theme), toolbar);

    let button = layout::anchor_slot(stage, ANCHOR_WIDTH.min(stage.width), ANCHOR_HEIGHT);
    frame.render_widget(anchor_button(state, &theme), button);
    state
        .popover
        .set_anchor(Some(Anchor::new(ANCHOR_KEY, button)));

    if !state.popover.is_mounted() {
        state.list.mark_closed();
        return Ok(());
    }
    let content = content_size(state);
    let z_index = state
        .popover
        .z_index()
        .unwrap_or(state.popover.options().z_index);
    let ShowcaseState {
        options,
        selected,
        highlight,
        list,
        popover,
        list_config,
        ..
    } = state;
    let (selected, highlight, open) = (*selected, *highlight, popover.is_open());

    let mut portal = PortalHost::new(area);
    portal.push(z_index, |container, buf| {
        Popover::new(content)
            .theme(&theme)
            .content(|inner, buf| {
                VirtualOptionsList::new(&*options)
                    .theme(&theme)
                    .highlight(highlight)
                    .open(open)
                    .placeholder(list_config.placeholder.as_str())
                    .row_renderer(move |option, ctx| row_line(option, ctx, selected))
                    .group_header_renderer(|group| Line::from(format!("{} ·", group.label)))
                    .render(inner, buf, list);
            })
            .render(container, buf, popover);
    });
    portal.render(frame.buffer_mut());
    Ok(())
}

fn toolbar_line<'a>(state: &ShowcaseState, theme: &Theme) -> Line<'a> {
    let options = state.popover.options();
    let item = |key: &'static str, value: String| {
        [
            Span::styled(format!("{key}: "), theme.muted()),
            Span::styled(value, theme.accent()),
            Span::raw("  "),
        ]
    };
    Line::from_iter(
        item("Theme", theme.name.clone())
            .into_iter()
            .chain(item("Placement", options.placement.to_string()))
            .chain(item("Arrow", options.with_arrow.to_string()))
            .chain(item("Anchor width", options.use_anchor_width.to_string())),
    )
}

fn anchor_button<'a>(state: &'a ShowcaseState, theme: &Theme) -> Paragraph<'a> {
    let border = if state.is_open() {
        theme.accent()
    } else {
        theme.border()
    };
    let label = match state.selected_label() {
        Some(label) => Span::styled(label, theme.base()),
        None => Span::styled("Pick a fish…", theme.muted()),
    };
    Paragraph::new(Line::from(vec![label, Span::raw(" ▾")]))
        .alignment(Alignment::Left)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(border),
        )
}

fn row_line(option: &SelectOption, ctx: RowContext, selected: Option<usize>) -> Line<'static> {
    let marker = if selected == Some(ctx.index) {
        "✓ "
    } else {
        "  "
    };
    Line::from(format!("{marker}{}", option.label))
}

/// Size of the list inside the popover border: wide enough for the longest label, as tall as the
/// list last asked for.
fn content_size(state: &ShowcaseState) -> Size {
    let placeholder = Line::from(state.list_config.placeholder.as_str()).width();
    let width = state
        .options
        .iter_flat()
        .map(|it| Line::from(it.label.as_str()).width() + 2)
        .max()
        .unwrap_or(0)
        .max(placeholder);
    let height = match state.list.height() {
        Some(height) => height,
        None => state.list_config.visible_rows.min(state.options.len()) as u16,
    };
    Size::new(width as u16, height.max(1))
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use popselect::options::GroupedOptions;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::components::showcase::state::demo_options;

    fn render(showcase: &mut Showcase, width: u16, height: u16) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                draw(showcase, frame, area).unwrap();
            })
            .unwrap();
        terminal
    }

    fn contains(terminal: &Terminal<TestBackend>, needle: &str) -> bool {
        let buf = terminal.backend().buffer();
        (0..buf.area.height).any(|y| {
            (0..buf.area.width)
                .map(|x| buf[(x, y)].symbol())
                .collect::<String>()
                .contains(needle)
        })
    }

    #[test]
    fn test_closed_shows_only_anchor() {
        let mut showcase = Showcase::with_options(demo_options());

        let terminal = render(&mut showcase, 60, 20);

        assert!(contains(&terminal, "Pick a fish…"));
        assert!(!contains(&terminal, "Any fish"));
        assert_eq!(
            showcase.state.popover.anchor().map(|it| it.key.as_str()),
            Some(ANCHOR_KEY)
        );
    }

    #[test]
    fn test_open_renders_list_in_popover() {
        let mut showcase = Showcase::with_options(demo_options());
        showcase.state.open(Instant::now());

        let terminal = render(&mut showcase, 60, 24);

        assert!(contains(&terminal, "Any fish"));
        assert!(contains(&terminal, "Freshwater"));
        assert!(showcase.state.popover.computed().is_some());
    }

    #[test]
    fn test_empty_options_show_placeholder() {
        let mut showcase = Showcase::with_options(GroupedOptions::default());
        showcase.state.open(Instant::now());

        let terminal = render(&mut showcase, 60, 24);

        assert!(contains(&terminal, "No options"));
    }

    #[test]
    fn test_content_size_follows_labels() {
        let showcase = Showcase::with_options(demo_options());

        assert_eq!(content_size(&showcase.state), Size::new(11, 5));
    }
}
