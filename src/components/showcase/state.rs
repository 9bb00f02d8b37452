use std::{fs, path::Path, time::Instant};

use color_eyre::{Result, eyre::WrapErr};
use popselect::{
    config::{Config, ListConfig},
    options::{GroupedOptions, OptionEntry, OptionGroup, SelectOption},
    popover::{Placement, PopoverOptions, PopoverState, StackingContext},
    theme::ThemeSwitcher,
    virtual_list::VirtualListState,
};
use strum::IntoEnumIterator;
use tracing::{debug, info};

pub struct ShowcaseState {
    pub options: GroupedOptions,
    /// Flat index of the picked option.
    pub selected: Option<usize>,
    /// Flat index of the keyboard highlight while open.
    pub highlight: Option<usize>,
    pub list: VirtualListState,
    pub popover: PopoverState,
    pub themes: ThemeSwitcher,
    pub list_config: ListConfig,
    stacking: StackingContext,
}

impl ShowcaseState {
    pub fn new(options: GroupedOptions) -> Self {
        let stacking = StackingContext::default();
        let list_config = ListConfig::default();
        Self {
            options,
            selected: None,
            highlight: None,
            list: VirtualListState::new(&list_config),
            popover: PopoverState::new(PopoverOptions::default(), stacking.clone()),
            themes: ThemeSwitcher::default(),
            list_config,
            stacking,
        }
    }

    pub fn apply_config(
        &mut self,
        config: &Config,
        theme: Option<&str>,
        placement: Option<Placement>,
    ) {
        self.themes = ThemeSwitcher::new(&config.themes, theme.unwrap_or(&config.default_theme));
        self.list_config = config.list.clone();
        self.list = VirtualListState::new(&self.list_config);

        let mut popover = config.popover.clone();
        if let Some(placement) = placement {
            popover.placement = placement;
        }
        self.popover = PopoverState::new(popover, self.stacking.clone());
    }

    pub fn is_open(&self) -> bool {
        self.popover.is_open()
    }

    /// Opens with the highlight on the picked option, or the first one that can be picked.
    pub fn open(&mut self, now: Instant) {
        self.highlight = self
            .selected
            .filter(|it| !self.options.is_disabled(*it))
            .or_else(|| self.options.first_enabled());
        self.popover.set_open(true, now);
    }

    pub fn close(&mut self, now: Instant) {
        self.popover.set_open(false, now);
    }

    pub fn move_highlight(&mut self, forward: bool) {
        self.highlight = if forward {
            self.options.next_enabled(self.highlight)
        } else {
            self.options.previous_enabled(self.highlight)
        };
    }

    pub fn highlight_edge(&mut self, first: bool) {
        self.highlight = if first {
            self.options.first_enabled()
        } else {
            self.options.last_enabled()
        };
    }

    /// Picks the highlighted option and closes. Disabled options cannot be picked.
    pub fn pick(&mut self, now: Instant) -> Option<&SelectOption> {
        let picked = self.highlight.filter(|it| !self.options.is_disabled(*it))?;
        self.selected = Some(picked);
        self.close(now);
        self.options.get(picked)
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.selected
            .and_then(|it| self.options.get(it))
            .map(|it| it.label.as_str())
    }

    pub fn cycle_placement(&mut self, now: Instant) -> Placement {
        let all: Vec<Placement> = Placement::iter().collect();
        let current = self.popover.options().placement;
        let idx = all.iter().position(|it| *it == current).unwrap_or(0);
        let next = all[(idx + 1) % all.len()];
        self.update_popover(now, |options| options.placement = next);
        next
    }

    pub fn toggle_arrow(&mut self, now: Instant) -> bool {
        self.update_popover(now, |options| options.with_arrow = !options.with_arrow);
        self.popover.options().with_arrow
    }

    pub fn toggle_anchor_width(&mut self, now: Instant) -> bool {
        self.update_popover(now, |options| {
            options.use_anchor_width = !options.use_anchor_width
        });
        self.popover.options().use_anchor_width
    }

    fn update_popover(&mut self, now: Instant, change: impl FnOnce(&mut PopoverOptions)) {
        let mut options = self.popover.options().clone();
        change(&mut options);
        debug!("Popover options now {options:?}");
        self.popover.set_options(options, now);
    }
}

/// Reads a JSON or JSON5 array of options and groups.
pub fn load_options(path: &Path) -> Result<GroupedOptions> {
    let raw = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read options from {}", path.display()))?;
    let entries: Vec<OptionEntry> = match path.extension().and_then(|it| it.to_str()) {
        Some("json") => serde_json::from_str(&raw)
            .wrap_err_with(|| format!("Invalid JSON in {}", path.display()))?,
        _ => json5::from_str(&raw)
            .wrap_err_with(|| format!("Invalid JSON5 in {}", path.display()))?,
    };
    let options = GroupedOptions::new(entries);
    info!("Loaded {} options from {}", options.len(), path.display());
    Ok(options)
}

fn fish(names: &[&str]) -> Vec<SelectOption> {
    names
        .iter()
        .map(|name| SelectOption::new(*name, name.to_lowercase()))
        .collect()
}

pub fn demo_options() -> GroupedOptions {
    let mut freshwater = fish(&["Trout", "Pike", "Carp", "Perch", "Zander", "Catfish"]);
    freshwater[3].disabled = true;
    let saltwater = fish(&["Cod", "Tuna", "Mackerel", "Herring", "Halibut", "Sardine"]);
    let numbered = (1..=500)
        .map(|it| SelectOption::new(format!("Fish #{it}"), format!("fish-{it}")))
        .collect();
    GroupedOptions::new(vec![
        SelectOption::new("Any fish", "any").into(),
        OptionGroup::new("Freshwater", freshwater).into(),
        OptionGroup::new("Saltwater", saltwater).into(),
        SelectOption::new("Sold out", "none").disabled(true).into(),
        OptionGroup::new("The whole school", numbered).into(),
    ])
}
