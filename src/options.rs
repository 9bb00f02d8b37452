use std::collections::BTreeMap;

use derive_deref::Deref;
use itertools::Itertools;
use serde::Deserialize;

mod navigation;

/// A single selectable item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectOption<P = ()> {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub disabled: bool,
    /// Whatever the row renderer needs besides the label.
    #[serde(default)]
    pub payload: P,
}

impl SelectOption<()> {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            disabled: false,
            payload: (),
        }
    }
}

impl<P> SelectOption<P> {
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_payload<Q>(self, payload: Q) -> SelectOption<Q> {
        SelectOption {
            label: self.label,
            value: self.value,
            disabled: self.disabled,
            payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(bound(deserialize = "P: Deserialize<'de> + Default"))]
pub struct OptionGroup<P = ()> {
    pub label: String,
    pub options: Vec<SelectOption<P>>,
}

impl<P> OptionGroup<P> {
    pub fn new(label: impl Into<String>, options: Vec<SelectOption<P>>) -> Self {
        Self {
            label: label.into(),
            options,
        }
    }
}

/// An entry of the non-flattened list. Objects carrying `options` are groups.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged, bound(deserialize = "P: Deserialize<'de> + Default"))]
pub enum OptionEntry<P = ()> {
    Group(OptionGroup<P>),
    Item(SelectOption<P>),
}

impl<P> From<SelectOption<P>> for OptionEntry<P> {
    fn from(value: SelectOption<P>) -> Self {
        Self::Item(value)
    }
}

impl<P> From<OptionGroup<P>> for OptionEntry<P> {
    fn from(value: OptionGroup<P>) -> Self {
        Self::Group(value)
    }
}

/// Where a flat index points to in the non-flattened list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatPosition {
    pub entry: usize,
    /// Index inside the group, `None` for top-level options.
    pub member: Option<usize>,
}

/// The addressable index space used for highlighting, scrolling and virtualization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct FlatOptions(Vec<FlatPosition>);

/// Flat index of each group's first member -> index of that group in the entry list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct GroupStarts(BTreeMap<usize, usize>);

/// Owns the grouped option list together with everything derived from it.
///
/// The flat index space and the group start map are only rebuilt when the entries are replaced,
/// never while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedOptions<P = ()> {
    entries: Vec<OptionEntry<P>>,
    flat: FlatOptions,
    group_starts: GroupStarts,
}

impl<P> Default for GroupedOptions<P> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<P> From<Vec<SelectOption<P>>> for GroupedOptions<P> {
    fn from(value: Vec<SelectOption<P>>) -> Self {
        Self::new(value.into_iter().map(OptionEntry::Item).collect())
    }
}

impl<P> GroupedOptions<P> {
    pub fn new(entries: Vec<OptionEntry<P>>) -> Self {
        let (flat, group_starts) = flatten(&entries);
        Self {
            entries,
            flat,
            group_starts,
        }
    }

    pub fn set_entries(&mut self, entries: Vec<OptionEntry<P>>) {
        *self = Self::new(entries);
    }

    pub fn entries(&self) -> &[OptionEntry<P>] {
        &self.entries
    }

    /// Whether the non-flattened list is empty (placeholder case).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of flat indices.
    pub fn len(&self) -> usize {
        self.flat.len()
    }

    pub fn flat(&self) -> &FlatOptions {
        &self.flat
    }

    pub fn group_starts(&self) -> &GroupStarts {
        &self.group_starts
    }

    pub fn get(&self, flat_idx: usize) -> Option<&SelectOption<P>> {
        let position = self.flat.get(flat_idx)?;
        match (&self.entries[position.entry], position.member) {
            (OptionEntry::Item(option), None) => Some(option),
            (OptionEntry::Group(group), Some(member)) => group.options.get(member),
            _ => None,
        }
    }

    /// The group whose header goes above the row at `flat_idx`, if that row starts a group.
    pub fn group_starting_at(&self, flat_idx: usize) -> Option<&OptionGroup<P>> {
        match self.entries.get(*self.group_starts.get(&flat_idx)?)? {
            OptionEntry::Group(group) => Some(group),
            OptionEntry::Item(_) => None,
        }
    }

    pub fn iter_flat(&self) -> impl Iterator<Item = &SelectOption<P>> {
        (0..self.len()).filter_map(|idx| self.get(idx))
    }

    pub fn is_disabled(&self, flat_idx: usize) -> bool {
        self.get(flat_idx).is_none_or(|it| it.disabled)
    }

    pub fn first_enabled(&self) -> Option<usize> {
        self.iter_flat().positions(|it| !it.disabled).next()
    }

    pub fn last_enabled(&self) -> Option<usize> {
        (0..self.len()).rev().find(|idx| !self.is_disabled(*idx))
    }

    pub fn position_of_value(&self, value: &str) -> Option<usize> {
        self.iter_flat().position(|it| it.value == value)
    }
}

fn flatten<P>(entries: &[OptionEntry<P>]) -> (FlatOptions, GroupStarts) {
    let mut flat = Vec::new();
    let mut starts = BTreeMap::new();
    for (entry_idx, entry) in entries.iter().enumerate() {
        match entry {
            OptionEntry::Item(_) => flat.push(FlatPosition {
                entry: entry_idx,
                member: None,
            }),
            OptionEntry::Group(group) => {
                if !group.options.is_empty() {
                    starts.insert(flat.len(), entry_idx);
                }
                flat.extend((0..group.options.len()).map(|member| FlatPosition {
                    entry: entry_idx,
                    member: Some(member),
                }));
            }
        }
    }
    (FlatOptions(flat), GroupStarts(starts))
}

#[cfg(test)]
pub(crate) mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    pub(crate) fn letters(labels: &[&str]) -> Vec<SelectOption> {
        labels
            .iter()
            .map(|it| SelectOption::new(*it, it.to_lowercase()))
            .collect()
    }

    fn grouped_zxy() -> GroupedOptions {
        GroupedOptions::new(vec![
            SelectOption::new("Z", "z").into(),
            OptionGroup::new("G", letters(&["X", "Y"])).into(),
        ])
    }

    #[test]
    fn test_flatten_expands_groups_in_place() {
        let options = grouped_zxy();

        let labels = options.iter_flat().map(|it| it.label.as_str()).collect_vec();
        assert_eq!(labels, vec!["Z", "X", "Y"]);
        assert_eq!(
            options.group_starts().iter().map(|(k, v)| (*k, *v)).collect_vec(),
            vec![(1, 1)]
        );
        assert_eq!(options.group_starting_at(1).map(|it| it.label.as_str()), Some("G"));
        assert_eq!(options.group_starting_at(0), None);
        assert_eq!(options.group_starting_at(2), None);
    }

    #[test]
    fn test_flat_len_is_group_sizes_plus_top_level() {
        let options = GroupedOptions::new(vec![
            OptionGroup::new("A", letters(&["1", "2", "3"])).into(),
            SelectOption::new("top", "top").into(),
            OptionGroup::new("empty", vec![]).into(),
            OptionGroup::new("B", letters(&["4"])).into(),
        ]);

        assert_eq!(options.len(), 3 + 1 + 0 + 1);
        assert_eq!(
            options.group_starts().iter().map(|(k, v)| (*k, *v)).collect_vec(),
            vec![(0, 0), (4, 3)]
        );
        assert_eq!(options.get(4).map(|it| it.label.as_str()), Some("4"));
        assert_eq!(options.get(5), None);
    }

    #[test]
    fn test_set_entries_recomputes_derived_state() {
        let mut options = grouped_zxy();
        options.set_entries(letters(&["A", "B"]).into_iter().map(Into::into).collect());

        assert_eq!(options.len(), 2);
        assert!(options.group_starts().is_empty());
    }

    #[test]
    fn test_enabled_boundaries_skip_disabled() {
        let mut items = letters(&["A", "B", "C", "D"]);
        items[0].disabled = true;
        items[3].disabled = true;
        let options = GroupedOptions::from(items);

        assert_eq!(options.first_enabled(), Some(1));
        assert_eq!(options.last_enabled(), Some(2));
        assert!(options.is_disabled(0));
        assert!(options.is_disabled(99));
    }

    #[test]
    fn test_deserialize_mixed_entries() {
        let raw = r#"[
            {"label": "Z", "value": "z"},
            {"label": "G", "options": [
                {"label": "X", "value": "x", "disabled": true},
                {"label": "Y", "value": "y"}
            ]}
        ]"#;
        let entries: Vec<OptionEntry> = serde_json::from_str(raw).unwrap();
        let options = GroupedOptions::new(entries);

        assert_eq!(options.len(), 3);
        assert!(options.is_disabled(1));
        assert_eq!(options.position_of_value("y"), Some(2));
    }

    #[test]
    fn test_deserialize_json5_payload() {
        let raw = "[{label: 'A', value: 'a', payload: 'first'}]";
        let entries: Vec<OptionEntry<String>> = json5::from_str(raw).unwrap();

        assert_eq!(
            entries,
            vec![OptionEntry::Item(SelectOption::new("A", "a").with_payload("first".to_string()))]
        );
    }

    #[test]
    fn test_deserialize_group_with_payloads() {
        let raw = "{label: 'Deep sea', options: [{label: 'Eel', value: 'eel', payload: 'slippery'}, {label: 'Ray', value: 'ray'}]}";
        let entry: OptionEntry<String> = json5::from_str(raw).unwrap();

        let OptionEntry::Group(group) = entry else {
            panic!("expected a group, got {entry:?}");
        };
        assert_eq!(group.label, "Deep sea");
        assert_eq!(
            group.options.iter().map(|it| it.payload.as_str()).collect_vec(),
            vec!["slippery", ""]
        );
    }

    #[test]
    fn test_last_enabled_skips_disabled_tail() {
        let mut items = letters(&["A", "B", "C"]);
        items[1].disabled = true;
        items[2].disabled = true;
        let options = GroupedOptions::from(items);

        assert_eq!(options.last_enabled(), Some(0));
        assert_eq!(GroupedOptions::<()>::default().last_enabled(), None);
    }
}
