use super::GroupedOptions;

/// Keyboard movement over the flat index space. Disabled options are skipped; moving past either
/// end wraps around to the first/last enabled option.
impl<P> GroupedOptions<P> {
    pub fn next_enabled(&self, current: Option<usize>) -> Option<usize> {
        let Some(current) = current else {
            return self.first_enabled();
        };
        ((current + 1)..self.len())
            .find(|idx| !self.is_disabled(*idx))
            .or_else(|| self.first_enabled())
    }

    pub fn previous_enabled(&self, current: Option<usize>) -> Option<usize> {
        let Some(current) = current else {
            return self.last_enabled();
        };
        (0..current.min(self.len()))
            .rev()
            .find(|idx| !self.is_disabled(*idx))
            .or_else(|| self.last_enabled())
    }
}

#[cfg(test)]
mod tests {
    use crate::options::{GroupedOptions, tests::letters};

    fn with_disabled(labels: &[&str], disabled: &[usize]) -> GroupedOptions {
        let mut items = letters(labels);
        for idx in disabled {
            items[*idx].disabled = true;
        }
        GroupedOptions::from(items)
    }

    #[test]
    fn test_next_skips_disabled_and_wraps() {
        let options = with_disabled(&["A", "B", "C", "D"], &[1]);

        assert_eq!(options.next_enabled(None), Some(0));
        assert_eq!(options.next_enabled(Some(0)), Some(2));
        assert_eq!(options.next_enabled(Some(2)), Some(3));
        assert_eq!(options.next_enabled(Some(3)), Some(0));
    }

    #[test]
    fn test_previous_skips_disabled_and_wraps() {
        let options = with_disabled(&["A", "B", "C", "D"], &[0, 2]);

        assert_eq!(options.previous_enabled(None), Some(3));
        assert_eq!(options.previous_enabled(Some(3)), Some(1));
        assert_eq!(options.previous_enabled(Some(1)), Some(3));
    }

    #[test]
    fn test_all_disabled_has_nowhere_to_go() {
        let options = with_disabled(&["A", "B"], &[0, 1]);

        assert_eq!(options.next_enabled(Some(0)), None);
        assert_eq!(options.previous_enabled(None), None);
    }
}
