use super::virtualizer::{VirtualRow, Virtualizer};

/// Height of the list viewport, derived from the measured heights of the first `visible_rows`
/// rows.
///
/// The virtualizer may produce just a single row for a frame (no viewport yet, or transiently
/// while measuring). Such frames are ignored unless the option count itself changed, otherwise
/// the list would collapse to one row.
#[derive(Debug, Default, Clone)]
pub struct HeightTracker {
    count: Option<usize>,
    height: Option<u16>,
}

impl HeightTracker {
    pub fn height(&self) -> Option<u16> {
        self.height
    }

    pub fn observe(
        &mut self,
        rows: &[VirtualRow],
        virtualizer: &Virtualizer,
        visible_rows: usize,
    ) -> Option<u16> {
        let count = virtualizer.count();
        let count_changed = self.count != Some(count);
        self.count = Some(count);

        if rows.len() > 1 || count_changed {
            let height = (0..count.min(visible_rows))
                .filter_map(|index| virtualizer.size_of(index))
                .map(|it| it as u32)
                .sum::<u32>();
            self.height = Some(height.min(u16::MAX as u32) as u16);
        }
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_computes_height() {
        let virtualizer = Virtualizer::new(30, 1, 10);
        let rows = virtualizer.virtual_rows();
        let mut tracker = HeightTracker::default();

        assert_eq!(rows.len(), 1);
        assert_eq!(tracker.observe(&rows, &virtualizer, 5), Some(5));
    }

    #[test]
    fn test_single_row_frame_keeps_previous_height() {
        let mut virtualizer = Virtualizer::new(30, 1, 10);
        virtualizer.set_viewport(Some(5));
        let mut tracker = HeightTracker::default();
        tracker.observe(&virtualizer.virtual_rows(), &virtualizer, 5);

        virtualizer.measure(0, 3);
        let transient = &virtualizer.virtual_rows()[..1];
        assert_eq!(tracker.observe(transient, &virtualizer, 5), Some(5));

        assert_eq!(tracker.observe(&virtualizer.virtual_rows(), &virtualizer, 5), Some(7));
    }

    #[test]
    fn test_count_change_recomputes_even_with_single_row() {
        let mut virtualizer = Virtualizer::new(30, 1, 10);
        virtualizer.set_viewport(Some(5));
        let mut tracker = HeightTracker::default();
        tracker.observe(&virtualizer.virtual_rows(), &virtualizer, 5);

        virtualizer.set_count(2);
        let rows = &virtualizer.virtual_rows()[..1];
        assert_eq!(tracker.observe(rows, &virtualizer, 5), Some(2));
    }
}
