use std::ops::Range;

use self::fenwick::Fenwick;

mod fenwick;

/// Where a row should end up inside the viewport after a scroll-to-index.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
    /// Trailing edge of the row lines up with the trailing edge of the viewport.
    #[default]
    End,
    /// `Start` or `End`, whichever needs the shorter scroll. No-op if already visible.
    Auto,
}

/// Transient render descriptor for one materialized row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualRow {
    pub index: usize,
    /// Offset from the top of the content, in lines.
    pub start: u32,
    /// Measured height, in lines.
    pub size: u16,
}

impl VirtualRow {
    pub fn end(&self) -> u32 {
        self.start + self.size as u32
    }
}

/// Row virtualization over a fixed number of rows with individually measured heights.
///
/// Until a viewport height is known only a single row is produced, which is what the height
/// tracker of the options list has to cope with. Offsets and row lookups go through prefix sums,
/// so every query stays logarithmic in the row count.
#[derive(Debug, Clone)]
pub struct Virtualizer {
    sizes: Vec<u16>,
    sums: Fenwick,
    estimate: u16,
    overscan: usize,
    viewport: Option<u16>,
    scroll_offset: u32,
}

impl Virtualizer {
    pub fn new(count: usize, estimate: u16, overscan: usize) -> Self {
        let sizes = vec![estimate; count];
        Self {
            sums: Fenwick::from_sizes(&sizes),
            sizes,
            estimate,
            overscan,
            viewport: None,
            scroll_offset: 0,
        }
    }

    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    /// Changes the number of rows. Measurements of rows that still exist are kept.
    pub fn set_count(&mut self, count: usize) {
        if count != self.sizes.len() {
            self.sizes.resize(count, self.estimate);
            self.sums = Fenwick::from_sizes(&self.sizes);
            self.clamp_scroll();
        }
    }

    /// Records the real height of a row. Returns whether anything changed.
    pub fn measure(&mut self, index: usize, size: u16) -> bool {
        match self.sizes.get_mut(index) {
            Some(current) if *current != size => {
                self.sums.replace(index, *current, size);
                *current = size;
                self.clamp_scroll();
                true
            }
            _ => false,
        }
    }

    pub fn size_of(&self, index: usize) -> Option<u16> {
        self.sizes.get(index).copied()
    }

    pub fn viewport(&self) -> Option<u16> {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Option<u16>) {
        self.viewport = viewport;
        self.clamp_scroll();
    }

    pub fn scroll_offset(&self) -> u32 {
        self.scroll_offset
    }

    pub fn set_scroll_offset(&mut self, offset: u32) {
        self.scroll_offset = offset.min(self.max_scroll_offset());
    }

    pub fn total_size(&self) -> u32 {
        self.sums.prefix_sum(self.count())
    }

    pub fn offset_of(&self, index: usize) -> u32 {
        self.sums.prefix_sum(index)
    }

    fn max_scroll_offset(&self) -> u32 {
        self.total_size()
            .saturating_sub(self.viewport.unwrap_or_default() as u32)
    }

    fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll_offset());
    }

    fn row(&self, index: usize, start: u32) -> VirtualRow {
        VirtualRow {
            index,
            start,
            size: self.sizes[index],
        }
    }

    /// Rows intersecting the viewport, without overscan.
    pub fn visible_range(&self) -> Range<usize> {
        let count = self.count();
        let start = self.sums.index_at(self.scroll_offset);
        if start >= count {
            return count..count;
        }
        let viewport_end = self.scroll_offset + self.viewport.unwrap_or(1).max(1) as u32;
        let end = (self.sums.index_at(viewport_end - 1) + 1).min(count);
        start..end
    }

    /// Whether the row lies completely inside the viewport.
    pub fn is_visible(&self, index: usize) -> bool {
        let (Some(viewport), Some(size)) = (self.viewport, self.size_of(index)) else {
            return false;
        };
        let start = self.offset_of(index);
        start >= self.scroll_offset
            && start + size as u32 <= self.scroll_offset + viewport as u32
    }

    /// The rows to materialize: the visible ones padded by `overscan` on both sides. Near either
    /// end of the list the window shifts inwards so it keeps its length.
    pub fn virtual_rows(&self) -> Vec<VirtualRow> {
        let count = self.count();
        if count == 0 {
            return Vec::new();
        }
        let visible = self.visible_range();
        if self.viewport.is_none() {
            let index = visible.start.min(count - 1);
            return vec![self.row(index, self.offset_of(index))];
        }

        let window = (visible.len() + 2 * self.overscan).min(count);
        let mut start = visible.start.saturating_sub(self.overscan);
        if start + window > count {
            start = count - window;
        }

        let mut offset = self.offset_of(start);
        (start..start + window)
            .map(|index| {
                let row = self.row(index, offset);
                offset = row.end();
                row
            })
            .collect()
    }

    pub fn scroll_to_index(&mut self, index: usize, align: Align) {
        let Some(size) = self.size_of(index) else {
            return;
        };
        let viewport = self.viewport.unwrap_or_default() as u32;
        let start = self.offset_of(index);
        let end = start + size as u32;
        let target = match align {
            Align::Start => start,
            Align::End => end.saturating_sub(viewport),
            Align::Center => (start + end).saturating_sub(viewport) / 2,
            Align::Auto if self.is_visible(index) => return,
            Align::Auto if start < self.scroll_offset => start,
            Align::Auto => end.saturating_sub(viewport),
        };
        self.set_scroll_offset(target);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sized(count: usize, viewport: u16, overscan: usize) -> Virtualizer {
        let mut virtualizer = Virtualizer::new(count, 1, overscan);
        virtualizer.set_viewport(Some(viewport));
        virtualizer
    }

    fn indices(rows: &[VirtualRow]) -> Vec<usize> {
        rows.iter().map(|it| it.index).collect()
    }

    #[test]
    fn test_rendered_rows_are_visible_plus_double_overscan() {
        let mut virtualizer = sized(100, 5, 10);
        assert_eq!(virtualizer.virtual_rows().len(), 25);

        virtualizer.set_scroll_offset(50);
        let rows = virtualizer.virtual_rows();
        assert_eq!(rows.len(), 25);
        assert_eq!(rows.first().map(|it| it.index), Some(40));

        virtualizer.set_scroll_offset(95);
        let rows = virtualizer.virtual_rows();
        assert_eq!(rows.len(), 25);
        assert_eq!(rows.last().map(|it| it.index), Some(99));
    }

    #[test]
    fn test_rendered_rows_clamped_to_count() {
        let virtualizer = sized(7, 5, 10);
        assert_eq!(indices(&virtualizer.virtual_rows()), (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_without_viewport_only_one_row() {
        let virtualizer = Virtualizer::new(30, 1, 10);
        assert_eq!(virtualizer.virtual_rows().len(), 1);
    }

    #[test]
    fn test_scroll_to_index_end_alignment() {
        let mut virtualizer = sized(50, 5, 2);
        virtualizer.scroll_to_index(20, Align::End);

        assert_eq!(virtualizer.scroll_offset(), 16);
        assert!(virtualizer.is_visible(20));
        assert!(!virtualizer.is_visible(21));
        assert_eq!(virtualizer.visible_range(), 16..21);
    }

    #[test]
    fn test_scroll_to_index_auto_prefers_shortest_scroll() {
        let mut virtualizer = sized(50, 5, 2);
        virtualizer.set_scroll_offset(20);

        virtualizer.scroll_to_index(22, Align::Auto);
        assert_eq!(virtualizer.scroll_offset(), 20);

        virtualizer.scroll_to_index(3, Align::Auto);
        assert_eq!(virtualizer.scroll_offset(), 3);

        virtualizer.scroll_to_index(49, Align::Auto);
        assert_eq!(virtualizer.scroll_offset(), 45);
    }

    #[test]
    fn test_measurements_shift_offsets() {
        let mut virtualizer = sized(10, 4, 0);
        assert!(virtualizer.measure(2, 2));
        assert!(!virtualizer.measure(2, 2));

        assert_eq!(virtualizer.offset_of(3), 4);
        assert_eq!(virtualizer.total_size(), 11);
        assert_eq!(indices(&virtualizer.virtual_rows()), vec![0, 1, 2]);
    }

    #[test]
    fn test_shrinking_count_clamps_scroll() {
        let mut virtualizer = sized(50, 5, 0);
        virtualizer.set_scroll_offset(40);
        virtualizer.set_count(10);

        assert_eq!(virtualizer.scroll_offset(), 5);
    }

    #[test]
    fn test_scroll_to_index_start_and_center() {
        let mut virtualizer = sized(50, 5, 2);
        virtualizer.scroll_to_index(20, Align::Start);
        assert_eq!(virtualizer.scroll_offset(), 20);
        assert_eq!(virtualizer.visible_range(), 20..25);

        virtualizer.scroll_to_index(20, Align::Center);
        assert_eq!(virtualizer.scroll_offset(), 18);
        assert_eq!(virtualizer.visible_range(), 18..23);
    }

    #[test]
    fn test_visible_range_with_mixed_heights() {
        let mut virtualizer = sized(10, 4, 0);
        virtualizer.measure(1, 3);
        virtualizer.set_scroll_offset(2);

        // Row 1 covers 1..4, row 2 covers 4..5, row 3 covers 5..6.
        assert_eq!(virtualizer.visible_range(), 1..4);
        assert!(!virtualizer.is_visible(1));
        assert!(virtualizer.is_visible(2));
    }

    #[test]
    fn test_large_lists_stay_addressable() {
        let mut virtualizer = sized(1_000_000, 10, 3);
        virtualizer.measure(10, 5);
        virtualizer.scroll_to_index(999_999, Align::End);

        assert_eq!(virtualizer.total_size(), 1_000_004);
        assert_eq!(virtualizer.scroll_offset(), 999_994);
        assert_eq!(virtualizer.visible_range(), 999_990..1_000_000);
        assert_eq!(virtualizer.offset_of(500_000), 500_004);

        let rows = virtualizer.virtual_rows();
        assert_eq!(rows.len(), 16);
        assert_eq!(rows.last().map(|it| (it.index, it.start)), Some((999_999, 1_000_003)));
    }
}
