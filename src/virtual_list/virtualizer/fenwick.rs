/// Binary indexed tree over row heights: prefix sums and offset to row lookups in `O(log n)`.
#[derive(Debug, Clone, Default)]
pub(super) struct Fenwick {
    // 1-based; slot 0 is unused.
    tree: Vec<u32>,
}

fn lowest_bit(index: usize) -> usize {
    index & index.wrapping_neg()
}

impl Fenwick {
    /// Builds the tree in linear time.
    pub fn from_sizes(sizes: &[u16]) -> Self {
        let len = sizes.len();
        let mut tree = vec![0u32; len + 1];
        for index in 1..=len {
            tree[index] += sizes[index - 1] as u32;
            let parent = index + lowest_bit(index);
            if parent <= len {
                tree[parent] += tree[index];
            }
        }
        Self { tree }
    }

    pub fn len(&self) -> usize {
        self.tree.len().saturating_sub(1)
    }

    /// Replaces the size at `index`, given the size it had before.
    pub fn replace(&mut self, index: usize, previous: u16, size: u16) {
        let mut slot = index + 1;
        while slot <= self.len() {
            self.tree[slot] = self.tree[slot] - previous as u32 + size as u32;
            slot += lowest_bit(slot);
        }
    }

    /// Sum of the sizes of the rows before `end`.
    pub fn prefix_sum(&self, end: usize) -> u32 {
        let mut slot = end.min(self.len());
        let mut sum = 0;
        while slot > 0 {
            sum += self.tree[slot];
            slot -= lowest_bit(slot);
        }
        sum
    }

    /// Index of the row covering `offset`, or `len()` when the offset is past the end.
    pub fn index_at(&self, offset: u32) -> usize {
        let len = self.len();
        let mut position = 0;
        let mut remaining = offset;
        let mut step = if len == 0 { 0 } else { 1 << len.ilog2() };
        while step > 0 {
            let next = position + step;
            if next <= len && self.tree[next] <= remaining {
                position = next;
                remaining -= self.tree[next];
            }
            step >>= 1;
        }
        position
    }
}
