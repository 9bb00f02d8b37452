use std::{cell::RefCell, collections::BTreeSet, rc::Rc};

use ratatui::{buffer::Buffer, layout::Rect};
use tracing::trace;

/// Hands out z-indices to floating panels. Clones share the same allocations.
#[derive(Debug, Clone, Default)]
pub struct StackingContext {
    taken: Rc<RefCell<BTreeSet<u32>>>,
}

impl StackingContext {
    /// Allocates at least `requested`, and above every panel that is currently allocated.
    pub fn allocate(&self, requested: u32) -> Layer {
        let mut taken = self.taken.borrow_mut();
        let z_index = match taken.last() {
            Some(top) => requested.max(top + 1),
            None => requested,
        };
        taken.insert(z_index);
        trace!("Allocated z-index {z_index}");
        Layer {
            z_index,
            taken: Rc::clone(&self.taken),
        }
    }

    pub fn allocated(&self) -> Vec<u32> {
        self.taken.borrow().iter().copied().collect()
    }
}

/// A z-index allocation, released on drop.
#[derive(Debug)]
pub struct Layer {
    z_index: u32,
    taken: Rc<RefCell<BTreeSet<u32>>>,
}

impl Layer {
    pub fn z_index(&self) -> u32 {
        self.z_index
    }
}

impl Drop for Layer {
    fn drop(&mut self) {
        self.taken.borrow_mut().remove(&self.z_index);
    }
}

type Draw<'a> = Box<dyn FnOnce(Rect, &mut Buffer) + 'a>;

/// Collects floating content during a frame and draws it afterwards on top of everything else,
/// lowest z-index first, into the container area.
pub struct PortalHost<'a> {
    container: Rect,
    layers: Vec<(u32, Draw<'a>)>,
}

impl<'a> PortalHost<'a> {
    pub fn new(container: Rect) -> Self {
        Self {
            container,
            layers: Vec::new(),
        }
    }

    pub fn push<F>(&mut self, z_index: u32, draw: F)
    where
        F: FnOnce(Rect, &mut Buffer) + 'a,
    {
        self.layers.push((z_index, Box::new(draw)));
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn render(mut self, buf: &mut Buffer) {
        self.layers.sort_by_key(|(z_index, _)| *z_index);
        let container = self.container.intersection(buf.area);
        for (_, draw) in self.layers {
            draw(container, buf);
        }
    }
}
