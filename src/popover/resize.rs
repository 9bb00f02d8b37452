use ratatui::layout::Size;

use super::Anchor;

/// Watches the size of one anchor between frames.
#[derive(Debug, Default, Clone)]
pub struct ResizeObserver {
    target: Option<(String, Size)>,
}

impl ResizeObserver {
    /// Starts watching `anchor`, replacing any previous target.
    pub fn observe(&mut self, anchor: &Anchor) {
        self.target = Some((anchor.key.clone(), anchor.area.as_size()));
    }

    pub fn disconnect(&mut self) {
        self.target = None;
    }

    pub fn observed_key(&self) -> Option<&str> {
        self.target.as_ref().map(|(key, _)| key.as_str())
    }

    /// Returns whether the observed anchor changed size since the last check.
    /// Anchors other than the observed one are ignored.
    pub fn check(&mut self, anchor: &Anchor) -> bool {
        let Some((key, size)) = self.target.as_mut() else {
            return false;
        };
        if *key != anchor.key {
            return false;
        }
        let current = anchor.area.as_size();
        if current == *size {
            return false;
        }
        *size = current;
        true
    }
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use super::*;

    #[test]
    fn test_reports_each_size_change_once() {
        let mut observer = ResizeObserver::default();
        let mut anchor = Anchor::new("a", Rect::new(0, 0, 10, 1));
        observer.observe(&anchor);

        assert!(!observer.check(&anchor));
        anchor.area.x = 5;
        assert!(!observer.check(&anchor));
        anchor.area.width = 12;
        assert!(observer.check(&anchor));
        assert!(!observer.check(&anchor));
    }

    #[test]
    fn test_disconnected_or_foreign_anchor_never_reports() {
        let mut observer = ResizeObserver::default();
        let anchor = Anchor::new("a", Rect::new(0, 0, 10, 1));
        assert!(!observer.check(&anchor));

        observer.observe(&anchor);
        assert!(!observer.check(&Anchor::new("b", Rect::new(0, 0, 3, 3))));

        observer.disconnect();
        assert_eq!(observer.observed_key(), None);
        assert!(!observer.check(&Anchor::new("a", Rect::new(0, 0, 3, 3))));
    }
}
