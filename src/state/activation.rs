/// A vertical run of layout rows: `start..start + len`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: u16,
    pub len: u16,
}

impl Span {
    pub fn new(start: u16, len: u16) -> Self {
        Self { start, len }
    }

    fn end(self) -> u32 {
        self.start as u32 + self.len as u32
    }

    /// Zero-length anchors count as visible when their row is inside `other`
    pub fn intersects(self, other: Span) -> bool {
        if other.len == 0 {
            return false;
        }
        let start = self.start as u32;
        let self_end = self.end().max(start + 1);
        start < other.end() && (other.start as u32) < self_end
    }
}

/// One-shot latch that activates a deferred view the first time its anchor
/// is on screen. After that it never evaluates visibility again.
pub struct VisibilityLatch {
    activated: bool,
    on_activate: Option<Box<dyn FnOnce()>>,
}

impl VisibilityLatch {
    pub fn new() -> Self {
        Self {
            activated: false,
            on_activate: None,
        }
    }

    /// Latch with an observer that fires once on activation and is then dropped
    pub fn with_observer(on_activate: impl FnOnce() + 'static) -> Self {
        Self {
            activated: false,
            on_activate: Some(Box::new(on_activate)),
        }
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Report where the anchor and the visible window currently are.
    /// Returns the latch state after the observation.
    pub fn observe(&mut self, anchor: Span, viewport: Span) -> bool {
        if self.activated {
            return true;
        }
        if anchor.intersects(viewport) {
            self.activated = true;
            if let Some(observer) = self.on_activate.take() {
                observer();
            }
        }
        self.activated
    }
}

impl Default for VisibilityLatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_latch_starts_inactive() {
        let mut latch = VisibilityLatch::new();
        assert!(!latch.observe(Span::new(40, 1), Span::new(0, 30)));
        assert!(!latch.is_activated());
    }

    #[test]
    fn test_latch_never_reverts() {
        let mut latch = VisibilityLatch::new();
        assert!(latch.observe(Span::new(40, 1), Span::new(20, 30)));
        // Scrolled back out of view
        assert!(latch.observe(Span::new(40, 1), Span::new(0, 30)));
        assert!(latch.is_activated());
    }

    #[test]
    fn test_observer_fires_once() {
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        let mut latch = VisibilityLatch::with_observer(move || counter.set(counter.get() + 1));
        latch.observe(Span::new(5, 1), Span::new(0, 10));
        latch.observe(Span::new(5, 1), Span::new(0, 10));
        latch.observe(Span::new(50, 1), Span::new(0, 10));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_span_edges() {
        let viewport = Span::new(10, 10);
        assert!(Span::new(10, 0).intersects(viewport));
        assert!(Span::new(19, 0).intersects(viewport));
        assert!(!Span::new(20, 0).intersects(viewport));
        assert!(Span::new(5, 6).intersects(viewport));
        assert!(!Span::new(5, 5).intersects(viewport));
        assert!(!Span::new(0, 5).intersects(Span::new(0, 0)));
    }
}
