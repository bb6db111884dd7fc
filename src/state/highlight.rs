use super::store::{ListenerId, Store};

/// The currently emphasized region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionHighlight {
    pub parent_region: String,
    pub sub_region: Option<String>,
}

impl RegionHighlight {
    /// Whether `name` is the highlighted sub-region. Unknown names simply never match.
    pub fn matches(&self, name: &str) -> bool {
        self.sub_region.as_deref() == Some(name)
    }
}

/// Owner of the highlight shared by the map and the time explorer.
/// Every panel holds a clone of this handle; none keeps a private copy.
#[derive(Clone)]
pub struct HighlightCoordinator {
    store: Store<RegionHighlight>,
}

impl HighlightCoordinator {
    pub fn new(parent_region: impl Into<String>) -> Self {
        Self {
            store: Store::new(RegionHighlight {
                parent_region: parent_region.into(),
                sub_region: None,
            }),
        }
    }

    pub fn get(&self) -> RegionHighlight {
        self.store.get()
    }

    /// Effect run whenever the routed parent region changes.
    ///
    /// Only the parent field follows the route. A previously highlighted
    /// sub-region is kept as-is even though it may not exist under the new
    /// parent; panels render such a name as "no match".
    pub fn on_parent_region_context_change(&self, parent_region: &str) -> bool {
        self.store.update(|highlight| {
            if highlight.parent_region == parent_region {
                return false;
            }
            highlight.parent_region = parent_region.to_string();
            true
        })
    }

    /// Replace the highlighted sub-region. The name is not validated here.
    pub fn set_highlight(&self, sub_region: Option<String>) {
        self.store.update(|highlight| {
            let changed = highlight.sub_region != sub_region;
            highlight.sub_region = sub_region;
            changed
        });
    }

    pub fn clear_highlight(&self) {
        self.set_highlight(None);
    }

    /// Move the highlight `step` places through `order`, wrapping at the ends.
    /// With nothing (or an unknown name) highlighted, forward steps start at the
    /// first entry and backward steps at the last.
    pub fn step_highlight<S: AsRef<str>>(&self, order: &[S], step: isize) {
        if order.is_empty() || step == 0 {
            return;
        }
        let len = order.len() as isize;
        let current = self.store.with(|highlight| {
            highlight
                .sub_region
                .as_deref()
                .and_then(|name| order.iter().position(|entry| entry.as_ref() == name))
        });
        let next = match current {
            Some(idx) => (idx as isize + step).rem_euclid(len),
            None if step > 0 => (step - 1).rem_euclid(len),
            None => (len + step).rem_euclid(len),
        };
        self.set_highlight(Some(order[next as usize].as_ref().to_string()));
    }

    pub fn version(&self) -> u64 {
        self.store.version()
    }

    pub fn subscribe(&self, listener: impl Fn(&RegionHighlight) + 'static) -> ListenerId {
        self.store.subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_initial_highlight() {
        let coordinator = HighlightCoordinator::new("KL");
        assert_eq!(
            coordinator.get(),
            RegionHighlight {
                parent_region: "KL".to_string(),
                sub_region: None,
            }
        );
    }

    #[test]
    fn test_parent_change_preserves_sub_region() {
        let coordinator = HighlightCoordinator::new("KL");
        coordinator.set_highlight(Some("Ernakulam".to_string()));
        assert!(coordinator.on_parent_region_context_change("TN"));

        let highlight = coordinator.get();
        assert_eq!(highlight.parent_region, "TN");
        assert_eq!(highlight.sub_region.as_deref(), Some("Ernakulam"));
    }

    #[test]
    fn test_same_parent_is_no_op() {
        let coordinator = HighlightCoordinator::new("KL");
        assert!(!coordinator.on_parent_region_context_change("KL"));
        assert_eq!(coordinator.version(), 0);
    }

    #[test]
    fn test_set_highlight_leaves_parent() {
        let coordinator = HighlightCoordinator::new("KL");
        coordinator.set_highlight(Some("Nowhere".to_string()));
        let highlight = coordinator.get();
        assert_eq!(highlight.parent_region, "KL");
        assert!(highlight.matches("Nowhere"));
        assert!(!highlight.matches("Kollam"));
    }

    #[test]
    fn test_all_panels_see_change() {
        let coordinator = HighlightCoordinator::new("KL");
        let map_panel = coordinator.clone();
        let explorer_panel = coordinator.clone();

        let broadcast = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&broadcast);
        explorer_panel.subscribe(move |h| sink.borrow_mut().push(h.sub_region.clone()));

        map_panel.set_highlight(Some("Kollam".to_string()));
        assert_eq!(explorer_panel.get().sub_region.as_deref(), Some("Kollam"));
        assert_eq!(*broadcast.borrow(), vec![Some("Kollam".to_string())]);

        explorer_panel.clear_highlight();
        assert_eq!(map_panel.get().sub_region, None);
    }

    #[test]
    fn test_step_wraps() {
        let coordinator = HighlightCoordinator::new("KL");
        let order = ["A", "B", "C"];
        coordinator.step_highlight(&order, 1);
        assert!(coordinator.get().matches("A"));
        coordinator.step_highlight(&order, -1);
        assert!(coordinator.get().matches("C"));
        coordinator.step_highlight(&order, 1);
        assert!(coordinator.get().matches("A"));

        let fresh = HighlightCoordinator::new("KL");
        fresh.step_highlight(&order, -1);
        assert!(fresh.get().matches("C"));
    }
}
