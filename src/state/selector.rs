use super::store::{ListenerId, Store};
use crate::data::StatisticMode;
use crate::session::SessionStorage;
use std::rc::Rc;

/// Session key the chosen mode is stored under
pub const SESSION_KEY: &str = "mapStatistic";

/// Holds the chosen statistic mode and writes every change through to session storage
#[derive(Clone)]
pub struct StatisticSelector {
    store: Store<StatisticMode>,
    session: Rc<SessionStorage>,
}

impl StatisticSelector {
    /// Restore the last mode from the session, defaulting to active
    pub fn new(session: Rc<SessionStorage>) -> Self {
        let initial = match session.get(SESSION_KEY) {
            Some(stored) => stored.parse().unwrap_or_else(|err| {
                tracing::warn!(
                    target: "region_pulse::state",
                    error = %err,
                    "selector.ignored_stored_mode"
                );
                StatisticMode::default()
            }),
            None => StatisticMode::default(),
        };
        Self {
            store: Store::new(initial),
            session,
        }
    }

    pub fn get(&self) -> StatisticMode {
        self.store.get()
    }

    pub fn set(&self, mode: StatisticMode) {
        self.store.update(|current| {
            let changed = *current != mode;
            *current = mode;
            changed
        });
        // Persisted even when unchanged so the session always reflects the last choice
        if let Err(err) = self.session.set(SESSION_KEY, mode.as_str()) {
            tracing::warn!(
                target: "region_pulse::state",
                error = %err,
                "selector.persist_failed"
            );
        }
    }

    pub fn cycle(&self) {
        self.set(self.get().next());
    }

    pub fn version(&self) -> u64 {
        self.store.version()
    }

    pub fn subscribe(&self, listener: impl Fn(&StatisticMode) + 'static) -> ListenerId {
        self.store.subscribe(listener)
    }
}
