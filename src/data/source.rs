use super::DataError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// When a cached source goes back to its backing file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// Periodic revalidation; `None` means load once and keep
    pub interval: Option<Duration>,
    /// Reload on mount even if a value is already cached
    pub revalidate_on_mount: bool,
    /// Reload when the terminal regains focus
    pub revalidate_on_focus: bool,
}

impl RefreshPolicy {
    /// Live snapshot: refreshed on a timer and on every mount
    pub fn live(interval: Duration) -> Self {
        Self {
            interval: Some(interval),
            revalidate_on_mount: true,
            revalidate_on_focus: false,
        }
    }

    /// Historical data: fetched once per session unless invalidated
    pub fn once() -> Self {
        Self {
            interval: None,
            revalidate_on_mount: false,
            revalidate_on_focus: false,
        }
    }
}

type Loader<T> = fn(&Path) -> Result<T, DataError>;

/// Read-through cache over one data file, keyed by its path.
/// Hands out immutable `Arc` snapshots; a failed reload keeps the last good value.
pub struct SourceCache<T> {
    key: PathBuf,
    policy: RefreshPolicy,
    loader: Loader<T>,
    value: Option<Arc<T>>,
    fetched_at: Option<Instant>,
    generation: u64,
}

impl<T> SourceCache<T> {
    pub fn new(key: impl Into<PathBuf>, policy: RefreshPolicy, loader: Loader<T>) -> Self {
        Self {
            key: key.into(),
            policy,
            loader,
            value: None,
            fetched_at: None,
            generation: 0,
        }
    }

    pub fn key(&self) -> &Path {
        &self.key
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    /// Latest successfully loaded value, if any
    pub fn current(&self) -> Option<Arc<T>> {
        self.value.clone()
    }

    /// Bumped on every successful load
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// First use by a view. Always loads when nothing is cached yet.
    pub fn mount(&mut self, now: Instant) -> bool {
        if self.value.is_none() || self.policy.revalidate_on_mount {
            self.fetch(now)
        } else {
            false
        }
    }

    /// Periodic check from the event loop; reloads when the interval has elapsed
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(interval) = self.policy.interval else {
            return false;
        };
        match self.fetched_at {
            Some(at) if now.saturating_duration_since(at) < interval => false,
            _ => self.fetch(now),
        }
    }

    pub fn on_focus(&mut self, now: Instant) -> bool {
        if self.policy.revalidate_on_focus {
            self.fetch(now)
        } else {
            false
        }
    }

    /// Explicit reload regardless of policy
    pub fn invalidate(&mut self, now: Instant) -> bool {
        self.fetch(now)
    }

    fn fetch(&mut self, now: Instant) -> bool {
        // A failure still counts as an attempt so the interval throttles retries
        self.fetched_at = Some(now);
        match (self.loader)(&self.key) {
            Ok(value) => {
                self.value = Some(Arc::new(value));
                self.generation += 1;
                tracing::info!(
                    target: "region_pulse::data",
                    path = %self.key.display(),
                    generation = self.generation,
                    "source.loaded"
                );
                true
            }
            Err(err) => {
                tracing::warn!(
                    target: "region_pulse::data",
                    path = %self.key.display(),
                    error = %err,
                    kept_previous = self.value.is_some(),
                    "source.load_failed"
                );
                false
            }
        }
    }
}
