mod activation;
mod highlight;
mod selector;
mod store;

pub use activation::{Span, VisibilityLatch};
pub use highlight::{HighlightCoordinator, RegionHighlight};
pub use selector::{StatisticSelector, SESSION_KEY};
pub use store::{ListenerId, Store};
