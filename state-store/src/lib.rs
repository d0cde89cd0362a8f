//! Node status storage for controller drivers
//!
//! Stores the integer driver values of every registered controller node and
//! emits a report each time a write should be sent upstream.
//!
//! # Features
//!
//! - **Report Policies**: writes carry `report`/`force` flags the way
//!   controller status writes do
//! - **Atomic Batches**: many nodes written under one lock
//! - **Blocking Iteration**: consume reports via blocking iterators
//! - **Generic Node IDs**: any hashable type identifies a node
//!
//! # Quick Start
//!
//! ```rust
//! use state_store::{DriverWrite, StatusStore};
//!
//! let store = StatusStore::<String>::new();
//! store.register("8901234".to_string());
//!
//! store.write_batch(&[(
//!     "8901234".to_string(),
//!     vec![DriverWrite::forced("ST", 1), DriverWrite::forced("GV0", 30)],
//! )]);
//!
//! assert_eq!(store.get(&"8901234".to_string(), "ST"), Some(1));
//! assert_eq!(store.iter().try_iter().count(), 2);
//! ```
//!
//! # Architecture
//!
//! ```text
//! StatusStore<Id>
//!     │
//!     ├── entities: HashMap<Id, DriverBag>
//!     │       │
//!     │       └── DriverBag: HashMap<DriverCode, i32>
//!     │
//!     └── report_channel: mpsc::channel<ReportEvent<Id>>
//!             │
//!             └── ReportIterator<Id>
//! ```

pub mod driver;
pub mod event;
pub mod iter;
pub mod store;

pub use driver::{DriverCode, DriverWrite, ReportPolicy};
pub use event::ReportEvent;
pub use iter::{ReportIterator, TimeoutIter, TryIter};
pub use store::{DriverBag, StatusStore};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::driver::{DriverWrite, ReportPolicy};
    pub use crate::event::ReportEvent;
    pub use crate::iter::ReportIterator;
    pub use crate::store::StatusStore;
}
