//! Route reconciliation subsystem.
//!
//! # State Machines
//! ```text
//! create(request):
//!     GET /id/{identity}
//!         Unreachable → stop this attempt
//!         NotFound    → render → PUT routes/0/ → Created
//!         Found       → AlreadyExists
//!
//! delete(identity):
//!     DELETE /id/{identity}
//!         Applied     → DeletedById
//!         UnknownId   → GET server routes → scan (last entry excluded)
//!                         match at k → DELETE routes/k → DeletedAt(k)
//!                         no match   → NoMatchingRoute (fatal)
//!         Unreachable → stop this attempt
//! ```
//!
//! # Design Decisions
//! - Remote state is re-read right before every mutation, never cached
//! - "Already exists" is success, not conflict
//! - Retry iterations share nothing but the immutable request

pub mod reconciler;
pub mod retry;

pub use reconciler::{CreateOutcome, DeleteOutcome, ReconcileError, Reconciler};
pub use retry::run_with_retry;
