//! # aynorica-sync
//!
//! Everything that turns a user intent into an effect:
//!
//! - [`staleness`]: relative-time strings and the 24 h staleness check
//! - [`pipeline`]: the git sequences behind "sync brain state" and
//!   "refresh registry"
//! - [`specialty`]: validation of deploy-node input
//! - [`dispatch`]: the [`Host`] seam and the [`Dispatcher`] that routes
//!   [`Action`]s

pub mod dispatch;
pub mod error;
pub mod pipeline;
pub mod specialty;
pub mod staleness;

pub use dispatch::{Action, Dispatcher, Host, InputRequest, PickItem};
pub use error::SyncError;
pub use pipeline::{GitStep, RefreshOutcome, SyncOutcome};
pub use specialty::{Specialty, SpecialtyError};
pub use staleness::Staleness;
