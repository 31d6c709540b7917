//! Long-running Aynorica session: status display, registry watcher and the
//! debounced sync offer after brain-state edits.

mod error;
pub mod debounce;
pub mod runtime;
pub mod status;
pub mod subscription;

pub use debounce::Debouncer;
pub use error::WatchError;
pub use runtime::{activate, run, start_blocking, Session};
pub use status::{status_line, StatusBar, StatusSink, StatusText};
pub use subscription::{ChangeEvent, ChangeFeed, Subscribers, Subscription};
