//! The status display: one line naming the current node, the network size
//! and how long ago the node last synced.

use chrono::{DateTime, Utc};

use aynorica_core::{NodeId, Registry, RegistryReader};
use aynorica_sync::{staleness, Action};

pub const NOT_INITIALIZED_TEXT: &str = "🧠 Aynorica (not initialized)";
pub const NOT_INITIALIZED_TOOLTIP: &str = "Click to initialize or check setup";

/// Text and tooltip for the status display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusText {
    pub text: String,
    pub tooltip: String,
    /// Command run when the display is activated.
    pub command: Action,
}

/// Build the status text for `current` in `registry`.
///
/// Falls back to the "not initialized" text when either is absent or the
/// current node is not a key of the registry.
pub fn status_line(
    registry: Option<&Registry>,
    current: Option<&NodeId>,
    now: DateTime<Utc>,
) -> StatusText {
    let found = registry.zip(current).and_then(|(registry, id)| {
        registry.node(id).map(|node| (registry, id, node))
    });
    let Some((registry, id, node)) = found else {
        return StatusText {
            text: NOT_INITIALIZED_TEXT.to_string(),
            tooltip: NOT_INITIALIZED_TOOLTIP.to_string(),
            command: Action::QuickActions,
        };
    };

    StatusText {
        text: format!(
            "🧠 {id} | {} nodes | ↑ {}",
            registry.node_count(),
            staleness::elapsed(&node.last_sync, now)
        ),
        tooltip: format!(
            "Current: {id}\nChildren: {}\nClick for quick actions",
            node.children.len()
        ),
        command: Action::QuickActions,
    }
}

/// Where status text ends up: an editor status item, a terminal line.
pub trait StatusSink {
    fn show(&mut self, status: &StatusText);
    fn hide(&mut self);
}

/// The single status display of a session.
///
/// Created once at activation and torn down with [`StatusBar::dispose`];
/// updates after disposal are ignored.
pub struct StatusBar<S: StatusSink> {
    sink: S,
    shown: Option<StatusText>,
    disposed: bool,
}

impl<S: StatusSink> StatusBar<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            shown: None,
            disposed: false,
        }
    }

    /// Re-read the registry and current node, then redraw.
    pub fn update(&mut self, reader: &RegistryReader) {
        self.update_at(reader, Utc::now());
    }

    pub fn update_at(&mut self, reader: &RegistryReader, now: DateTime<Utc>) {
        if self.disposed {
            tracing::debug!("status update after dispose ignored");
            return;
        }
        let status = match reader.snapshot() {
            Some((registry, current)) => status_line(Some(&registry), current.as_ref(), now),
            None => status_line(None, None, now),
        };
        if self.shown.as_ref() != Some(&status) {
            tracing::debug!(text = %status.text, "status updated");
        }
        self.sink.show(&status);
        self.shown = Some(status);
    }

    /// Last text handed to the sink.
    pub fn shown(&self) -> Option<&StatusText> {
        self.shown.as_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.shown = None;
        self.sink.hide();
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: StatusSink> Drop for StatusBar<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}
