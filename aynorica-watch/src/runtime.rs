//! Session lifecycle: activation checks, then a single-threaded event loop
//! that keeps the status display current and offers a sync after edits.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use chrono::Utc;

use aynorica_core::{ExtensionSettings, GitRunner, RegistryReader};
use aynorica_detector::{detect_node, NodeWorkspace};
use aynorica_sync::{staleness, Action, Dispatcher, Host};

use crate::debounce::Debouncer;
use crate::error::{io_err, WatchError};
use crate::status::{StatusBar, StatusSink};
use crate::subscription::{ChangeEvent, ChangeFeed, Subscribers, Subscription};

pub const MSG_REGISTRY_MISSING: &str =
    "Aynorica node detected but registry missing. Run: ay:sync";
pub const MSG_SYNC_OFFER: &str = "Sync brain state to GitHub?";

/// An activated workspace.
pub struct Session<H: Host, S: StatusSink> {
    workspace: NodeWorkspace,
    settings: ExtensionSettings,
    reader: Rc<RegistryReader>,
    host: H,
    status: Rc<RefCell<StatusBar<S>>>,
}

/// Activate a session for the workspace at `root`.
///
/// Returns `Ok(None)` when the workspace is a node without a registry; the
/// user has already been told how to initialize it.
pub fn activate<H: Host, S: StatusSink + 'static>(
    root: &Path,
    settings: ExtensionSettings,
    git: Rc<dyn GitRunner>,
    host: H,
    sink: S,
) -> Result<Option<Session<H, S>>, WatchError> {
    let workspace = detect_node(root)?;
    tracing::info!(root = %root.display(), marker = ?workspace.marker, "Aynorica workspace detected");

    let reader = Rc::new(RegistryReader::new(root, git));
    let Some(registry) = reader.read() else {
        if host.confirm(MSG_REGISTRY_MISSING, "Open Chat", "Dismiss") {
            host.open_chat("ay:sync");
        }
        return Ok(None);
    };

    let session = Session {
        workspace,
        settings,
        reader,
        host,
        status: Rc::new(RefCell::new(StatusBar::new(sink))),
    };
    session.refresh_status();

    let current = session.reader.current_node();
    if let Some(stale) = staleness::check_registry(&registry, current.as_ref(), Utc::now()) {
        if session
            .host
            .confirm(&stale.message(), "Refresh Now", "Dismiss")
        {
            session.handle_follow_up(session.dispatcher().refresh_registry_confirmed());
        }
    }

    tracing::info!("Aynorica session activated");
    Ok(Some(session))
}

impl<H: Host, S: StatusSink + 'static> Session<H, S> {
    pub fn workspace(&self) -> &NodeWorkspace {
        &self.workspace
    }

    pub fn settings(&self) -> &ExtensionSettings {
        &self.settings
    }

    pub fn reader(&self) -> &RegistryReader {
        &self.reader
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn status(&self) -> &Rc<RefCell<StatusBar<S>>> {
        &self.status
    }

    pub fn dispatcher(&self) -> Dispatcher<'_, H> {
        Dispatcher::new(&self.reader, &self.host)
    }

    /// Run `action` and apply its follow-up.
    pub fn dispatch(&self, action: Action) {
        let follow_up = self.dispatcher().dispatch(action);
        self.handle_follow_up(follow_up);
    }

    pub fn refresh_status(&self) {
        self.status.borrow_mut().update(&self.reader);
    }

    /// Ask whether to sync now; the answer counts as the sync confirmation.
    pub fn offer_sync(&self) {
        if self.host.confirm(MSG_SYNC_OFFER, "Yes", "Not Now") {
            self.dispatcher().sync_brain_state_confirmed();
        }
    }

    /// Register the session's change handlers on `subscribers`.
    ///
    /// Registry changes redraw the status; with `auto_sync_on_save`, any
    /// other brain file write (re)starts `debouncer`.
    pub fn wire(
        &self,
        subscribers: &Subscribers<ChangeEvent>,
        debouncer: &Rc<RefCell<Debouncer<()>>>,
    ) -> Vec<Subscription> {
        let mut subscriptions = Vec::new();

        let status = Rc::clone(&self.status);
        let reader = Rc::clone(&self.reader);
        subscriptions.push(subscribers.subscribe(move |event| {
            if *event == ChangeEvent::Registry {
                tracing::info!("registry changed, updating status");
                status.borrow_mut().update(&reader);
            }
        }));

        if self.settings.auto_sync_on_save {
            let debouncer = Rc::clone(debouncer);
            subscriptions.push(subscribers.subscribe(move |event| {
                if let ChangeEvent::BrainFile(path) = event {
                    tracing::debug!(path = %path.display(), "brain file saved");
                    debouncer.borrow_mut().schedule(());
                }
            }));
        }

        subscriptions
    }

    pub fn dispose(&self) {
        self.status.borrow_mut().dispose();
        tracing::info!("Aynorica session disposed");
    }
}

impl<H: Host, S: StatusSink> Session<H, S> {
    fn handle_follow_up(&self, follow_up: Option<Action>) {
        if follow_up == Some(Action::RefreshStatus) {
            self.status.borrow_mut().update(&self.reader);
        }
    }
}

/// Drive `session` until ctrl-c or until the watcher goes away.
pub async fn run<H: Host, S: StatusSink + 'static>(
    session: Session<H, S>,
) -> Result<(), WatchError> {
    let mut feed = ChangeFeed::watch(session.reader.root())?;
    let subscribers = feed.subscribers();

    let (debouncer, mut offers) = Debouncer::new(session.settings.sync_debounce);
    let debouncer = Rc::new(RefCell::new(debouncer));
    let _subscriptions = session.wire(&subscribers, &debouncer);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let result = loop {
        tokio::select! {
            event = feed.recv() => {
                let Some(event) = event else {
                    tracing::warn!("watcher stopped");
                    break Ok(());
                };
                subscribers.publish(&event);
            }
            Some(()) = offers.recv() => session.offer_sync(),
            signal = &mut ctrl_c => {
                match signal {
                    Ok(()) => {
                        tracing::info!("received ctrl-c, shutting down");
                        break Ok(());
                    }
                    Err(err) => break Err(io_err("ctrl-c handler", err)),
                }
            }
        }
    };

    debouncer.borrow_mut().cancel();
    session.dispose();
    result
}

/// Activate and run a session on a fresh single-threaded runtime, blocking
/// the current thread until it ends.
pub fn start_blocking<H: Host, S: StatusSink + 'static>(
    root: &Path,
    settings: ExtensionSettings,
    git: Rc<dyn GitRunner>,
    host: H,
    sink: S,
) -> Result<(), WatchError> {
    init_tracing();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;

    let Some(session) = activate(root, settings, git, host, sink)? else {
        return Ok(());
    };
    runtime.block_on(run(session))
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
