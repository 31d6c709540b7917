//! User intents and the host they run against.
//!
//! [`Host`] is everything the surrounding editor or terminal provides:
//! prompts, pickers, notifications, a document viewer and a chat surface.
//! [`Dispatcher`] maps an [`Action`] onto registry reads, git pipelines and
//! host calls. Failures end up as host notifications, never as panics.

use std::fmt;

use aynorica_core::{NodeId, RegistryError, RegistryReader};
use aynorica_renderer::NetworkRenderer;

use crate::error::SyncError;
use crate::pipeline::{self, GitStep, SyncOutcome};
use crate::specialty;

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// A discrete user intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ShowNetwork,
    SyncBrainState,
    DeployNode,
    LoadNode,
    QuickActions,
    RefreshRegistry,
    /// Internal: re-read the registry into the status display.
    RefreshStatus,
}

impl Action {
    /// Entries offered by [`Action::QuickActions`], in menu order.
    pub const MENU: [Action; 5] = [
        Action::ShowNetwork,
        Action::SyncBrainState,
        Action::DeployNode,
        Action::LoadNode,
        Action::RefreshRegistry,
    ];

    /// Command palette identifier.
    pub fn command_id(&self) -> &'static str {
        match self {
            Action::ShowNetwork => "aynorica.showNetwork",
            Action::SyncBrainState => "aynorica.syncBrainState",
            Action::DeployNode => "aynorica.deployNode",
            Action::LoadNode => "aynorica.loadNode",
            Action::QuickActions => "aynorica.quickActions",
            Action::RefreshRegistry => "aynorica.refreshRegistry",
            Action::RefreshStatus => "aynorica.refreshStatus",
        }
    }

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            Action::ShowNetwork => "🌐 Show Network",
            Action::SyncBrainState => "⬆️ Sync Brain State",
            Action::DeployNode => "🚀 Deploy New Node",
            Action::LoadNode => "📥 Load Node Context",
            Action::QuickActions => "⚡ Quick Actions",
            Action::RefreshRegistry => "🔄 Refresh Registry",
            Action::RefreshStatus => "Refresh Status",
        }
    }

    pub fn from_command_id(id: &str) -> Option<Action> {
        [
            Action::ShowNetwork,
            Action::SyncBrainState,
            Action::DeployNode,
            Action::LoadNode,
            Action::QuickActions,
            Action::RefreshRegistry,
            Action::RefreshStatus,
        ]
        .into_iter()
        .find(|a| a.command_id() == id)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command_id())
    }
}

// ---------------------------------------------------------------------------
// Host seam
// ---------------------------------------------------------------------------

/// A free-text prompt with inline validation.
pub struct InputRequest<'a> {
    pub prompt: &'a str,
    pub placeholder: &'a str,
    /// `None` when the value is acceptable, else the message to show while
    /// the host re-prompts.
    pub validate: &'a dyn Fn(&str) -> Option<String>,
}

/// One entry in a selection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickItem {
    pub label: String,
    pub description: Option<String>,
    pub detail: Option<String>,
}

impl PickItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
            detail: None,
        }
    }
}

/// Collaborators supplied by the host platform.
pub trait Host {
    /// Modal question; `true` only when the user picks `accept`.
    fn confirm(&self, message: &str, accept: &str, decline: &str) -> bool;

    /// Ask for text. Must not return a value that `validate` rejects;
    /// `None` means the user cancelled.
    fn input(&self, request: &InputRequest<'_>) -> Option<String>;

    /// Index into `items` of the chosen entry, or `None` if dismissed.
    fn pick(&self, placeholder: &str, items: &[PickItem]) -> Option<usize>;

    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);

    /// Progress of a long-running step.
    fn progress(&self, _message: &str) {}

    /// Present read-only Markdown.
    fn show_document(&self, content: &str);

    /// Hand a query to the external chat/command surface.
    fn open_chat(&self, query: &str);
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

pub const MSG_REGISTRY_MISSING: &str = "Registry not found. Run ay:sync to initialize.";
pub const MSG_NO_CHANGES: &str = "No changes to sync.";
pub const MSG_SYNCED: &str = "✅ Brain state synced to GitHub";
pub const MSG_REFRESHED: &str = "✅ Registry updated";
pub const MSG_NO_OTHER_NODES: &str = "No other nodes to load";

/// Routes [`Action`]s. Holds no state between calls.
pub struct Dispatcher<'a, H: Host + ?Sized> {
    reader: &'a RegistryReader,
    host: &'a H,
}

impl<'a, H: Host + ?Sized> Dispatcher<'a, H> {
    pub fn new(reader: &'a RegistryReader, host: &'a H) -> Self {
        Self { reader, host }
    }

    /// Run `action`. Returns a follow-up the caller owns (currently only
    /// [`Action::RefreshStatus`]).
    pub fn dispatch(&self, action: Action) -> Option<Action> {
        tracing::debug!("dispatching {action}");
        match action {
            Action::ShowNetwork => {
                self.show_network();
                None
            }
            Action::SyncBrainState => {
                if self
                    .host
                    .confirm("Sync brain state to GitHub?", "Yes", "No")
                {
                    self.sync_brain_state_confirmed();
                }
                None
            }
            Action::DeployNode => {
                self.deploy_node();
                None
            }
            Action::LoadNode => {
                self.load_node();
                None
            }
            Action::RefreshRegistry => {
                if self.host.confirm(
                    "Sync with parent to update network registry?",
                    "Yes",
                    "No",
                ) {
                    self.refresh_registry_confirmed()
                } else {
                    None
                }
            }
            Action::QuickActions => self.quick_actions(),
            Action::RefreshStatus => Some(Action::RefreshStatus),
        }
    }

    /// Render the network report into a read-only document.
    pub fn show_network(&self) {
        let Some((registry, current)) = self.reader.snapshot() else {
            self.host.error(MSG_REGISTRY_MISSING);
            return;
        };
        match NetworkRenderer::new().and_then(|r| r.render(&registry, current.as_ref())) {
            Ok(report) => self.host.show_document(&report),
            Err(err) => self.host.error(&format!("Failed to render network: {err}")),
        }
    }

    /// Sync without asking first; the caller already has consent.
    pub fn sync_brain_state_confirmed(&self) -> Option<SyncOutcome> {
        let mut on_step = |step: GitStep| self.host.progress(&step_progress(step));
        match pipeline::sync_brain_state(self.reader.git().as_ref(), &mut on_step) {
            Ok(SyncOutcome::NoChanges) => {
                self.host.info(MSG_NO_CHANGES);
                Some(SyncOutcome::NoChanges)
            }
            Ok(SyncOutcome::Synced) => {
                self.host.info(MSG_SYNCED);
                Some(SyncOutcome::Synced)
            }
            Err(err) => {
                self.host.error(&format!("Sync failed: {err}"));
                None
            }
        }
    }

    /// Refresh without asking first. Returns the status follow-up on success.
    pub fn refresh_registry_confirmed(&self) -> Option<Action> {
        let mut on_step = |step: GitStep| self.host.progress(&step_progress(step));
        match pipeline::refresh_registry(
            self.reader.root(),
            self.reader.git().as_ref(),
            &mut on_step,
        ) {
            Ok(_) => {
                self.host.info(MSG_REFRESHED);
                Some(Action::RefreshStatus)
            }
            Err(SyncError::Registry(RegistryError::ConfigNotFound { .. })) => {
                self.host.error("aynorica-config.json not found");
                None
            }
            Err(err) => {
                self.host.error(&format!("Refresh failed: {err}"));
                None
            }
        }
    }

    /// Ask for a specialty and hand `ay:deploy {specialty}` to chat.
    pub fn deploy_node(&self) {
        let request = InputRequest {
            prompt: "Node specialty (e.g., nestjs, security, frontend)",
            placeholder: "nestjs",
            validate: &specialty::validation_message,
        };
        let Some(value) = self.host.input(&request) else {
            return;
        };
        // Hosts are trusted to validate, but nothing invalid leaves here.
        match specialty::validate(&value) {
            Ok(specialty) => self.host.open_chat(&format!("ay:deploy {specialty}")),
            Err(err) => self.host.error(&err.to_string()),
        }
    }

    /// Pick another node and hand `ay:load {node}` to chat.
    pub fn load_node(&self) {
        let Some((registry, current)) = self.reader.snapshot() else {
            self.host.error("Registry not found");
            return;
        };
        let candidates: Vec<(&NodeId, &aynorica_core::Node)> = registry
            .nodes
            .iter()
            .filter(|(id, _)| Some(*id) != current.as_ref())
            .collect();
        if candidates.is_empty() {
            self.host.info(MSG_NO_OTHER_NODES);
            return;
        }

        let items: Vec<PickItem> = candidates
            .iter()
            .map(|(id, node)| PickItem {
                label: id.to_string(),
                description: Some(node.description.clone()),
                detail: Some(format!("Branch: {}", node.branch)),
            })
            .collect();
        let Some(index) = self.host.pick("Select node to load into context", &items) else {
            return;
        };
        if let Some((id, _)) = candidates.get(index) {
            self.host.open_chat(&format!("ay:load {id}"));
        }
    }

    fn quick_actions(&self) -> Option<Action> {
        let items: Vec<PickItem> = Action::MENU
            .iter()
            .map(|a| PickItem::new(a.label()))
            .collect();
        let index = self.host.pick("Aynorica Quick Actions", &items)?;
        let chosen = *Action::MENU.get(index)?;
        self.dispatch(chosen)
    }
}

fn step_progress(step: GitStep) -> String {
    match step {
        GitStep::Fetch => "Fetching from parent...".to_string(),
        GitStep::Rebase => "Rebasing...".to_string(),
        GitStep::Diff => "Checking for changes...".to_string(),
        GitStep::Add => "Staging brain state...".to_string(),
        GitStep::Commit => "Committing...".to_string(),
        GitStep::Push => "Pushing...".to_string(),
    }
}
