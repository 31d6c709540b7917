//! Dispatcher behaviour against a scripted host and a recording git.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;

use aynorica_core::{git::display_command, GitError, GitRunner, RegistryReader};
use aynorica_sync::{Action, Dispatcher, Host, InputRequest, PickItem};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Shown {
    Info(String),
    Warn(String),
    Error(String),
    Document(String),
    Chat(String),
    Picker(Vec<String>),
}

#[derive(Default)]
struct ScriptedHost {
    confirms: RefCell<VecDeque<bool>>,
    inputs: RefCell<VecDeque<Option<String>>>,
    picks: RefCell<VecDeque<Option<usize>>>,
    shown: RefCell<Vec<Shown>>,
    progress: RefCell<Vec<String>>,
}

impl ScriptedHost {
    fn confirming(answers: &[bool]) -> Self {
        let host = Self::default();
        host.confirms.borrow_mut().extend(answers.iter().copied());
        host
    }

    fn shown(&self) -> Vec<Shown> {
        self.shown.borrow().clone()
    }
}

impl Host for ScriptedHost {
    fn confirm(&self, _message: &str, _accept: &str, _decline: &str) -> bool {
        self.confirms.borrow_mut().pop_front().unwrap_or(false)
    }

    fn input(&self, request: &InputRequest<'_>) -> Option<String> {
        // Behave like an editor input box: keep asking until valid or cancelled.
        loop {
            let next = self.inputs.borrow_mut().pop_front()??;
            match (request.validate)(&next) {
                None => return Some(next),
                Some(message) => self.shown.borrow_mut().push(Shown::Warn(message)),
            }
        }
    }

    fn pick(&self, _placeholder: &str, items: &[PickItem]) -> Option<usize> {
        self.shown
            .borrow_mut()
            .push(Shown::Picker(items.iter().map(|i| i.label.clone()).collect()));
        self.picks.borrow_mut().pop_front().flatten()
    }

    fn info(&self, message: &str) {
        self.shown.borrow_mut().push(Shown::Info(message.into()));
    }

    fn warn(&self, message: &str) {
        self.shown.borrow_mut().push(Shown::Warn(message.into()));
    }

    fn error(&self, message: &str) {
        self.shown.borrow_mut().push(Shown::Error(message.into()));
    }

    fn progress(&self, message: &str) {
        self.progress.borrow_mut().push(message.into());
    }

    fn show_document(&self, content: &str) {
        self.shown.borrow_mut().push(Shown::Document(content.into()));
    }

    fn open_chat(&self, query: &str) {
        self.shown.borrow_mut().push(Shown::Chat(query.into()));
    }
}

/// Answers `branch --show-current` with `branch`; fails the verb in `fail`.
struct RecordingGit {
    branch: &'static str,
    fail: Vec<(&'static str, i32)>,
    calls: RefCell<Vec<String>>,
}

impl RecordingGit {
    fn on(branch: &'static str) -> Self {
        Self {
            branch,
            fail: vec![],
            calls: RefCell::new(vec![]),
        }
    }

    fn failing(mut self, verb: &'static str, code: i32) -> Self {
        self.fail.push((verb, code));
        self
    }

    fn mutating_calls(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| !c.starts_with("git branch"))
            .cloned()
            .collect()
    }
}

impl GitRunner for RecordingGit {
    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let command = display_command(args);
        self.calls.borrow_mut().push(command.clone());
        if args == ["branch", "--show-current"] {
            return Ok(self.branch.to_string());
        }
        if let Some((verb, code)) = self.fail.iter().find(|(v, _)| args.first() == Some(v)) {
            return Err(GitError::Failed {
                command,
                code: Some(*code),
                stderr: format!("error: {verb} rejected"),
            });
        }
        Ok(String::new())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const REGISTRY: &str = r#"{
    "primeNode": "prime",
    "nodes": {
        "prime":    { "branch": "main", "parent": null, "children": ["nestjs", "security"],
                      "status": "active", "description": "Root", "lastSync": "2025-01-01T00:00:00Z" },
        "nestjs":   { "branch": "node/nestjs", "parent": "prime", "children": [],
                      "status": "active", "description": "NestJS", "lastSync": "2025-01-01T00:00:00Z" },
        "security": { "branch": "node/security", "parent": "prime", "children": [],
                      "status": "idle", "description": "Security", "lastSync": "2025-01-01T00:00:00Z" }
    }
}"#;

fn workspace(registry: Option<&str>, config: Option<&str>) -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let brain = dir.path().join(".github");
    std::fs::create_dir_all(&brain).expect("mkdir");
    if let Some(json) = registry {
        std::fs::write(brain.join("aynorica-registry.json"), json).expect("registry");
    }
    if let Some(json) = config {
        std::fs::write(brain.join("aynorica-config.json"), json).expect("config");
    }
    dir
}

fn reader(root: &Path, git: Rc<RecordingGit>) -> RegistryReader {
    RegistryReader::new(root, git)
}

// ---------------------------------------------------------------------------
// show-network
// ---------------------------------------------------------------------------

#[test]
fn show_network_without_registry_reports_error() {
    let ws = workspace(None, None);
    let git = Rc::new(RecordingGit::on("main"));
    let host = ScriptedHost::default();
    let reader = reader(ws.path(), git);

    Dispatcher::new(&reader, &host).dispatch(Action::ShowNetwork);
    assert_eq!(
        host.shown(),
        vec![Shown::Error(
            "Registry not found. Run ay:sync to initialize.".into()
        )]
    );
}

#[test]
fn show_network_marks_current_node() {
    let ws = workspace(Some(REGISTRY), None);
    let git = Rc::new(RecordingGit::on("node/security"));
    let host = ScriptedHost::default();
    let reader = reader(ws.path(), git);

    Dispatcher::new(&reader, &host).dispatch(Action::ShowNetwork);
    match host.shown().as_slice() {
        [Shown::Document(doc)] => {
            assert!(doc.contains("**Total Nodes:** 3"));
            assert!(doc.contains("📍 **security** ← YOU ARE HERE"));
            assert!(doc.contains("📦 **prime**"));
            assert!(doc.contains("📄 **nestjs**"));
        }
        other => panic!("expected one document, got {other:?}"),
    }
}

/// Rewrites the registry while answering the branch query, like a rebase
/// landing mid-action.
struct RewritesOnBranchQuery {
    registry: std::path::PathBuf,
    replacement: &'static str,
}

impl GitRunner for RewritesOnBranchQuery {
    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        if args == ["branch", "--show-current"] {
            std::fs::write(&self.registry, self.replacement).expect("rewrite registry");
            return Ok("main".into());
        }
        Ok(String::new())
    }
}

#[test]
fn show_network_marks_current_against_rendered_registry() {
    let ws = workspace(Some(REGISTRY), None);
    let git = Rc::new(RewritesOnBranchQuery {
        registry: ws.path().join(".github/aynorica-registry.json"),
        replacement: r#"{ "primeNode": "moved", "nodes": { "moved": { "branch": "main" } } }"#,
    });
    let host = ScriptedHost::default();
    let reader = RegistryReader::new(ws.path(), git);

    Dispatcher::new(&reader, &host).dispatch(Action::ShowNetwork);
    match host.shown().as_slice() {
        [Shown::Document(doc)] => {
            assert!(doc.contains("📍 **prime** ← YOU ARE HERE"));
            assert!(!doc.contains("moved"));
        }
        other => panic!("expected one document, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// sync-brain-state
// ---------------------------------------------------------------------------

#[test]
fn sync_declined_runs_no_git() {
    let ws = workspace(Some(REGISTRY), None);
    let git = Rc::new(RecordingGit::on("main"));
    let host = ScriptedHost::confirming(&[false]);
    let reader = reader(ws.path(), git.clone());

    Dispatcher::new(&reader, &host).dispatch(Action::SyncBrainState);
    assert!(git.mutating_calls().is_empty());
    assert!(host.shown().is_empty());
}

#[test]
fn sync_with_clean_tree_says_no_changes() {
    let ws = workspace(Some(REGISTRY), None);
    let git = Rc::new(RecordingGit::on("main"));
    let host = ScriptedHost::confirming(&[true]);
    let reader = reader(ws.path(), git.clone());

    Dispatcher::new(&reader, &host).dispatch(Action::SyncBrainState);
    assert_eq!(git.mutating_calls(), vec!["git diff --quiet .github/"]);
    assert_eq!(host.shown(), vec![Shown::Info("No changes to sync.".into())]);
}

#[test]
fn sync_with_changes_pushes_and_reports_success() {
    let ws = workspace(Some(REGISTRY), None);
    let git = Rc::new(RecordingGit::on("main").failing("diff", 1));
    let host = ScriptedHost::confirming(&[true]);
    let reader = reader(ws.path(), git.clone());

    Dispatcher::new(&reader, &host).dispatch(Action::SyncBrainState);
    assert_eq!(
        git.mutating_calls(),
        vec![
            "git diff --quiet .github/",
            "git add .github/",
            "git commit -m \"chore: sync brain state\"",
            "git push",
        ]
    );
    assert_eq!(
        host.shown(),
        vec![Shown::Info("✅ Brain state synced to GitHub".into())]
    );
}

#[test]
fn sync_commit_failure_skips_push_and_surfaces_git_text() {
    let ws = workspace(Some(REGISTRY), None);
    let git = Rc::new(
        RecordingGit::on("main")
            .failing("diff", 1)
            .failing("commit", 1),
    );
    let host = ScriptedHost::confirming(&[true]);
    let reader = reader(ws.path(), git.clone());

    Dispatcher::new(&reader, &host).dispatch(Action::SyncBrainState);
    let calls = git.mutating_calls();
    assert_eq!(calls.last().map(String::as_str), Some("git commit -m \"chore: sync brain state\""));
    assert!(!calls.iter().any(|c| c == "git push"));

    match host.shown().as_slice() {
        [Shown::Error(msg)] => {
            assert!(msg.starts_with("Sync failed: "));
            assert!(msg.contains("error: commit rejected"));
        }
        other => panic!("expected one error, got {other:?}"),
    }
}

#[test]
fn sync_push_failure_keeps_commit_and_surfaces_git_text() {
    let ws = workspace(Some(REGISTRY), None);
    let git = Rc::new(
        RecordingGit::on("main")
            .failing("diff", 1)
            .failing("push", 1),
    );
    let host = ScriptedHost::confirming(&[true]);
    let reader = reader(ws.path(), git.clone());

    Dispatcher::new(&reader, &host).dispatch(Action::SyncBrainState);
    assert_eq!(
        git.mutating_calls(),
        vec![
            "git diff --quiet .github/",
            "git add .github/",
            "git commit -m \"chore: sync brain state\"",
            "git push",
        ]
    );

    match host.shown().as_slice() {
        [Shown::Error(msg)] => {
            assert!(msg.starts_with("Sync failed: "));
            assert!(msg.contains("error: push rejected"));
        }
        other => panic!("expected one error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// deploy-node / load-node
// ---------------------------------------------------------------------------

#[test]
fn deploy_reprompts_until_valid_then_opens_chat() {
    let ws = workspace(Some(REGISTRY), None);
    let host = ScriptedHost::default();
    host.inputs.borrow_mut().extend([
        Some("NestJS".to_string()),
        Some(String::new()),
        Some("nest-js".to_string()),
    ]);
    let reader = reader(ws.path(), Rc::new(RecordingGit::on("main")));

    Dispatcher::new(&reader, &host).dispatch(Action::DeployNode);
    assert_eq!(
        host.shown(),
        vec![
            Shown::Warn("Use lowercase letters, numbers, and hyphens only".into()),
            Shown::Warn("Specialty cannot be empty".into()),
            Shown::Chat("ay:deploy nest-js".into()),
        ]
    );
}

#[test]
fn deploy_cancelled_opens_nothing() {
    let ws = workspace(Some(REGISTRY), None);
    let host = ScriptedHost::default();
    host.inputs.borrow_mut().push_back(None);
    let reader = reader(ws.path(), Rc::new(RecordingGit::on("main")));

    Dispatcher::new(&reader, &host).dispatch(Action::DeployNode);
    assert!(host.shown().is_empty());
}

#[test]
fn load_excludes_current_node() {
    let ws = workspace(Some(REGISTRY), None);
    let host = ScriptedHost::default();
    host.picks.borrow_mut().push_back(Some(1));
    let reader = reader(ws.path(), Rc::new(RecordingGit::on("node/nestjs")));

    Dispatcher::new(&reader, &host).dispatch(Action::LoadNode);
    assert_eq!(
        host.shown(),
        vec![
            Shown::Picker(vec!["prime".into(), "security".into()]),
            Shown::Chat("ay:load security".into()),
        ]
    );
}

#[test]
fn load_with_single_node_has_nothing_to_offer() {
    let ws = workspace(
        Some(r#"{ "primeNode": "prime", "nodes": { "prime": { "branch": "main" } } }"#),
        None,
    );
    let host = ScriptedHost::default();
    let reader = reader(ws.path(), Rc::new(RecordingGit::on("main")));

    Dispatcher::new(&reader, &host).dispatch(Action::LoadNode);
    assert_eq!(host.shown(), vec![Shown::Info("No other nodes to load".into())]);
}

// ---------------------------------------------------------------------------
// refresh-registry / quick-actions
// ---------------------------------------------------------------------------

#[test]
fn refresh_success_requests_status_refresh() {
    let ws = workspace(
        Some(REGISTRY),
        Some(r#"{ "parentBranch": "main", "remote": { "name": "aynorica-brain" } }"#),
    );
    let git = Rc::new(RecordingGit::on("node/nestjs"));
    let host = ScriptedHost::confirming(&[true]);
    let reader = reader(ws.path(), git.clone());

    let follow_up = Dispatcher::new(&reader, &host).dispatch(Action::RefreshRegistry);
    assert_eq!(follow_up, Some(Action::RefreshStatus));
    assert_eq!(
        git.mutating_calls(),
        vec!["git fetch aynorica-brain main", "git rebase aynorica-brain/main"]
    );
    assert_eq!(
        *host.progress.borrow(),
        vec!["Fetching from parent...", "Rebasing..."]
    );
    assert_eq!(host.shown(), vec![Shown::Info("✅ Registry updated".into())]);
}

#[test]
fn refresh_fetch_failure_stops_before_rebase() {
    let ws = workspace(Some(REGISTRY), Some("{}"));
    let git = Rc::new(RecordingGit::on("main").failing("fetch", 128));
    let host = ScriptedHost::confirming(&[true]);
    let reader = reader(ws.path(), git.clone());

    let follow_up = Dispatcher::new(&reader, &host).dispatch(Action::RefreshRegistry);
    assert_eq!(follow_up, None);
    assert_eq!(git.mutating_calls(), vec!["git fetch aynorica-brain main"]);
    match host.shown().as_slice() {
        [Shown::Error(msg)] => assert!(msg.starts_with("Refresh failed: ")),
        other => panic!("expected one error, got {other:?}"),
    }
}

#[test]
fn refresh_without_config_reports_missing_file() {
    let ws = workspace(Some(REGISTRY), None);
    let host = ScriptedHost::confirming(&[true]);
    let reader = reader(ws.path(), Rc::new(RecordingGit::on("main")));

    Dispatcher::new(&reader, &host).dispatch(Action::RefreshRegistry);
    assert_eq!(
        host.shown(),
        vec![Shown::Error("aynorica-config.json not found".into())]
    );
}

#[test]
fn quick_actions_dispatches_the_chosen_entry() {
    let ws = workspace(Some(REGISTRY), None);
    let host = ScriptedHost::default();
    host.picks.borrow_mut().push_back(Some(0));
    let reader = reader(ws.path(), Rc::new(RecordingGit::on("main")));

    Dispatcher::new(&reader, &host).dispatch(Action::QuickActions);
    let shown = host.shown();
    assert_eq!(
        shown[0],
        Shown::Picker(vec![
            "🌐 Show Network".into(),
            "⬆️ Sync Brain State".into(),
            "🚀 Deploy New Node".into(),
            "📥 Load Node Context".into(),
            "🔄 Refresh Registry".into(),
        ])
    );
    assert!(matches!(shown[1], Shown::Document(_)));
}

#[test]
fn quick_actions_dismissed_does_nothing() {
    let ws = workspace(Some(REGISTRY), None);
    let host = ScriptedHost::default();
    let reader = reader(ws.path(), Rc::new(RecordingGit::on("main")));

    assert_eq!(Dispatcher::new(&reader, &host).dispatch(Action::QuickActions), None);
    assert_eq!(host.shown().len(), 1);
}
