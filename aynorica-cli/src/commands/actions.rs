//! `aynorica network|sync|deploy|load|refresh|quick`: one dispatcher action
//! each, run against the terminal host.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use aynorica_sync::{Action, Dispatcher};

use super::open_workspace;
use crate::host::TerminalHost;

/// Arguments for `aynorica sync` and `aynorica refresh`.
#[derive(Args, Debug)]
pub struct ConfirmArgs {
    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for `aynorica deploy`.
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Specialty of the new node (lowercase letters, digits, hyphens).
    /// Prompted for when omitted.
    pub specialty: Option<String>,
}

/// Arguments for `aynorica load`.
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Node to load. Chosen from a list when omitted.
    pub node: Option<String>,
}

/// Run `action` in the workspace at `root`.
pub fn run(root: &Path, action: Action, host: TerminalHost) -> Result<ExitCode> {
    let workspace = open_workspace(root)?;
    let follow_up = Dispatcher::new(&workspace.reader, &host).dispatch(action);
    if follow_up == Some(Action::RefreshStatus) {
        super::status::print_line(&workspace.reader);
    }
    Ok(host.exit_code())
}
