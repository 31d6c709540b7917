//! `aynorica watch`: keep a session open in the terminal.

use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Args;

use aynorica_core::{ExtensionSettings, ShellGit};

use super::resolve_root;
use crate::host::{TerminalHost, TerminalStatus};

/// Arguments for `aynorica watch`.
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Offer to sync after files under `.github/` are written.
    #[arg(long, env = "AYNORICA_AUTO_SYNC_ON_SAVE")]
    pub auto_sync_on_save: bool,

    /// Quiet period before the sync offer, in milliseconds.
    #[arg(long, env = "AYNORICA_SYNC_DEBOUNCE_MS", default_value_t = 5000)]
    pub sync_debounce_ms: u64,
}

impl WatchArgs {
    pub fn settings(&self) -> ExtensionSettings {
        ExtensionSettings {
            auto_sync_on_save: self.auto_sync_on_save,
            ..ExtensionSettings::default()
        }
        .with_debounce_ms(self.sync_debounce_ms)
    }

    pub fn run(self, root: &Path) -> Result<()> {
        let root = resolve_root(root)?;
        let git = Rc::new(ShellGit::new(root.clone()));
        aynorica_watch::start_blocking(
            &root,
            self.settings(),
            git,
            TerminalHost::new(),
            TerminalStatus::default(),
        )
        .context("watch session failed")
    }
}
