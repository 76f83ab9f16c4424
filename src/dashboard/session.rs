//! Connected accounts, persisted across restarts.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use alloy::primitives::Address;
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

/// On-disk shape of the session file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub accounts: Vec<Address>,
}

/// The accounts the dashboard acts for. The first one is active.
pub struct Session {
    accounts: ArcSwap<Vec<Address>>,
    persistence_path: Option<PathBuf>,
}

impl Session {
    /// Create an empty session.
    pub fn new(persistence_path: Option<PathBuf>) -> Self {
        Self {
            accounts: ArcSwap::from_pointee(Vec::new()),
            persistence_path,
        }
    }

    /// Load from file if it exists.
    pub fn load_from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let session = Self::new(Some(path.to_path_buf()));
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let state: SessionState = serde_json::from_reader(reader)?;
            tracing::info!(accounts = state.accounts.len(), "Restored session");
            session.accounts.store(Arc::new(state.accounts));
        }
        Ok(session)
    }

    /// Save to file. No-op without a persistence path.
    pub fn save_to_file(&self) -> std::io::Result<()> {
        if let Some(path) = &self.persistence_path {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer(&mut writer, &self.state())?;
            writer.flush()?;
            tracing::debug!(path = %path.display(), "Saved session");
        }
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            accounts: self.accounts(),
        }
    }

    pub fn accounts(&self) -> Vec<Address> {
        self.accounts.load().as_ref().clone()
    }

    pub fn active_account(&self) -> Option<Address> {
        self.accounts.load().first().copied()
    }

    pub fn is_connected(&self) -> bool {
        !self.accounts.load().is_empty()
    }

    /// Replace the connected accounts and persist.
    pub fn connect(&self, accounts: Vec<Address>) -> std::io::Result<()> {
        tracing::info!(account = ?accounts.first(), "Session connected");
        self.accounts.store(Arc::new(accounts));
        self.save_to_file()
    }

    /// Forget all accounts and persist.
    pub fn disconnect(&self) -> std::io::Result<()> {
        self.accounts.store(Arc::new(Vec::new()));
        tracing::info!("Session disconnected");
        self.save_to_file()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(None)
    }
}
