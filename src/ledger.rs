use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Persistent set of listing ids already routed through the filter, accepted
/// or not. Membership alone decides "already handled"; entries are never
/// evicted. Stored as a pretty-printed JSON array so the file stays auditable.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    seen: BTreeSet<String>,
}

impl Ledger {
    /// Load from disk. A missing file is an empty ledger, anything else
    /// unreadable is an error: silently starting fresh would re-notify
    /// every listing ever seen.
    pub fn load(path: &Path) -> Result<Self> {
        let seen = if path.exists() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading ledger {}", path.display()))?;
            let ids: Vec<String> = serde_json::from_str(&raw)
                .with_context(|| format!("parsing ledger {}", path.display()))?;
            ids.into_iter().collect()
        } else {
            BTreeSet::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            seen,
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Idempotent. Returns true if the id was new.
    pub fn mark(&mut self, id: &str) -> bool {
        self.seen.insert(id.to_string())
    }

    /// Write the full set back, pretty-printed.
    pub fn persist(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("creating ledger dir {}", dir.display()))?;
            }
        }
        let ids: Vec<&String> = self.seen.iter().collect();
        let json = serde_json::to_string_pretty(&ids)?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing ledger {}", self.path.display()))?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ── Tests ──
