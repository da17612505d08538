// Holds the current catalog snapshot and swaps it on explicit reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::catalog::CatalogFile;
use crate::error::ConfigError;
use crate::snapshot::ConfigSnapshot;

#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    current: Arc<ConfigSnapshot>,
}

impl ConfigStore {
    /// Load and validate the catalog at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let current = Arc::new(load_snapshot(&path)?);
        log::info!(
            "loaded catalog {} ({} occupations)",
            path.display(),
            current.occupations.len()
        );
        Ok(Self { path, current })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The snapshot in effect right now. Callers keep it for a whole run.
    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        Arc::clone(&self.current)
    }

    /// Re-read the catalog file. On failure the previous snapshot stays in effect.
    pub fn reload(&mut self) -> Result<Arc<ConfigSnapshot>, ConfigError> {
        match load_snapshot(&self.path) {
            Ok(snapshot) => {
                self.current = Arc::new(snapshot);
                log::info!("reloaded catalog {}", self.path.display());
                Ok(self.snapshot())
            }
            Err(e) => {
                log::warn!("catalog reload failed, keeping previous snapshot: {e}");
                Err(e)
            }
        }
    }
}

fn load_snapshot(path: &Path) -> Result<ConfigSnapshot, ConfigError> {
    let mut snapshot = CatalogFile::load(path)?.into_snapshot()?;
    snapshot.source = Some(path.to_path_buf());
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(price: &str) -> String {
        format!(
            r#"{{
                "default_occupation": "MOZO",
                "occupations": [ {{
                    "name": "MOZO", "display_name": "Mozo", "synonyms": ["MESERO"],
                    "prendas": [ {{ "prenda_type": "CAMISA", "price_sml_other": {price} }} ]
                }} ]
            }}"#
        )
    }

    fn camisa_cents(snapshot: &ConfigSnapshot) -> Option<i64> {
        snapshot.occupation("MOZO")?.garment("CAMISA")?.prices.iter().next()?.2.map(|m| m.cents())
    }

    #[test]
    fn reload_replaces_snapshot_but_old_one_stays_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, catalog("25.0")).unwrap();

        let mut store = ConfigStore::open(&path).unwrap();
        let before = store.snapshot();
        assert_eq!(before.source.as_deref(), Some(path.as_path()));

        std::fs::write(&path, catalog("30.0")).unwrap();
        let after = store.reload().unwrap();

        assert_eq!(camisa_cents(&before), Some(2500));
        assert_eq!(camisa_cents(&after), Some(3000));
        assert_eq!(camisa_cents(&store.snapshot()), Some(3000));
    }

    #[test]
    fn failed_reload_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, catalog("25.0")).unwrap();

        let mut store = ConfigStore::open(&path).unwrap();
        std::fs::write(&path, "{ broken").unwrap();
        assert!(store.reload().is_err());
        assert_eq!(camisa_cents(&store.snapshot()), Some(2500));
    }
}
