// ============================================================================
// FileStore : stockage clé-valeur dans un fichier JSON
// ============================================================================
// Le fichier contient un objet JSON { "clé": "valeur", ... }
// Il est relu à l'ouverture et réécrit entièrement à chaque set().
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::KeyValueStore;

/// Stockage clé-valeur persistant sur disque
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Ouvre (ou prépare) le fichier `path`
    ///
    /// Un fichier absent donne un stockage vide. Un fichier illisible ou
    /// corrompu aussi : il sera écrasé au prochain set().
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();

        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Store file is malformed, starting empty");
                BTreeMap::new()
            }),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Store file not readable, starting empty");
                BTreeMap::new()
            }
        };

        Self { path, entries }
    }

    /// Emplacement par défaut : <data dir>/cryptotracker/store.json
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cryptotracker")
            .join("store.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Échec de la création du répertoire {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(&self.entries)
            .context("Échec de la sérialisation du stockage")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Échec de l'écriture de {}", self.path.display()))?;

        debug!(path = %self.path.display(), keys = self.entries.len(), "Store saved");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
    }
}
