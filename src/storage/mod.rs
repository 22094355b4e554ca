// ============================================================================
// Module : storage
// ============================================================================
// Persistance clé-valeur locale (équivalent du localStorage d'un navigateur)
//
// CONCEPT RUST : Trait objects
// - Box<dyn KeyValueStore> : le tracker ne sait pas où sont stockées les données
// - FileStore en production, MemoryStore dans les tests
// ============================================================================

pub mod favorites;  // Ensemble des favoris (fichier favorites.rs)
pub mod file_store; // Stockage sur disque (fichier file_store.rs)

use std::collections::HashMap;

use anyhow::Result;

pub use favorites::FavoriteSet;
pub use file_store::FileStore;

/// Stockage clé-valeur synchrone
pub trait KeyValueStore: Send {
    /// Lit la valeur associée à `key` (None si absente)
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Écrase la valeur associée à `key`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Stockage en mémoire, perdu à la fin du processus
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Crée un stockage pré-rempli avec une entrée
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
