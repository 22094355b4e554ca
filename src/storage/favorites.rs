// ============================================================================
// Structure : FavoriteSet
// ============================================================================
// Ensemble des identifiants favoris, persisté sous une clé fixe
//
// CONCEPTS RUST :
// 1. Vec : l'ordre d'insertion est conservé tel quel dans le stockage
// 2. Ownership : FavoriteSet possède son stockage (Box<dyn KeyValueStore>)
// ============================================================================

use std::fmt;

use tracing::{debug, info, warn};

use super::KeyValueStore;

/// Clé de persistance des favoris
pub const FAVORITES_KEY: &str = "cryptoFavorites";

/// Favoris de l'utilisateur, synchronisés avec le stockage
pub struct FavoriteSet {
    ids: Vec<String>,
    store: Box<dyn KeyValueStore>,
}

impl FavoriteSet {
    /// Charge les favoris depuis le stockage
    ///
    /// Donnée absente, illisible ou mal formée : ensemble vide, jamais d'erreur.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let ids = match store.get(FAVORITES_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<String>>(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Malformed favorites data, starting with no favorites");
                Vec::new()
            }),
            Ok(None) => {
                debug!("No favorites stored yet");
                Vec::new()
            }
            Err(e) => {
                warn!(error = ?e, "Failed to read favorites, starting with no favorites");
                Vec::new()
            }
        };

        info!(count = ids.len(), "Favorites loaded");
        Self { ids, store }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|fav| fav == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Ajoute ou retire `id`, puis persiste
    ///
    /// Retourne true si `id` est favori après l'appel. Un échec d'écriture
    /// est journalisé mais ne bloque pas la modification en mémoire.
    pub fn toggle(&mut self, id: &str) -> bool {
        let now_favorite = if self.contains(id) {
            self.ids.retain(|fav| fav != id);
            false
        } else {
            self.ids.push(id.to_string());
            true
        };

        self.persist();
        now_favorite
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.ids)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.store.set(FAVORITES_KEY, &json));

        match result {
            Ok(()) => debug!(count = self.ids.len(), "Favorites persisted"),
            Err(e) => warn!(error = ?e, "Failed to persist favorites"),
        }
    }
}

impl fmt::Debug for FavoriteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ids.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    /// Stockage qui refuse toute écriture
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> anyhow::Result<()> {
            anyhow::bail!("read-only")
        }
    }

    #[test]
    fn test_load_absent_is_empty() {
        let favorites = FavoriteSet::load(Box::new(MemoryStore::new()));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let store = MemoryStore::with_entry(FAVORITES_KEY, "{not an array");
        let favorites = FavoriteSet::load(Box::new(store));
        assert!(favorites.is_empty());

        let store = MemoryStore::with_entry(FAVORITES_KEY, "[1, 2, 3]");
        let favorites = FavoriteSet::load(Box::new(store));
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_load_existing() {
        let store = MemoryStore::with_entry(FAVORITES_KEY, r#"["ethereum","bitcoin"]"#);
        let favorites = FavoriteSet::load(Box::new(store));
        assert_eq!(favorites.len(), 2);
        assert!(favorites.contains("bitcoin"));
        assert!(favorites.contains("ethereum"));
    }

    #[test]
    fn test_toggle_persists() {
        let mut favorites = FavoriteSet::load(Box::new(MemoryStore::new()));

        assert!(favorites.toggle("bitcoin"));
        assert_eq!(
            favorites.store.get(FAVORITES_KEY).unwrap().as_deref(),
            Some(r#"["bitcoin"]"#)
        );

        assert!(!favorites.toggle("bitcoin"));
        assert_eq!(favorites.store.get(FAVORITES_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_toggle_twice_keeps_stored_order() {
        let original = r#"["ethereum","bitcoin"]"#;
        let mut favorites = FavoriteSet::load(Box::new(MemoryStore::with_entry(FAVORITES_KEY, original)));

        assert!(favorites.toggle("solana"));
        assert_eq!(favorites.iter().collect::<Vec<_>>(), vec!["ethereum", "bitcoin", "solana"]);
        assert!(!favorites.toggle("solana"));

        assert_eq!(favorites.store.get(FAVORITES_KEY).unwrap().as_deref(), Some(original));
        assert_eq!(favorites.iter().collect::<Vec<_>>(), vec!["ethereum", "bitcoin"]);
    }

    #[test]
    fn test_toggle_survives_write_failure() {
        let mut favorites = FavoriteSet::load(Box::new(ReadOnlyStore));
        assert!(favorites.toggle("bitcoin"));
        assert!(favorites.contains("bitcoin"));
    }
}
