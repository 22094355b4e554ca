// ============================================================================
// Structure : Asset
// ============================================================================
// Instantané de marché d'une cryptomonnaie (une ligne de /coins/markets)
//
// CONCEPTS RUST :
// 1. Immutabilité : un Asset n'est jamais modifié, la liste est remplacée
//    entièrement à chaque rafraîchissement
// 2. Option<f64> : la variation 24h peut être absente (null côté API)
// ============================================================================

use serde::{Deserialize, Serialize};

/// Instantané de marché d'un actif
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Identifiant unique (ex: "bitcoin")
    pub id: String,

    /// Nom affiché (ex: "Bitcoin")
    pub name: String,

    /// Symbole du ticker, en minuscules côté API (ex: "btc")
    pub symbol: String,

    /// URL de l'icône
    pub image: String,

    /// Prix actuel en USD
    pub current_price: f64,

    /// Variation sur 24h en pourcentage (None si inconnue)
    pub price_change_percentage_24h: Option<f64>,

    /// Capitalisation en USD
    pub market_cap: f64,

    /// Volume échangé sur 24h en USD
    pub total_volume: f64,
}

impl Asset {
    /// Crée un actif sans données de marché (prix et volumes à 0)
    pub fn new(id: impl Into<String>, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            image: String::new(),
            current_price: 0.0,
            price_change_percentage_24h: None,
            market_cap: 0.0,
            total_volume: 0.0,
        }
    }

    /// Builder : fixe la variation 24h
    pub fn with_change(mut self, change: Option<f64>) -> Self {
        self.price_change_percentage_24h = change;
        self
    }

    /// Vérifie si le nom ou le symbole contient `needle`
    ///
    /// `needle` doit déjà être en minuscules.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.symbol.to_lowercase().contains(needle)
    }

    /// Retourne true si la variation 24h est strictement positive
    pub fn is_gainer(&self) -> bool {
        self.price_change_percentage_24h.is_some_and(|c| c > 0.0)
    }

    /// Retourne true si la variation 24h est strictement négative
    pub fn is_loser(&self) -> bool {
        self.price_change_percentage_24h.is_some_and(|c| c < 0.0)
    }
}
