// ============================================================================
// Enum : FilterMode
// ============================================================================
// Les quatre modes d'affichage, mutuellement exclusifs
//
// CONCEPT RUST : Enums pour state machines
// - Un seul mode actif à la fois
// - Pas de transition automatique : seul l'utilisateur change de mode
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Mode de filtrage de la liste affichée
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Toute la liste, ordre d'origine
    #[default]
    All,
    /// Uniquement les favoris, ordre d'origine
    Favorites,
    /// Variation 24h > 0, triés par variation décroissante
    Gainers,
    /// Variation 24h < 0, triés par variation croissante
    Losers,
}

impl FilterMode {
    /// Tous les modes, dans l'ordre des onglets
    pub const ALL: [FilterMode; 4] = [
        FilterMode::All,
        FilterMode::Favorites,
        FilterMode::Gainers,
        FilterMode::Losers,
    ];

    /// Nom court (utilisé en ligne de commande et dans les logs)
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Favorites => "favorites",
            FilterMode::Gainers => "gainers",
            FilterMode::Losers => "losers",
        }
    }

    /// Label affiché dans les onglets
    pub fn label(&self) -> &'static str {
        match self {
            FilterMode::All => "All",
            FilterMode::Favorites => "Favorites",
            FilterMode::Gainers => "Top Gainers",
            FilterMode::Losers => "Top Losers",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "favorites" | "favourites" => Ok(FilterMode::Favorites),
            "gainers" => Ok(FilterMode::Gainers),
            "losers" => Ok(FilterMode::Losers),
            other => Err(format!(
                "mode de filtre inconnu '{}' (attendu : all, favorites, gainers, losers)",
                other
            )),
        }
    }
}
