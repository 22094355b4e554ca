// ============================================================================
// Module : api
// ============================================================================
// Source de données de marché
//
// CONCEPT RUST : Trait comme point d'injection
// - MarketTracker ne connaît que le trait MarketDataSource
// - CoinGeckoClient est l'implémentation réelle, les tests en fournissent
//   une fausse
// ============================================================================

pub mod coingecko; // Client CoinGecko

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Asset;

pub use coingecko::CoinGeckoClient;

/// Échec d'un rafraîchissement
///
/// Toutes les variantes sont traitées de la même façon par le tracker :
/// la liste précédente reste affichée et l'indicateur d'erreur s'allume.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Erreur réseau (connexion, timeout, TLS...)
    #[error("requête HTTP échouée : {0}")]
    Transport(#[from] reqwest::Error),

    /// Réponse HTTP hors 2xx
    #[error("l'API a retourné une erreur : HTTP {0}")]
    Status(reqwest::StatusCode),

    /// Corps de réponse illisible
    #[error("réponse JSON invalide : {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source des instantanés de marché
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Récupère les actifs triés par capitalisation décroissante
    async fn fetch_top_assets(&self) -> Result<Vec<Asset>, FetchError>;
}
