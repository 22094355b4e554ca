// ============================================================================
// API Client : CoinGecko
// ============================================================================
// Récupère le top des cryptomonnaies par capitalisation depuis CoinGecko
//
// CONCEPTS RUST :
// 1. async/await : requête HTTP non-bloquante
// 2. Serde : désérialisation JSON vers des structures "wire"
// 3. Conversion wire -> modèle : le reste de l'app ne voit que Asset
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use super::{FetchError, MarketDataSource};
use crate::models::Asset;

/// URL de base de l'API publique
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Nombre d'actifs demandés
pub const TOP_ASSETS: u32 = 50;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Structures pour parser la réponse JSON de /coins/markets
// ============================================================================
// Les champs numériques peuvent être null pour les actifs peu liquides,
// d'où les Option. On normalise ensuite vers Asset.
// ============================================================================

#[derive(Debug, Deserialize)]
struct MarketEntry {
    id: String,
    name: String,
    symbol: String,
    #[serde(default)]
    image: Option<String>,
    current_price: Option<f64>,
    price_change_percentage_24h: Option<f64>,
    market_cap: Option<f64>,
    total_volume: Option<f64>,
}

impl From<MarketEntry> for Asset {
    fn from(entry: MarketEntry) -> Self {
        Asset {
            id: entry.id,
            name: entry.name,
            symbol: entry.symbol,
            image: entry.image.unwrap_or_default(),
            current_price: entry.current_price.unwrap_or(0.0),
            price_change_percentage_24h: entry.price_change_percentage_24h,
            market_cap: entry.market_cap.unwrap_or(0.0),
            total_volume: entry.total_volume.unwrap_or(0.0),
        }
    }
}

/// Client CoinGecko
///
/// Cloneable : reqwest::Client partage son pool de connexions entre clones,
/// ce qui permet d'en donner une copie à chaque tâche de rafraîchissement.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    /// Crée un client pointant sur `base_url` (sans slash final)
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cryptotracker/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// URL de la requête top 50 en USD, sans sparkline
    fn markets_url(&self) -> String {
        format!(
            "{}/coins/markets?vs_currency=usd&order=market_cap_desc&per_page={}&page=1&sparkline=false",
            self.base_url, TOP_ASSETS
        )
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_top_assets(&self) -> Result<Vec<Asset>, FetchError> {
        let url = self.markets_url();
        debug!(url = %url, "Sending HTTP request to CoinGecko");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        if !status.is_success() {
            error!(status = %status, "CoinGecko returned error status");
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        let entries: Vec<MarketEntry> = serde_json::from_str(&body)?;
        let assets: Vec<Asset> = entries.into_iter().map(Asset::from).collect();

        info!(assets = assets.len(), "Successfully fetched market data");
        Ok(assets)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
