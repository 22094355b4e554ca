// ============================================================================
// Configuration : arguments de la ligne de commande
// ============================================================================
// CONCEPT RUST : clap derive
// - Chaque champ de la structure devient une option (--api-url, ...)
// - Les valeurs par défaut sont déclarées à côté du champ
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::api::coingecko::DEFAULT_BASE_URL;
use crate::models::FilterMode;
use crate::refresh::DEFAULT_REFRESH_INTERVAL;
use crate::storage::FileStore;

/// Suivi des 50 premières cryptomonnaies dans le terminal
#[derive(Debug, Clone, Parser)]
#[command(name = "cryptotracker", version, about)]
pub struct Config {
    /// URL de base de l'API CoinGecko
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Intervalle de rafraîchissement automatique, en secondes
    #[arg(long, default_value_t = DEFAULT_REFRESH_INTERVAL.as_secs(), value_parser = clap::value_parser!(u64).range(1..))]
    pub refresh_secs: u64,

    /// Fichier de stockage des favoris (défaut : <data dir>/cryptotracker/store.json)
    #[arg(long)]
    pub store_file: Option<PathBuf>,

    /// Répertoire des fichiers de log
    #[arg(long, default_value = "./logs")]
    pub log_dir: PathBuf,

    /// Rafraîchit une fois, affiche le tableau sur stdout et quitte
    #[arg(long)]
    pub once: bool,

    /// Mode de filtre initial (all, favorites, gainers, losers)
    #[arg(long, default_value_t = FilterMode::All)]
    pub filter: FilterMode,

    /// Terme de recherche appliqué au tableau (mode --once)
    #[arg(long)]
    pub search: Option<String>,
}

impl Config {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }

    pub fn store_path(&self) -> PathBuf {
        self.store_file.clone().unwrap_or_else(FileStore::default_path)
    }
}
