// ============================================================================
// CryptoTracker - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;     // Source de données CoinGecko
pub mod app;     // État de l'application TUI
pub mod config;  // Arguments de la ligne de commande
pub mod models;  // Structures de données
pub mod refresh; // Timer et requêtes en arrière-plan
pub mod storage; // Persistance des favoris
pub mod tracker; // Cœur : filtres, recherche, favoris
pub mod ui;      // Interface utilisateur
pub mod view;    // Projection en cartes
