// ============================================================================
// Module : models
// ============================================================================
// Ce module contient les structures de données de l'application
// ============================================================================

pub mod asset;  // Instantané de marché (fichier asset.rs)
pub mod filter; // Modes de filtrage (fichier filter.rs)

// Re-export des structures principales pour simplifier les imports
pub use asset::Asset;
pub use filter::FilterMode;
