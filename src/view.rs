// ============================================================================
// View-model : projection de la liste affichée en cartes
// ============================================================================
// Fonctions pures : (liste affichée, favoris) -> Vec<AssetCard>
// La technologie de rendu (ratatui, stdout) ne fait que lire ces cartes.
// ============================================================================

use crate::models::Asset;
use crate::storage::FavoriteSet;

/// Message affiché quand la liste est vide
pub const NO_RESULTS_MESSAGE: &str = "No cryptocurrencies found matching your criteria.";

/// Sens de la variation 24h (pilote la couleur)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Unknown,
}

/// Une carte prête à afficher
#[derive(Debug, Clone, PartialEq)]
pub struct AssetCard {
    pub id: String,
    pub icon: String,
    pub name: String,
    /// Symbole en majuscules
    pub symbol: String,
    pub price: String,
    /// "+2.35%", "-1.20%" ou "N/A"
    pub change: String,
    pub trend: Trend,
    pub market_cap: String,
    pub volume: String,
    pub favorite: bool,
}

/// Icône affichée quand l'API n'en fournit pas
pub const ICON_PLACEHOLDER: &str = "-";

impl AssetCard {
    /// URL de l'icône, ou un tiret si elle est absente
    pub fn icon_label(&self) -> &str {
        if self.icon.is_empty() {
            ICON_PLACEHOLDER
        } else {
            &self.icon
        }
    }
}

/// Résultat du rendu
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// Liste vide : un seul indicateur "aucun résultat"
    NoResults,
    Cards(Vec<AssetCard>),
}

impl Rendered {
    pub fn len(&self) -> usize {
        match self {
            Rendered::NoResults => 0,
            Rendered::Cards(cards) => cards.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Projette la liste affichée en cartes
pub fn render_cards(displayed: &[Asset], favorites: &FavoriteSet) -> Rendered {
    if displayed.is_empty() {
        return Rendered::NoResults;
    }

    Rendered::Cards(
        displayed
            .iter()
            .map(|asset| card_for(asset, favorites.contains(&asset.id)))
            .collect(),
    )
}

/// Construit la carte d'un actif
pub fn card_for(asset: &Asset, favorite: bool) -> AssetCard {
    let (change, trend) = match asset.price_change_percentage_24h {
        Some(c) if c >= 0.0 => (format!("+{:.2}%", c), Trend::Up),
        Some(c) => (format!("{:.2}%", c), Trend::Down),
        None => ("N/A".to_string(), Trend::Unknown),
    };

    AssetCard {
        id: asset.id.clone(),
        icon: asset.image.clone(),
        name: asset.name.clone(),
        symbol: asset.symbol.to_uppercase(),
        price: format_usd(asset.current_price),
        change,
        trend,
        market_cap: format_usd(asset.market_cap),
        volume: format_usd(asset.total_volume),
        favorite,
    }
}

// ============================================================================
// Formatage des montants
// ============================================================================

/// Formate un montant en dollars avec séparateurs de milliers
///
/// Au plus 3 décimales (zéros finaux retirés) au-dessus de 1 $, jusqu'à 8
/// en dessous pour que les micro-prix restent lisibles.
///
/// Exemple : 1234567.891 -> "$1,234,567.891", 0.00001234 -> "$0.00001234"
pub fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }

    let decimals = if value.abs() >= 1.0 || value == 0.0 { 3 } else { 8 };
    let formatted = format!("{:.*}", decimals, value.abs());

    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (formatted.as_str(), ""),
    };

    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };

    let grouped = group_thousands(int_part);
    if frac_part.is_empty() {
        format!("{}${}", sign, grouped)
    } else {
        format!("{}${}.{}", sign, grouped, frac_part)
    }
}

/// Insère une virgule toutes les trois positions : "1234567" -> "1,234,567"
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0.0), "$0");
        assert_eq!(format_usd(1.0), "$1");
        assert_eq!(format_usd(999.5), "$999.5");
        assert_eq!(format_usd(67000.0), "$67,000");
        assert_eq!(format_usd(1234567.891), "$1,234,567.891");
        assert_eq!(format_usd(1320000000000.0), "$1,320,000,000,000");
        assert_eq!(format_usd(0.00001234), "$0.00001234");
        assert_eq!(format_usd(-1500.25), "-$1,500.25");
        assert_eq!(format_usd(f64::NAN), "N/A");
    }

    #[test]
    fn test_card_change_formatting() {
        let up = card_for(&Asset::new("b", "Bitcoin", "btc").with_change(Some(5.2)), false);
        assert_eq!(up.change, "+5.20%");
        assert_eq!(up.trend, Trend::Up);
        assert_eq!(up.symbol, "BTC");

        let down = card_for(&Asset::new("e", "Ether", "eth").with_change(Some(-2.1)), true);
        assert_eq!(down.change, "-2.10%");
        assert_eq!(down.trend, Trend::Down);
        assert!(down.favorite);

        let zero = card_for(&Asset::new("u", "Tether", "usdt").with_change(Some(0.0)), false);
        assert_eq!(zero.change, "+0.00%");

        let unknown = card_for(&Asset::new("d", "Doge", "doge"), false);
        assert_eq!(unknown.change, "N/A");
        assert_eq!(unknown.trend, Trend::Unknown);
    }

    #[test]
    fn test_icon_label() {
        let asset = Asset {
            image: "https://img/btc.png".to_string(),
            ..Asset::new("bitcoin", "Bitcoin", "btc")
        };
        let with_icon = card_for(&asset, false);
        assert_eq!(with_icon.icon_label(), "https://img/btc.png");

        let without = card_for(&Asset::new("bitcoin", "Bitcoin", "btc"), false);
        assert_eq!(without.icon_label(), ICON_PLACEHOLDER);
    }

    #[test]
    fn test_render_empty_is_no_results() {
        let favorites = FavoriteSet::load(Box::new(MemoryStore::new()));
        assert_eq!(render_cards(&[], &favorites), Rendered::NoResults);
        assert!(render_cards(&[], &favorites).is_empty());
    }

    #[test]
    fn test_render_marks_favorites() {
        let mut favorites = FavoriteSet::load(Box::new(MemoryStore::new()));
        favorites.toggle("ether");

        let list = vec![
            Asset::new("bitcoin", "Bitcoin", "btc"),
            Asset::new("ether", "Ether", "eth"),
        ];

        match render_cards(&list, &favorites) {
            Rendered::Cards(cards) => {
                assert_eq!(cards.len(), 2);
                assert!(!cards[0].favorite);
                assert!(cards[1].favorite);
            }
            Rendered::NoResults => panic!("expected cards"),
        }
    }
}
