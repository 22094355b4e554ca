// ============================================================================
// Structure : MarketTracker
// ============================================================================
// Cœur de l'application : liste complète, liste affichée, mode de filtre,
// recherche et favoris
//
// CONCEPTS RUST :
// 1. State Management : tout l'état dans une seule structure, modifiée
//    uniquement via &mut self
// 2. Fonctions pures : filter_assets() et search_assets() ne dépendent que
//    de leurs arguments, faciles à tester
// 3. Rafraîchissement découpé : begin_refresh() / complete_refresh() pour que
//    la boucle d'événements puisse lancer la requête dans une tâche tokio
// ============================================================================

use chrono::{DateTime, Local};
use tracing::{debug, error, info, instrument};

use crate::api::{FetchError, MarketDataSource};
use crate::models::{Asset, FilterMode};
use crate::storage::{FavoriteSet, KeyValueStore};
use crate::view::{self, Rendered};

/// État du tracker de marché
pub struct MarketTracker {
    /// Dernière liste reçue avec succès, ordre de l'API
    assets: Vec<Asset>,

    /// Liste actuellement affichée (dérivée de assets)
    displayed: Vec<Asset>,

    filter: FilterMode,

    /// Contenu du champ de recherche
    search_term: String,

    favorites: FavoriteSet,

    /// Indicateur de chargement
    loading: bool,

    /// Indicateur d'erreur, affiché jusqu'à la prochaine tentative
    error: bool,

    /// Dernière erreur de rafraîchissement (diagnostic)
    last_error: Option<String>,

    /// Heure du dernier rafraîchissement réussi
    last_updated: Option<DateTime<Local>>,
}

impl MarketTracker {
    /// Crée le tracker et charge les favoris depuis `store`
    pub fn initialize(store: Box<dyn KeyValueStore>) -> Self {
        let favorites = FavoriteSet::load(store);
        info!(favorites = favorites.len(), "Market tracker initialized");

        Self {
            assets: Vec::new(),
            displayed: Vec::new(),
            filter: FilterMode::default(),
            search_term: String::new(),
            favorites,
            loading: false,
            error: false,
            last_error: None,
            last_updated: None,
        }
    }

    // ========================================================================
    // Rafraîchissement
    // ========================================================================

    /// Rafraîchit la liste depuis `source`
    ///
    /// Une erreur n'est jamais propagée : elle allume l'indicateur d'erreur
    /// et la liste précédente reste affichée.
    #[instrument(skip_all)]
    pub async fn refresh(&mut self, source: &dyn MarketDataSource) {
        self.begin_refresh();
        let result = source.fetch_top_assets().await;
        self.complete_refresh(result);
    }

    /// Début d'une tentative : affiche le chargement, masque l'erreur
    pub fn begin_refresh(&mut self) {
        self.loading = true;
        self.error = false;
    }

    /// Fin d'une tentative
    ///
    /// Chaque réponse est appliquée dans l'ordre d'arrivée : si deux requêtes
    /// se chevauchent, la dernière à répondre l'emporte.
    pub fn complete_refresh(&mut self, result: Result<Vec<Asset>, FetchError>) {
        match result {
            Ok(assets) => {
                info!(assets = assets.len(), filter = %self.filter, "Market data refreshed");
                self.assets = assets;
                self.last_updated = Some(Local::now());
                self.last_error = None;
                self.apply_filter(self.filter);
            }
            Err(e) => {
                error!(error = %e, kept = self.assets.len(), "Error fetching data");
                self.error = true;
                self.last_error = Some(e.to_string());
            }
        }

        self.loading = false;
    }

    // ========================================================================
    // Recherche et filtres
    // ========================================================================

    /// Recherche insensible à la casse sur le nom et le symbole
    ///
    /// Le résultat remplace la liste affichée sans tenir compte du mode de
    /// filtre courant, jusqu'au prochain apply_filter().
    pub fn search(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.displayed = search_assets(&self.assets, term);
        debug!(term = %term, results = self.displayed.len(), "Search applied");
    }

    /// Change de mode et recalcule la liste affichée
    pub fn apply_filter(&mut self, mode: FilterMode) {
        self.filter = mode;
        self.displayed = filter_assets(&self.assets, mode, &self.favorites);
        debug!(filter = %mode, results = self.displayed.len(), "Filter applied");
    }

    // ========================================================================
    // Favoris
    // ========================================================================

    /// Ajoute ou retire `id` des favoris (persisté immédiatement)
    ///
    /// Retourne true si `id` est favori après l'appel. En mode Favorites, la
    /// liste affichée est recalculée ; sinon seule l'étoile de la carte change.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        let now_favorite = self.favorites.toggle(id);
        info!(id = %id, favorite = now_favorite, "Favorite toggled");

        if self.filter == FilterMode::Favorites {
            self.apply_filter(FilterMode::Favorites);
        }

        now_favorite
    }

    // ========================================================================
    // Rendu
    // ========================================================================

    /// Projection de la liste affichée en cartes
    pub fn render(&self) -> Rendered {
        view::render_cards(&self.displayed, &self.favorites)
    }

    // ========================================================================
    // Accesseurs
    // ========================================================================

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn displayed(&self) -> &[Asset] {
        &self.displayed
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }
}

// ============================================================================
// Fonctions pures de filtrage
// ============================================================================

/// Applique `mode` à `assets`
///
/// - All / Favorites : ordre d'origine conservé
/// - Gainers : variation > 0, décroissante
/// - Losers : variation < 0, croissante (la plus forte baisse d'abord)
///
/// Les actifs sans variation 24h sont exclus de Gainers et Losers.
pub fn filter_assets(assets: &[Asset], mode: FilterMode, favorites: &FavoriteSet) -> Vec<Asset> {
    match mode {
        FilterMode::All => assets.to_vec(),
        FilterMode::Favorites => assets
            .iter()
            .filter(|a| favorites.contains(&a.id))
            .cloned()
            .collect(),
        FilterMode::Gainers => {
            let mut gainers: Vec<Asset> = assets.iter().filter(|a| a.is_gainer()).cloned().collect();
            gainers.sort_by(|a, b| change_of(b).total_cmp(&change_of(a)));
            gainers
        }
        FilterMode::Losers => {
            let mut losers: Vec<Asset> = assets.iter().filter(|a| a.is_loser()).cloned().collect();
            losers.sort_by(|a, b| change_of(a).total_cmp(&change_of(b)));
            losers
        }
    }
}

/// Sous-liste des actifs dont le nom ou le symbole contient `term`
///
/// Insensible à la casse ; un terme vide retourne toute la liste.
pub fn search_assets(assets: &[Asset], term: &str) -> Vec<Asset> {
    let needle = term.to_lowercase();
    assets.iter().filter(|a| a.matches(&needle)).cloned().collect()
}

fn change_of(asset: &Asset) -> f64 {
    asset.price_change_percentage_24h.unwrap_or(0.0)
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::storage::favorites::FAVORITES_KEY;
    use crate::storage::MemoryStore;

    /// Source de données scriptée : rejoue les réponses dans l'ordre
    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<Vec<Asset>, FetchError>>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<Vec<Asset>, FetchError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl MarketDataSource for ScriptedSource {
        async fn fetch_top_assets(&self) -> Result<Vec<Asset>, FetchError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted response left")
        }
    }

    fn status_error() -> FetchError {
        FetchError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn scenario_assets() -> Vec<Asset> {
        vec![
            Asset::new("bitcoin", "Bitcoin", "btc").with_change(Some(5.2)),
            Asset::new("ether", "Ether", "eth").with_change(Some(-2.1)),
            Asset::new("doge", "Dogecoin", "doge").with_change(None),
        ]
    }

    fn mixed_assets() -> Vec<Asset> {
        vec![
            Asset::new("a", "Alpha", "alp").with_change(Some(1.0)),
            Asset::new("b", "Beta", "bet").with_change(Some(-7.5)),
            Asset::new("c", "Gamma", "gam").with_change(Some(12.3)),
            Asset::new("d", "Delta", "del").with_change(None),
            Asset::new("e", "Epsilon", "eps").with_change(Some(-0.2)),
            Asset::new("f", "Zeta", "zet").with_change(Some(0.0)),
            Asset::new("g", "Eta", "eta").with_change(Some(3.3)),
            Asset::new("h", "Theta", "the").with_change(Some(-12.0)),
        ]
    }

    fn ids(list: &[Asset]) -> Vec<&str> {
        list.iter().map(|a| a.id.as_str()).collect()
    }

    fn tracker_with(assets: Vec<Asset>) -> MarketTracker {
        let mut tracker = MarketTracker::initialize(Box::new(MemoryStore::new()));
        tracker.complete_refresh(Ok(assets));
        tracker
    }

    #[test]
    fn test_initialize_loads_favorites() {
        let store = MemoryStore::with_entry(FAVORITES_KEY, r#"["ether"]"#);
        let tracker = MarketTracker::initialize(Box::new(store));
        assert!(tracker.favorites().contains("ether"));
        assert_eq!(tracker.filter(), FilterMode::All);
        assert!(tracker.displayed().is_empty());
    }

    #[test]
    fn test_scenario_filters() {
        let mut tracker = tracker_with(scenario_assets());

        tracker.apply_filter(FilterMode::Gainers);
        assert_eq!(ids(tracker.displayed()), vec!["bitcoin"]);

        tracker.apply_filter(FilterMode::Losers);
        assert_eq!(ids(tracker.displayed()), vec!["ether"]);

        tracker.apply_filter(FilterMode::All);
        assert_eq!(ids(tracker.displayed()), vec!["bitcoin", "ether", "doge"]);
    }

    #[test]
    fn test_gainers_positive_and_descending() {
        let favorites = FavoriteSet::load(Box::new(MemoryStore::new()));
        let result = filter_assets(&mixed_assets(), FilterMode::Gainers, &favorites);

        assert_eq!(ids(&result), vec!["c", "g", "a"]);
        assert!(result.iter().all(|a| change_of(a) > 0.0));
        assert!(result.windows(2).all(|w| change_of(&w[0]) >= change_of(&w[1])));
    }

    #[test]
    fn test_losers_negative_and_ascending() {
        let favorites = FavoriteSet::load(Box::new(MemoryStore::new()));
        let result = filter_assets(&mixed_assets(), FilterMode::Losers, &favorites);

        assert_eq!(ids(&result), vec!["h", "b", "e"]);
        assert!(result.iter().all(|a| change_of(a) < 0.0));
        assert!(result.windows(2).all(|w| change_of(&w[0]) <= change_of(&w[1])));
    }

    #[test]
    fn test_favorites_keep_original_order() {
        let mut tracker = tracker_with(mixed_assets());
        tracker.toggle_favorite("g");
        tracker.toggle_favorite("b");
        tracker.toggle_favorite("not-listed");

        tracker.apply_filter(FilterMode::Favorites);
        assert_eq!(ids(tracker.displayed()), vec!["b", "g"]);
    }

    #[test]
    fn test_apply_filter_is_idempotent() {
        let mut tracker = tracker_with(mixed_assets());
        for mode in FilterMode::ALL {
            tracker.apply_filter(mode);
            let first = tracker.displayed().to_vec();
            tracker.apply_filter(mode);
            assert_eq!(tracker.displayed(), first.as_slice(), "mode {}", mode);
        }
    }

    #[test]
    fn test_toggle_round_trip() {
        let mut tracker = MarketTracker::initialize(Box::new(MemoryStore::new()));
        assert!(tracker.favorites().is_empty());

        assert!(tracker.toggle_favorite("bitcoin"));
        assert_eq!(tracker.favorites().iter().collect::<Vec<_>>(), vec!["bitcoin"]);

        assert!(!tracker.toggle_favorite("bitcoin"));
        assert!(tracker.favorites().is_empty());
    }

    #[test]
    fn test_toggle_in_favorites_mode_removes_card() {
        let mut tracker = tracker_with(scenario_assets());
        tracker.toggle_favorite("bitcoin");
        tracker.toggle_favorite("doge");
        tracker.apply_filter(FilterMode::Favorites);
        assert_eq!(ids(tracker.displayed()), vec!["bitcoin", "doge"]);

        tracker.toggle_favorite("bitcoin");
        assert_eq!(ids(tracker.displayed()), vec!["doge"]);
    }

    #[test]
    fn test_toggle_outside_favorites_mode_keeps_list() {
        let mut tracker = tracker_with(scenario_assets());
        tracker.apply_filter(FilterMode::Losers);
        tracker.toggle_favorite("ether");
        assert_eq!(ids(tracker.displayed()), vec!["ether"]);

        match tracker.render() {
            Rendered::Cards(cards) => assert!(cards[0].favorite),
            Rendered::NoResults => panic!("expected a card"),
        }
    }

    #[test]
    fn test_search_case_insensitive() {
        let mut tracker = tracker_with(scenario_assets());

        tracker.search("BTC");
        assert_eq!(ids(tracker.displayed()), vec!["bitcoin"]);

        tracker.search("btc");
        assert_eq!(ids(tracker.displayed()), vec!["bitcoin"]);

        tracker.search("coin");
        assert_eq!(ids(tracker.displayed()), vec!["bitcoin", "doge"]);
    }

    #[test]
    fn test_search_overrides_filter() {
        let mut tracker = tracker_with(scenario_assets());
        tracker.apply_filter(FilterMode::Gainers);

        // La recherche porte sur toute la liste, pas seulement les gainers
        tracker.search("e");
        assert_eq!(ids(tracker.displayed()), vec!["ether", "doge"]);
        assert_eq!(tracker.filter(), FilterMode::Gainers);

        tracker.apply_filter(FilterMode::Gainers);
        assert_eq!(ids(tracker.displayed()), vec!["bitcoin"]);
    }

    #[test]
    fn test_empty_search_restores_full_list() {
        let mut tracker = tracker_with(scenario_assets());
        tracker.search("doge");
        assert_eq!(tracker.displayed().len(), 1);

        tracker.search("");
        assert_eq!(ids(tracker.displayed()), vec!["bitcoin", "ether", "doge"]);
    }

    #[test]
    fn test_render_no_results() {
        let mut tracker = tracker_with(scenario_assets());
        tracker.search("nothing matches this");
        assert_eq!(tracker.render(), Rendered::NoResults);
    }

    #[tokio::test]
    async fn test_refresh_success_then_failure_keeps_assets() {
        let source = ScriptedSource::new(vec![Ok(scenario_assets()), Err(status_error())]);
        let mut tracker = MarketTracker::initialize(Box::new(MemoryStore::new()));

        tracker.refresh(&source).await;
        assert_eq!(tracker.displayed().len(), 3);
        assert!(!tracker.has_error());
        assert!(!tracker.is_loading());
        assert!(tracker.last_updated().is_some());

        tracker.refresh(&source).await;
        assert_eq!(ids(tracker.displayed()), vec!["bitcoin", "ether", "doge"]);
        assert!(tracker.has_error());
        assert!(!tracker.is_loading());
        assert!(tracker.last_error().unwrap().contains("500"));
    }

    #[tokio::test]
    async fn test_successful_refresh_clears_last_error() {
        let source = ScriptedSource::new(vec![Err(status_error()), Ok(scenario_assets())]);
        let mut tracker = MarketTracker::initialize(Box::new(MemoryStore::new()));

        tracker.refresh(&source).await;
        assert!(tracker.last_error().is_some());

        tracker.refresh(&source).await;
        assert!(!tracker.has_error());
        assert_eq!(tracker.last_error(), None);
        assert_eq!(tracker.displayed().len(), 3);
    }

    #[tokio::test]
    async fn test_refresh_reapplies_filter() {
        let source = ScriptedSource::new(vec![Ok(scenario_assets())]);
        let mut tracker = MarketTracker::initialize(Box::new(MemoryStore::new()));
        tracker.apply_filter(FilterMode::Losers);

        tracker.refresh(&source).await;
        assert_eq!(ids(tracker.displayed()), vec!["ether"]);
    }

    #[test]
    fn test_begin_refresh_clears_error() {
        let mut tracker = tracker_with(scenario_assets());
        tracker.begin_refresh();
        tracker.complete_refresh(Err(status_error()));
        assert!(tracker.has_error());

        tracker.begin_refresh();
        assert!(!tracker.has_error());
        assert!(tracker.is_loading());
    }

    #[test]
    fn test_overlapping_refreshes_last_response_wins() {
        let mut tracker = MarketTracker::initialize(Box::new(MemoryStore::new()));

        // Deux requêtes lancées, la seconde répond en premier
        tracker.begin_refresh();
        tracker.begin_refresh();
        tracker.complete_refresh(Ok(vec![Asset::new("newer", "Newer", "nw")]));
        tracker.complete_refresh(Ok(vec![Asset::new("older", "Older", "od")]));

        assert_eq!(ids(tracker.displayed()), vec!["older"]);
    }
}
