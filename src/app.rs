// ============================================================================
// Structure : App
// ============================================================================
// État de l'interface TUI autour du MarketTracker
//
// PATTERN : "Application State"
// - Le tracker porte l'état métier (listes, filtre, favoris)
// - App ajoute l'état d'interaction : sélection, saisie de recherche, sortie
// - Toutes les modifications passent par les méthodes de App
// ============================================================================

use crate::models::FilterMode;
use crate::tracker::MarketTracker;

/// Écrans de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : liste des cartes
    Dashboard,

    /// Saisie du terme de recherche (filtrage en direct)
    SearchInput,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// État métier
    pub tracker: MarketTracker,

    /// Index de la carte sélectionnée dans la liste affichée
    pub selected_index: usize,

    /// Écran actuellement affiché
    pub current_screen: Screen,
}

impl App {
    pub fn new(tracker: MarketTracker) -> Self {
        Self {
            running: true,
            tracker,
            selected_index: 0,
            current_screen: Screen::Dashboard,
        }
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Navigue vers le haut dans la liste
    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Navigue vers le bas dans la liste
    ///
    /// saturating_sub(1) gère le cas liste vide (0 - 1 = 0)
    pub fn navigate_down(&mut self) {
        let max_index = self.tracker.displayed().len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    /// Identifiant de l'actif sélectionné
    pub fn selected_id(&self) -> Option<&str> {
        self.tracker
            .displayed()
            .get(self.selected_index)
            .map(|asset| asset.id.as_str())
    }

    /// Ramène la sélection dans les bornes après un changement de liste
    pub fn clamp_selection(&mut self) {
        let max_index = self.tracker.displayed().len().saturating_sub(1);
        self.selected_index = self.selected_index.min(max_index);
    }

    // ========================================================================
    // Actions métier
    // ========================================================================

    /// Sélectionne un mode de filtre (la liste repart du début)
    pub fn select_filter(&mut self, mode: FilterMode) {
        self.tracker.apply_filter(mode);
        self.selected_index = 0;
    }

    /// Bascule le favori de la carte sélectionnée
    ///
    /// Retourne l'id concerné et son nouvel état, None si la liste est vide.
    pub fn toggle_selected_favorite(&mut self) -> Option<(String, bool)> {
        let id = self.selected_id()?.to_string();
        let now_favorite = self.tracker.toggle_favorite(&id);
        self.clamp_selection();
        Some((id, now_favorite))
    }

    // ========================================================================
    // Saisie de recherche
    // ========================================================================

    /// Entre en mode saisie ; le terme courant reste éditable
    pub fn start_search(&mut self) {
        self.current_screen = Screen::SearchInput;
    }

    /// Quitte le mode saisie (le résultat de la recherche reste affiché)
    pub fn finish_search(&mut self) {
        self.current_screen = Screen::Dashboard;
    }

    /// Ajoute un caractère au terme et relance la recherche
    pub fn append_char(&mut self, c: char) {
        let mut term = self.tracker.search_term().to_string();
        term.push(c);
        self.update_search(&term);
    }

    /// Supprime le dernier caractère du terme et relance la recherche
    pub fn backspace(&mut self) {
        let mut term = self.tracker.search_term().to_string();
        term.pop();
        self.update_search(&term);
    }

    fn update_search(&mut self, term: &str) {
        self.tracker.search(term);
        self.selected_index = 0;
    }

    /// Vérifie si on est en mode saisie
    pub fn is_in_search_input(&self) -> bool {
        self.current_screen == Screen::SearchInput
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
