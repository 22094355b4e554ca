// ============================================================================
// Gestion des événements
// ============================================================================
// Lit les événements clavier et les traduit en actions de l'application
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Pattern matching : KeyCode -> Action
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::models::FilterMode;

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Pas d'événement pendant le timeout de poll
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    poll_timeout: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            poll_timeout: Duration::from_millis(250),
        }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// Le timeout permet à la boucle de traiter les résultats des requêtes
    /// même quand l'utilisateur ne tape rien.
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.poll_timeout)? {
            match event::read()? {
                // Sur certains OS, on reçoit Press ET Release
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Action : intention de l'utilisateur
// ============================================================================

/// Action déduite d'une touche
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Refresh,
    Up,
    Down,
    ToggleFavorite,
    Filter(FilterMode),
    StartSearch,
    /// Caractère tapé dans le champ de recherche
    SearchChar(char),
    SearchBackspace,
    /// Enter ou Échap : sortie du champ de recherche
    FinishSearch,
    None,
}

/// Traduit une touche du dashboard en action
pub fn dashboard_action(key: &KeyEvent) -> Action {
    if is_ctrl_c(key) {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Action::Quit,
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::F(5) => Action::Refresh,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Char(' ') | KeyCode::Char('s') => Action::ToggleFavorite,
        KeyCode::Char('/') => Action::StartSearch,
        KeyCode::Char('1') | KeyCode::Char('a') => Action::Filter(FilterMode::All),
        KeyCode::Char('2') | KeyCode::Char('f') => Action::Filter(FilterMode::Favorites),
        KeyCode::Char('3') | KeyCode::Char('g') => Action::Filter(FilterMode::Gainers),
        KeyCode::Char('4') | KeyCode::Char('l') => Action::Filter(FilterMode::Losers),
        _ => Action::None,
    }
}

/// Traduit une touche du champ de recherche en action
pub fn search_input_action(key: &KeyEvent) -> Action {
    if is_ctrl_c(key) {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Enter | KeyCode::Esc => Action::FinishSearch,
        KeyCode::Backspace => Action::SearchBackspace,
        KeyCode::Char(c) => Action::SearchChar(c),
        _ => Action::None,
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c'))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn test_dashboard_keys() {
        assert_eq!(dashboard_action(&key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(dashboard_action(&key(KeyCode::Char('r'))), Action::Refresh);
        assert_eq!(dashboard_action(&key(KeyCode::Char('j'))), Action::Down);
        assert_eq!(dashboard_action(&key(KeyCode::Char(' '))), Action::ToggleFavorite);
        assert_eq!(
            dashboard_action(&key(KeyCode::Char('3'))),
            Action::Filter(FilterMode::Gainers)
        );
        assert_eq!(
            dashboard_action(&key(KeyCode::Char('l'))),
            Action::Filter(FilterMode::Losers)
        );
        assert_eq!(dashboard_action(&key(KeyCode::Char('z'))), Action::None);
    }

    #[test]
    fn test_search_input_keys() {
        // En saisie, 'q' est un caractère, pas une sortie
        assert_eq!(search_input_action(&key(KeyCode::Char('q'))), Action::SearchChar('q'));
        assert_eq!(search_input_action(&key(KeyCode::Esc)), Action::FinishSearch);
        assert_eq!(search_input_action(&key(KeyCode::Backspace)), Action::SearchBackspace);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(search_input_action(&ctrl_c), Action::Quit);
    }
}
