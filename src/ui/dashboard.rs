// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine les cartes produites par MarketTracker::render() avec ratatui
//
// CONCEPTS RATATUI :
// 1. Layout : header (onglets), recherche, cartes, footer (statut)
// 2. Tabs : un onglet par mode de filtre, l'actif surligné
// 3. List + ListState : sélection avec défilement automatique
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};

use crate::app::App;
use crate::models::FilterMode;
use crate::view::{AssetCard, Rendered, Trend, NO_RESULTS_MESSAGE};

/// Dessine l'interface complète
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);
    render_search_bar(frame, app, chunks[1]);
    render_cards(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

/// Crée le layout principal (header, recherche, contenu, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header : onglets de filtre
            Constraint::Length(3), // Barre de recherche
            Constraint::Min(0),    // Cartes : tout le reste
            Constraint::Length(4), // Footer : statut + raccourcis
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header : onglets de filtre
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 🚀 Crypto Tracker ")
        .title_alignment(Alignment::Center);

    let titles: Vec<Line> = FilterMode::ALL
        .iter()
        .enumerate()
        .map(|(i, mode)| Line::from(format!("{} {}", i + 1, mode.label())))
        .collect();

    let selected = FilterMode::ALL
        .iter()
        .position(|mode| *mode == app.tracker.filter())
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(block)
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::REVERSED),
        );

    frame.render_widget(tabs, area);
}

// ============================================================================
// Barre de recherche
// ============================================================================

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.is_in_search_input();
    let border = if editing { Color::Green } else { Color::Cyan };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" 🔍 Search ");

    let term = app.tracker.search_term();
    let mut spans = Vec::new();
    if term.is_empty() && !editing {
        spans.push(Span::styled(
            "Press / to search by name or symbol",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::styled(term, Style::default().fg(Color::White)));
    }
    if editing {
        spans.push(Span::styled(
            "█",
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

// ============================================================================
// Cartes
// ============================================================================

fn render_cards(frame: &mut Frame, app: &App, area: Rect) {
    let rendered = app.tracker.render();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" 📊 Markets ({}) ", rendered.len()));

    let cards = match rendered {
        Rendered::NoResults => {
            let text = vec![
                Line::from(""),
                Line::from(Span::styled(NO_RESULTS_MESSAGE, Style::default().fg(Color::Gray))),
            ];
            let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        }
        Rendered::Cards(cards) => cards,
    };

    let items: Vec<ListItem> = cards.iter().map(card_item).collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol("▶ ");

    let mut state = ListState::default().with_selected(Some(app.selected_index));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Une carte sur trois lignes :
///   ⭐ Bitcoin (BTC)                 $67,000.5   +2.35%
///      Market Cap: $1,320,000,000,000   24h Volume: $25,000,000,000
///      Icon: https://.../bitcoin.png
fn card_item(card: &AssetCard) -> ListItem<'static> {
    let star = if card.favorite { "⭐" } else { "☆ " };

    let change_style = match card.trend {
        Trend::Up => Style::default().fg(Color::Green),
        Trend::Down => Style::default().fg(Color::Red),
        Trend::Unknown => Style::default().fg(Color::Gray),
    };

    let title = Line::from(vec![
        Span::styled(format!("{} ", star), Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("{:<28}", format!("{} ({})", card.name, card.symbol)),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{:>20}", card.price), Style::default().fg(Color::White)),
        Span::styled(format!("{:>10}", card.change), change_style),
    ]);

    let info = Line::from(vec![
        Span::raw("   "),
        Span::styled("Market Cap: ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{:<24}", card.market_cap)),
        Span::styled("24h Volume: ", Style::default().fg(Color::DarkGray)),
        Span::raw(card.volume.clone()),
    ]);

    let icon = Line::from(vec![
        Span::raw("   "),
        Span::styled(format!("Icon: {}", card.icon_label()), Style::default().fg(Color::DarkGray)),
    ]);

    ListItem::new(Text::from(vec![title, info, icon]))
}

// ============================================================================
// Footer : statut + raccourcis
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let status = status_line(app);

    let shortcuts = if app.is_in_search_input() {
        Line::from(vec![
            Span::styled("[Enter/ESC]", key_style(Color::Green)),
            Span::raw(" Done  "),
            Span::styled("[Backspace]", key_style(Color::Yellow)),
            Span::raw(" Erase"),
        ])
    } else {
        Line::from(vec![
            Span::styled("[q]", key_style(Color::Yellow)),
            Span::raw(" Quit  "),
            Span::styled("[↑↓ / j k]", key_style(Color::Yellow)),
            Span::raw(" Navigate  "),
            Span::styled("[1-4]", key_style(Color::Yellow)),
            Span::raw(" Filter  "),
            Span::styled("[/]", key_style(Color::Yellow)),
            Span::raw(" Search  "),
            Span::styled("[space]", key_style(Color::Green)),
            Span::raw(" Favorite  "),
            Span::styled("[r]", key_style(Color::Green)),
            Span::raw(" Refresh"),
        ])
    };

    let paragraph = Paragraph::new(vec![status, shortcuts])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Indicateurs de chargement, d'erreur et heure de mise à jour
fn status_line(app: &App) -> Line<'static> {
    let tracker = &app.tracker;
    let mut spans = Vec::new();

    if tracker.is_loading() {
        spans.push(Span::styled(
            "⏳ Loading market data...  ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }

    if tracker.has_error() {
        spans.push(Span::styled(
            "⚠ Failed to load data. Please try again later.  ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let updated = match tracker.last_updated() {
        Some(at) => format!("Updated {}", at.format("%H:%M:%S")),
        None => "Not loaded yet".to_string(),
    };
    spans.push(Span::styled(updated, Style::default().fg(Color::DarkGray)));

    Line::from(spans)
}

fn key_style(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}
