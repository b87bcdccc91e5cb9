// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier, les clics souris et les ticks de l'UI
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Pattern matching avec matches! pour identifier les touches
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEventKind,
};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Clic gauche à la position (colonne, ligne) du terminal
    Click { column: u16, row: u16 },

    /// Rien pendant le délai de poll (permet de traiter les résultats du worker)
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
    /// Si rien n'arrive avant le timeout, retourne Event::Tick.
    pub fn next(&self) -> Result<Event> {
        if !event::poll(self.poll_timeout)? {
            return Ok(Event::Tick);
        }

        let event = match event::read()? {
            // Sur certains OS on reçoit Press ET Release : on ne garde que Press
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
            CrosstermEvent::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                Event::Click {
                    column: mouse.column,
                    row: mouse.row,
                }
            }
            // Resize, release, mouvements souris : ignorés
            _ => Event::Tick,
        };
        Ok(event)
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers : identifier les touches
// ============================================================================

fn key_matches(event: &Event, predicate: impl Fn(KeyCode) -> bool) -> bool {
    match event {
        Event::Key(key) => predicate(key.code),
        _ => false,
    }
}

/// 'q' : quitter (two-step)
pub fn is_quit_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char('q') | KeyCode::Char('Q')))
}

pub fn is_escape_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Esc))
}

pub fn is_space_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char(' ')))
}

pub fn is_enter_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Enter))
}

/// Flèche haut ou 'k' (vim)
pub fn is_up_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K')))
}

/// Flèche bas ou 'j' (vim)
pub fn is_down_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J')))
}

/// 'a' : ajouter un symbole
pub fn is_add_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char('a') | KeyCode::Char('A')))
}

/// 'c' : vider la watchlist (avec confirmation)
pub fn is_clear_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char('c') | KeyCode::Char('C')))
}

/// 'v' : bouton "détails" de la ligne sélectionnée
pub fn is_view_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char('v') | KeyCode::Char('V')))
}

/// 'r' : rafraîchir maintenant
pub fn is_refresh_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char('r') | KeyCode::Char('R')))
}

/// 'y' : réponse oui à une confirmation
pub fn is_yes_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char('y') | KeyCode::Char('Y')))
}

pub fn is_backspace_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Backspace))
}

/// Caractère acceptable dans un symbole (lettres, chiffres, '-', '&')
pub fn is_ticker_char_event(event: &Event) -> bool {
    key_matches(event, |code| {
        matches!(code, KeyCode::Char(c) if c.is_ascii_alphanumeric() || c == '-' || c == '&')
    })
}

/// Extrait le caractère d'un événement clavier
pub fn get_char_from_event(event: &Event) -> Option<char> {
    match event {
        Event::Key(KeyEvent { code: KeyCode::Char(c), .. }) => Some(*c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    #[test]
    fn test_is_quit_event() {
        assert!(is_quit_event(&key(KeyCode::Char('q'))));
        assert!(!is_quit_event(&key(KeyCode::Char('a'))));
        assert!(!is_quit_event(&Event::Tick));
    }

    #[test]
    fn test_ticker_chars() {
        assert!(is_ticker_char_event(&key(KeyCode::Char('M'))));
        assert!(is_ticker_char_event(&key(KeyCode::Char('&'))));
        assert!(!is_ticker_char_event(&key(KeyCode::Char(' '))));
        assert_eq!(get_char_from_event(&key(KeyCode::Char('m'))), Some('m'));
        assert_eq!(get_char_from_event(&key(KeyCode::Enter)), None);
    }

    #[test]
    fn test_click_is_not_a_key() {
        let click = Event::Click { column: 3, row: 4 };
        assert!(!is_enter_event(&click));
        assert!(get_char_from_event(&click).is_none());
    }
}
