//! Keybinding configuration for the catalog browser.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use crate::tui::event::Action;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: Vec<String>,
    pub move_up: Vec<String>,
    pub move_down: Vec<String>,
    pub next_page: Vec<String>,
    pub prev_page: Vec<String>,
    pub add_to_cart: Vec<String>,
    pub remove_from_cart: Vec<String>,
    pub refresh: Vec<String>,
    pub retry: Vec<String>,
}

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|k| k.to_string()).collect()
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: keys(&["q", "Ctrl+c"]),
            move_up: keys(&["k", "Up"]),
            move_down: keys(&["j", "Down"]),
            next_page: keys(&["n", "PageDown"]),
            prev_page: keys(&["p", "PageUp"]),
            add_to_cart: keys(&["a", "Enter"]),
            remove_from_cart: keys(&["x", "Delete"]),
            refresh: keys(&["R"]),
            retry: keys(&["r"]),
        }
    }
}

impl KeybindingConfig {
    /// Resolves a key event to an action; earlier entries win on conflicts.
    pub fn get_action(&self, key: &KeyEvent) -> Action {
        let table: [(&[String], Action); 9] = [
            (&self.quit, Action::Quit),
            (&self.move_up, Action::MoveUp),
            (&self.move_down, Action::MoveDown),
            (&self.next_page, Action::NextPage),
            (&self.prev_page, Action::PrevPage),
            (&self.add_to_cart, Action::AddToCart),
            (&self.remove_from_cart, Action::RemoveFromCart),
            (&self.refresh, Action::Refresh),
            (&self.retry, Action::Retry),
        ];

        table
            .iter()
            .find(|(bindings, _)| {
                bindings
                    .iter()
                    .filter_map(|b| parse_key_string(b).ok())
                    .any(|binding| binding.matches(key))
            })
            .map(|(_, action)| *action)
            .unwrap_or(Action::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Shift is ignored on the event side since terminals report it for
    /// uppercase characters.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.code == key.code
            && (self.modifiers == key.modifiers
                || self.modifiers == (key.modifiers - KeyModifiers::SHIFT))
    }
}

/// Parses bindings such as `"j"`, `"PageDown"`, `"Ctrl+c"` or `"F5"`.
pub fn parse_key_string(s: &str) -> Result<KeyBinding, String> {
    let s = s.trim();
    let (modifier_parts, key_part) = match s.rsplit_once('+') {
        // A lone "+" is the plus key itself.
        Some((mods, key)) if !key.is_empty() => (Some(mods), key),
        _ => (None, s),
    };

    let mut modifiers = KeyModifiers::NONE;
    for part in modifier_parts.into_iter().flat_map(|m| m.split('+')) {
        modifiers |= match part.to_lowercase().as_str() {
            "ctrl" | "control" => KeyModifiers::CONTROL,
            "shift" => KeyModifiers::SHIFT,
            "alt" => KeyModifiers::ALT,
            _ => return Err(format!("Unknown modifier: {}", part)),
        };
    }

    Ok(KeyBinding {
        code: parse_key_code(key_part)?,
        modifiers,
    })
}

fn parse_key_code(s: &str) -> Result<KeyCode, String> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    let lower = s.to_lowercase();
    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=12).contains(&n) {
            return Ok(KeyCode::F(n));
        }
    }

    match lower.as_str() {
        "enter" | "return" => Ok(KeyCode::Enter),
        "tab" => Ok(KeyCode::Tab),
        "backtab" => Ok(KeyCode::BackTab),
        "backspace" => Ok(KeyCode::Backspace),
        "delete" | "del" => Ok(KeyCode::Delete),
        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "pageup" | "pgup" => Ok(KeyCode::PageUp),
        "pagedown" | "pgdn" => Ok(KeyCode::PageDown),
        "up" => Ok(KeyCode::Up),
        "down" => Ok(KeyCode::Down),
        "left" => Ok(KeyCode::Left),
        "right" => Ok(KeyCode::Right),
        "esc" | "escape" => Ok(KeyCode::Esc),
        "space" => Ok(KeyCode::Char(' ')),
        _ => Err(format!("Unknown key: {}", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_parse_plain_and_special_keys() {
        assert_eq!(parse_key_string("j").unwrap().code, KeyCode::Char('j'));
        assert_eq!(parse_key_string("R").unwrap().code, KeyCode::Char('R'));
        assert_eq!(parse_key_string("PageDown").unwrap().code, KeyCode::PageDown);
        assert_eq!(parse_key_string("F5").unwrap().code, KeyCode::F(5));
        assert_eq!(parse_key_string("+").unwrap().code, KeyCode::Char('+'));
    }

    #[test]
    fn test_parse_modifiers() {
        let binding = parse_key_string("Ctrl+Shift+a").unwrap();
        assert_eq!(binding.code, KeyCode::Char('a'));
        assert_eq!(binding.modifiers, KeyModifiers::CONTROL | KeyModifiers::SHIFT);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_key_string("Hyper+a").is_err());
        assert!(parse_key_string("F13").is_err());
        assert!(parse_key_string("Banana").is_err());
    }

    #[test]
    fn test_ctrl_binding_requires_ctrl() {
        let binding = parse_key_string("Ctrl+c").unwrap();
        assert!(binding.matches(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!binding.matches(&press(KeyCode::Char('c'))));
    }

    #[test]
    fn test_uppercase_with_shift_matches() {
        let binding = parse_key_string("R").unwrap();
        assert!(binding.matches(&KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT)));
    }

    #[test]
    fn test_default_actions() {
        let config = KeybindingConfig::default();
        assert_eq!(config.get_action(&press(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(config.get_action(&press(KeyCode::Down)), Action::MoveDown);
        assert_eq!(config.get_action(&press(KeyCode::Char('a'))), Action::AddToCart);
        assert_eq!(config.get_action(&press(KeyCode::Delete)), Action::RemoveFromCart);
        assert_eq!(config.get_action(&press(KeyCode::Char('r'))), Action::Retry);
        assert_eq!(
            config.get_action(&KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT)),
            Action::Refresh
        );
        assert_eq!(config.get_action(&press(KeyCode::Char('z'))), Action::None);
    }
}
