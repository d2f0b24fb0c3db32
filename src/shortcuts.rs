//! Configuração de atalhos de teclado.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Conjunto completo de atalhos, por tela.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shortcuts {
    pub login: LoginShortcuts,
    pub transcription: TranscriptionShortcuts,
    pub users: UsersShortcuts,
    pub input_box: InputBoxShortcuts,
}

/// Atalhos da tela de login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginShortcuts {
    pub quit: Vec<String>,
    pub username: Vec<String>,
    pub password: Vec<String>,
    pub submit: Vec<String>,
}

/// Atalhos da tela de transcrição.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionShortcuts {
    pub quit: Vec<String>,
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub edit_field: Vec<String>,
    pub attach_file: Vec<String>,
    pub add_tag: Vec<String>,
    pub remove_tag: Vec<String>,
    pub submit: Vec<String>,
    pub download: Vec<String>,
    pub preview: Vec<String>,
    pub reset: Vec<String>,
    pub theme: Vec<String>,
    pub users: Vec<String>,
    pub logout: Vec<String>,
}

/// Atalhos da tela de usuários.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersShortcuts {
    pub back: Vec<String>,
    pub quit: Vec<String>,
    pub refresh: Vec<String>,
    pub new_user: Vec<String>,
    pub delete: Vec<String>,
    pub up: Vec<String>,
    pub down: Vec<String>,
}

/// Atalhos dentro do InputBox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputBoxShortcuts {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub backspace: Vec<String>,
    pub delete: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub home: Vec<String>,
    pub end: Vec<String>,
    pub clear_line: Vec<String>,
}

impl Shortcuts {
    /// Lê do TOML; sem arquivo, usa os padrões.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }
}

impl Default for Shortcuts {
    fn default() -> Self {
        Self {
            login: LoginShortcuts {
                quit: vec!["q".into()],
                username: vec!["u".into()],
                password: vec!["p".into()],
                submit: vec!["Enter".into()],
            },
            transcription: TranscriptionShortcuts {
                quit: vec!["q".into()],
                up: vec!["Up".into(), "k".into()],
                down: vec!["Down".into(), "j".into()],
                edit_field: vec!["e".into(), "Enter".into()],
                attach_file: vec!["f".into()],
                add_tag: vec!["a".into()],
                remove_tag: vec!["x".into()],
                submit: vec!["s".into()],
                download: vec!["d".into()],
                preview: vec!["v".into()],
                reset: vec!["c".into()],
                theme: vec!["t".into()],
                users: vec!["g".into()],
                logout: vec!["o".into()],
            },
            users: UsersShortcuts {
                back: vec!["Esc".into()],
                quit: vec!["q".into()],
                refresh: vec!["r".into()],
                new_user: vec!["n".into()],
                delete: vec!["x".into()],
                up: vec!["Up".into(), "k".into()],
                down: vec!["Down".into(), "j".into()],
            },
            input_box: InputBoxShortcuts {
                confirm: vec!["Enter".into()],
                cancel: vec!["Esc".into()],
                backspace: vec!["Backspace".into()],
                delete: vec!["Delete".into()],
                left: vec!["Left".into()],
                right: vec!["Right".into()],
                home: vec!["Home".into()],
                end: vec!["End".into()],
                clear_line: vec!["Ctrl+u".into()],
            },
        }
    }
}

/// O KeyEvent casa com algum dos atalhos informados?
pub fn matches_shortcut(key: &KeyEvent, shortcuts: &[String]) -> bool {
    shortcuts.iter().any(|s| matches_single(key, s))
}

/// Compara o KeyEvent com um único atalho (ex.: "a", "Enter", "Ctrl+u").
fn matches_single(key: &KeyEvent, shortcut: &str) -> bool {
    let mut parts = shortcut.split('+').rev();
    let Some(key_str) = parts.next() else {
        return false;
    };

    // Monta os modificadores esperados a partir dos prefixos.
    let mut expected = KeyModifiers::empty();
    for modifier in parts {
        match modifier.to_ascii_lowercase().as_str() {
            "ctrl" => expected |= KeyModifiers::CONTROL,
            "alt" => expected |= KeyModifiers::ALT,
            "shift" => expected |= KeyModifiers::SHIFT,
            _ => return false,
        }
    }
    if key.modifiers != expected {
        return false;
    }

    match key_str.to_ascii_lowercase().as_str() {
        "enter" => key.code == KeyCode::Enter,
        "esc" => key.code == KeyCode::Esc,
        "tab" => key.code == KeyCode::Tab,
        "backspace" => key.code == KeyCode::Backspace,
        "delete" => key.code == KeyCode::Delete,
        "up" => key.code == KeyCode::Up,
        "down" => key.code == KeyCode::Down,
        "left" => key.code == KeyCode::Left,
        "right" => key.code == KeyCode::Right,
        "home" => key.code == KeyCode::Home,
        "end" => key.code == KeyCode::End,
        _ => {
            // Caractere único casa exatamente (sensível a maiúsculas).
            let mut chars = key_str.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => key.code == KeyCode::Char(c),
                _ => false,
            }
        }
    }
}

/// Junta a lista de teclas para exibição na barra de ajuda.
pub fn format_keys(keys: &[String]) -> String {
    keys.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caractere_simples_casa() {
        let key = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::empty());
        assert!(matches_shortcut(&key, &[String::from("s")]));
        assert!(!matches_shortcut(&key, &[String::from("d")]));
    }

    #[test]
    fn tecla_especial_casa() {
        let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::empty());
        assert!(matches_shortcut(&key, &[String::from("Esc")]));
        assert!(!matches_shortcut(&key, &[String::from("Enter")]));
    }

    #[test]
    fn modificador_e_exigido() {
        let ctrl_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert!(matches_shortcut(&ctrl_u, &[String::from("Ctrl+u")]));
        assert!(!matches_shortcut(&ctrl_u, &[String::from("u")]));

        let plain_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::empty());
        assert!(!matches_shortcut(&plain_u, &[String::from("Ctrl+u")]));
    }

    #[test]
    fn lista_com_alternativas() {
        let shortcuts = vec![String::from("Down"), String::from("j")];
        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::empty());
        let j = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::empty());
        let k = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::empty());
        assert!(matches_shortcut(&down, &shortcuts));
        assert!(matches_shortcut(&j, &shortcuts));
        assert!(!matches_shortcut(&k, &shortcuts));
    }
}
