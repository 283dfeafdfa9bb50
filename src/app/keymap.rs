use std::sync::{Arc, LazyLock};

use anyhow::{Context, Result, anyhow, bail};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use super::input::KeyAction;

const DEFAULT_KEYMAP: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/keymap/default.keymap.json"
));

/// Which kind of row the cursor is on; bindings declare where they apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum KeymapContext {
    Field,
    Type,
    Add,
}

impl KeymapContext {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "field" => Some(KeymapContext::Field),
            "type" => Some(KeymapContext::Type),
            "add" => Some(KeymapContext::Add),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct RawEntry {
    id: String,
    description: String,
    contexts: Vec<String>,
    action: RawAction,
    combos: Vec<String>,
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum RawAction {
    Save,
    Quit,
    ResetStatus,
    Activate,
    AppendField,
    RemoveField,
    RowStep { delta: i32 },
    ColumnStep { delta: i32 },
    CycleType { delta: i32 },
}

impl From<RawAction> for KeyAction {
    fn from(raw: RawAction) -> Self {
        match raw {
            RawAction::Save => KeyAction::Save,
            RawAction::Quit => KeyAction::Quit,
            RawAction::ResetStatus => KeyAction::ResetStatus,
            RawAction::Activate => KeyAction::Activate,
            RawAction::AppendField => KeyAction::AppendField,
            RawAction::RemoveField => KeyAction::RemoveField,
            RawAction::RowStep { delta } => KeyAction::RowStep(delta),
            RawAction::ColumnStep { delta } => KeyAction::ColumnStep(delta),
            RawAction::CycleType { delta } => KeyAction::CycleType(delta),
        }
    }
}

#[derive(Debug)]
struct KeyBinding {
    action: KeyAction,
    contexts: Vec<KeymapContext>,
    combos: Vec<KeyPattern>,
    snippet: String,
}

impl KeyBinding {
    fn from_raw(raw: RawEntry) -> Result<Self> {
        let contexts = raw
            .contexts
            .iter()
            .map(|ctx| {
                KeymapContext::parse(ctx)
                    .ok_or_else(|| anyhow!("keymap entry {} has unknown context '{ctx}'", raw.id))
            })
            .collect::<Result<Vec<_>>>()?;
        if contexts.is_empty() {
            bail!("keymap entry {} must declare at least one context", raw.id);
        }
        let combos = raw
            .combos
            .iter()
            .map(|combo| {
                KeyPattern::parse(combo)
                    .with_context(|| format!("failed to parse combo '{combo}' for {}", raw.id))
            })
            .collect::<Result<Vec<_>>>()?;
        if combos.is_empty() {
            bail!("keymap entry {} must declare combos", raw.id);
        }
        let combos_display = combos
            .iter()
            .map(|pattern| pattern.display.as_str())
            .collect::<Vec<_>>()
            .join("/");
        Ok(Self {
            action: raw.action.into(),
            contexts,
            combos,
            snippet: format!("{combos_display} {}", raw.description),
        })
    }

    fn applies_to(&self, active: &[KeymapContext]) -> bool {
        self.contexts.iter().any(|ctx| active.contains(ctx))
    }
}

#[derive(Debug)]
struct KeyPattern {
    code: KeyCode,
    required: KeyModifiers,
    display: String,
}

impl KeyPattern {
    fn parse(spec: &str) -> Result<Self> {
        let display = spec.trim().to_string();
        let mut tokens = display
            .split('+')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .collect::<Vec<_>>();
        let Some(key_token) = tokens.pop() else {
            bail!("combo must contain a key");
        };
        let mut required = KeyModifiers::empty();
        for token in tokens {
            match token.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => required |= KeyModifiers::CONTROL,
                "shift" => required |= KeyModifiers::SHIFT,
                "alt" => required |= KeyModifiers::ALT,
                other => bail!("unsupported modifier '{other}'"),
            }
        }
        let code = match key_token.to_ascii_lowercase().as_str() {
            "tab" if required.contains(KeyModifiers::SHIFT) => KeyCode::BackTab,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "enter" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "delete" | "del" => KeyCode::Delete,
            "backspace" => KeyCode::Backspace,
            other if other.chars().count() == 1 => {
                KeyCode::Char(other.chars().next().unwrap_or_default())
            }
            _ => bail!("unsupported key '{key_token}'"),
        };
        if code == KeyCode::BackTab {
            required.remove(KeyModifiers::SHIFT);
        }
        Ok(Self {
            code,
            required,
            display,
        })
    }

    fn matches(&self, key: &KeyEvent) -> bool {
        let code_matches = match (self.code, key.code) {
            (KeyCode::Char(expected), KeyCode::Char(actual)) => {
                actual.to_ascii_lowercase() == expected
            }
            (expected, actual) => expected == actual,
        };
        if !code_matches || !key.modifiers.contains(self.required) {
            return false;
        }
        // Terminals disagree on whether BackTab and shifted letters carry SHIFT.
        let extra = key.modifiers.difference(self.required);
        let tolerated = match self.code {
            KeyCode::Char(_) | KeyCode::BackTab => KeyModifiers::SHIFT,
            _ => KeyModifiers::empty(),
        };
        tolerated.contains(extra)
    }
}

/// Parsed keymap; shared between options and the input router.
#[derive(Debug)]
pub struct KeymapStore {
    bindings: Vec<KeyBinding>,
}

impl KeymapStore {
    pub fn from_json(source: &str) -> Result<Self> {
        let raw_entries: Vec<RawEntry> =
            serde_json::from_str(source).context("failed to parse keymap JSON")?;
        let bindings = raw_entries
            .into_iter()
            .map(KeyBinding::from_raw)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { bindings })
    }

    pub(crate) fn classify(&self, key: &KeyEvent, active: &[KeymapContext]) -> Option<KeyAction> {
        self.bindings
            .iter()
            .filter(|binding| binding.applies_to(active))
            .find(|binding| binding.combos.iter().any(|pattern| pattern.matches(key)))
            .map(|binding| binding.action)
    }

    pub(crate) fn help_text(&self, active: &[KeymapContext]) -> Option<String> {
        let snippets = self
            .bindings
            .iter()
            .filter(|binding| binding.applies_to(active))
            .map(|binding| binding.snippet.as_str())
            .collect::<Vec<_>>();
        if snippets.is_empty() {
            None
        } else {
            Some(snippets.join(" • "))
        }
    }
}

static DEFAULT_STORE: LazyLock<Arc<KeymapStore>> = LazyLock::new(|| {
    Arc::new(KeymapStore::from_json(DEFAULT_KEYMAP).expect("invalid keymap/default.keymap.json"))
});

pub(crate) fn default_store() -> Arc<KeymapStore> {
    Arc::clone(&DEFAULT_STORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn default_keymap_parses() {
        let store = default_store();
        let action = store.classify(
            &key(KeyCode::Char('s'), KeyModifiers::CONTROL),
            &[KeymapContext::Field],
        );
        assert_eq!(action, Some(KeyAction::Save));
    }

    #[test]
    fn type_bindings_only_apply_on_type_column() {
        let store = default_store();
        let left = key(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(store.classify(&left, &[KeymapContext::Field]), None);
        assert_eq!(
            store.classify(&left, &[KeymapContext::Field, KeymapContext::Type]),
            Some(KeyAction::CycleType(-1))
        );
    }

    #[test]
    fn shift_tab_accepts_backtab_with_or_without_shift() {
        let store = default_store();
        for modifiers in [KeyModifiers::NONE, KeyModifiers::SHIFT] {
            assert_eq!(
                store.classify(&key(KeyCode::BackTab, modifiers), &[KeymapContext::Field]),
                Some(KeyAction::ColumnStep(-1))
            );
        }
    }

    #[test]
    fn plain_letters_are_not_bound() {
        let store = default_store();
        assert_eq!(
            store.classify(&key(KeyCode::Char('s'), KeyModifiers::NONE), &[KeymapContext::Field]),
            None
        );
    }

    #[test]
    fn help_lists_context_bindings() {
        let store = default_store();
        let help = store.help_text(&[KeymapContext::Add]).unwrap();
        assert!(help.contains("Ctrl+S save"));
        assert!(!help.contains("remove field"));
    }

    #[test]
    fn rejects_unknown_contexts() {
        let raw = r#"[{"id":"x","description":"x","contexts":["nowhere"],"action":{"kind":"save"},"combos":["Ctrl+S"]}]"#;
        let err = KeymapStore::from_json(raw).unwrap_err();
        assert!(err.to_string().contains("unknown context"));
    }
}
