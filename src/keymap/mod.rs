pub mod builtin;
pub mod talon;

pub use talon::{load_talon_lettermap, load_talon_symbolmap};

use crate::app_dirs::expand_home;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// One spoken phrase and the key text it produces
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyMapping {
    pub spoken: String,
    pub symbol: String,
}

impl KeyMapping {
    pub fn new(spoken: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            spoken: spoken.into(),
            symbol: symbol.into(),
        }
    }

    pub fn to_uppercase(&self) -> Self {
        Self {
            spoken: self.spoken.to_uppercase(),
            symbol: self.symbol.to_uppercase(),
        }
    }
}

fn from_pairs(pairs: &[(&str, &str)]) -> Vec<KeyMapping> {
    pairs
        .iter()
        .map(|(spoken, symbol)| KeyMapping::new(*spoken, *symbol))
        .collect()
}

fn sorted_by_symbol(mappings: Vec<KeyMapping>) -> Vec<KeyMapping> {
    mappings
        .into_iter()
        .sorted_by(|a, b| a.symbol.cmp(&b.symbol).then_with(|| a.spoken.cmp(&b.spoken)))
        .collect()
}

/// Which speech grammar the spoken names come from
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MapStyle {
    #[default]
    Talon,
    Dragonfly,
}

#[derive(Debug, Clone)]
pub struct KeyMapSources {
    pub style: MapStyle,
    pub alphabet_csv: PathBuf,
    pub keys_file: PathBuf,
    pub symbols: bool,
}

/// Source lists a [`KeyMap`] is assembled from
#[derive(Debug, Clone, Default)]
pub struct KeyMapParts {
    pub letters: Vec<KeyMapping>,
    pub numbers: Vec<KeyMapping>,
    pub crucial: Vec<KeyMapping>,
    pub punctuation: Vec<KeyMapping>,
}

impl KeyMapParts {
    pub fn builtin() -> Self {
        Self {
            letters: from_pairs(builtin::ALPHABET),
            numbers: from_pairs(builtin::NUMBERS),
            crucial: from_pairs(builtin::CRUCIAL),
            punctuation: from_pairs(builtin::LONG_PUNCTUATION),
        }
    }

    /// Built-in lists, with Talon files taking over where they load and are
    /// non-empty
    pub fn load(sources: &KeyMapSources) -> Self {
        let mut parts = Self::builtin();
        if sources.style == MapStyle::Dragonfly {
            return parts;
        }

        let csv_path = expand_home(&sources.alphabet_csv);
        match load_talon_lettermap(&csv_path) {
            Ok(letters) if !letters.is_empty() => parts.letters = letters,
            Ok(_) => warn!(path = %csv_path.display(), "talon alphabet is empty, using built-in"),
            Err(e) => warn!(path = %csv_path.display(), error = %e, "cannot read talon alphabet, using built-in"),
        }

        let keys_path = expand_home(&sources.keys_file);
        match load_talon_symbolmap(&keys_path) {
            Ok(symbols) if !symbols.is_empty() => parts.punctuation = symbols,
            Ok(_) => warn!(path = %keys_path.display(), "no talon symbols found, using built-in"),
            Err(e) => warn!(path = %keys_path.display(), error = %e, "cannot read talon keys, using built-in"),
        }

        parts
    }
}

/// Ordered list of mappings drawn from when building combos. Repeated
/// entries are deliberate: they are picked more often.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyMap {
    entries: Vec<KeyMapping>,
}

impl KeyMap {
    /// Letters then numbers (each sorted by symbol), then the crucial keys
    /// twice. With `symbols` the whole list is doubled before punctuation is
    /// appended, so the core keys still dominate.
    pub fn build(parts: KeyMapParts, symbols: bool) -> Self {
        let crucial = sorted_by_symbol(parts.crucial);

        let mut entries = sorted_by_symbol(parts.letters);
        entries.extend(sorted_by_symbol(parts.numbers));
        entries.extend(crucial.iter().cloned());
        entries.extend(crucial);

        if symbols {
            entries.extend_from_within(..);
            entries.extend(sorted_by_symbol(parts.punctuation));
        }

        info!(entries = entries.len(), symbols, "built key map");
        Self { entries }
    }

    pub fn load(sources: &KeyMapSources) -> Self {
        Self::build(KeyMapParts::load(sources), sources.symbols)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&KeyMapping> {
        self.entries.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyMapping> {
        self.entries.iter()
    }
}

impl From<Vec<KeyMapping>> for KeyMap {
    fn from(entries: Vec<KeyMapping>) -> Self {
        Self { entries }
    }
}
