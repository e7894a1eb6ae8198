//! Loaders for a Talon user directory (knausj layout).
//!
//! The alphabet comes from `settings/alphabet.csv`. Punctuation is scraped
//! from the `punctuation_words` and `symbol_key_words` dictionaries in
//! `core/keys/keys.py` without executing it.

use super::KeyMapping;
use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

const HEADER_CELL: &str = "Spoken Form";

/// Load the spoken alphabet. The first column holds the symbol, the second
/// the spoken phrase; header rows and short rows are skipped.
pub fn load_talon_lettermap<P: AsRef<Path>>(path: P) -> Result<Vec<KeyMapping>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b',')
        .quote(b'|')
        .flexible(true)
        .from_path(path.as_ref())?;

    let mut letters: HashMap<String, String> = HashMap::new();
    for record in reader.records() {
        let record = record?;
        if record.len() < 2 || record.iter().any(|cell| cell == HEADER_CELL) {
            continue;
        }
        letters.insert(record[1].to_string(), record[0].to_string());
    }

    debug!(path = %path.as_ref().display(), count = letters.len(), "loaded talon alphabet");
    Ok(into_mappings(letters))
}

/// Load punctuation and symbol names from a Talon `keys.py`
pub fn load_talon_symbolmap<P: AsRef<Path>>(path: P) -> Result<Vec<KeyMapping>> {
    let source = fs::read_to_string(path.as_ref())?;
    let symbols = parse_symbol_dictionaries(&source);
    debug!(path = %path.as_ref().display(), count = symbols.len(), "loaded talon symbols");
    Ok(into_mappings(symbols))
}

pub(crate) fn parse_symbol_dictionaries(source: &str) -> HashMap<String, String> {
    let mut lines = source.lines();
    let mut symbols = HashMap::new();

    for marker in ["punctuation_words = {", "symbol_key_words = {"] {
        if !lines.any(|line| line.contains(marker)) {
            break;
        }
        for line in lines.by_ref() {
            let line = line.trim_start();
            if line.starts_with('"') {
                if let Some((phrase, symbol)) = parse_dictionary_line(line) {
                    symbols.insert(phrase, symbol);
                }
            } else if line.contains('}') {
                break;
            }
        }
    }

    symbols
}

/// Parse `"phrase": "symbol",` where the phrase starts with a letter
fn parse_dictionary_line(line: &str) -> Option<(String, String)> {
    if line.len() < 6 || !line[1..].starts_with(char::is_alphabetic) {
        return None;
    }

    let line = line.trim_end_matches([',', ' ', '\n', '\r']);
    let (phrase, symbol) = line.split_once(':')?;
    let phrase = phrase.trim_matches('"');
    let symbol = symbol.trim_start_matches([' ', '"']).trim_end_matches('"');

    if phrase.is_empty() || symbol.is_empty() {
        return None;
    }
    Some((phrase.to_string(), symbol.to_string()))
}

fn into_mappings(map: HashMap<String, String>) -> Vec<KeyMapping> {
    map.into_iter()
        .map(|(spoken, symbol)| KeyMapping::new(spoken, symbol))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const KEYS_PY: &str = r#"
from talon import Module

mod = Module()

punctuation_words = {
    # spoken forms for common punctuation
    "`": "`",
    "back tick": "`",
    "comma": ",",
    "period": ".",
    "question mark": "?",
    "colon": ":",
}
symbol_key_words = {
    "dot": ".",
    "pipe": "|",
    "close curly": "}",
}

other = {
    "ignored": "!",
}
"#;

    #[test]
    fn parses_both_dictionaries() {
        let symbols = parse_symbol_dictionaries(KEYS_PY);
        assert_eq!(symbols.get("back tick").map(String::as_str), Some("`"));
        assert_eq!(symbols.get("comma").map(String::as_str), Some(","));
        assert_eq!(symbols.get("colon").map(String::as_str), Some(":"));
        assert_eq!(symbols.get("dot").map(String::as_str), Some("."));
        assert_eq!(symbols.get("close curly").map(String::as_str), Some("}"));
        assert!(!symbols.contains_key("ignored"));
        // phrases must start with a letter
        assert!(!symbols.contains_key("`"));
        assert_eq!(symbols.len(), 8);
    }

    #[test]
    fn missing_markers_yield_nothing() {
        assert!(parse_symbol_dictionaries("x = {\n  \"comma\": \",\",\n}\n").is_empty());
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!(parse_dictionary_line("\"ab\""), None);
        assert_eq!(parse_dictionary_line("\"nothing\","), None);
        assert_eq!(parse_dictionary_line("\"empty\": \"\","), None);
        assert_eq!(
            parse_dictionary_line("\"plus\": \"+\",\n"),
            Some(("plus".to_string(), "+".to_string()))
        );
    }

    #[test]
    fn loads_alphabet_csv_skipping_header_and_short_rows() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Letter,Spoken Form").unwrap();
        writeln!(file, "a,air").unwrap();
        writeln!(file, "b,bat").unwrap();
        writeln!(file, "lonely").unwrap();
        writeln!(file, "|,|,pipe").unwrap();
        file.flush().unwrap();

        let mut letters = load_talon_lettermap(file.path()).unwrap();
        letters.sort_by(|a, b| a.spoken.cmp(&b.spoken));
        assert_eq!(
            letters,
            vec![
                KeyMapping::new("air", "a"),
                KeyMapping::new("bat", "b"),
                KeyMapping::new("pipe", ","),
            ]
        );
    }

    #[test]
    fn missing_csv_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_talon_lettermap(dir.path().join("nope.csv")).is_err());
    }

    #[test]
    fn loads_symbols_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(KEYS_PY.as_bytes()).unwrap();
        file.flush().unwrap();

        let symbols = load_talon_symbolmap(file.path()).unwrap();
        assert!(symbols.contains(&KeyMapping::new("question mark", "?")));
    }
}
