//! Mappings compiled into the binary.

/// Keys that are drilled twice as often as the rest
pub const CRUCIAL: &[(&str, &str)] = &[("space", " "), ("dot", ".")];

pub const NUMBERS: &[(&str, &str)] = &[
    ("zero", "0"),
    ("one", "1"),
    ("two", "2"),
    ("three", "3"),
    ("four", "4"),
    ("five", "5"),
    ("six", "6"),
    ("seven", "7"),
    ("eight", "8"),
    ("nine", "9"),
];

/// The knausj Talon spoken alphabet
pub const ALPHABET: &[(&str, &str)] = &[
    ("air", "a"),
    ("bat", "b"),
    ("cap", "c"),
    ("drum", "d"),
    ("each", "e"),
    ("fine", "f"),
    ("gust", "g"),
    ("harp", "h"),
    ("sit", "i"),
    ("jury", "j"),
    ("crunch", "k"),
    ("look", "l"),
    ("made", "m"),
    ("near", "n"),
    ("odd", "o"),
    ("pit", "p"),
    ("quench", "q"),
    ("red", "r"),
    ("sun", "s"),
    ("trap", "t"),
    ("urge", "u"),
    ("vest", "v"),
    ("whale", "w"),
    ("plex", "x"),
    ("yank", "y"),
    ("zip", "z"),
];

/// Long punctuation names: slower to say, more reliable to recognise
pub const LONG_PUNCTUATION: &[(&str, &str)] = &[
    ("pipe symbol", "|"),
    ("minus", "-"),
    ("dot", "."),
    ("comma", ","),
    ("backslash", "\\"),
    ("underscore", "_"),
    ("(asterisk|Asterix)", "*"),
    ("colon", ":"),
    ("(semicolon|semi colon)", ";"),
    ("at symbol", "@"),
    ("quotes", "\""),
    ("single quote", "'"),
    ("apostrophe", "'"),
    ("hash", "#"),
    ("dollar", "$"),
    ("dollar sign", "$"),
    ("percent", "%"),
    ("percentage", "%"),
    ("ampersand", "&"),
    ("slash", "/"),
    ("equals", "="),
    ("plus", "+"),
    ("space", " "),
    ("question", "?"),
    ("question mark", "?"),
    ("exclamation", "!"),
    ("exclamation mark", "!"),
    ("caret", "^"),
    ("tilde", "~"),
    ("back tick", "`"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn alphabet_covers_every_letter_once() {
        let symbols: HashSet<&str> = ALPHABET.iter().map(|(_, s)| *s).collect();
        assert_eq!(symbols.len(), 26);
        assert!(symbols.iter().all(|s| s.len() == 1));
    }

    #[test]
    fn numbers_are_digits() {
        for (i, (_, digit)) in NUMBERS.iter().enumerate() {
            assert_eq!(*digit, i.to_string());
        }
    }
}
