//! Random password generation from selectable character classes.

pub mod store;

use std::fmt;

use rand::Rng;
use thiserror::Error;

pub use store::{PasswordRecord, PasswordStore};

const LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const NUMBERS: &str = "1234567890";
const SYMBOLS: &str = "!@#$%^&*()-_+=~`{}[];:\"'<>?,./|";

/// Symbols some sites reject; multi-codepoint entries are kept whole
const EXTENDED: &[&str] = &[
    "←", "↑", "→", "↓", "·", "•", "●", "–", "‽", "‖", "«", "»", "‘", "„", "✅", "❤️", "⌘", "⌥",
    "⌫", "∞", "™", "¼", "½", "¾", "À", "Á", "Â", "Ã", "Ä", "Å", "Æ", "Ç", "È", "É", "Ê", "Ë",
    "Ì", "Í", "Î", "Ï", "Ð", "Ñ", "Ò", "Ó", "Ô", "Õ", "Ö", "Ø", "Ù", "Ú", "Û", "Ü", "Ý", "Þ",
    "ß", "æ", "Ħ", "ĳ", "Œ", "œ", "☚", "☛", "★", "☆", "♠", "♣", "♥", "♦", "♪", "♫", "♀",
];

/// A class of characters the operator can opt into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// A–Z and a–z
    Letters,
    /// 0–9
    Numbers,
    /// ASCII punctuation
    Symbols,
    /// Arrows, bullets, accented letters and the like
    Extended,
}

impl CharClass {
    /// Every class, in prompt order
    pub const ALL: [CharClass; 4] = [
        CharClass::Letters,
        CharClass::Numbers,
        CharClass::Symbols,
        CharClass::Extended,
    ];

    /// Characters in this class
    pub fn symbols(self) -> Vec<&'static str> {
        match self {
            CharClass::Letters => split_chars(LETTERS),
            CharClass::Numbers => split_chars(NUMBERS),
            CharClass::Symbols => split_chars(SYMBOLS),
            CharClass::Extended => EXTENDED.to_vec(),
        }
    }

    /// Example shown when asking about the class
    pub fn example(self) -> &'static str {
        match self {
            CharClass::Letters => "A, B, C",
            CharClass::Numbers => "1, 2, 3",
            CharClass::Symbols => "@, %, &",
            CharClass::Extended => "←, ↑, →",
        }
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharClass::Letters => write!(f, "letters"),
            CharClass::Numbers => write!(f, "numbers"),
            CharClass::Symbols => write!(f, "special chars"),
            CharClass::Extended => write!(f, "super special chars"),
        }
    }
}

fn split_chars(s: &'static str) -> Vec<&'static str> {
    s.char_indices()
        .map(|(i, c)| &s[i..i + c.len_utf8()])
        .collect()
}

/// Invalid generator input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("Select at least one character class")]
    NoClasses,

    #[error("Password length must be greater than zero")]
    ZeroLength,
}

/// Build a password of `length` symbols drawn uniformly from `classes`
pub fn generate<R: Rng + ?Sized>(
    length: usize,
    classes: &[CharClass],
    rng: &mut R,
) -> Result<String, PasswordError> {
    if length == 0 {
        return Err(PasswordError::ZeroLength);
    }

    let mut alphabet: Vec<&'static str> = Vec::new();
    for class in CharClass::ALL.iter().filter(|c| classes.contains(c)) {
        alphabet.extend(class.symbols());
    }
    if alphabet.is_empty() {
        return Err(PasswordError::NoClasses);
    }

    Ok((0..length)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_class_sizes() {
        assert_eq!(CharClass::Letters.symbols().len(), 52);
        assert_eq!(CharClass::Numbers.symbols().len(), 10);
        assert_eq!(CharClass::Symbols.symbols().len(), 31);
        assert!(CharClass::Extended.symbols().contains(&"❤️"));
    }

    #[test]
    fn test_numbers_only() {
        let mut rng = StdRng::seed_from_u64(7);
        let password = generate(16, &[CharClass::Numbers], &mut rng).unwrap();
        assert_eq!(password.chars().count(), 16);
        assert!(password.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_letters_and_symbols_stay_in_alphabet() {
        let mut rng = StdRng::seed_from_u64(42);
        let password = generate(64, &[CharClass::Letters, CharClass::Symbols], &mut rng).unwrap();
        assert!(password
            .chars()
            .all(|c| c.is_ascii_alphabetic() || SYMBOLS.contains(c)));
    }

    #[test]
    fn test_same_seed_same_password() {
        let a = generate(20, &CharClass::ALL, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = generate(20, &CharClass::ALL, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_input() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(generate(8, &[], &mut rng), Err(PasswordError::NoClasses));
        assert_eq!(
            generate(0, &[CharClass::Letters], &mut rng),
            Err(PasswordError::ZeroLength)
        );
    }
}
