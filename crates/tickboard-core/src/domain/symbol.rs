use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 15;

/// Normalized exchange ticker, e.g. `EUNL.DE` or `4GLD.DE`.
///
/// Exchange-listed fund tickers may start with a digit, so only the
/// character set is checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse and normalize a symbol to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let len = normalized.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        for (index, ch) in normalized.chars().enumerate() {
            let valid = ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '^' | '=');
            if !valid {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_symbol() {
        let parsed = Symbol::parse(" eunl.de ").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "EUNL.DE");
    }

    #[test]
    fn accepts_leading_digit() {
        let parsed = Symbol::parse("4gld.de").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "4GLD.DE");
    }

    #[test]
    fn rejects_invalid_chars() {
        let err = Symbol::parse("EUNL$").expect_err("must fail");
        assert!(matches!(err, ValidationError::SymbolInvalidChar { ch: '$', index: 4 }));
    }

    #[test]
    fn rejects_empty_and_long_symbols() {
        assert!(matches!(
            Symbol::parse("   "),
            Err(ValidationError::EmptySymbol)
        ));
        assert!(matches!(
            Symbol::parse("ABCDEFGHIJKLMNOP"),
            Err(ValidationError::SymbolTooLong { len: 16, max: 15 })
        ));
    }
}
