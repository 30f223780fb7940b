use serde::{Deserialize, Serialize};

use crate::{Symbol, ValidationError};

/// Static display metadata for one dashboard instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentMeta {
    pub symbol: Symbol,
    pub name: String,
    /// ISIN or WKN shown next to the name.
    pub identifier: String,
}

impl InstrumentMeta {
    pub fn new(
        symbol: Symbol,
        name: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(ValidationError::EmptyInstrumentName {
                symbol: symbol.to_string(),
            });
        }

        Ok(Self {
            symbol,
            name,
            identifier: identifier.into().trim().to_owned(),
        })
    }
}
