//! Symbol table: bijection between symbols and contiguous integer ids

use std::collections::HashMap;

use crate::config::SymbolConfig;
use crate::error::{Error, Result};

/// Integer id of a symbol, in the width the model consumes
pub type SymbolId = i64;

/// Immutable symbol <-> id mapping. The id of a symbol is its position in
/// the ordered list the table was built from.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<String>,
    ids: HashMap<String, SymbolId>,
}

impl SymbolTable {
    /// Build from symbols in id order. The first symbol is the pad and may
    /// be any token; every other symbol must be a single character, since
    /// text is encoded one character at a time. Repeated symbols are rejected.
    pub fn build<I, S>(ordered_symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut symbols = Vec::new();
        let mut ids = HashMap::new();

        for (position, symbol) in ordered_symbols.into_iter().enumerate() {
            let symbol = symbol.into();
            if position > 0 && symbol.chars().count() != 1 {
                return Err(Error::ConfigError(format!(
                    "Symbol {:?} at position {} must be a single character",
                    symbol, position
                )));
            }
            if let Some(&first) = ids.get(&symbol) {
                return Err(Error::DuplicateSymbol {
                    symbol,
                    first: first as usize,
                    position,
                });
            }
            ids.insert(symbol.clone(), position as SymbolId);
            symbols.push(symbol);
        }

        Ok(Self { symbols, ids })
    }

    /// Build `[pad] + punctuation + characters`
    pub fn from_config(config: &SymbolConfig) -> Result<Self> {
        Self::build(config.ordered())
    }

    pub fn id_of(&self, symbol: &str) -> Result<SymbolId> {
        self.ids
            .get(symbol)
            .copied()
            .ok_or_else(|| Error::UnknownSymbol(symbol.to_string()))
    }

    pub fn symbol_of(&self, id: SymbolId) -> Result<&str> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.symbols.get(i))
            .map(String::as_str)
            .ok_or(Error::InvalidId {
                id,
                size: self.symbols.len(),
            })
    }

    /// Id of a single-character symbol, if configured
    pub fn char_id(&self, c: char) -> Option<SymbolId> {
        let mut buf = [0u8; 4];
        self.ids.get(&*c.encode_utf8(&mut buf)).copied()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.ids.contains_key(symbol)
    }

    /// Id of the pad symbol, which always comes first
    pub fn pad_id(&self) -> Option<SymbolId> {
        if self.symbols.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in id order
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> SymbolTable {
        SymbolTable::from_config(&SymbolConfig::new("_", vec![",", "."].into(), "abc".into()))
            .unwrap()
    }

    #[test]
    fn test_ids_follow_config_order() {
        let table = sample_table();
        assert_eq!(table.len(), 6);
        for (symbol, id) in [("_", 0), (",", 1), (".", 2), ("a", 3), ("b", 4), ("c", 5)] {
            assert_eq!(table.id_of(symbol).unwrap(), id);
        }
        assert_eq!(table.pad_id(), Some(0));
    }

    #[test]
    fn test_bijection() {
        let table = SymbolTable::build(["<pad>", " ", "ə", "ʃ", "ç", "x"]).unwrap();
        for symbol in table.symbols() {
            let id = table.id_of(symbol).unwrap();
            assert_eq!(table.symbol_of(id).unwrap(), symbol);
        }
        for id in 0..table.len() as SymbolId {
            let symbol = table.symbol_of(id).unwrap();
            assert_eq!(table.id_of(symbol).unwrap(), id);
        }
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let err = SymbolTable::build(["_", "a", "b", "a"]).unwrap_err();
        match err {
            Error::DuplicateSymbol {
                symbol,
                first,
                position,
            } => {
                assert_eq!(symbol, "a");
                assert_eq!(first, 1);
                assert_eq!(position, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_across_groups_rejected() {
        let config = SymbolConfig::new("_", ".,".into(), "ab.".into());
        assert!(matches!(
            SymbolTable::from_config(&config),
            Err(Error::DuplicateSymbol { .. })
        ));
    }

    #[test]
    fn test_unknown_symbol() {
        let table = sample_table();
        assert!(matches!(table.id_of("z"), Err(Error::UnknownSymbol(s)) if s == "z"));
        assert!(!table.contains("z"));
    }

    #[test]
    fn test_invalid_ids() {
        let table = sample_table();
        assert!(matches!(table.symbol_of(6), Err(Error::InvalidId { id: 6, size: 6 })));
        assert!(matches!(table.symbol_of(-1), Err(Error::InvalidId { id: -1, .. })));
    }

    #[test]
    fn test_multichar_symbols_rejected() {
        let config = SymbolConfig::new("_", vec!["."].into(), vec!["a", "ch"].into());
        let err = SymbolTable::from_config(&config).unwrap_err();
        assert!(
            matches!(err, Error::ConfigError(ref msg) if msg.contains("\"ch\" at position 3")),
            "got {err:?}"
        );

        assert!(SymbolTable::build(["_", ""]).is_err());
    }

    #[test]
    fn test_multichar_pad_allowed() {
        let table = SymbolTable::build(["<pad>", "a"]).unwrap();
        assert_eq!(table.pad_id(), Some(0));
        assert_eq!(table.char_id('a'), Some(1));
        assert_eq!(table.char_id('<'), None);
    }

    #[test]
    fn test_empty_table() {
        let table = SymbolTable::build(Vec::<String>::new()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.pad_id(), None);
    }
}
