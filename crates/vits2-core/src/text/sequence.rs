//! Conversion between text and symbol id sequences

use tracing::warn;

use super::cleaners::{CleanerChain, CleanerRegistry};
use super::symbols::{SymbolId, SymbolTable};
use crate::error::{Error, Result};

/// What to do with characters that have no entry in the symbol table.
/// Both policies drop the character; they differ only in reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropPolicy {
    /// Drop without a trace (raw text, after cleaning)
    Silent,
    /// Drop and emit a warning naming the symbol and the utterance
    #[default]
    Reported,
}

/// Result of encoding one utterance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encoded {
    pub ids: Vec<SymbolId>,
    /// Characters that were dropped, in input order
    pub dropped: Vec<char>,
}

/// Map every character of `text` through `table`
pub fn encode(text: &str, table: &SymbolTable, policy: DropPolicy) -> Encoded {
    let mut encoded = Encoded {
        ids: Vec::with_capacity(text.len()),
        dropped: Vec::new(),
    };

    for c in text.chars() {
        match table.char_id(c) {
            Some(id) => encoded.ids.push(id),
            None => {
                if policy == DropPolicy::Reported {
                    warn!("Undefined symbol {:?} in: {}", c, text);
                }
                encoded.dropped.push(c);
            }
        }
    }

    encoded
}

/// Clean raw text with a resolved chain, then encode it. Characters the
/// cleaners leave behind that are not in the table are dropped silently.
pub fn encode_raw(text: &str, chain: &CleanerChain, table: &SymbolTable) -> Vec<SymbolId> {
    let cleaned = chain.apply(text);
    encode(&cleaned, table, DropPolicy::Silent).ids
}

/// Resolve `cleaner_names` against `registry` and encode raw text. Fails
/// with `UnknownCleaner` before any cleaning happens.
pub fn text_to_sequence<S: AsRef<str>>(
    text: &str,
    cleaner_names: &[S],
    registry: &CleanerRegistry,
    table: &SymbolTable,
) -> Result<Vec<SymbolId>> {
    let chain = registry.chain(cleaner_names)?;
    Ok(encode_raw(text, &chain, table))
}

/// Encode already-cleaned text, reporting every dropped character
pub fn encode_cleaned(cleaned_text: &str, table: &SymbolTable) -> Vec<SymbolId> {
    encode(cleaned_text, table, DropPolicy::Reported).ids
}

/// Concatenate the symbols for `sequence`
pub fn decode(sequence: &[SymbolId], table: &SymbolTable) -> Result<String> {
    let mut text = String::with_capacity(sequence.len());
    for &id in sequence {
        text.push_str(table.symbol_of(id)?);
    }
    Ok(text)
}

/// Put `filler` before, between and after the elements of `sequence`.
/// The result has length `2 * n + 1`.
pub fn intersperse(sequence: &[SymbolId], filler: SymbolId) -> Result<Vec<SymbolId>> {
    if filler < 0 {
        return Err(Error::InvalidFillerId(filler));
    }

    let mut result = vec![filler; sequence.len() * 2 + 1];
    for (i, &id) in sequence.iter().enumerate() {
        result[i * 2 + 1] = id;
    }
    Ok(result)
}
