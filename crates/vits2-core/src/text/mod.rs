//! Text frontend: cleaners, symbol table and sequence codec

mod cleaners;
mod sequence;
mod symbols;

pub use cleaners::{
    basic_cleaners, collapse_whitespace, convert_to_ascii, english_cleaners,
    expand_abbreviations, expand_numbers, lowercase, number_to_words, ordinal_to_words,
    transliteration_cleaners, BuiltinCleaner, CleanerChain, CleanerFn, CleanerRegistry,
};
pub use sequence::{
    decode, encode, encode_cleaned, encode_raw, intersperse, text_to_sequence, DropPolicy,
    Encoded,
};
pub use symbols::{SymbolId, SymbolTable};
