//! Named text cleaners
//!
//! A cleaner is a pure `&str -> String` transform. Cleaners are looked up by
//! name in a [`CleanerRegistry`]; a list of names is resolved into a
//! [`CleanerChain`] up front so that an unknown name fails before any text is
//! touched.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

/// Shared handle to a cleaner function
pub type CleanerFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Cleaners shipped with the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinCleaner {
    /// Lowercase and collapse whitespace; no transliteration
    Basic,
    /// ASCII transliteration, lowercase, collapse whitespace
    Transliteration,
    /// Transliteration plus number and abbreviation expansion
    English,
}

impl BuiltinCleaner {
    pub fn all() -> &'static [BuiltinCleaner] {
        &[
            BuiltinCleaner::Basic,
            BuiltinCleaner::Transliteration,
            BuiltinCleaner::English,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinCleaner::Basic => "basic_cleaners",
            BuiltinCleaner::Transliteration => "transliteration_cleaners",
            BuiltinCleaner::English => "english_cleaners",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.name() == name)
    }

    pub fn clean(&self, text: &str) -> String {
        match self {
            BuiltinCleaner::Basic => basic_cleaners(text),
            BuiltinCleaner::Transliteration => transliteration_cleaners(text),
            BuiltinCleaner::English => english_cleaners(text),
        }
    }

    fn as_fn(self) -> CleanerFn {
        Arc::new(move |text: &str| self.clean(text))
    }
}

impl fmt::Display for BuiltinCleaner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mapping from cleaner name to cleaner function
#[derive(Clone, Default)]
pub struct CleanerRegistry {
    cleaners: HashMap<String, CleanerFn>,
}

impl CleanerRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every [`BuiltinCleaner`] registered under its name
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for cleaner in BuiltinCleaner::all() {
            registry
                .cleaners
                .insert(cleaner.name().to_string(), cleaner.as_fn());
        }
        registry
    }

    /// Register a plug-in cleaner, replacing any previous one with that name
    pub fn register<F>(&mut self, name: impl Into<String>, cleaner: F) -> &mut Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        let name = name.into();
        debug!("Registering cleaner {}", name);
        self.cleaners.insert(name, Arc::new(cleaner));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cleaners.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.cleaners.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn resolve(&self, name: &str) -> Result<CleanerFn> {
        self.cleaners
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownCleaner(name.to_string()))
    }

    /// Resolve every name, failing on the first one that is not registered
    pub fn chain<S: AsRef<str>>(&self, names: &[S]) -> Result<CleanerChain> {
        let mut steps = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            steps.push((name.to_string(), self.resolve(name)?));
        }
        Ok(CleanerChain { steps })
    }

    /// Resolve `names` and run `text` through them left to right
    pub fn apply_chain<S: AsRef<str>>(&self, text: &str, names: &[S]) -> Result<String> {
        Ok(self.chain(names)?.apply(text))
    }
}

impl fmt::Debug for CleanerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleanerRegistry")
            .field("cleaners", &self.names())
            .finish()
    }
}

/// An ordered list of resolved cleaners
#[derive(Clone, Default)]
pub struct CleanerChain {
    steps: Vec<(String, CleanerFn)>,
}

impl CleanerChain {
    pub fn apply(&self, text: &str) -> String {
        let mut text = text.to_string();
        for (_, cleaner) in &self.steps {
            text = cleaner(&text);
        }
        text
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Debug for CleanerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

// Cleaner pipelines

pub fn basic_cleaners(text: &str) -> String {
    collapse_whitespace(&lowercase(text))
}

pub fn transliteration_cleaners(text: &str) -> String {
    collapse_whitespace(&lowercase(&convert_to_ascii(text)))
}

pub fn english_cleaners(text: &str) -> String {
    // Pound amounts go first; the sign does not survive ASCII folding
    let text = expand_pounds(text);
    let text = convert_to_ascii(&text);
    let text = lowercase(&text);
    let text = expand_numbers(&text);
    let text = expand_abbreviations(&text);
    collapse_whitespace(&text)
}

// Building blocks

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

pub fn lowercase(text: &str) -> String {
    text.to_lowercase()
}

/// Replace every whitespace run with a single space
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").into_owned()
}

/// Best-effort ASCII transliteration: typographic punctuation is mapped to
/// its ASCII form, accents are stripped through NFKD decomposition, and
/// anything left outside ASCII is dropped.
pub fn convert_to_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
            continue;
        }
        if let Some(replacement) = ascii_replacement(c) {
            out.push_str(replacement);
            continue;
        }
        out.extend(
            std::iter::once(c)
                .nfkd()
                .filter(|d| !is_combining_mark(*d))
                .filter(char::is_ascii),
        );
    }
    out
}

fn ascii_replacement(c: char) -> Option<&'static str> {
    let s = match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{00AB}' | '\u{00BB}' | '\u{2033}' => "\"",
        '\u{2013}' | '\u{2014}' | '\u{2212}' => "-",
        '\u{2026}' => "...",
        '\u{00A0}' | '\u{2009}' | '\u{202F}' => " ",
        '\u{00DF}' => "ss",
        '\u{00C6}' => "AE",
        '\u{00E6}' => "ae",
        '\u{0152}' => "OE",
        '\u{0153}' => "oe",
        '\u{00D8}' => "O",
        '\u{00F8}' => "o",
        '\u{0141}' => "L",
        '\u{0142}' => "l",
        '\u{00D0}' => "D",
        '\u{00F0}' => "d",
        '\u{00DE}' => "Th",
        '\u{00FE}' => "th",
        _ => return None,
    };
    Some(s)
}

static ABBREVIATIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        ("mrs", "misess"),
        ("mr", "mister"),
        ("dr", "doctor"),
        ("st", "saint"),
        ("co", "company"),
        ("jr", "junior"),
        ("maj", "major"),
        ("gen", "general"),
        ("drs", "doctors"),
        ("rev", "reverend"),
        ("lt", "lieutenant"),
        ("hon", "honorable"),
        ("sgt", "sergeant"),
        ("capt", "captain"),
        ("esq", "esquire"),
        ("ltd", "limited"),
        ("col", "colonel"),
        ("ft", "fort"),
    ]
    .into_iter()
    .map(|(abbr, full)| {
        let re = Regex::new(&format!(r"(?i)\b{}\.", abbr)).unwrap();
        (re, full)
    })
    .collect()
});

/// Expand common title and address abbreviations ("dr." -> "doctor")
pub fn expand_abbreviations(text: &str) -> String {
    let mut text = text.to_string();
    for (re, full) in ABBREVIATIONS.iter() {
        text = re.replace_all(&text, *full).into_owned();
    }
    text
}

static COMMA_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9][0-9,]+[0-9])").unwrap());
static POUNDS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"£([0-9,]*[0-9]+)").unwrap());
static DOLLARS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$([0-9.,]*[0-9]+)").unwrap());
static DECIMAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9]+)\.([0-9]+)").unwrap());
static ORDINAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+(st|nd|rd|th)").unwrap());
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

/// Spell out numbers, currency amounts, decimals and ordinals
pub fn expand_numbers(text: &str) -> String {
    let text = COMMA_NUMBER_RE.replace_all(text, |c: &Captures| c[1].replace(',', ""));
    let text = expand_pounds(&text);
    let text = DOLLARS_RE.replace_all(&text, |c: &Captures| expand_dollars(&c[1]));
    let text = DECIMAL_RE.replace_all(&text, |c: &Captures| expand_decimal(&c[1], &c[2]));
    let text = ORDINAL_RE.replace_all(&text, |c: &Captures| expand_ordinal(&c[0]));
    let text = NUMBER_RE.replace_all(&text, |c: &Captures| expand_number(&c[0]));
    text.into_owned()
}

fn expand_pounds(text: &str) -> String {
    POUNDS_RE.replace_all(text, "$1 pounds").into_owned()
}

fn expand_dollars(amount: &str) -> String {
    let amount = amount.replace(',', "");
    let parse = |part: Option<&str>| match part {
        None | Some("") => Some(0u64),
        Some(digits) => digits.parse().ok(),
    };
    let mut parts = amount.split('.');
    let dollars = parse(parts.next());
    let cents = parse(parts.next());

    // Unusual formats and amounts past u64 are left as digits for the
    // number pass
    let (Some(dollars), Some(cents), None) = (dollars, cents, parts.next()) else {
        return format!("{} dollars", amount);
    };

    let unit = |n: u64, one: &str, many: &str| {
        format!("{} {}", n, if n == 1 { one } else { many })
    };
    match (dollars, cents) {
        (0, 0) => "zero dollars".to_string(),
        (d, 0) => unit(d, "dollar", "dollars"),
        (0, c) => unit(c, "cent", "cents"),
        (d, c) => format!("{}, {}", unit(d, "dollar", "dollars"), unit(c, "cent", "cents")),
    }
}

fn expand_decimal(whole: &str, fraction: &str) -> String {
    format!("{} point {}", whole, fraction)
}

fn expand_ordinal(token: &str) -> String {
    let digits = token.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    match digits.parse::<u64>() {
        Ok(n) => ordinal_to_words(n),
        Err(_) => token.to_string(),
    }
}

fn expand_number(token: &str) -> String {
    let Ok(n) = token.parse::<u64>() else {
        // Too long for u64: read digit by digit
        return token
            .chars()
            .filter_map(|c| c.to_digit(10))
            .map(|d| ONES[d as usize].to_string())
            .map(|w| if w.is_empty() { "zero".to_string() } else { w })
            .collect::<Vec<_>>()
            .join(" ");
    };

    if n > 1000 && n < 3000 {
        if n == 2000 {
            "two thousand".to_string()
        } else if n > 2000 && n < 2010 {
            format!("two thousand {}", number_to_words(n % 100))
        } else if n % 100 == 0 {
            format!("{} hundred", number_to_words(n / 100))
        } else {
            let tail = n % 100;
            let tail = if tail < 10 {
                format!("oh {}", number_to_words(tail))
            } else {
                number_to_words(tail)
            };
            format!("{} {}", number_to_words(n / 100), tail)
        }
    } else {
        number_to_words(n)
    }
}

const ONES: [&str; 20] = [
    "", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: [(u64, &str); 6] = [
    (1_000_000_000_000_000_000, "quintillion"),
    (1_000_000_000_000_000, "quadrillion"),
    (1_000_000_000_000, "trillion"),
    (1_000_000_000, "billion"),
    (1_000_000, "million"),
    (1_000, "thousand"),
];

/// Cardinal number in English words ("twenty-one", "one hundred five")
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return "zero".to_string();
    }
    spell(n)
}

fn spell(n: u64) -> String {
    if n < 20 {
        return ONES[n as usize].to_string();
    }
    if n < 100 {
        let tens = TENS[(n / 10) as usize];
        return match n % 10 {
            0 => tens.to_string(),
            ones => format!("{}-{}", tens, ONES[ones as usize]),
        };
    }
    if n < 1000 {
        let hundreds = format!("{} hundred", ONES[(n / 100) as usize]);
        return match n % 100 {
            0 => hundreds,
            rest => format!("{} {}", hundreds, spell(rest)),
        };
    }
    for (scale, name) in SCALES {
        if n >= scale {
            let high = format!("{} {}", spell(n / scale), name);
            return match n % scale {
                0 => high,
                rest => format!("{} {}", high, spell(rest)),
            };
        }
    }
    unreachable!("every n >= 1000 matches a scale")
}

/// Ordinal number in English words ("twenty-first")
pub fn ordinal_to_words(n: u64) -> String {
    let cardinal = number_to_words(n);
    let split = cardinal
        .rfind(|c: char| c == ' ' || c == '-')
        .map(|i| i + 1)
        .unwrap_or(0);
    let (head, last) = cardinal.split_at(split);

    let last = match last {
        "one" => "first".to_string(),
        "two" => "second".to_string(),
        "three" => "third".to_string(),
        "five" => "fifth".to_string(),
        "eight" => "eighth".to_string(),
        "nine" => "ninth".to_string(),
        "twelve" => "twelfth".to_string(),
        w if w.ends_with('y') => format!("{}ieth", &w[..w.len() - 1]),
        w => format!("{}th", w),
    };
    format!("{}{}", head, last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_resolve() {
        let registry = CleanerRegistry::with_builtins();
        for cleaner in BuiltinCleaner::all() {
            assert!(registry.contains(cleaner.name()));
            assert_eq!(BuiltinCleaner::from_name(cleaner.name()), Some(*cleaner));
        }
        assert_eq!(
            registry.names(),
            vec!["basic_cleaners", "english_cleaners", "transliteration_cleaners"]
        );
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = CleanerRegistry::with_builtins();
        let err = registry.resolve("klingon_cleaners").err().unwrap();
        assert!(matches!(err, Error::UnknownCleaner(ref name) if name == "klingon_cleaners"));
        assert_eq!(err.to_string(), "Unknown cleaner: klingon_cleaners");
    }

    #[test]
    fn test_chain_applies_left_to_right() {
        let mut registry = CleanerRegistry::new();
        registry
            .register("append_a", |t: &str| format!("{t}a"))
            .register("append_b", |t: &str| format!("{t}b"));

        assert_eq!(registry.apply_chain("x", &["append_a", "append_b"]).unwrap(), "xab");
        assert_eq!(registry.apply_chain("x", &["append_b", "append_a"]).unwrap(), "xba");
        assert_eq!(registry.apply_chain::<&str>("x", &[]).unwrap(), "x");
    }

    #[test]
    fn test_unknown_name_fails_before_any_cleaner_runs() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut registry = CleanerRegistry::new();
        registry.register("count", move |t: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            t.to_string()
        });

        let err = registry
            .apply_chain("text", &["count", "missing", "also_missing"])
            .unwrap_err();
        assert!(matches!(err, Error::UnknownCleaner(ref name) if name == "missing"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = CleanerRegistry::with_builtins();
        registry.register("basic_cleaners", |t: &str| t.to_uppercase());
        assert_eq!(registry.apply_chain("abc", &["basic_cleaners"]).unwrap(), "ABC");
    }

    #[test]
    fn test_chain_debug_lists_names() {
        let registry = CleanerRegistry::with_builtins();
        let chain = registry.chain(&["basic_cleaners", "english_cleaners"]).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(format!("{chain:?}"), r#"["basic_cleaners", "english_cleaners"]"#);
    }

    #[test]
    fn test_basic_cleaners() {
        assert_eq!(basic_cleaners("Hello   World\t\nAgain"), "hello world again");
        assert_eq!(basic_cleaners("Ça va"), "ça va");
    }

    #[test]
    fn test_transliteration_cleaners() {
        assert_eq!(transliteration_cleaners("Ça  va, Zoë?"), "ca va, zoe?");
        assert_eq!(transliteration_cleaners("\u{201C}Straße\u{201D}"), "\"strasse\"");
    }

    #[test]
    fn test_english_cleaners() {
        assert_eq!(
            english_cleaners("Dr. Smith paid $3.50 on the 2nd of May, 1999."),
            "doctor smith paid three dollars, fifty cents on the second of may, nineteen ninety-nine."
        );
        assert_eq!(
            english_cleaners("Mr.  Jones has 1,200 cats"),
            "mister jones has twelve hundred cats"
        );
    }

    #[test]
    fn test_english_cleaners_pounds() {
        assert_eq!(english_cleaners("It cost £20"), "it cost twenty pounds");
        assert_eq!(english_cleaners("£1,500 or £3"), "fifteen hundred pounds or three pounds");
    }

    #[test]
    fn test_dollar_amount_past_u64() {
        let nines = vec!["nine"; 20].join(" ");
        assert_eq!(
            expand_numbers("$99999999999999999999"),
            format!("{} dollars", nines)
        );
        assert_eq!(expand_numbers("$.50"), "fifty cents");
    }

    #[test]
    fn test_number_to_words() {
        assert_eq!(number_to_words(0), "zero");
        assert_eq!(number_to_words(7), "seven");
        assert_eq!(number_to_words(21), "twenty-one");
        assert_eq!(number_to_words(105), "one hundred five");
        assert_eq!(number_to_words(1_000_001), "one million one");
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(ordinal_to_words(1), "first");
        assert_eq!(ordinal_to_words(12), "twelfth");
        assert_eq!(ordinal_to_words(20), "twentieth");
        assert_eq!(ordinal_to_words(21), "twenty-first");
        assert_eq!(ordinal_to_words(103), "one hundred third");
    }

    #[test]
    fn test_expand_numbers() {
        assert_eq!(expand_numbers("2000"), "two thousand");
        assert_eq!(expand_numbers("2005"), "two thousand five");
        assert_eq!(expand_numbers("1900"), "nineteen hundred");
        assert_eq!(expand_numbers("1905"), "nineteen oh five");
        assert_eq!(expand_numbers("3.14"), "three point fourteen");
        assert_eq!(expand_numbers("£20"), "twenty pounds");
        assert_eq!(expand_numbers("$1"), "one dollar");
        assert_eq!(expand_numbers("$0.01"), "one cent");
    }

    #[test]
    fn test_expand_abbreviations() {
        assert_eq!(expand_abbreviations("mrs. and mr. dr."), "misess and mister doctor");
        assert_eq!(expand_abbreviations("drs. said"), "doctors said");
        assert_eq!(expand_abbreviations("street"), "street");
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CleanerRegistry>();
        assert_send_sync::<CleanerChain>();
    }
}
