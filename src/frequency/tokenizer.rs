//! Per-file letter counting.

use unicode_general_category::{GeneralCategory, get_general_category};

use super::FrequencyMap;

/// Counts the letters in one file's raw content.
///
/// Content is decoded as UTF-8 on a best-effort basis: invalid sequences
/// become U+FFFD, which is not a letter, so undecodable bytes contribute
/// nothing instead of failing the file. Digits, punctuation, whitespace,
/// letter-like numerals and combining marks are ignored.
///
/// # Example
///
/// ```
/// use letterfreq_core::frequency::tokenize;
///
/// let counts = tokenize(b"aAbb!");
/// assert_eq!(counts.get('a'), 2);
/// assert_eq!(counts.get('b'), 2);
/// assert_eq!(counts.total(), 4);
/// ```
#[must_use]
pub fn tokenize(bytes: &[u8]) -> FrequencyMap {
    let text = String::from_utf8_lossy(bytes);
    let mut counts = FrequencyMap::new();
    for c in text.chars().filter(|&c| is_letter(c)) {
        counts.add(fold_case(c), 1);
    }
    counts
}

/// Returns true for characters in a Unicode letter category
/// (Lu, Ll, Lt, Lm, Lo).
#[must_use]
pub fn is_letter(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

/// Simple one-to-one lowercase mapping.
///
/// Only `'İ'` has a multi-character full lowercase (`i` plus a combining
/// dot); its simple mapping is the leading `'i'`.
#[must_use]
pub fn fold_case(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}
