//! Mora counting and Japanese character-class predicates shared by the
//! tanka pipeline crates.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

pub const HIRA_START: char = '\u{3041}';
pub const HIRA_END: char = '\u{309F}';
pub const KATA_START: char = '\u{30A1}';
pub const KATA_END: char = '\u{30FF}';

lazy_static! {
    pub static ref ALL_JA_REGEX: Regex =
        Regex::new(r"^[○◯々-〇〻ぁ-ゖゝ-ゞァ-ヺーｦ-ﾝ\p{Radical}\p{Unified_Ideograph}]+$")
            .expect("failed to build character counting regex");
    // Small kana that fuse with the preceding mora (e.g. キャ) instead of
    // contributing one of their own.
    static ref SMALL_KANA: HashSet<char> =
        ['ァ', 'ィ', 'ゥ', 'ェ', 'ォ', 'ャ', 'ュ', 'ョ', 'ヮ'].into_iter().collect();
}

#[inline]
pub fn is_hiragana(c: char) -> bool {
    HIRA_START <= c && c <= HIRA_END
}

#[inline]
pub fn is_katakana(c: char) -> bool {
    KATA_START <= c && c <= KATA_END
}

/// True iff any code point of `text` lies in the Hiragana or Katakana block.
///
/// Cheap pre-filter used by the engine to short-circuit non-Japanese input
/// without paying for a tokenizer round trip.
pub fn is_japanese(text: &str) -> bool {
    text.chars().any(|c| is_hiragana(c) || is_katakana(c))
}

/// Count the mora (phonetic beats) in a katakana reading or surface string.
///
/// Counts Unicode scalar values, then subtracts one for every small kana
/// (palatalized/glide syllable) since those fuse onto the preceding mora
/// rather than contributing one of their own. The long vowel mark `ー` and
/// the sokuon `ッ` each count as a full mora.
pub fn mora_count(reading: &str) -> u32 {
    let total = reading.chars().count() as u32;
    let small = reading.chars().filter(|c| SMALL_KANA.contains(c)).count() as u32;
    total.saturating_sub(small)
}
