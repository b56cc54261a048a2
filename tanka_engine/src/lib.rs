//! The tanka extraction engine: turns arbitrary text into zero or more
//! validated 5-7-5-7-7 tanka, wrapped and deduplicated.

mod detect;

use std::collections::HashSet;

use tanka_ja_utils::is_japanese;
use tanka_phrase::{segment_by_phrase, Phrase};
use tanka_tokenise::{tokenise, AnalyzerPool};
use tracing::{debug, instrument};

pub use crate::detect::detect_tanka;

/// Turn `text` into the ordered, deduplicated list of tanka it contains.
///
/// Short-circuits to an empty list for non-Japanese input (no hiragana
/// or katakana at all) without paying for a tokenizer round trip. Within one
/// call, output order is the order of the starting phrase position;
/// across concurrent calls there is no ordering guarantee.
#[instrument(skip(text, pool), level = "debug")]
pub async fn extract_tanka(text: &str, pool: &AnalyzerPool) -> Vec<String> {
    if !is_japanese(text) {
        return Vec::new();
    }

    let morphemes = tokenise(text, pool).await;
    let phrases = segment_by_phrase(&morphemes);
    let found = find_all_tanka(&phrases);
    debug!(count = found.len(), "finished scanning for tanka");
    found
}

/// Scan every starting position in `phrases` for a tanka, wrapping and
/// deduplicating matches in start-position order. Split out of
/// `extract_tanka` so it can be driven directly off a `Phrase` fixture in
/// tests, without a `mecab` subprocess round trip.
fn find_all_tanka(phrases: &[Phrase]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();
    for i in 0..phrases.len() {
        let Some(tanka) = detect_tanka(&phrases[i..]) else {
            continue;
        };
        let wrapped = format!("『{tanka}』");
        if seen.insert(wrapped.clone()) {
            found.push(wrapped);
        }
    }
    found
}

/// Join discovered tanka the way a reply or a harvested-candidate digest
/// presents multiple finds in one message.
pub fn join_for_reply(tankas: &[String]) -> String {
    tankas.join("\n\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tanka_tokenise::AnalyzerPool;

    use super::*;

    #[tokio::test]
    async fn empty_input_yields_no_tanka() {
        let pool = AnalyzerPool::new(1);
        assert_eq!(extract_tanka("", &pool).await, Vec::<String>::new());
    }

    #[tokio::test]
    async fn pure_ascii_yields_no_tanka() {
        let pool = AnalyzerPool::new(1);
        assert_eq!(
            extract_tanka("hello world", &pool).await,
            Vec::<String>::new()
        );
    }

    #[test]
    fn join_for_reply_separates_with_blank_line() {
        let tankas = vec!["『a』".to_owned(), "『b』".to_owned()];
        assert_eq!(join_for_reply(&tankas), "『a』\n\n『b』");
    }

    fn p(surface: &str, mora: u32, can_start: bool, sentence_top: bool, noun: bool) -> Phrase {
        Phrase {
            surface: surface.to_owned(),
            mora_count: mora,
            can_start,
            sentence_top,
            noun_or_symbol: noun,
        }
    }

    #[test]
    fn finds_two_distinct_tankas_at_different_start_positions_in_order() {
        // Two complete 5-phrase tanka back to back, each composed entirely
        // of noun_or_symbol phrases so neither needs a sentence boundary to
        // be accepted. The scan over every starting position must surface
        // both, in the order their start positions occur.
        let phrases = vec![
            p("一", 5, true, true, true),
            p("二", 7, false, false, true),
            p("三", 5, false, false, true),
            p("四", 7, false, false, true),
            p("五", 7, false, false, true),
            p("六", 5, true, true, true),
            p("七", 7, false, false, true),
            p("八", 5, false, false, true),
            p("九", 7, false, false, true),
            p("十", 7, false, false, true),
        ];
        let found = find_all_tanka(&phrases);
        assert_eq!(
            found,
            vec![
                "『一 二 三\n四 五』".to_owned(),
                "『六 七 八\n九 十』".to_owned(),
            ]
        );
    }

    #[test]
    fn identical_matches_from_different_starts_are_deduped() {
        // Phrases 5-9 repeat phrases 0-4 verbatim, so the scan finds the
        // same tanka text starting at both position 0 and position 5; the
        // second occurrence must be dropped rather than appearing twice.
        let phrases = vec![
            p("一", 5, true, true, true),
            p("二", 7, false, false, true),
            p("三", 5, false, false, true),
            p("四", 7, false, false, true),
            p("五", 7, false, false, true),
            p("一", 5, true, true, true),
            p("二", 7, false, false, true),
            p("三", 5, false, false, true),
            p("四", 7, false, false, true),
            p("五", 7, false, false, true),
        ];
        let found = find_all_tanka(&phrases);
        assert_eq!(found, vec!["『一 二 三\n四 五』".to_owned()]);
    }
}
