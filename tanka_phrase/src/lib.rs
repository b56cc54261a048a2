//! Collapses a morpheme sequence into bunsetsu-like phrases: the natural
//! boundary unit between the ku of a tanka.

use tanka_tokenise::Morpheme;
use tracing::instrument;

/// A contiguous group of morphemes forming one candidate boundary unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Phrase {
    pub surface: String,
    pub mora_count: u32,
    /// May this phrase begin a tanka? Implies the phrase is not dependent.
    pub can_start: bool,
    /// Does this phrase begin a sentence (predecessor ended in 。, or it is
    /// the first phrase of the document)?
    pub sentence_top: bool,
    /// True only if every morpheme the phrase contains is noun-or-symbol.
    pub noun_or_symbol: bool,
}

/// Segment a morpheme sequence into phrases, in a single left-to-right
/// pass over an in-flight phrase accumulator.
#[instrument(skip_all, level = "trace")]
pub fn segment_by_phrase(morphemes: &[Morpheme]) -> Vec<Phrase> {
    let mut phrases = Vec::new();
    let mut current = Phrase::default();
    let mut prev_was_prefix = false;

    for m in morphemes {
        if !m.divisible || prev_was_prefix {
            current.surface.push_str(&m.surface);
            current.mora_count += m.mora_count;
            if prev_was_prefix {
                current.can_start = !m.dependent;
            }
            // This AND is immediately overwritten below. The source's
            // documented behavior is that the *last* morpheme's flag wins;
            // downstream poetry acceptance empirically relies on it, so it
            // is preserved rather than "fixed".
            current.noun_or_symbol = current.noun_or_symbol && m.noun_or_symbol;
            current.noun_or_symbol = m.noun_or_symbol;
        } else {
            let sentence_top_for_next = current.surface.ends_with('。');
            phrases.push(std::mem::take(&mut current));
            current = Phrase {
                surface: m.surface.clone(),
                mora_count: m.mora_count,
                can_start: !m.dependent,
                sentence_top: sentence_top_for_next,
                noun_or_symbol: m.noun_or_symbol,
            };
        }
        prev_was_prefix = m.prefix;
    }
    phrases.push(current);

    if phrases.first().is_some_and(|p| p.surface.is_empty()) {
        phrases.remove(0);
    }
    if let Some(first) = phrases.first_mut() {
        first.sentence_top = true;
    }

    phrases
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tanka_tokenise::Morpheme;

    use super::*;

    fn m(surface: &str, mora_count: u32, dependent: bool, divisible: bool, prefix: bool, noun: bool) -> Morpheme {
        Morpheme {
            surface: surface.to_owned(),
            mora_count,
            dependent,
            divisible,
            prefix,
            noun_or_symbol: noun,
        }
    }

    #[test]
    fn empty_input_yields_one_empty_phrase_then_drops_it() {
        assert_eq!(segment_by_phrase(&[]), vec![]);
    }

    #[test]
    fn particle_attaches_to_preceding_content_word() {
        let nodes = vec![
            m("田子", 2, false, true, false, true),
            m("の", 1, true, false, false, false),
        ];
        let phrases = segment_by_phrase(&nodes);
        assert_eq!(phrases.len(), 1);
        assert_eq!(phrases[0].surface, "田子の");
        assert_eq!(phrases[0].mora_count, 3);
        assert!(phrases[0].can_start);
    }

    #[test]
    fn divisible_morpheme_opens_a_new_phrase() {
        let nodes = vec![
            m("富士", 2, false, true, false, true),
            m("山", 2, false, true, false, true),
        ];
        let phrases = segment_by_phrase(&nodes);
        assert_eq!(phrases.len(), 2);
        assert_eq!(phrases[0].surface, "富士");
        assert_eq!(phrases[1].surface, "山");
    }

    #[test]
    fn prefix_fuses_into_the_following_morpheme_regardless_of_divisible() {
        let nodes = vec![
            m("お", 0, false, true, true, false),
            m("酒", 2, false, true, false, true),
        ];
        let phrases = segment_by_phrase(&nodes);
        assert_eq!(phrases.len(), 1);
        assert_eq!(phrases[0].surface, "お酒");
        assert!(phrases[0].can_start);
    }

    #[test]
    fn first_phrase_is_always_sentence_top() {
        let nodes = vec![m("富士", 2, true, true, false, true)];
        let phrases = segment_by_phrase(&nodes);
        assert!(phrases[0].sentence_top);
    }

    #[test]
    fn sentence_boundary_propagates_to_the_next_phrase() {
        let nodes = vec![
            m("富士", 2, false, true, false, true),
            m("。", 0, true, false, false, true),
            m("山", 2, false, true, false, true),
        ];
        let phrases = segment_by_phrase(&nodes);
        assert_eq!(phrases.len(), 2);
        assert_eq!(phrases[0].surface, "富士。");
        assert_eq!(phrases[1].surface, "山");
        assert!(phrases[1].sentence_top);
    }
}
