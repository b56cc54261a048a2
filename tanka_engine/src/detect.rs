use tanka_phrase::Phrase;

/// The five ku rules: the delimiter that precedes each ku, and its target
/// mora count. Concatenating delimiter+ku for all five reproduces the
/// `ku1 ku2 ku3\nku4 ku5` layout.
const KU_RULES: [(&str, u32); 5] = [("", 5), (" ", 7), (" ", 5), ("\n", 7), (" ", 7)];

/// Greedily consume phrases from the front of `phrases`, summing mora
/// until the running total reaches `target` exactly on a phrase boundary.
///
/// Returns the concatenated surfaces, whether every consumed phrase was
/// noun-or-symbol, and the unconsumed remainder. `None` if the sum
/// overshoots `target` or the phrases run out first.
fn find_ku<'a>(phrases: &'a [Phrase], target: u32) -> Option<(String, bool, &'a [Phrase])> {
    if phrases.is_empty() {
        return None;
    }
    let mut morae = 0u32;
    let mut ku = String::new();
    let mut noun_only = true;
    let mut remainder = phrases;
    while morae < target {
        let head = remainder.first()?;
        morae += head.mora_count;
        if morae > target {
            return None;
        }
        ku.push_str(&head.surface);
        noun_only &= head.noun_or_symbol;
        remainder = &remainder[1..];
        if remainder.is_empty() && morae != target {
            return None;
        }
    }
    Some((ku, noun_only, remainder))
}

/// Attempt to match a 5-7-5-7-7 tanka starting at `phrases[0]`.
///
/// Returns the unwrapped `ku1 ku2 ku3\nku4 ku5` form with interior 。,
/// 「, 」 artifacts stripped per the acceptance rules. The caller wraps a
/// successful match in 『…』 and handles deduplication.
pub fn detect_tanka(phrases: &[Phrase]) -> Option<String> {
    let first = phrases.first()?;
    if !first.can_start {
        return None;
    }

    let mut remaining = phrases;
    let mut tanka = String::new();
    let mut noun_only = true;
    for (delimiter, target) in KU_RULES {
        let (ku, ku_noun_only, rest) = find_ku(remaining, target)?;
        tanka.push_str(delimiter);
        tanka.push_str(&ku);
        noun_only &= ku_noun_only;
        remaining = rest;
    }

    if tanka.matches('「').count() != tanka.matches('」').count() {
        return None;
    }

    let sentence_top_flag = first.sentence_top || tanka.starts_with('「');
    let end_flag = tanka.ends_with('」') || tanka.ends_with('。');

    let tanka = tanka.replace("。」", "").replace('「', "").replace('」', "");

    if !(sentence_top_flag || end_flag || noun_only) {
        return None;
    }

    // A tanka may not cross a sentence break unless it is composed
    // entirely of nominal phrases.
    if !noun_only && !tanka.ends_with('。') && tanka.contains('。') {
        return None;
    }

    Some(tanka.replace('。', ""))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

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
    fn finds_classic_tanka() {
        let phrases = vec![
            p("田子の浦ゆ", 5, true, true, false),
            p("うち出でて見れば", 7, false, false, false),
            p("真白にそ", 5, false, false, false),
            p("富士の高嶺に", 7, false, false, false),
            p("雪は降りける", 7, false, false, false),
        ];
        let tanka = detect_tanka(&phrases).unwrap();
        assert_eq!(
            tanka,
            "田子の浦ゆ うち出でて見れば 真白にそ\n富士の高嶺に 雪は降りける"
        );
    }

    #[test]
    fn fails_when_first_phrase_cannot_start() {
        let phrases = vec![p("の", 1, false, true, false)];
        assert!(detect_tanka(&phrases).is_none());
    }

    #[test]
    fn fails_on_mora_overshoot() {
        let phrases = vec![p("いろはにほへと", 8, true, true, false)];
        assert!(find_ku(&phrases, 5).is_none());
    }

    #[test]
    fn nominal_tanka_accepted_without_sentence_boundary() {
        // Every phrase is noun_or_symbol, the first is not sentence_top, and
        // nothing ends with 」 or 。: only the noun_only acceptance path can
        // let this one through.
        let phrases = vec![
            p("一", 5, true, false, true),
            p("二", 7, false, false, true),
            p("三", 5, false, false, true),
            p("四", 7, false, false, true),
            p("五", 7, false, false, true),
        ];
        let tanka = detect_tanka(&phrases).unwrap();
        assert_eq!(tanka, "一 二 三\n四 五");
    }

    #[test]
    fn bracket_mismatch_is_rejected() {
        let phrases = vec![
            p("「田子の浦ゆ", 5, true, true, false),
            p("うち出でて見れば", 7, false, false, false),
            p("真白にそ", 5, false, false, false),
            p("富士の高嶺に", 7, false, false, false),
            p("雪は降りける", 7, false, false, false),
        ];
        assert!(detect_tanka(&phrases).is_none());
    }
}
