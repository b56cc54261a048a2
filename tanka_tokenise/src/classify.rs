use tanka_ja_utils::{is_katakana, mora_count};

/// One token from the analyzer, classified per the rules below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Morpheme {
    pub surface: String,
    pub mora_count: u32,
    pub dependent: bool,
    pub divisible: bool,
    pub prefix: bool,
    pub noun_or_symbol: bool,
}

const PERIOD_SURFACES: [&str; 8] = ["。", "?", "!", "EOS", ":", ";", "▼", "▲"];
const OPEN_BRACKET_SURFACES: [&str; 4] = ["(", "<", "{", "["];
const CLOSE_BRACKET_SURFACES: [&str; 4] = [")", ">", "}", "]"];
const INDEPENDENT_DEPENDENTS: [&str; 3] = ["もの", "こと", "日"];
const INDEPENDENT_READINGS: [&str; 4] = ["イイ", "ヨイ", "トキ", "トコロ"];
const LEMMA_EXCEPTION_VERBS: [&str; 2] = ["ある", "なる"];
const LEMMA_EXCEPTION_ADJECTIVE: &str = "ない";

/// Parse one line of `surface<TAB>csv-fields` analyzer output into a
/// [`Morpheme`], per the classification table below. Returns `None` for
/// blank lines, comment lines, and anything that falls through to "other".
pub fn classify_line(line: &str) -> Option<Morpheme> {
    if line.is_empty() || line.starts_with(',') {
        return None;
    }

    let (surface, rest) = match line.split_once('\t') {
        Some((surface, rest)) => (surface, rest),
        None => (line, ""),
    };
    let fields: Vec<&str> = std::iter::once(surface).chain(rest.split(',')).collect();

    classify_word(surface, &fields)
        .or_else(|| classify_katakana_token(surface))
        .or_else(|| classify_period(surface))
        .or_else(|| classify_open_bracket(surface, &fields))
        .or_else(|| classify_close_bracket(surface, &fields))
        .or_else(|| classify_ampersand(surface))
        .or_else(|| classify_unknown(surface, &fields))
}

fn classify_word(surface: &str, fields: &[&str]) -> Option<Morpheme> {
    if fields.len() != 10 {
        return None;
    }
    let pos1 = fields[1];
    if pos1 == "記号" {
        return None;
    }
    let pos2 = fields[2];
    let conj_type = fields[5];
    let lemma = fields[7];
    let reading = fields[8];

    let dependent = pos1.contains('助')
        || pos2 == "非自立"
        || pos2 == "接尾"
        || conj_type == "サ変・スル"
        || (pos1 == "動詞" && LEMMA_EXCEPTION_VERBS.contains(&lemma))
        || (pos1 == "形容詞" && lemma == LEMMA_EXCEPTION_ADJECTIVE);

    let divisible = !dependent
        || INDEPENDENT_DEPENDENTS.contains(&surface)
        || pos2 == "副助詞"
        || INDEPENDENT_READINGS.contains(&reading)
        || (conj_type == "サ変・スル" && surface != "し")
        || (pos1 == "動詞" && LEMMA_EXCEPTION_VERBS.contains(&lemma))
        || (pos1 == "形容詞" && lemma == LEMMA_EXCEPTION_ADJECTIVE);

    Some(Morpheme {
        surface: surface.to_owned(),
        mora_count: mora_count(reading),
        dependent,
        divisible,
        prefix: pos1 == "接頭詞",
        noun_or_symbol: matches!(pos1, "名詞" | "連体詞"),
    })
}

fn classify_katakana_token(surface: &str) -> Option<Morpheme> {
    let stripped: String = surface.chars().filter(|&c| c != '・').collect();
    if stripped.is_empty() || !stripped.chars().all(is_katakana) {
        return None;
    }
    Some(Morpheme {
        surface: surface.to_owned(),
        mora_count: mora_count(&stripped),
        dependent: false,
        divisible: true,
        prefix: false,
        noun_or_symbol: false,
    })
}

fn classify_period(surface: &str) -> Option<Morpheme> {
    if !PERIOD_SURFACES.contains(&surface) {
        return None;
    }
    Some(Morpheme {
        surface: "。".to_owned(),
        mora_count: 0,
        dependent: true,
        divisible: false,
        prefix: false,
        noun_or_symbol: true,
    })
}

fn classify_open_bracket(surface: &str, fields: &[&str]) -> Option<Morpheme> {
    let pos2_is_open = fields.get(2) == Some(&"括弧開");
    if !pos2_is_open && !OPEN_BRACKET_SURFACES.contains(&surface) {
        return None;
    }
    Some(Morpheme {
        surface: "「".to_owned(),
        mora_count: 0,
        dependent: false,
        divisible: true,
        prefix: true,
        noun_or_symbol: true,
    })
}

fn classify_close_bracket(surface: &str, fields: &[&str]) -> Option<Morpheme> {
    let pos2_is_close = fields.get(2) == Some(&"括弧閉");
    if !pos2_is_close && !CLOSE_BRACKET_SURFACES.contains(&surface) {
        return None;
    }
    Some(Morpheme {
        surface: "」".to_owned(),
        mora_count: 0,
        dependent: true,
        divisible: false,
        prefix: false,
        noun_or_symbol: true,
    })
}

fn classify_ampersand(surface: &str) -> Option<Morpheme> {
    if surface != "&" {
        return None;
    }
    Some(Morpheme {
        surface: "&".to_owned(),
        mora_count: 3,
        dependent: true,
        divisible: false,
        prefix: false,
        noun_or_symbol: true,
    })
}

fn classify_unknown(surface: &str, fields: &[&str]) -> Option<Morpheme> {
    if fields.len() != 8 || fields.get(1) != Some(&"名詞") {
        return None;
    }
    Some(Morpheme {
        surface: surface.to_owned(),
        // Unknown nouns get a sentinel mora count large enough to overshoot
        // any ku, so they can never complete a match on their own.
        mora_count: 8,
        dependent: false,
        divisible: true,
        prefix: false,
        noun_or_symbol: false,
    })
}

/// Parse the full line-oriented output of one analyzer invocation.
pub fn parse_morphemes(output: &str) -> Vec<Morpheme> {
    output.lines().filter_map(classify_line).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn word_line(
        surface: &str,
        pos1: &str,
        pos2: &str,
        conj_type: &str,
        lemma: &str,
        reading: &str,
    ) -> String {
        format!("{surface}\t{pos1},{pos2},*,*,{conj_type},*,{lemma},{reading},{reading}")
    }

    #[test]
    fn known_noun_is_divisible_and_nominal() {
        let line = word_line("富士", "名詞", "一般", "*", "富士", "フジ");
        let m = classify_line(&line).unwrap();
        assert_eq!(m.surface, "富士");
        assert_eq!(m.mora_count, 2);
        assert!(!m.dependent);
        assert!(m.divisible);
        assert!(m.noun_or_symbol);
    }

    #[test]
    fn particle_is_dependent_and_not_divisible() {
        let line = word_line("は", "助詞", "係助詞", "*", "は", "ハ");
        let m = classify_line(&line).unwrap();
        assert!(m.dependent);
        assert!(!m.divisible);
    }

    #[test]
    fn particle_whitelisted_reading_is_divisible() {
        let line = word_line("とき", "名詞", "非自立", "*", "とき", "トキ");
        let m = classify_line(&line).unwrap();
        assert!(m.dependent);
        assert!(m.divisible);
    }

    #[test]
    fn prefix_is_flagged() {
        let line = word_line("お", "接頭詞", "*", "*", "お", "オ");
        let m = classify_line(&line).unwrap();
        assert!(m.prefix);
    }

    #[test]
    fn symbol_pos_is_skipped_as_word() {
        let line = word_line("、", "記号", "読点", "*", "、", "、");
        assert!(classify_line(&line).is_none());
    }

    #[test]
    fn bare_katakana_token_counts_own_mora() {
        let m = classify_line("タナバタ").unwrap();
        assert_eq!(m.surface, "タナバタ");
        assert_eq!(m.mora_count, 4);
        assert!(m.divisible);
        assert!(!m.dependent);
    }

    #[test]
    fn period_markers_normalize_to_maru() {
        for s in ["。", "?", "EOS", "▼"] {
            let m = classify_line(s).unwrap();
            assert_eq!(m.surface, "。");
            assert_eq!(m.mora_count, 0);
            assert!(m.dependent);
        }
    }

    #[test]
    fn ascii_brackets_normalize_to_kagi() {
        let open = classify_line("(").unwrap();
        assert_eq!(open.surface, "「");
        assert!(open.prefix);

        let close = classify_line(")").unwrap();
        assert_eq!(close.surface, "」");
        assert!(close.dependent);
    }

    #[test]
    fn ampersand_is_three_mora() {
        let m = classify_line("&").unwrap();
        assert_eq!(m.mora_count, 3);
    }

    #[test]
    fn unknown_noun_gets_sentinel_mora_count() {
        let line = "何某\t名詞,一般,*,*,*,*,*";
        let m = classify_line(line).unwrap();
        assert_eq!(m.mora_count, 8);
        assert!(!m.noun_or_symbol);
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert!(classify_line("").is_none());
        assert!(classify_line(",foo,bar").is_none());
    }
}
