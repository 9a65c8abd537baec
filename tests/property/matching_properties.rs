use proptest::prelude::*;
use qa_finder::corpus::Corpus;
use qa_finder::matcher::Matcher;
use qa_finder::parse::{extract_pairs, QaPair};
use qa_finder::similarity::{normalize, ratio};

const TEXT: &str = "[a-zA-Zа-яА-ЯёЁ0-9 '\t\n.,:=?-]{0,40}";

proptest! {
    #[test]
    fn normalize_is_idempotent(s in TEXT) {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalized_text_has_no_apostrophes_or_edge_spaces(s in TEXT) {
        let n = normalize(&s);
        prop_assert!(!n.contains('\''));
        prop_assert!(!n.contains("  "));
        prop_assert_eq!(n.trim(), n.as_str());
    }

    #[test]
    fn ratio_is_bounded(a in TEXT, b in TEXT) {
        let r = ratio(&a, &b);
        prop_assert!((0.0..=1.0).contains(&r), "ratio out of range: {}", r);
    }

    #[test]
    fn ratio_with_itself_is_one(s in "[a-zа-я0-9 ]{1,40}") {
        prop_assert_eq!(ratio(&s, &s), 1.0);
    }

    #[test]
    fn below_threshold_is_never_found(
        questions in proptest::collection::vec("[a-z]{1,12}", 1..6),
        query in "[0-9]{1,12}",
    ) {
        // Digits never occur in the letter-only questions, so every score is 0.
        let pairs = questions.iter().map(|q| QaPair::new(q.clone(), "answer")).collect();
        let matcher = Matcher::with_default_threshold(Corpus::from_pairs(pairs));
        prop_assert!(!matcher.answer(&query).is_found());
    }

    #[test]
    fn extracted_questions_are_never_blank(lines in proptest::collection::vec(TEXT, 0..12)) {
        let lines: Vec<String> = lines.into_iter().map(|l| l.trim().to_string()).filter(|l| !l.is_empty()).collect();
        for pair in extract_pairs(&lines) {
            prop_assert!(!pair.question.trim().is_empty());
        }
    }
}
