//! Best-match lookup over the corpus.
//!
//! # Algorithm
//!
//! 1. Normalize the query (see [`normalize`]).
//! 2. For every pair in stored order, normalize its question and compute
//!    [`ratio`] against the query.
//! 3. Keep the pair whose score is strictly greater than the best so far,
//!    so ties go to the earlier pair.
//! 4. The best pair is an answer only if its score is at least the
//!    threshold and its stored answer is non-empty.
//!
//! The scan is linear and holds no mutable state, so one [`Matcher`] can
//! serve any number of concurrent queries behind an `Arc`.

use anyhow::Result;
use serde::Serialize;

use crate::config::Config;
use crate::corpus::{self, Corpus};
use crate::parse::QaPair;
use crate::similarity::{normalize, ratio};

/// Minimum similarity for a match unless configured otherwise.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// The highest-scoring pair for a query, before the threshold is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate<'a> {
    /// Position of the pair in the corpus.
    pub index: usize,
    pub pair: &'a QaPair,
    pub score: f64,
}

/// Outcome of a query.
///
/// Serializes as `{"found": true, "answer": ..}` or `{"found": false}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "AnswerBody")]
pub enum AnswerResult {
    Found {
        answer: String,
        question: String,
        score: f64,
    },
    NotFound {
        /// Best score seen, `0.0` when nothing matched at all.
        best_score: f64,
    },
}

impl AnswerResult {
    pub fn is_found(&self) -> bool {
        matches!(self, AnswerResult::Found { .. })
    }

    pub fn answer(&self) -> Option<&str> {
        match self {
            AnswerResult::Found { answer, .. } => Some(answer),
            AnswerResult::NotFound { .. } => None,
        }
    }
}

#[derive(Serialize)]
struct AnswerBody {
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    question: Option<String>,
    score: f64,
}

impl From<AnswerResult> for AnswerBody {
    fn from(result: AnswerResult) -> Self {
        match result {
            AnswerResult::Found {
                answer,
                question,
                score,
            } => AnswerBody {
                found: true,
                answer: Some(answer),
                question: Some(question),
                score,
            },
            AnswerResult::NotFound { best_score } => AnswerBody {
                found: false,
                answer: None,
                question: None,
                score: best_score,
            },
        }
    }
}

/// Answers queries against an immutable corpus.
#[derive(Debug, Clone)]
pub struct Matcher {
    corpus: Corpus,
    threshold: f64,
}

impl Matcher {
    pub fn new(corpus: Corpus, threshold: f64) -> Self {
        Self { corpus, threshold }
    }

    pub fn with_default_threshold(corpus: Corpus) -> Self {
        Self::new(corpus, DEFAULT_THRESHOLD)
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// The pair with the highest score, first one on ties.
    ///
    /// `None` when the query normalizes to nothing, the corpus is empty or
    /// every score is `0.0`.
    pub fn best_match(&self, query: &str) -> Option<MatchCandidate<'_>> {
        let query = normalize(query);
        if query.is_empty() {
            return None;
        }
        self.scan(&query)
    }

    /// Looks up the answer for a raw user query.
    ///
    /// A query that normalizes to nothing is not scored at all.
    pub fn answer(&self, query: &str) -> AnswerResult {
        let query = normalize(query);
        if query.is_empty() {
            tracing::debug!("empty query, nothing to match");
            return AnswerResult::NotFound { best_score: 0.0 };
        }

        let result = match self.scan(&query) {
            Some(best) if best.score >= self.threshold && best.pair.has_answer() => {
                AnswerResult::Found {
                    answer: best.pair.answer.clone(),
                    question: best.pair.question.clone(),
                    score: best.score,
                }
            }
            Some(best) => AnswerResult::NotFound {
                best_score: best.score,
            },
            None => AnswerResult::NotFound { best_score: 0.0 },
        };

        match &result {
            AnswerResult::Found { score, .. } => {
                tracing::debug!(query = %query, score, "match found")
            }
            AnswerResult::NotFound { best_score } => {
                tracing::debug!(query = %query, best_score, "no match above threshold")
            }
        }
        result
    }

    fn scan(&self, normalized_query: &str) -> Option<MatchCandidate<'_>> {
        let mut best: Option<MatchCandidate<'_>> = None;
        let mut best_score = 0.0;
        for (index, pair) in self.corpus.pairs().iter().enumerate() {
            // Query first: the ratio is not symmetric.
            let score = ratio(normalized_query, &normalize(&pair.question));
            if score > best_score {
                best_score = score;
                best = Some(MatchCandidate { index, pair, score });
            }
        }
        best
    }
}

/// `qaf ask`: answer one question from the command line.
pub fn run_ask(config: &Config, question: &str, explain: bool) -> Result<()> {
    let corpus = corpus::load_from_config(config)?;
    let matcher = Matcher::new(corpus, config.matching.threshold);

    match matcher.answer(question) {
        AnswerResult::Found {
            answer,
            question: matched,
            score,
        } => {
            println!("{}", answer);
            if explain {
                println!();
                println!("matched question: {}", matched);
                println!("score: {:.4}", score);
            }
        }
        AnswerResult::NotFound { best_score } => {
            println!("{}", config.server.not_found_message);
            if explain {
                println!();
                if let Some(best) = matcher.best_match(question) {
                    println!("closest question: {}", best.pair.question);
                }
                println!(
                    "best score: {:.4} (threshold {:.2})",
                    best_score,
                    matcher.threshold()
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(pairs: &[(&str, &str)]) -> Matcher {
        let pairs = pairs.iter().map(|(q, a)| QaPair::new(*q, *a)).collect();
        Matcher::with_default_threshold(Corpus::from_pairs(pairs))
    }

    #[test]
    fn exact_match_after_normalization() {
        let m = matcher(&[("Что такое ось", "Определение оси")]);
        let result = m.answer("что  такое ось");
        assert_eq!(result.answer(), Some("Определение оси"));
        match result {
            AnswerResult::Found { score, .. } => assert_eq!(score, 1.0),
            other => panic!("expected a match, got {:?}", other),
        }
    }

    #[test]
    fn unrelated_query_is_not_found() {
        let m = matcher(&[("A", "B")]);
        let result = m.answer("completely unrelated long sentence");
        assert!(!result.is_found());
    }

    #[test]
    fn apostrophes_and_case_are_ignored() {
        let m = matcher(&[("Don't Panic", "towel")]);
        assert_eq!(m.answer("dont panic").answer(), Some("towel"));
    }

    #[test]
    fn ties_keep_the_first_pair() {
        let m = matcher(&[("abc", "first"), ("abc", "second")]);
        assert_eq!(m.answer("abc").answer(), Some("first"));
        assert_eq!(m.best_match("abc").unwrap().index, 0);
    }

    #[test]
    fn closest_question_wins() {
        let m = matcher(&[
            ("what is rust", "a language"),
            ("what is a crate", "a compilation unit"),
        ]);
        assert_eq!(m.answer("what is a crate?").answer(), Some("a compilation unit"));
    }

    #[test]
    fn best_pair_with_empty_answer_is_not_found() {
        let m = matcher(&[("what is x", ""), ("what is y", "Y")]);
        let result = m.answer("what is x");
        assert_eq!(result, AnswerResult::NotFound { best_score: 1.0 });
    }

    #[test]
    fn threshold_is_inclusive() {
        // ratio("ab", "ac") == 0.5
        let m = matcher(&[("ac", "yes")]);
        assert_eq!(m.answer("ab").answer(), Some("yes"));

        let strict = Matcher::new(m.corpus().clone(), 0.51);
        assert!(!strict.answer("ab").is_found());
    }

    #[test]
    fn empty_query_is_not_found() {
        // A question made only of apostrophes normalizes to "" and would
        // otherwise score 1.0 against an empty query.
        let m = matcher(&[("'", "odd")]);
        assert_eq!(m.answer("   ").answer(), None);
        assert_eq!(m.answer("").answer(), None);
    }

    #[test]
    fn blank_query_has_no_closest_question() {
        let m = matcher(&[("'", "odd"), ("what is x", "X")]);
        assert!(m.best_match("  ").is_none());
        assert!(m.best_match("'").is_none());
    }

    #[test]
    fn query_is_scored_as_the_first_sequence() {
        // ratio("cabacb", "cbabc") = 8/11, ratio("cabacb", "baaabc") = 0.5;
        // with the arguments swapped the second question would win.
        let m = matcher(&[("cbabc", "first"), ("baaabc", "second")]);
        let best = m.best_match("cabacb").unwrap();
        assert_eq!(best.index, 0);
        assert!((best.score - 8.0 / 11.0).abs() < 1e-9);
        assert_eq!(m.answer("cabacb").answer(), Some("first"));
    }

    #[test]
    fn empty_corpus_is_not_found() {
        let m = matcher(&[]);
        assert_eq!(m.answer("anything"), AnswerResult::NotFound { best_score: 0.0 });
        assert!(m.best_match("anything").is_none());
    }

    #[test]
    fn zero_scores_produce_no_candidate() {
        let m = matcher(&[("xyz", "never")]);
        assert!(m.best_match("abc").is_none());
    }

    #[test]
    fn serializes_found_and_not_found() {
        let found = AnswerResult::Found {
            answer: "B".to_string(),
            question: "A".to_string(),
            score: 1.0,
        };
        let json = serde_json::to_value(&found).unwrap();
        assert_eq!(json["found"], true);
        assert_eq!(json["answer"], "B");

        let missing = AnswerResult::NotFound { best_score: 0.2 };
        let json = serde_json::to_value(&missing).unwrap();
        assert_eq!(json["found"], false);
        assert!(json.get("answer").is_none());
    }
}
