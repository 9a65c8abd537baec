//! Question/answer pair extraction from paragraph lines.
//!
//! Source documents mark each record with `S:` followed by the question.
//! The answer either follows on the same line after the first `:` (or,
//! when there is no colon, the first `=`), or sits on the next line. A next
//! line starting with `=` is an explicit answer line; any other next line is
//! taken verbatim unless it starts a new record (`S:`) or an info line
//! (`I:`).
//!
//! The pass is index driven: [`parse_record`] looks at one line, may peek at
//! the following one, and reports how many lines it used so the caller can
//! skip a line already folded into an answer.

use serde::{Deserialize, Serialize};

/// Marks a line carrying a question.
pub const QUESTION_MARKER: &str = "S:";
/// A next line starting with this is never taken as an answer.
pub const INFO_MARKER: &str = "I:";
/// Prefix of an explicit answer line.
const ANSWER_PREFIX: char = '=';

/// One known question and its answer, as extracted (not normalized).
///
/// `answer` may be empty when no answer could be located; such a pair is
/// kept but never returned as a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    pub fn has_answer(&self) -> bool {
        !self.answer.is_empty()
    }
}

/// Outcome of parsing the record that starts at one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The emitted pair, if the line was a marker line with a non-empty question.
    pub pair: Option<QaPair>,
    /// Lines used: 1 for the line itself, 2 when the next line became the answer.
    pub consumed: usize,
}

/// Parses the record at `lines[index]`.
///
/// Returns `consumed == 0` only when `index` is past the end.
pub fn parse_record<S: AsRef<str>>(lines: &[S], index: usize) -> Step {
    let Some(line) = lines.get(index) else {
        return Step {
            pair: None,
            consumed: 0,
        };
    };
    let line: &str = line.as_ref();
    let Some((_, rest)) = line.split_once(QUESTION_MARKER) else {
        return Step {
            pair: None,
            consumed: 1,
        };
    };
    let rest = rest.trim();

    // A colon always wins over `=`; `=` only splits when no colon exists.
    let (question, candidate) = match rest.find(':').or_else(|| rest.find(ANSWER_PREFIX)) {
        Some(pos) => (rest[..pos].trim(), rest[pos + 1..].trim()),
        None => (rest, ""),
    };

    let mut consumed = 1;
    let answer = if candidate.is_empty() {
        let next: Option<&str> = lines.get(index + 1).map(|next| next.as_ref());
        match lookahead_answer(next) {
            Some(answer) => {
                consumed = 2;
                answer
            }
            None => String::new(),
        }
    } else {
        candidate.to_string()
    };

    let pair = (!question.is_empty()).then(|| QaPair::new(question, answer));
    Step { pair, consumed }
}

/// Decides whether the line after a marker line supplies the answer.
fn lookahead_answer(next: Option<&str>) -> Option<String> {
    let next = next?;
    if next.starts_with(ANSWER_PREFIX) {
        let stripped = next.trim_start_matches(|c: char| c == ANSWER_PREFIX || c == ' ');
        Some(stripped.trim().to_string())
    } else if !next.starts_with(INFO_MARKER) && !next.starts_with(QUESTION_MARKER) {
        Some(next.to_string())
    } else {
        None
    }
}

/// Extracts every pair from a document's ordered, non-empty lines.
pub fn extract_pairs<S: AsRef<str>>(lines: &[S]) -> Vec<QaPair> {
    let mut pairs = Vec::new();
    let mut index = 0;
    while index < lines.len() {
        let step = parse_record(lines, index);
        if let Some(pair) = step.pair {
            pairs.push(pair);
        }
        index += step.consumed.max(1);
    }
    pairs
}
