use serde::{Deserialize, Serialize};

const VAGUE_VERBS: &[&str] = &[
    "improved",
    "enhanced",
    "helped",
    "worked on",
    "assisted",
    "supported",
    "participated",
    "involved",
    "responsible for",
];

/// Lines shorter than this are treated as headings or contact details.
const MIN_STATEMENT_WORDS: usize = 4;

/// How well a resume quantifies its achievements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImpactSummary {
    pub statements: usize,
    pub quantified: usize,
    /// Vague verbs found on unquantified lines, in first-seen order.
    pub vague_verbs: Vec<String>,
}

impl ImpactSummary {
    /// Share of statements carrying a measurable outcome. 0.0 when there are none.
    pub fn ratio(&self) -> f64 {
        if self.statements == 0 {
            return 0.0;
        }
        self.quantified as f64 / self.statements as f64
    }
}

/// A statement is quantified when it carries a number, a percentage or a
/// currency amount.
pub fn is_quantified(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
        || text.contains('%')
        || text.contains('$')
        || text.contains('€')
        || text.contains('£')
}

pub fn summarize_impact(resume_text: &str) -> ImpactSummary {
    let mut summary = ImpactSummary::default();

    for line in resume_text.lines().map(str::trim) {
        if line.split_whitespace().count() < MIN_STATEMENT_WORDS {
            continue;
        }
        summary.statements += 1;

        if is_quantified(line) {
            summary.quantified += 1;
            continue;
        }

        let lower = line.to_lowercase();
        if let Some(&verb) = VAGUE_VERBS.iter().find(|v| lower.contains(*v)) {
            if !summary.vague_verbs.iter().any(|seen| seen == verb) {
                summary.vague_verbs.push(verb.to_string());
            }
        }
    }

    summary
}
