//! JD keyword extraction: a deterministic keyword inventory weighted by
//! frequency and by the section of the posting a term appears in.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// A single keyword from the JD, weighted by position and frequency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordEntry {
    /// Display form, as first written in the JD.
    pub keyword: String,
    pub frequency: u32,
    /// title=1.0, requirements=0.8, responsibilities/body=0.6, about=0.3
    pub position_weight: f32,
    /// frequency * position_weight
    pub weighted_score: f32,
}

impl KeywordEntry {
    pub fn normalized(&self) -> String {
        self.keyword.to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    Title,
    Requirements,
    Responsibilities,
    About,
    Body,
}

impl Section {
    fn weight(self) -> f32 {
        match self {
            Section::Title => 1.0,
            Section::Requirements => 0.8,
            Section::Responsibilities | Section::Body => 0.6,
            Section::About => 0.3,
        }
    }
}

const REQUIREMENT_MARKERS: &[&str] = &[
    "requirement",
    "required",
    "qualification",
    "must have",
    "nice to have",
    "preferred",
    "skills",
    "what you bring",
];
const RESPONSIBILITY_MARKERS: &[&str] = &[
    "responsibilit",
    "what you'll do",
    "what you will do",
    "you will",
    "duties",
    "the role",
];
const ABOUT_MARKERS: &[&str] = &[
    "about",
    "benefits",
    "perks",
    "who we are",
    "why join",
    "compensation",
];

/// Headings longer than this many words are treated as prose.
const MAX_HEADING_WORDS: usize = 5;

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "all", "also", "an", "and", "any", "are", "as",
    "at", "be", "been", "being", "both", "but", "by", "can", "could", "do", "does", "each",
    "etc", "for", "from", "has", "have", "having", "how", "if", "in", "including", "into",
    "is", "it", "its", "join", "just", "least", "like", "may", "more", "most", "must", "new",
    "no", "not", "of", "on", "one", "or", "other", "our", "out", "over", "own", "per", "plus",
    "should", "so", "some", "such", "than", "that", "the", "their", "them", "then", "there",
    "these", "they", "this", "those", "through", "to", "up", "us", "use", "using", "very",
    "via", "want", "was", "we", "well", "were", "what", "when", "where", "which", "while",
    "who", "why", "will", "with", "within", "would", "you", "your", "ability", "able",
    "candidate", "candidates", "company", "environment", "experience", "experienced",
    "familiarity", "good", "great", "ideal", "knowledge", "looking", "preferred", "proven",
    "related", "required", "requirements", "responsibilities", "role", "seeking", "strong",
    "team", "teams", "understanding", "work", "working", "year", "years", "nice", "bring",
    "qualification", "qualifications", "benefits", "perks", "duties",
];

fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '/' | '-')
}

/// Splits text into candidate terms, keeping tech spellings like `C++`,
/// `C#`, `.NET`, `Node.js` and `CI/CD` intact.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !is_token_char(c))
        .map(|t| t.trim_end_matches(['.', '/', '-']).trim_start_matches(['/', '-']))
        .filter(|t| !t.is_empty())
}

/// Detects a section heading at the start of `line`.
///
/// A `Label: ...` or `Label:` line is a heading when its label contains a
/// marker. A line without a colon is a heading only when it starts with one,
/// so prose such as "Knowledge about Kafka" stays in its section.
/// Returns the section and the text to scan: everything after the colon, or
/// the whole line when there is no colon.
fn detect_heading(line: &str) -> Option<(Section, &str)> {
    let line = line.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '#' | '*' | '-' | '•'));
    let (label, rest, anchored) = match line.split_once(':') {
        Some((label, rest)) => (label, rest, false),
        None => (line, line, true),
    };
    if label.split_whitespace().count() > MAX_HEADING_WORDS {
        return None;
    }

    let label = label.trim().to_lowercase();
    let has = |markers: &[&str]| {
        markers.iter().any(|m| {
            if anchored {
                label.starts_with(m)
            } else {
                label.contains(m)
            }
        })
    };
    let section = if has(REQUIREMENT_MARKERS) {
        Section::Requirements
    } else if has(RESPONSIBILITY_MARKERS) {
        Section::Responsibilities
    } else if has(ABOUT_MARKERS) {
        Section::About
    } else {
        return None;
    };
    Some((section, rest))
}

struct Candidate {
    keyword: String,
    frequency: u32,
    position_weight: f32,
}

/// Builds the keyword inventory for a job description.
///
/// Terms shorter than `min_len` characters, stopwords and pure numbers are
/// dropped. Result is sorted by `weighted_score` descending (ties keep
/// first-appearance order) and truncated to `max_keywords`.
pub fn extract_keywords(jd_text: &str, min_len: usize, max_keywords: usize) -> Vec<KeywordEntry> {
    let stopwords: HashSet<&str> = STOPWORDS.iter().copied().collect();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut candidates: Vec<Candidate> = Vec::new();

    let mut section = Section::Body;
    let lines = jd_text.lines().map(str::trim).filter(|l| !l.is_empty());

    for (line_no, line) in lines.enumerate() {
        // The first line is the job title whatever words it contains.
        let (line_section, content) = if line_no == 0 {
            (Section::Title, line)
        } else if let Some((heading, rest)) = detect_heading(line) {
            section = heading;
            (heading, rest)
        } else {
            (section, line)
        };
        let weight = line_section.weight();

        for token in tokenize(content) {
            let normalized = token.to_lowercase();
            if normalized.chars().count() < min_len
                || !normalized.chars().any(char::is_alphabetic)
                || stopwords.contains(normalized.as_str())
            {
                continue;
            }

            match index.get(&normalized) {
                Some(&i) => {
                    let candidate = &mut candidates[i];
                    candidate.frequency += 1;
                    candidate.position_weight = candidate.position_weight.max(weight);
                }
                None => {
                    index.insert(normalized, candidates.len());
                    candidates.push(Candidate {
                        keyword: token.to_string(),
                        frequency: 1,
                        position_weight: weight,
                    });
                }
            }
        }
    }

    let mut inventory: Vec<KeywordEntry> = candidates
        .into_iter()
        .map(|c| KeywordEntry {
            weighted_score: c.frequency as f32 * c.position_weight,
            keyword: c.keyword,
            frequency: c.frequency,
            position_weight: c.position_weight,
        })
        .collect();

    // Stable sort keeps first-appearance order among equal scores.
    inventory.sort_by(|a, b| {
        b.weighted_score
            .partial_cmp(&a.weighted_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    inventory.truncate(max_keywords);
    inventory
}

#[cfg(test)]
mod tests {
    use super::*;

    const STARTUP_JD: &str = r#"
        Senior Rust Engineer
        We move fast and own everything end-to-end. You will architect distributed systems.
        Requirements: Rust, Tokio, PostgreSQL, Kubernetes, CI/CD
        Nice to have: Kafka, C++
        About Us: Fast-paced startup disrupting fintech infrastructure.
    "#;

    fn find<'a>(inventory: &'a [KeywordEntry], kw: &str) -> Option<&'a KeywordEntry> {
        inventory.iter().find(|k| k.normalized() == kw)
    }

    #[test]
    fn test_tokenize_keeps_tech_spellings() {
        let tokens: Vec<_> = tokenize("C++, C#, .NET, Node.js and CI/CD.").collect();
        assert_eq!(tokens, vec!["C++", "C#", ".NET", "Node.js", "and", "CI/CD"]);
    }

    #[test]
    fn test_title_terms_get_full_weight() {
        let inventory = extract_keywords(STARTUP_JD, 2, 50);
        let rust = find(&inventory, "rust").unwrap();
        assert_eq!(rust.frequency, 2);
        assert!((rust.position_weight - 1.0).abs() < f32::EPSILON);
        assert!((rust.weighted_score - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_requirement_terms_weighted_0_8() {
        let inventory = extract_keywords(STARTUP_JD, 2, 50);
        let kafka = find(&inventory, "kafka").unwrap();
        assert!((kafka.position_weight - 0.8).abs() < f32::EPSILON);
        assert!(find(&inventory, "ci/cd").is_some());
        assert!(find(&inventory, "c++").is_some());
    }

    #[test]
    fn test_about_terms_weighted_0_3() {
        let inventory = extract_keywords(STARTUP_JD, 2, 50);
        let fintech = find(&inventory, "fintech").unwrap();
        assert!((fintech.position_weight - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_heading_labels_are_not_keywords() {
        let inventory = extract_keywords(STARTUP_JD, 2, 50);
        assert!(find(&inventory, "nice").is_none());
        assert!(find(&inventory, "requirements").is_none());
    }

    #[test]
    fn test_stopwords_and_numbers_dropped() {
        let inventory = extract_keywords("Engineer\nWe want 5+ years of experience with the Go stack", 2, 50);
        for dropped in ["we", "want", "5+", "years", "of", "experience", "with", "the"] {
            assert!(find(&inventory, dropped).is_none(), "{dropped} should be dropped");
        }
        assert!(find(&inventory, "go").is_some());
        assert!(find(&inventory, "stack").is_some());
    }

    #[test]
    fn test_min_length_respected() {
        let inventory = extract_keywords("Engineer\nGo and Rust and R", 3, 50);
        assert!(find(&inventory, "go").is_none());
        assert!(find(&inventory, "rust").is_some());
    }

    #[test]
    fn test_max_keywords_truncates_lowest_scores() {
        let inventory = extract_keywords(STARTUP_JD, 2, 3);
        assert_eq!(inventory.len(), 3);
        assert_eq!(inventory[0].normalized(), "rust");
    }

    #[test]
    fn test_sorted_descending_with_stable_ties() {
        let inventory = extract_keywords("Platform Engineer\nDocker Terraform Docker", 2, 50);
        let names: Vec<_> = inventory.iter().map(|k| k.keyword.as_str()).collect();
        assert_eq!(names, vec!["Docker", "Platform", "Engineer", "Terraform"]);
        for pair in inventory.windows(2) {
            assert!(pair[0].weighted_score >= pair[1].weighted_score);
        }
    }

    #[test]
    fn test_first_seen_casing_kept() {
        let inventory = extract_keywords("Engineer\nPostgreSQL and postgresql", 2, 50);
        let pg = find(&inventory, "postgresql").unwrap();
        assert_eq!(pg.keyword, "PostgreSQL");
        assert_eq!(pg.frequency, 2);
    }

    #[test]
    fn test_heading_without_colon_keeps_line_content() {
        let inventory = extract_keywords("Backend Engineer\nYou will build gRPC services", 2, 50);
        let grpc = find(&inventory, "grpc").unwrap();
        assert!((grpc.position_weight - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_jd_has_no_keywords() {
        assert!(extract_keywords("   \n  ", 2, 50).is_empty());
    }

    fn weight_of(inventory: &[KeywordEntry], kw: &str) -> f32 {
        find(inventory, kw).map(|k| k.position_weight).unwrap_or(0.0)
    }

    #[test]
    fn test_title_with_marker_words_keeps_full_weight() {
        let inventory = extract_keywords("Payroll & Benefits Engineer\nRequirements: Rust", 2, 50);
        assert!((weight_of(&inventory, "payroll") - 1.0).abs() < f32::EPSILON);
        assert!((weight_of(&inventory, "engineer") - 1.0).abs() < f32::EPSILON);
        assert!((weight_of(&inventory, "rust") - 0.8).abs() < f32::EPSILON);

        let inventory = extract_keywords("Skills Platform Engineer\nAbout: fintech", 2, 50);
        assert!((weight_of(&inventory, "platform") - 1.0).abs() < f32::EPSILON);
        assert!((weight_of(&inventory, "skills") - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_marker_word_inside_prose_does_not_switch_section() {
        let jd = "Data Engineer\nRequirements: Rust\nKnowledge about Kafka\nTerraform Helm Istio";
        let inventory = extract_keywords(jd, 2, 50);
        for kw in ["kafka", "terraform", "helm", "istio"] {
            assert!(
                (weight_of(&inventory, kw) - 0.8).abs() < f32::EPSILON,
                "{kw} should stay in requirements"
            );
        }
    }

    #[test]
    fn test_bare_heading_lines_switch_section() {
        let jd = "Data Engineer\nAbout Us\nFintech scale-up\nWhat you'll do:\nBuild Airflow pipelines";
        let inventory = extract_keywords(jd, 2, 50);
        assert!((weight_of(&inventory, "fintech") - 0.3).abs() < f32::EPSILON);
        assert!((weight_of(&inventory, "airflow") - 0.6).abs() < f32::EPSILON);
    }
}
