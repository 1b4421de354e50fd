// src/extractor.rs
//! Weighted skill extraction from normalized document text

use crate::catalog::SkillCatalog;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Exact word-boundary occurrences privilege unambiguous matches over
/// incidental substrings.
const EXACT_MATCH_WEIGHT: u32 = 3;
const SUBSTRING_WEIGHT: u32 = 1;
const VARIANT_WEIGHT: u32 = 1;
const ABBREVIATION_WEIGHT: u32 = 2;

/// A skill whose accumulated score crossed this threshold is retained;
/// a single incidental substring hit is not enough.
const RETENTION_THRESHOLD: u32 = 2;

/// Abbreviation credit: full dictionary form paired with the short token
/// that may appear in text instead.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("javascript", "js"),
    ("typescript", "ts"),
    ("machine learning", "ml"),
    ("artificial intelligence", "ai"),
    ("user interface", "ui"),
    ("user experience", "ux"),
    ("application programming interface", "api"),
    ("structured query language", "sql"),
];

/// A detected skill with its accumulated match score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSkill {
    pub name: String,
    pub match_score: u32,
}

struct CompiledSkill {
    /// Canonical display casing from the dictionary.
    display: String,
    lower: String,
    word_pattern: Option<Regex>,
    /// Dot-, space- and hyphen-stripped forms, deduplicated.
    variants: Vec<String>,
    abbreviation_patterns: Vec<Regex>,
}

/// Extracts a confidence-ranked skill list from free-form text.
/// Patterns are compiled once at construction; the extractor itself is
/// read-only and safe to share across requests.
pub struct SkillExtractor {
    skills: Vec<CompiledSkill>,
}

impl SkillExtractor {
    pub fn new(catalog: Arc<SkillCatalog>) -> Self {
        let skills = catalog
            .entries()
            .iter()
            .map(|entry| {
                let lower = entry.name.to_lowercase();

                let word_pattern =
                    match Regex::new(&format!(r"\b{}\b", regex::escape(&lower))) {
                        Ok(re) => Some(re),
                        Err(e) => {
                            warn!("Skipping word pattern for '{}': {}", entry.name, e);
                            None
                        }
                    };

                let mut variants: Vec<String> = Vec::new();
                for stripped in ['.', ' ', '-'].map(|c| lower.replace(c, "")) {
                    if stripped != lower && !variants.contains(&stripped) {
                        variants.push(stripped);
                    }
                }

                let abbreviation_patterns = ABBREVIATIONS
                    .iter()
                    .filter(|(full, _)| *full == lower)
                    .filter_map(|(_, abbrev)| {
                        Regex::new(&format!(r"\b{}\b", regex::escape(abbrev))).ok()
                    })
                    .collect();

                CompiledSkill {
                    display: entry.name.clone(),
                    lower,
                    word_pattern,
                    variants,
                    abbreviation_patterns,
                }
            })
            .collect();

        Self { skills }
    }

    /// Extract skills from text, ranked descending by match score.
    /// Ties keep dictionary order. Empty or whitespace-only input yields
    /// an empty list, not an error.
    pub fn extract(&self, text: &str) -> Vec<ExtractedSkill> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        // Collapse whitespace runs, lowercase for matching.
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let lower = normalized.to_lowercase();

        let mut found: Vec<ExtractedSkill> = Vec::new();

        for skill in &self.skills {
            let mut score = 0u32;

            if let Some(pattern) = &skill.word_pattern {
                let exact = pattern.find_iter(&lower).count() as u32;
                score += exact * EXACT_MATCH_WEIGHT;
            }

            if lower.contains(&skill.lower) {
                score += SUBSTRING_WEIGHT;
            }

            for variant in &skill.variants {
                if lower.contains(variant.as_str()) {
                    score += VARIANT_WEIGHT;
                }
            }

            for pattern in &skill.abbreviation_patterns {
                if pattern.is_match(&lower) {
                    score += ABBREVIATION_WEIGHT;
                }
            }

            if score >= RETENTION_THRESHOLD {
                found.push(ExtractedSkill {
                    name: skill.display.clone(),
                    match_score: score,
                });
            }
        }

        // Stable sort: equal scores keep dictionary order.
        found.sort_by(|a, b| b.match_score.cmp(&a.match_score));

        info!("Extracted {} skills from {} chars of text", found.len(), text.len());
        found
    }
}

/// Shown to the user when extraction finds nothing - an expected
/// outcome, not a failure.
pub const NO_SKILLS_GUIDANCE: &str = "No technical skills found. Make sure the document \
includes technical skills like programming languages (Python, Java), frameworks (React, \
Django), databases (SQL, MongoDB), or tools (Git, Docker), ideally in a dedicated \
'Skills' section using standard skill names.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{SkillCategory, SkillEntry};

    fn extractor() -> SkillExtractor {
        SkillExtractor::new(Arc::new(SkillCatalog::default()))
    }

    fn small_extractor(names: &[&str]) -> SkillExtractor {
        let entries = names
            .iter()
            .map(|n| SkillEntry {
                name: (*n).to_string(),
                category: SkillCategory::OtherSkills,
            })
            .collect();
        SkillExtractor::new(Arc::new(SkillCatalog::new(entries)))
    }

    #[test]
    fn test_empty_input_yields_empty_list() {
        assert!(extractor().extract("").is_empty());
        assert!(extractor().extract("   \n\t  ").is_empty());
    }

    #[test]
    fn test_text_without_skills_yields_empty_list() {
        let skills = extractor().extract("The quick brown fox jumped over the lazy dog.");
        assert!(skills.is_empty(), "unexpected skills: {:?}", skills);
    }

    #[test]
    fn test_single_exact_occurrence_is_retained() {
        let skills = small_extractor(&["Docker"]).extract("We deploy with docker every day");
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].name, "Docker");
        // One exact word match (3) plus the substring hit (1).
        assert_eq!(skills[0].match_score, 4);
    }

    #[test]
    fn test_single_substring_occurrence_is_not_retained() {
        // "go" appears only inside "categorical": substring score of 1 is
        // below the retention threshold.
        let skills = small_extractor(&["Go"]).extract("we studied categorical data");
        assert!(skills.is_empty(), "unexpected skills: {:?}", skills);
    }

    #[test]
    fn test_repeated_exact_matches_accumulate_and_outrank() {
        // Scenario from the scoring design: three word-bounded occurrences
        // score 3 * 3 = 9 (+1 substring) and outrank a single-hit skill.
        let skills = extractor().extract("Experienced in react react REACT development with sql");
        let react = skills.iter().find(|s| s.name == "React").expect("react retained");
        assert_eq!(react.match_score, 10);
        let sql = skills.iter().find(|s| s.name == "SQL").expect("sql retained");
        assert!(react.match_score > sql.match_score);
        assert_eq!(skills[0].name, "React");
    }

    #[test]
    fn test_variant_matching() {
        // "nodejs" is the dot-stripped variant of "node.js"; no exact or
        // plain-substring hit, so the variant alone would not retain it,
        // but paired text does.
        let skills = small_extractor(&["Node.js"]).extract("built services in node.js and nodejs");
        assert_eq!(skills.len(), 1);
        // exact (3) + substring (1) + variant (1)
        assert_eq!(skills[0].match_score, 5);
    }

    #[test]
    fn test_abbreviation_grants_credit() {
        // "ml" as a real token grants the machine-learning abbreviation
        // bonus even when the full form never appears.
        let skills = small_extractor(&["Machine Learning"]).extract("strong ml background");
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].match_score, 2);
    }

    #[test]
    fn test_abbreviation_requires_token_boundary() {
        // "ml" inside "html" must not trigger the abbreviation credit.
        let skills = small_extractor(&["Machine Learning"]).extract("wrote html pages");
        assert!(skills.is_empty(), "unexpected skills: {:?}", skills);
    }

    #[test]
    fn test_ties_keep_dictionary_order() {
        let ex = small_extractor(&["Python", "Java"]);
        let skills = ex.extract("python once, java once");
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].match_score, skills[1].match_score);
        assert_eq!(skills[0].name, "Python");
        assert_eq!(skills[1].name, "Java");
    }

    #[test]
    fn test_display_casing_comes_from_dictionary() {
        let skills = small_extractor(&["PostgreSQL"]).extract("we use postgresql in production");
        assert_eq!(skills[0].name, "PostgreSQL");
    }
}
