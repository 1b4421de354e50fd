// src/report.rs
//! Categorized skills report built on top of extraction results

use crate::catalog::{SkillCatalog, SkillCategory};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStrength {
    pub category: SkillCategory,
    pub category_name: String,
    pub skills: Vec<String>,
    pub count: usize,
    pub total_possible: usize,
    pub strength_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsSummary {
    pub total_skills: usize,
    pub unique_categories: usize,
    pub top_category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsReport {
    pub categories: Vec<CategoryStrength>,
    pub top_categories: Vec<String>,
    pub summary: SkillsSummary,
}

/// Group detected skills by catalog category and compute per-category
/// strength as the share of that category's dictionary covered.
pub fn build_report(catalog: &SkillCatalog, skills: &[String]) -> SkillsReport {
    let mut categories: Vec<CategoryStrength> = Vec::new();

    for (category, members) in catalog.by_category() {
        let matched: Vec<String> = skills
            .iter()
            .filter(|s| members.iter().any(|m| m.eq_ignore_ascii_case(s)))
            .cloned()
            .collect();

        if matched.is_empty() {
            continue;
        }

        let total_possible = members.len();
        let strength = (matched.len() as f64 / total_possible as f64) * 100.0;

        categories.push(CategoryStrength {
            category,
            category_name: category.display_name().to_string(),
            count: matched.len(),
            skills: matched,
            total_possible,
            strength_percentage: (strength * 10.0).round() / 10.0,
        });
    }

    let mut ranked: Vec<&CategoryStrength> = categories.iter().collect();
    ranked.sort_by(|a, b| {
        b.strength_percentage
            .partial_cmp(&a.strength_percentage)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let top_categories = ranked
        .iter()
        .take(3)
        .map(|c| c.category_name.clone())
        .collect();

    let top_category = categories
        .iter()
        .max_by_key(|c| c.count)
        .map(|c| c.category_name.clone());

    SkillsReport {
        summary: SkillsSummary {
            total_skills: skills.len(),
            unique_categories: categories.len(),
            top_category,
        },
        top_categories,
        categories,
    }
}
