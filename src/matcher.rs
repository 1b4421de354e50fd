// src/matcher.rs
//! Scores a detected skill set against the role catalog

use crate::catalog::RoleCatalog;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Required-skill overlap carries 70 of the 100 raw points, preferred
/// overlap the remaining 30, before the role weight is applied.
const REQUIRED_POINTS: f64 = 70.0;
const PREFERRED_POINTS: f64 = 30.0;
const MAX_SCORE: f64 = 100.0;
const MAX_MATCHES: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleMatch {
    pub title: String,
    pub score: f64,
    pub required_matches: usize,
    pub total_required: usize,
    pub preferred_matches: usize,
    pub total_preferred: usize,
}

/// Matches skill sets against role profiles. Read-only once built.
pub struct RoleMatcher {
    catalog: Arc<RoleCatalog>,
}

impl RoleMatcher {
    pub fn new(catalog: Arc<RoleCatalog>) -> Self {
        Self { catalog }
    }

    /// Rank roles by fit, best first, at most six. A role with zero
    /// required-skill overlap is excluded regardless of preferred
    /// overlap. Equal scores keep catalog declaration order.
    pub fn match_roles(&self, skills: &[String]) -> Vec<RoleMatch> {
        if skills.is_empty() {
            return Vec::new();
        }

        let skill_set: HashSet<String> = skills.iter().map(|s| s.to_lowercase()).collect();

        let mut matches: Vec<RoleMatch> = Vec::new();

        for profile in self.catalog.profiles() {
            let required_matches = profile
                .required
                .iter()
                .filter(|s| skill_set.contains(s.as_str()))
                .count();

            if required_matches == 0 {
                continue;
            }

            let preferred_matches = profile
                .preferred
                .iter()
                .filter(|s| skill_set.contains(s.as_str()))
                .count();

            let required_score =
                (required_matches as f64 / profile.required.len() as f64) * REQUIRED_POINTS;
            let preferred_score = if profile.preferred.is_empty() {
                0.0
            } else {
                (preferred_matches as f64 / profile.preferred.len() as f64) * PREFERRED_POINTS
            };

            let raw = (required_score + preferred_score) * profile.weight;
            let score = ((raw.min(MAX_SCORE)) * 10.0).round() / 10.0;

            debug!(
                "Role '{}': required {}/{}, preferred {}/{}, score {}",
                profile.title,
                required_matches,
                profile.required.len(),
                preferred_matches,
                profile.preferred.len(),
                score
            );

            matches.push(RoleMatch {
                title: profile.title.clone(),
                score,
                required_matches,
                total_required: profile.required.len(),
                preferred_matches,
                total_preferred: profile.preferred.len(),
            });
        }

        // Stable sort preserves catalog order on ties.
        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(MAX_MATCHES);
        matches
    }
}
