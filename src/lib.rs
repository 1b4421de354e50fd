//! Resume-to-job matching core: skill extraction from document text,
//! role scoring against a role catalog, and multi-source job listing
//! aggregation keyed on the extracted skills.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod catalog;
pub mod document;
pub mod error;
pub mod extractor;
pub mod matcher;
pub mod report;
pub mod scraping;

pub use catalog::{RoleCatalog, RoleProfile, SkillCatalog, SkillCategory, SkillEntry};
pub use document::{DocumentDecoder, PlainTextDecoder};
pub use error::MatcherError;
pub use extractor::{ExtractedSkill, SkillExtractor, NO_SKILLS_GUIDANCE};
pub use matcher::{RoleMatch, RoleMatcher};
pub use report::{build_report, SkillsReport};
pub use scraping::{
    Aggregator, HttpPageFetcher, JobPosting, JobSource, PageFetcher, RetryPolicy,
};

/// Combined result of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub skills: Vec<ExtractedSkill>,
    pub role_matches: Vec<RoleMatch>,
    pub report: SkillsReport,
}

impl Analysis {
    pub fn no_skills_found(&self) -> bool {
        self.skills.is_empty()
    }
}

/// The full pipeline over a pair of immutable catalogs. Cheap to share:
/// all operations are pure functions of their input plus the catalogs,
/// so one instance serves concurrent requests without synchronization.
pub struct ResumeMatcher {
    skill_catalog: Arc<SkillCatalog>,
    extractor: SkillExtractor,
    matcher: RoleMatcher,
}

impl ResumeMatcher {
    pub fn new() -> Self {
        Self::with_catalogs(
            Arc::new(SkillCatalog::default()),
            Arc::new(RoleCatalog::default()),
        )
    }

    pub fn with_catalogs(skills: Arc<SkillCatalog>, roles: Arc<RoleCatalog>) -> Self {
        Self {
            extractor: SkillExtractor::new(skills.clone()),
            matcher: RoleMatcher::new(roles),
            skill_catalog: skills,
        }
    }

    pub fn skill_catalog(&self) -> &SkillCatalog {
        &self.skill_catalog
    }

    /// Confidence-ranked skills detected in the text. Empty input or
    /// text without recognizable skills yields an empty list.
    pub fn extract_skills(&self, text: &str) -> Vec<ExtractedSkill> {
        self.extractor.extract(text)
    }

    /// Ranked role matches for a skill list, at most six.
    pub fn match_roles(&self, skills: &[String]) -> Vec<RoleMatch> {
        self.matcher.match_roles(skills)
    }

    /// Live listings for the strongest detected skills: the top three
    /// ranked skills seed the queries of every source.
    pub async fn aggregate_listings(
        &self,
        skills: &[ExtractedSkill],
        transport: Arc<dyn PageFetcher>,
    ) -> Vec<JobPosting> {
        let top_skills: Vec<String> = skills.iter().take(3).map(|s| s.name.clone()).collect();
        Aggregator::new(transport).aggregate(&top_skills).await
    }

    /// Extraction, role matching and the categorized report in one pass.
    pub fn analyze(&self, text: &str) -> Analysis {
        let skills = self.extract_skills(text);
        let names: Vec<String> = skills.iter().map(|s| s.name.clone()).collect();
        let role_matches = self.match_roles(&names);
        let report = build_report(&self.skill_catalog, &names);

        Analysis {
            skills,
            role_matches,
            report,
        }
    }
}

impl Default for ResumeMatcher {
    fn default() -> Self {
        Self::new()
    }
}
