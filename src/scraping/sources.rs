// src/scraping/sources.rs
//! Data-driven per-source tables: query shapes, candidate URL templates
//! and selector fallback chains. Adding a source means adding a table,
//! not new control flow.

use super::JobSource;
use url::Url;

/// Ordered selector fallback chains for one source's markup. The first
/// selector that yields a usable value wins; chains exist because the
/// markup is not under our control and changes without notice.
pub struct SelectorChains {
    pub container: &'static [&'static str],
    pub title: &'static [&'static str],
    /// Attribute carrying the title when the element text is empty
    /// (Indeed puts it in `title=`).
    pub title_attr: Option<&'static str>,
    pub company: &'static [&'static str],
    pub link: &'static [&'static str],
}

pub struct SourceSpec {
    pub source: JobSource,
    /// Company text longer than this is prose captured by accident.
    pub max_company_len: usize,
    pub selectors: SelectorChains,
}

static INTERNSHALA: SourceSpec = SourceSpec {
    source: JobSource::Internshala,
    max_company_len: 100,
    selectors: SelectorChains {
        container: &[
            "div.individual_internship",
            "div.internship_meta",
            "div[id*=\"internship\"]",
            "div.job-tile",
            "div.container-fluid.individual_internship",
        ],
        title: &[
            "h3.job-internship-name a",
            "h4.job-internship-name a",
            "h3 a",
            ".profile h3 a",
            ".heading_4_5 a",
            "a[href*=\"internship/detail\"]",
            "h3",
            "h4",
            ".profile",
            ".heading_4_5",
        ],
        title_attr: None,
        company: &[
            ".company-name",
            ".company_name",
            "p.company_name",
            "a.link_display_like_text",
            ".company",
            ".text-muted",
        ],
        link: &[
            "a[href*=\"internship/detail\"]",
            "a[href*=\"job/detail\"]",
            ".view_detail_button",
            "h3 a",
            "h4 a",
        ],
    },
};

static NAUKRI: SourceSpec = SourceSpec {
    source: JobSource::Naukri,
    max_company_len: 80,
    selectors: SelectorChains {
        container: &[
            "article.jobTuple",
            "div.srp-jobtuple-wrapper",
            "div.jobTuple",
            "div[class*=\"job\"]",
        ],
        title: &[
            "a.title",
            ".jobTupleHeader .title a",
            "h3 a",
            "h4 a",
            "[data-job-title]",
        ],
        title_attr: None,
        company: &[
            "a.subTitle",
            ".company",
            ".companyInfo",
            ".comp-name",
            ".jobTupleHeader .subTitle",
        ],
        link: &["a.title", "h3 a", "h4 a"],
    },
};

static INDEED: SourceSpec = SourceSpec {
    source: JobSource::Indeed,
    max_company_len: 100,
    selectors: SelectorChains {
        container: &[
            "div[data-result-id]",
            "div.job_seen_beacon",
            "td.resultContent",
            "div.slider_container",
        ],
        title: &[
            "h2 a span[title]",
            "h2.jobTitle a span",
            ".jobTitle a",
            "h2 span[title]",
        ],
        title_attr: Some("title"),
        company: &[
            "span.companyName",
            ".companyName",
            "span[data-testid=\"company-name\"]",
            ".company",
        ],
        link: &["h2 a", ".jobTitle a"],
    },
};

impl SourceSpec {
    pub fn for_source(source: JobSource) -> &'static SourceSpec {
        match source {
            JobSource::Internshala => &INTERNSHALA,
            JobSource::Naukri => &NAUKRI,
            JobSource::Indeed => &INDEED,
        }
    }

    /// Derive up to four distinct search queries from the top ranked
    /// skills (at most three skills are consulted).
    pub fn build_queries(&self, top_skills: &[String]) -> Vec<String> {
        let mut queries: Vec<String> = Vec::new();
        let mut push = |q: String| {
            if !queries.contains(&q) {
                queries.push(q);
            }
        };

        for skill in top_skills.iter().take(3) {
            match self.source {
                JobSource::Internshala => {
                    push(format!("{} developer", skill));
                    push(format!("{} engineer", skill));
                    push(format!("{} intern", skill));
                    push(skill.to_lowercase());
                }
                JobSource::Naukri => push(format!("{} jobs", skill)),
                JobSource::Indeed => push(format!("{} developer", skill)),
            }
        }

        queries.truncate(4);
        queries
    }

    /// Candidate URLs for one query, tried in order until one yields
    /// parseable results.
    pub fn candidate_urls(&self, query: &str) -> Vec<String> {
        let slug = query.replace(' ', "-").to_lowercase();
        match self.source {
            JobSource::Internshala => vec![
                format!("https://internshala.com/internships/keywords-{}", slug),
                format!("https://internshala.com/jobs/keywords-{}", slug),
                format!("https://internshala.com/internships/{}", slug),
            ],
            JobSource::Naukri => vec![format!("https://www.naukri.com/{}", slug)],
            JobSource::Indeed => vec![self.search_url(query)],
        }
    }

    /// Search results URL, also used as the posting-link fallback.
    pub fn search_url(&self, query: &str) -> String {
        let slug = query.replace(' ', "-").to_lowercase();
        match self.source {
            JobSource::Internshala => {
                format!("https://internshala.com/internships/keywords-{}", slug)
            }
            JobSource::Naukri => format!("https://www.naukri.com/{}", slug),
            JobSource::Indeed => {
                Url::parse_with_params("https://in.indeed.com/jobs", &[("q", query), ("l", "India")])
                    .map(String::from)
                    .unwrap_or_else(|_| "https://in.indeed.com/jobs".to_string())
            }
        }
    }
}
