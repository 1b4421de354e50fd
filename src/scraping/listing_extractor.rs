// src/scraping/listing_extractor.rs
//! Pulls title/company/link out of heterogeneous source markup using
//! the per-source selector fallback chains.

use super::sources::SourceSpec;
use super::JobPosting;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

/// Titles of at most this many characters are fragments, not job titles.
const MIN_TITLE_LEN: usize = 5;

/// Extract postings from one page of source markup. Fields falling
/// through their whole selector chain get the source's fallback values;
/// cards without an acceptable title are skipped entirely.
pub fn extract_postings(
    spec: &SourceSpec,
    markup: &str,
    query: &str,
    limit: usize,
) -> Vec<JobPosting> {
    let document = Html::parse_document(markup);
    let cards = select_cards(&document, spec, limit);

    if cards.is_empty() {
        debug!(
            "No job cards found in {} markup for '{}'",
            spec.source.display_name(),
            query
        );
        return Vec::new();
    }

    let mut postings = Vec::new();

    for card in cards {
        let Some(title) = extract_title(&card, spec) else {
            continue;
        };

        let company = extract_company(&card, spec)
            .unwrap_or_else(|| spec.source.placeholder_company());

        let link = extract_link(&card, spec)
            .unwrap_or_else(|| spec.search_url(query));

        postings.push(JobPosting {
            title,
            company,
            link,
            source: spec.source,
            query_used: query.to_string(),
        });
    }

    postings
}

/// First container selector producing any cards wins.
fn select_cards<'a>(
    document: &'a Html,
    spec: &SourceSpec,
    limit: usize,
) -> Vec<ElementRef<'a>> {
    for selector_str in spec.selectors.container {
        let Ok(selector) = Selector::parse(selector_str) else {
            warn!("Invalid container selector: {}", selector_str);
            continue;
        };
        let cards: Vec<ElementRef<'a>> = document.select(&selector).take(limit).collect();
        if !cards.is_empty() {
            debug!(
                "Found {} cards with selector '{}' ({})",
                cards.len(),
                selector_str,
                spec.source.display_name()
            );
            return cards;
        }
    }
    Vec::new()
}

fn extract_title(card: &ElementRef, spec: &SourceSpec) -> Option<String> {
    for selector_str in spec.selectors.title {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(element) = card.select(&selector).next() {
            // Some sources keep the real title in an attribute.
            if let Some(attr) = spec.selectors.title_attr {
                if let Some(value) = element.value().attr(attr) {
                    let text = clean_text(value);
                    if text.chars().count() > MIN_TITLE_LEN {
                        return Some(text);
                    }
                }
            }
            let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
            if text.chars().count() > MIN_TITLE_LEN {
                return Some(text);
            }
        }
    }
    None
}

fn extract_company(card: &ElementRef, spec: &SourceSpec) -> Option<String> {
    for selector_str in spec.selectors.company {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(element) = card.select(&selector).next() {
            let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
            if !text.is_empty() && text.len() < spec.max_company_len {
                return Some(text);
            }
        }
    }
    None
}

fn extract_link(card: &ElementRef, spec: &SourceSpec) -> Option<String> {
    for selector_str in spec.selectors.link {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(element) = card.select(&selector).next() {
            if let Some(href) = element.value().attr("href") {
                if let Some(link) = normalize_link(href, spec) {
                    return Some(link);
                }
            }
        }
    }
    None
}

/// Absolute URLs pass through, root-relative paths are joined with the
/// source origin, anything else is discarded.
fn normalize_link(href: &str, spec: &SourceSpec) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        Some(href.to_string())
    } else if href.starts_with('/') {
        Some(format!("{}{}", spec.source.base_origin(), href))
    } else {
        None
    }
}

fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraping::JobSource;

    fn internshala() -> &'static SourceSpec {
        SourceSpec::for_source(JobSource::Internshala)
    }

    const INTERNSHALA_PAGE: &str = r#"
        <html><body>
          <div class="individual_internship">
            <h3 class="job-internship-name"><a href="/internship/detail/python-dev">Python Developer Intern</a></h3>
            <p class="company_name">Acme Robotics</p>
          </div>
          <div class="individual_internship">
            <h3 class="job-internship-name"><a href="https://internshala.com/internship/detail/data">Data Analyst Intern</a></h3>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_extracts_title_company_and_link() {
        let postings = extract_postings(internshala(), INTERNSHALA_PAGE, "python developer", 6);
        assert_eq!(postings.len(), 2);

        let first = &postings[0];
        assert_eq!(first.title, "Python Developer Intern");
        assert_eq!(first.company, "Acme Robotics");
        assert_eq!(
            first.link,
            "https://internshala.com/internship/detail/python-dev"
        );
        assert_eq!(first.source, JobSource::Internshala);
        assert_eq!(first.query_used, "python developer");
    }

    #[test]
    fn test_missing_company_uses_placeholder() {
        let postings = extract_postings(internshala(), INTERNSHALA_PAGE, "python developer", 6);
        assert_eq!(postings[1].company, "Internshala Partner Company");
    }

    #[test]
    fn test_absolute_link_passes_through() {
        let postings = extract_postings(internshala(), INTERNSHALA_PAGE, "python developer", 6);
        assert_eq!(
            postings[1].link,
            "https://internshala.com/internship/detail/data"
        );
    }

    #[test]
    fn test_short_titles_are_rejected() {
        let markup = r#"
            <div class="individual_internship">
              <h3 class="job-internship-name"><a href="/internship/detail/x">QA</a></h3>
            </div>
        "#;
        let postings = extract_postings(internshala(), markup, "qa", 6);
        assert!(postings.is_empty());
    }

    #[test]
    fn test_title_minimum_counts_characters_not_bytes() {
        // "डेटा" is four characters in twelve bytes; it is still too
        // short. The full Hindi title clears the minimum.
        let markup = r#"
            <div class="individual_internship">
              <h3><a href="/internship/detail/a">डेटा</a></h3>
            </div>
            <div class="individual_internship">
              <h3><a href="/internship/detail/b">डेटा इंजीनियर</a></h3>
            </div>
        "#;
        let postings = extract_postings(internshala(), markup, "data", 6);
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].title, "डेटा इंजीनियर");
    }

    #[test]
    fn test_oversized_company_falls_back_to_placeholder() {
        let prose = "a".repeat(150);
        let markup = format!(
            r#"<div class="individual_internship">
                 <h3><a href="/internship/detail/y">Backend Engineer</a></h3>
                 <p class="company_name">{}</p>
               </div>"#,
            prose
        );
        let postings = extract_postings(internshala(), &markup, "backend", 6);
        assert_eq!(postings[0].company, "Internshala Partner Company");
    }

    #[test]
    fn test_unusable_link_falls_back_to_search_url() {
        let markup = r#"
            <div class="individual_internship">
              <h3><a href="javascript:void(0)">Backend Engineer</a></h3>
            </div>
        "#;
        let postings = extract_postings(internshala(), markup, "python developer", 6);
        assert_eq!(
            postings[0].link,
            "https://internshala.com/internships/keywords-python-developer"
        );
    }

    #[test]
    fn test_container_fallback_chain() {
        // No individual_internship wrapper; the job-tile fallback matches.
        let markup = r#"
            <div class="job-tile">
              <h3><a href="/internship/detail/z">Frontend Developer</a></h3>
            </div>
        "#;
        let postings = extract_postings(internshala(), markup, "frontend", 6);
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].title, "Frontend Developer");
    }

    #[test]
    fn test_indeed_title_attribute() {
        let spec = SourceSpec::for_source(JobSource::Indeed);
        let markup = r#"
            <div class="job_seen_beacon">
              <h2 class="jobTitle"><a href="/rc/clk?jk=1"><span title="Senior Rust Engineer">Short</span></a></h2>
              <span class="companyName">Ferrous Systems</span>
            </div>
        "#;
        let postings = extract_postings(spec, markup, "rust developer", 6);
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].title, "Senior Rust Engineer");
        assert_eq!(postings[0].company, "Ferrous Systems");
        assert_eq!(postings[0].link, "https://in.indeed.com/rc/clk?jk=1");
    }

    #[test]
    fn test_limit_bounds_card_count() {
        let mut markup = String::from("<html><body>");
        for i in 0..10 {
            markup.push_str(&format!(
                r#"<div class="individual_internship">
                     <h3><a href="/internship/detail/{i}">Engineer Number {i}</a></h3>
                   </div>"#
            ));
        }
        markup.push_str("</body></html>");
        let postings = extract_postings(internshala(), &markup, "engineer", 4);
        assert_eq!(postings.len(), 4);
    }
}
