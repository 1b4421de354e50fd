use anyhow::{Context, Result};
use clap::Parser;
use resume_matcher::scraping::Aggregator;
use resume_matcher::{
    DocumentDecoder, HttpPageFetcher, PlainTextDecoder, ResumeMatcher, RoleCatalog, SkillCatalog,
    NO_SKILLS_GUIDANCE,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Analyze a resume text file: extract skills, rank role matches and
/// optionally aggregate live job listings.
#[derive(Parser)]
#[command(name = "jobradar", version)]
struct Cli {
    /// Resume file (plain text or markdown)
    resume: PathBuf,

    /// Also fetch live job listings for the top skills
    #[arg(long)]
    jobs: bool,

    /// Overall time budget for listing aggregation, in seconds
    #[arg(long, default_value_t = 120)]
    jobs_timeout: u64,

    /// Alternate skill catalog (TOML)
    #[arg(long)]
    skill_catalog: Option<PathBuf>,

    /// Alternate role catalog (TOML)
    #[arg(long)]
    role_catalog: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let skills = match &cli.skill_catalog {
        Some(path) => Arc::new(SkillCatalog::from_toml_file(path).await?),
        None => Arc::new(SkillCatalog::default()),
    };
    let roles = match &cli.role_catalog {
        Some(path) => Arc::new(RoleCatalog::from_toml_file(path).await?),
        None => Arc::new(RoleCatalog::default()),
    };
    info!("Skill catalog loaded with {} entries", skills.len());

    let bytes = tokio::fs::read(&cli.resume)
        .await
        .with_context(|| format!("Failed to read resume: {}", cli.resume.display()))?;
    let text = PlainTextDecoder
        .decode(&bytes)
        .context("Cannot process this file")?;

    let matcher = ResumeMatcher::with_catalogs(skills, roles);
    let analysis = matcher.analyze(&text);

    if analysis.no_skills_found() {
        eprintln!("{}", NO_SKILLS_GUIDANCE);
        return Ok(());
    }

    let mut output = serde_json::json!({
        "skills": analysis.skills,
        "role_matches": analysis.role_matches,
        "report": analysis.report,
    });

    if cli.jobs {
        let top_skills: Vec<String> = analysis
            .skills
            .iter()
            .take(3)
            .map(|s| s.name.clone())
            .collect();

        let transport = Arc::new(HttpPageFetcher::new()?);
        let aggregator = Aggregator::new(transport)
            .with_deadline(Duration::from_secs(cli.jobs_timeout));
        let postings = aggregator.aggregate(&top_skills).await;
        info!("Collected {} job listings", postings.len());

        output["job_listings"] = serde_json::to_value(&postings)?;
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
