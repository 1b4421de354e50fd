// src/catalog.rs
//! Static skill and role catalogs - loaded once at startup, passed explicitly

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Skill category grouping used for reporting and the catalog endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    ProgrammingLanguages,
    WebTechnologies,
    Databases,
    DataScienceAi,
    CloudDevops,
    MobileTechnologies,
    OtherSkills,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 7] = [
        SkillCategory::ProgrammingLanguages,
        SkillCategory::WebTechnologies,
        SkillCategory::Databases,
        SkillCategory::DataScienceAi,
        SkillCategory::CloudDevops,
        SkillCategory::MobileTechnologies,
        SkillCategory::OtherSkills,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            SkillCategory::ProgrammingLanguages => "Programming Languages",
            SkillCategory::WebTechnologies => "Web Technologies",
            SkillCategory::Databases => "Databases",
            SkillCategory::DataScienceAi => "Data Science & AI",
            SkillCategory::CloudDevops => "Cloud & DevOps",
            SkillCategory::MobileTechnologies => "Mobile Technologies",
            SkillCategory::OtherSkills => "Other Skills",
        }
    }
}

/// One recognized skill with its category membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: String,
    pub category: SkillCategory,
}

/// The full skill dictionary. Order is significant: extraction ties are
/// broken by dictionary order.
#[derive(Debug, Clone)]
pub struct SkillCatalog {
    entries: Vec<SkillEntry>,
}

#[derive(Deserialize)]
struct SkillCatalogFile {
    skills: Vec<SkillEntry>,
}

impl SkillCatalog {
    pub fn new(entries: Vec<SkillEntry>) -> Self {
        Self { entries }
    }

    /// Load an alternate catalog from a TOML file:
    /// `[[skills]] name = "Python" category = "programming_languages"`
    pub async fn from_toml_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read skill catalog: {}", path.display()))?;
        let parsed: SkillCatalogFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse skill catalog: {}", path.display()))?;
        info!(
            "Loaded skill catalog with {} entries from {}",
            parsed.skills.len(),
            path.display()
        );
        Ok(Self::new(parsed.skills))
    }

    pub fn entries(&self) -> &[SkillEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical entry for a skill name, case-insensitive.
    pub fn lookup(&self, name: &str) -> Option<&SkillEntry> {
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Filter an arbitrary skill list down to dictionary members,
    /// returning canonical display names.
    pub fn validate(&self, skills: &[String]) -> Vec<String> {
        skills
            .iter()
            .filter_map(|s| self.lookup(s).map(|e| e.name.clone()))
            .collect()
    }

    /// Skills grouped by category, in category declaration order.
    pub fn by_category(&self) -> Vec<(SkillCategory, Vec<&str>)> {
        SkillCategory::ALL
            .iter()
            .map(|cat| {
                let names = self
                    .entries
                    .iter()
                    .filter(|e| e.category == *cat)
                    .map(|e| e.name.as_str())
                    .collect();
                (*cat, names)
            })
            .collect()
    }
}

impl Default for SkillCatalog {
    fn default() -> Self {
        let mut entries = Vec::new();
        let mut add = |names: &[&str], category: SkillCategory| {
            entries.extend(names.iter().map(|n| SkillEntry {
                name: (*n).to_string(),
                category,
            }));
        };

        add(
            &[
                "Python",
                "Java",
                "JavaScript",
                "TypeScript",
                "C++",
                "C#",
                "C",
                "PHP",
                "Ruby",
                "Go",
                "Rust",
                "Swift",
                "Kotlin",
                "Scala",
                "R",
                "MATLAB",
                "Perl",
                "Shell",
                "Bash",
                "PowerShell",
                "Objective-C",
                "Dart",
                "Lua",
                "Assembly",
                "COBOL",
                "Fortran",
                "Haskell",
                "Clojure",
                "Elixir",
            ],
            SkillCategory::ProgrammingLanguages,
        );
        add(
            &[
                "HTML",
                "CSS",
                "React",
                "Angular",
                "Vue.js",
                "Node.js",
                "Express.js",
                "Django",
                "Flask",
                "FastAPI",
                "Spring Boot",
                "Laravel",
                "ASP.NET",
                "Bootstrap",
                "Tailwind CSS",
                "jQuery",
                "AJAX",
                "REST API",
                "GraphQL",
                "JSON",
                "XML",
                "WebSocket",
                "Next.js",
                "Nuxt.js",
                "Svelte",
                "Webpack",
                "Babel",
                "Sass",
                "SCSS",
                "Less",
                "Material-UI",
                "Ant Design",
                "Chakra UI",
            ],
            SkillCategory::WebTechnologies,
        );
        add(
            &[
                "SQL",
                "MySQL",
                "PostgreSQL",
                "MongoDB",
                "Redis",
                "Cassandra",
                "Oracle",
                "SQLite",
                "Firebase",
                "DynamoDB",
                "Neo4j",
                "Elasticsearch",
                "MariaDB",
                "CouchDB",
                "InfluxDB",
                "Apache Spark",
                "Hadoop",
                "BigQuery",
                "Snowflake",
                "Clickhouse",
                "Amazon RDS",
            ],
            SkillCategory::Databases,
        );
        add(
            &[
                "Machine Learning",
                "Deep Learning",
                "Data Analysis",
                "Data Science",
                "NLP",
                "Computer Vision",
                "TensorFlow",
                "PyTorch",
                "Scikit-learn",
                "Pandas",
                "NumPy",
                "Matplotlib",
                "Seaborn",
                "Jupyter",
                "Tableau",
                "Power BI",
                "Statistics",
                "Data Mining",
                "Neural Networks",
                "CNN",
                "RNN",
                "LSTM",
                "OpenCV",
                "NLTK",
                "spaCy",
                "Keras",
                "XGBoost",
                "Random Forest",
                "SVM",
                "Regression",
                "Classification",
            ],
            SkillCategory::DataScienceAi,
        );
        add(
            &[
                "AWS",
                "Azure",
                "Google Cloud",
                "Docker",
                "Kubernetes",
                "Jenkins",
                "Git",
                "GitLab",
                "GitHub",
                "CI/CD",
                "Terraform",
                "Ansible",
                "Linux",
                "Ubuntu",
                "CentOS",
                "DevOps",
                "Microservices",
                "Serverless",
                "CloudFormation",
                "Helm",
                "Istio",
                "Prometheus",
                "Grafana",
                "ELK Stack",
                "Nagios",
            ],
            SkillCategory::CloudDevops,
        );
        add(
            &[
                "Android",
                "iOS",
                "React Native",
                "Flutter",
                "Xamarin",
                "Ionic",
                "Mobile Development",
                "Cross-platform",
                "Native Development",
                "Cordova",
            ],
            SkillCategory::MobileTechnologies,
        );
        add(
            &[
                "Testing",
                "Unit Testing",
                "Selenium",
                "Postman",
                "Jest",
                "Cypress",
                "JUnit",
                "TestNG",
                "API Testing",
                "Automation Testing",
                "Manual Testing",
                "QA",
                "Figma",
                "Adobe XD",
                "Sketch",
                "UI/UX Design",
                "Photoshop",
                "Illustrator",
                "Agile",
                "Scrum",
                "Kanban",
                "JIRA",
                "Confluence",
                "Project Management",
                "Version Control",
                "Problem Solving",
                "Team Leadership",
                "Communication",
            ],
            SkillCategory::OtherSkills,
        );

        Self { entries }
    }
}

/// A job role profile: required and preferred skill sets plus an
/// importance weight applied to the combined score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleProfile {
    pub title: String,
    pub required: Vec<String>,
    pub preferred: Vec<String>,
    pub weight: f64,
}

/// Role catalog. Declaration order is preserved so equal-score matches
/// rank deterministically.
#[derive(Debug, Clone)]
pub struct RoleCatalog {
    profiles: Vec<RoleProfile>,
}

#[derive(Deserialize)]
struct RoleCatalogFile {
    roles: Vec<RoleProfile>,
}

impl RoleCatalog {
    pub fn new(profiles: Vec<RoleProfile>) -> Self {
        Self { profiles }
    }

    /// Load an alternate role catalog from a TOML file:
    /// `[[roles]] title = "..." required = [...] preferred = [...] weight = 1.4`
    pub async fn from_toml_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read role catalog: {}", path.display()))?;
        let parsed: RoleCatalogFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse role catalog: {}", path.display()))?;
        info!(
            "Loaded role catalog with {} profiles from {}",
            parsed.roles.len(),
            path.display()
        );
        Ok(Self::new(parsed.roles))
    }

    pub fn profiles(&self) -> &[RoleProfile] {
        &self.profiles
    }
}

impl Default for RoleCatalog {
    fn default() -> Self {
        let role = |title: &str, required: &[&str], preferred: &[&str], weight: f64| RoleProfile {
            title: title.to_string(),
            required: required.iter().map(|s| s.to_string()).collect(),
            preferred: preferred.iter().map(|s| s.to_string()).collect(),
            weight,
        };

        Self {
            profiles: vec![
                role(
                    "Python Developer",
                    &["python"],
                    &["django", "flask", "fastapi", "sql", "git", "rest api"],
                    1.4,
                ),
                role(
                    "Full Stack Developer",
                    &["javascript", "html", "css"],
                    &["react", "node.js", "python", "sql", "git", "mongodb"],
                    1.3,
                ),
                role(
                    "Data Scientist",
                    &["python", "data analysis"],
                    &[
                        "machine learning",
                        "pandas",
                        "numpy",
                        "sql",
                        "statistics",
                        "matplotlib",
                    ],
                    1.6,
                ),
                role(
                    "Frontend Developer",
                    &["javascript", "html", "css"],
                    &["react", "angular", "vue.js", "typescript", "bootstrap"],
                    1.2,
                ),
                role(
                    "Backend Developer",
                    &["python", "java", "node.js"],
                    &["sql", "mongodb", "rest api", "microservices", "docker"],
                    1.4,
                ),
                role(
                    "Machine Learning Engineer",
                    &["python", "machine learning"],
                    &["tensorflow", "pytorch", "deep learning", "nlp", "aws"],
                    1.7,
                ),
                role(
                    "DevOps Engineer",
                    &["linux", "docker"],
                    &["kubernetes", "aws", "jenkins", "terraform", "ci/cd"],
                    1.5,
                ),
                role(
                    "Mobile Developer",
                    &["android", "ios", "react native", "flutter"],
                    &["java", "swift", "kotlin", "mobile development"],
                    1.3,
                ),
                role(
                    "Database Administrator",
                    &["sql", "mysql", "postgresql"],
                    &["oracle", "mongodb", "database design", "performance tuning"],
                    1.3,
                ),
                role(
                    "UI/UX Designer",
                    &["figma", "ui/ux design"],
                    &["adobe xd", "sketch", "photoshop", "wireframing", "prototyping"],
                    1.2,
                ),
            ],
        }
    }
}
