use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::page::PageType;
use crate::domain::ticket::ParentReference;
use crate::error::{AppError, AppResult};

pub const LINEAR_ENDPOINT: &str = "https://api.linear.app/graphql";
pub const API_KEY_VARIABLE: &str = "LINEAR_API_KEY";

/// Minisites team.
const TEAM_ID: &str = "5b5c2471-d25c-4b70-81bf-5b2707f6553f";
const TEAM_KEY: &str = "MIN";
const PARENT_ISSUE_NUMBER: u32 = 42;
const TICKET_PRIORITY: u8 = 3;

pub const DEFAULT_SERVICES: [&str; 24] = [
    "dental-exams-cleanings",
    "fillings",
    "root-canal",
    "tooth-extractions",
    "childrens-dentistry",
    "preventive-care",
    "teeth-whitening",
    "veneers",
    "invisalign",
    "dental-bonding",
    "smile-makeovers",
    "dental-crowns",
    "dental-bridges",
    "dental-implants",
    "dentures",
    "emergency-dentistry",
    "tooth-pain-relief",
    "broken-tooth-repair",
    "sedation-dentistry",
    "periodontal-treatment",
    "night-guards",
    "oral-cancer-screening",
    "digital-x-rays",
    "sleep-apnea-treatment",
];

const SITEMAP_DIR: &str = "docs/websites/pages/sitemap";
const COMPETITORS_FILE: &str = "docs/strategy/competitor/top_competitors_home.tsv";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub shell_profile: Option<PathBuf>,
    pub tickets: TicketRunConfig,
    pub extractor: ExtractorConfig,
}

/// Everything the service-ticket run needs besides the credential.
#[derive(Debug, Clone)]
pub struct TicketRunConfig {
    pub endpoint: String,
    pub team_id: String,
    pub parent: ParentReference,
    pub priority: u8,
    pub services: Vec<String>,
    pub pause: Duration,
}

impl Default for TicketRunConfig {
    fn default() -> Self {
        Self {
            endpoint: LINEAR_ENDPOINT.to_string(),
            team_id: TEAM_ID.to_string(),
            parent: ParentReference {
                team_key: TEAM_KEY.to_string(),
                number: PARENT_ISSUE_NUMBER,
            },
            priority: TICKET_PRIORITY,
            services: DEFAULT_SERVICES.iter().map(|s| s.to_string()).collect(),
            pause: Duration::from_secs(1),
        }
    }
}

/// A competitor rank that never yields a row for one page type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankException {
    pub page_type: PageType,
    pub rank: String,
}

#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub sitemap_dir: PathBuf,
    pub competitors_file: PathBuf,
    /// Default include pattern per page type, in listing order.
    pub patterns: Vec<(PageType, String)>,
    /// Applied to `services_listing` when no excludes are given.
    pub listing_excludes: Vec<String>,
    pub rank_exceptions: Vec<RankException>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        let patterns = [
            (
                PageType::ServicesListing,
                r"/(services|dental-services)/?$|/dental-services-cedar-park",
            ),
            (
                PageType::Team,
                r"/(team|staff|doctors|meet-our-team|our-team)/?$",
            ),
            (PageType::DoctorProfiles, r"/(dr-|doctor-|dentist-)[^/]+/?$"),
            (PageType::About, r"/(about|about-us)/?$"),
            (PageType::Contact, r"/(contact|contact-us)/?$"),
        ];

        Self {
            sitemap_dir: PathBuf::from(SITEMAP_DIR),
            competitors_file: PathBuf::from(COMPETITORS_FILE),
            patterns: patterns
                .into_iter()
                .map(|(page, pattern)| (page, pattern.to_string()))
                .collect(),
            listing_excludes: vec![r"/(services|service)/[^/]+/".to_string()],
            // Aviva itself has no services listing page.
            rank_exceptions: vec![RankException {
                page_type: PageType::ServicesListing,
                rank: "16".to_string(),
            }],
        }
    }
}

impl ExtractorConfig {
    pub fn pattern_for(&self, page_type: &PageType) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(page, _)| page == page_type)
            .map(|(_, pattern)| pattern.as_str())
    }

    pub fn page_type_names(&self) -> Vec<&str> {
        self.patterns.iter().map(|(page, _)| page.as_str()).collect()
    }

    pub fn is_rank_excepted(&self, page_type: &PageType, rank: &str) -> bool {
        self.rank_exceptions
            .iter()
            .any(|exception| &exception.page_type == page_type && exception.rank == rank)
    }
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        let shell_profile = env::var_os("AVIVA_SHELL_PROFILE")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".zshrc")));

        let mut tickets = TicketRunConfig::default();
        if let Ok(endpoint) = env::var("AVIVA_LINEAR_ENDPOINT") {
            let endpoint = endpoint.trim();
            if endpoint.is_empty() {
                return Err(AppError::Configuration(
                    "AVIVA_LINEAR_ENDPOINT is set but empty".to_string(),
                ));
            }
            tickets.endpoint = endpoint.to_string();
        }

        Ok(Self {
            shell_profile,
            tickets,
            extractor: ExtractorConfig::default(),
        })
    }

    pub fn shell_profile(&self) -> AppResult<&PathBuf> {
        self.shell_profile.as_ref().ok_or_else(|| {
            AppError::Configuration("could not determine the home directory".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_default_patterns() {
        let config = ExtractorConfig::default();
        assert_eq!(
            config.pattern_for(&PageType::About),
            Some(r"/(about|about-us)/?$")
        );
        assert_eq!(config.pattern_for(&PageType::Other("blog".into())), None);
        assert_eq!(
            config.page_type_names(),
            vec!["services_listing", "team", "doctor_profiles", "about", "contact"]
        );
    }

    #[test]
    fn rank_exception_is_scoped_to_page_type() {
        let config = ExtractorConfig::default();
        assert!(config.is_rank_excepted(&PageType::ServicesListing, "16"));
        assert!(!config.is_rank_excepted(&PageType::Team, "16"));
        assert!(!config.is_rank_excepted(&PageType::ServicesListing, "15"));
    }

    #[test]
    fn ticket_defaults_cover_every_service() {
        let config = TicketRunConfig::default();
        assert_eq!(config.services.len(), 24);
        assert_eq!(config.services[0], "dental-exams-cleanings");
        assert_eq!(config.parent.to_string(), "MIN-42");
        assert_eq!(config.priority, 3);
    }
}
