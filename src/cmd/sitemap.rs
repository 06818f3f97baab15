use std::path::PathBuf;

use clap::Args;

use crate::config::ExtractorConfig;
use crate::domain::page::PageType;
use crate::error::AppResult;
use crate::workflow::sitemap_urls::{ExtractRequest, extract_urls_from_sitemaps};

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Page type: services_listing, team, doctor_profiles, about, contact, or any name
    /// together with a custom pattern.
    pub page_type: String,
    /// Output TSV file (rank, name, url).
    pub output_file: PathBuf,
    /// Regex overriding the page type's default pattern.
    pub pattern: Option<String>,
    /// Regex excluding otherwise matching URLs. Repeatable.
    #[arg(short, long = "exclude")]
    pub excludes: Vec<String>,
    /// Directory holding `<rank>_..._sitemap.xml` files.
    #[arg(long)]
    pub sitemap_dir: Option<PathBuf>,
    /// Competitor ranking TSV (rank, name, ...).
    #[arg(long)]
    pub competitors: Option<PathBuf>,
}

pub fn run(mut config: ExtractorConfig, args: ExtractArgs) -> AppResult<usize> {
    if let Some(dir) = args.sitemap_dir {
        config.sitemap_dir = dir;
    }
    if let Some(file) = args.competitors {
        config.competitors_file = file;
    }

    let request = ExtractRequest {
        page_type: PageType::from_str(&args.page_type),
        output_file: args.output_file,
        custom_pattern: args.pattern,
        exclude_patterns: args.excludes,
    };

    extract_urls_from_sitemaps(&config, &request)
}
