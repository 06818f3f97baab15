use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use regex::{Regex, RegexBuilder};
use tracing::{debug, error, info, warn};

use crate::config::ExtractorConfig;
use crate::domain::competitor::ExtractionResult;
use crate::domain::page::PageType;
use crate::error::{AppError, AppResult};
use crate::infra::sitemap;

#[derive(Debug, Clone)]
pub struct ExtractRequest {
    pub page_type: PageType,
    pub output_file: PathBuf,
    pub custom_pattern: Option<String>,
    pub exclude_patterns: Vec<String>,
}

/// Case-insensitive include pattern plus patterns that veto a match.
pub struct UrlFilter {
    include: Regex,
    excludes: Vec<Regex>,
}

impl UrlFilter {
    pub fn new(include: &str, excludes: &[String]) -> AppResult<Self> {
        Ok(Self {
            include: case_insensitive(include)?,
            excludes: excludes
                .iter()
                .map(|pattern| case_insensitive(pattern))
                .collect::<AppResult<_>>()?,
        })
    }

    pub fn matches(&self, url: &str) -> bool {
        self.include.is_match(url) && !self.excludes.iter().any(|exclude| exclude.is_match(url))
    }
}

fn case_insensitive(pattern: &str) -> AppResult<Regex> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

/// Picks the URL reported for one competitor.
///
/// Services listings prefer a plain `/services` page over `/dental-services`;
/// everything else takes the first qualifying URL.
pub fn select_url<'a>(
    page_type: &PageType,
    urls: &'a [String],
    filter: &UrlFilter,
) -> Option<&'a str> {
    let mut qualifying = urls.iter().filter(|url| filter.matches(url));
    let first = qualifying.next()?;

    if page_type.is_services_listing() {
        let preferred = std::iter::once(first)
            .chain(qualifying)
            .find(|url| {
                let lower = url.to_lowercase();
                lower.contains("/services") && !lower.contains("/dental-services")
            })
            .unwrap_or(first);
        return Some(preferred.as_str());
    }

    Some(first.as_str())
}

pub fn resolve_pattern<'a>(
    config: &'a ExtractorConfig,
    request: &'a ExtractRequest,
) -> AppResult<&'a str> {
    let custom = request.custom_pattern.as_deref().filter(|pattern| !pattern.is_empty());
    if let Some(pattern) = custom {
        return Ok(pattern);
    }
    config.pattern_for(&request.page_type).ok_or_else(|| {
        AppError::Configuration(format!(
            "unknown page type '{}' and no custom pattern provided. Available types: {}",
            request.page_type,
            config.page_type_names().join(", ")
        ))
    })
}

/// Scans every competitor sitemap and writes the matches to the request's
/// output file. Returns the number of rows written.
pub fn extract_urls_from_sitemaps(
    config: &ExtractorConfig,
    request: &ExtractRequest,
) -> AppResult<usize> {
    let pattern = resolve_pattern(config, request)?;
    let use_listing_default =
        request.page_type.is_services_listing() && request.exclude_patterns.is_empty();
    let excludes = if use_listing_default {
        config.listing_excludes.as_slice()
    } else {
        request.exclude_patterns.as_slice()
    };
    let filter = UrlFilter::new(pattern, excludes)?;

    let competitors = sitemap::load_competitors(&config.competitors_file)?;
    if competitors.is_empty() {
        warn!(
            file = %config.competitors_file.display(),
            "competitor table has no usable rows"
        );
    }
    info!(
        page_type = %request.page_type,
        competitors = competitors.len(),
        pattern,
        "extracting sitemap urls"
    );

    let mut results = Vec::new();
    let mut seen_ranks: HashSet<String> = HashSet::new();

    for path in sitemap::sitemap_files(&config.sitemap_dir)? {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let Some(rank) = sitemap::rank_from_filename(&file_name) else {
            continue;
        };
        let Some(name) = competitors.name_for(rank) else {
            continue;
        };
        if config.is_rank_excepted(&request.page_type, rank) {
            debug!(rank, name, "rank excepted for page type");
            continue;
        }
        if seen_ranks.contains(rank) {
            debug!(rank, file = %file_name, "rank already has a row");
            continue;
        }

        match match_sitemap(&path, &request.page_type, &filter) {
            Ok(Some(url)) => {
                println!("{rank}: {name} -> {url}");
                seen_ranks.insert(rank.to_string());
                results.push(ExtractionResult {
                    rank: rank.to_string(),
                    name: name.to_string(),
                    url,
                });
            }
            Ok(None) => debug!(rank, name, "no matching url"),
            Err(err) => error!(file = %file_name, error = %err, "error processing sitemap"),
        }
    }

    sitemap::write_results(&request.output_file, &results)?;

    println!();
    println!("TSV file created: {}", request.output_file.display());
    println!("Total entries: {}", results.len());
    Ok(results.len())
}

fn match_sitemap(
    path: &Path,
    page_type: &PageType,
    filter: &UrlFilter,
) -> AppResult<Option<String>> {
    let content = fs::read_to_string(path)?;
    let urls = sitemap::extract_locations(&content);
    Ok(select_url(page_type, &urls, filter).map(str::to_string))
}
