use clap::{Args, Subcommand};

use crate::config::{API_KEY_VARIABLE, AppConfig};
use crate::error::AppResult;
use crate::infra::shell_profile;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Show the resolved configuration (credential masked).
    Show,
}

pub fn run(config: &AppConfig, command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Show => run_show(config),
    }
}

fn run_show(config: &AppConfig) -> AppResult<()> {
    let api_key = match config.shell_profile.as_deref() {
        Some(path) => shell_profile::read_api_key(path, API_KEY_VARIABLE).ok(),
        None => None,
    };
    let profile = config
        .shell_profile
        .as_ref()
        .map(|path| path.display().to_string());

    let tickets = &config.tickets;
    println!("Shell profile: {}", display_value(&profile));
    println!("{API_KEY_VARIABLE}: {}", mask_secret(&api_key));
    println!("Linear endpoint: {}", tickets.endpoint);
    println!("Team id: {}", tickets.team_id);
    println!("Parent issue: {}", tickets.parent);
    println!("Priority: {}", tickets.priority);
    println!("Services: {}", tickets.services.len());
    println!("Pause between tickets: {:?}", tickets.pause);

    let extractor = &config.extractor;
    println!();
    println!("Sitemap directory: {}", extractor.sitemap_dir.display());
    println!("Competitor table: {}", extractor.competitors_file.display());
    for (page_type, pattern) in &extractor.patterns {
        println!("Pattern {page_type}: {pattern}");
    }
    for exception in &extractor.rank_exceptions {
        println!(
            "Skipped rank for {}: {}",
            exception.page_type, exception.rank
        );
    }

    Ok(())
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.len() > 6 && token.is_ascii() => {
            let prefix = &token[..3];
            let suffix = &token[token.len() - 3..];
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}
