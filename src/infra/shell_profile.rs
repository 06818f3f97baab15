use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use regex::Regex;

use crate::error::{AppError, AppResult};

/// Reads `variable` from an `export` line of a shell profile.
pub fn read_api_key(path: &Path, variable: &str) -> AppResult<String> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(AppError::Configuration(format!(
                "{variable} not found in {}",
                path.display()
            )));
        }
        Err(err) => return Err(AppError::Io(err)),
    };

    parse_api_key(&contents, variable)?.ok_or_else(|| {
        AppError::Configuration(format!("{variable} not found in {}", path.display()))
    })
}

pub fn parse_api_key(contents: &str, variable: &str) -> AppResult<Option<String>> {
    let prefix = format!("export {variable}=");
    let name = regex::escape(variable);
    let quoted = Regex::new(&format!(r#"{name}="([^"]+)""#))?;
    let unquoted = Regex::new(&format!(r"{name}=(\S+)"))?;

    for line in contents.lines().filter(|line| line.starts_with(&prefix)) {
        if let Some(captures) = quoted.captures(line) {
            return Ok(Some(captures[1].to_string()));
        }
        if let Some(captures) = unquoted.captures(line) {
            let value = captures[1].trim_matches(|c| c == '"' || c == '\'');
            return Ok(Some(value.to_string()).filter(|value| !value.is_empty()));
        }
    }

    Ok(None)
}
