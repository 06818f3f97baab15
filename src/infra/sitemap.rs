use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use regex::Regex;
use tracing::warn;

use crate::domain::competitor::{CompetitorTable, ExtractionResult};
use crate::error::{AppError, AppResult};

const SITEMAP_SUFFIX: &str = "_sitemap.xml";

static LOC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<loc>(https?://[^<]+)</loc>").expect("valid loc pattern"));
static RANK_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)_").expect("valid rank pattern"));

/// Loads rank -> name from the competitor TSV. Rows with fewer than three
/// columns, once surrounding whitespace is stripped from the line, are skipped.
pub fn load_competitors(path: &Path) -> AppResult<CompetitorTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_path(path)?;

    let mut table = CompetitorTable::default();
    for record in reader.records() {
        let record = record?;
        let fields = stripped_fields(&record);
        if fields.len() < 3 {
            continue;
        }
        table.insert(fields[0], fields[1]);
    }
    Ok(table)
}

/// Fields of a row with whitespace stripped from the ends of the whole line,
/// so blank leading or trailing columns disappear. Inner fields are untouched.
fn stripped_fields(record: &StringRecord) -> Vec<&str> {
    let mut fields = record.iter().collect::<Vec<_>>();
    while fields.first().is_some_and(|field| field.trim().is_empty()) {
        fields.remove(0);
    }
    while fields.last().is_some_and(|field| field.trim().is_empty()) {
        fields.pop();
    }
    if let Some(first) = fields.first_mut() {
        *first = first.trim_start();
    }
    if let Some(last) = fields.last_mut() {
        *last = last.trim_end();
    }
    fields
}

/// Sitemap files in `dir`, sorted by file name. A missing directory holds no
/// sitemaps.
pub fn sitemap_files(dir: &Path) -> AppResult<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(dir = %dir.display(), "sitemap directory not found");
            return Ok(Vec::new());
        }
        Err(err) => return Err(listing_error(dir, err)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| listing_error(dir, err))?.path();
        let is_sitemap = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(SITEMAP_SUFFIX));
        if is_sitemap && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn listing_error(dir: &Path, err: std::io::Error) -> AppError {
    AppError::Sitemap(format!("failed to list {}: {err}", dir.display()))
}

/// Leading numeric prefix of a file name such as `03_example_sitemap.xml`.
pub fn rank_from_filename(name: &str) -> Option<&str> {
    RANK_PREFIX
        .captures(name)
        .and_then(|captures| captures.get(1))
        .map(|rank| rank.as_str())
}

/// Every `<loc>` URL in document order; the rest of the document is ignored.
pub fn extract_locations(content: &str) -> Vec<String> {
    LOC_PATTERN
        .captures_iter(content)
        .map(|captures| captures[1].to_string())
        .collect()
}

/// Writes `rank\tname\turl` rows, replacing any existing file.
pub fn write_results(path: &Path, results: &[ExtractionResult]) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_path(path)?;

    for result in results {
        writer.write_record([&result.rank, &result.name, &result.url])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_short_competitor_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("competitors.tsv");
        fs::write(
            &path,
            "01\tAlpha Dental\t4.9\n02\tBeta\n\n03\tGamma Smiles\t4.7\textra\n",
        )
        .unwrap();

        let table = load_competitors(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.name_for("01"), Some("Alpha Dental"));
        assert_eq!(table.name_for("02"), None);
        assert_eq!(table.name_for("03"), Some("Gamma Smiles"));
    }

    #[test]
    fn strips_line_ends_before_counting_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("competitors.tsv");
        fs::write(
            &path,
            "01\tAlpha\t\n02\tBeta\t \t\n  03\tGamma Smiles \t4.7  \n04\t Delta \t4.6\n",
        )
        .unwrap();

        let table = load_competitors(&path).unwrap();
        assert_eq!(table.name_for("01"), None);
        assert_eq!(table.name_for("02"), None);
        assert_eq!(table.name_for("03"), Some("Gamma Smiles "));
        assert_eq!(table.name_for("04"), Some(" Delta "));
    }

    #[test]
    fn missing_sitemap_directory_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let files = sitemap_files(&dir.path().join("absent")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn unlistable_sitemap_path_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not_a_dir");
        fs::write(&file, "").unwrap();

        let err = sitemap_files(&file).unwrap_err();
        assert!(matches!(err, AppError::Sitemap(_)));
        assert!(err.to_string().contains("not_a_dir"));
    }

    #[test]
    fn reads_rank_prefix() {
        assert_eq!(rank_from_filename("07_cedar_sitemap.xml"), Some("07"));
        assert_eq!(rank_from_filename("12_sitemap.xml"), Some("12"));
        assert_eq!(rank_from_filename("cedar_sitemap.xml"), None);
        assert_eq!(rank_from_filename("7a_cedar_sitemap.xml"), None);
    }

    #[test]
    fn extracts_locations_from_loose_markup() {
        let content = "<urlset><url><loc>https://a.com/</loc></url>\
                       <url><loc>https://a.com/services/</loc>\
                       <loc>ftp://a.com/file</loc><broken <loc>http://a.com/team</loc>";
        assert_eq!(
            extract_locations(content),
            vec![
                "https://a.com/".to_string(),
                "https://a.com/services/".to_string(),
                "http://a.com/team".to_string(),
            ]
        );
    }

    #[test]
    fn lists_sitemaps_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["10_c_sitemap.xml", "02_b_sitemap.xml", "01_a_sitemap.xml", "notes.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let names = sitemap_files(dir.path())
            .unwrap()
            .into_iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["01_a_sitemap.xml", "02_b_sitemap.xml", "10_c_sitemap.xml"]
        );
    }

    #[test]
    fn writes_rows_and_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/urls.tsv");
        let rows = vec![ExtractionResult {
            rank: "01".to_string(),
            name: "Alpha".to_string(),
            url: "https://a.com/services/".to_string(),
        }];

        write_results(&path, &rows).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "01\tAlpha\thttps://a.com/services/\n"
        );
    }
}
