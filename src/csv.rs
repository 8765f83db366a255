//! Bulk CSV transfer against the backend's import/export endpoints.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::aggregate::iso_date;
use crate::client::ApiClient;
use crate::error::{Error, Locale, Result, IMPORT_FAILED, SELECT_CSV_FILE};

/// `<module>_<YYYY-MM-DD>.csv`
pub fn export_filename(module: &str, date: NaiveDate) -> String {
    format!("{}_{}.csv", module, iso_date(date))
}

pub fn default_export_endpoint(module: &str) -> String {
    format!("/api/csv/export/{}", module)
}

pub fn default_import_endpoint(module: &str) -> String {
    format!("/api/csv/import/{}", module)
}

/// Download the CSV blob behind `endpoint` into `dest_dir`.
pub async fn export(
    client: &ApiClient,
    module: &str,
    endpoint: &str,
    dest_dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf> {
    let blob = client.get_bytes(endpoint).await?;

    fs::create_dir_all(dest_dir)?;
    let path = dest_dir.join(export_filename(module, date));
    fs::write(&path, &blob)?;

    tracing::info!("Exported {} bytes of '{}' to {}", blob.len(), module, path.display());
    Ok(path)
}

#[derive(Debug, Deserialize)]
struct ImportResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    imported_count: u64,
    #[serde(default)]
    errors: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub imported_count: u64,
    /// Row-level problems; the import itself still succeeded.
    pub errors: Vec<String>,
}

impl ImportReport {
    pub fn has_warnings(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Reject anything that is not an existing `.csv` file before a request is made.
pub fn validate_csv_path(path: &Path, locale: Locale) -> Result<()> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if !is_csv || !path.is_file() {
        return Err(Error::Validation(SELECT_CSV_FILE.get(locale).to_string()));
    }
    Ok(())
}

pub async fn import(
    client: &ApiClient,
    endpoint: &str,
    path: &Path,
    locale: Locale,
) -> Result<ImportReport> {
    validate_csv_path(path, locale)?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("import.csv")
        .to_string();
    let contents = fs::read(path)?;

    let part = Part::bytes(contents)
        .file_name(file_name)
        .mime_str("text/csv")?;
    let form = Form::new().part("file", part);

    let response: ImportResponse = client.post_multipart(endpoint, form).await?;

    if !response.success {
        let message = response
            .error
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| IMPORT_FAILED.get(locale).to_string());
        return Err(Error::Import(message));
    }

    if !response.errors.is_empty() {
        tracing::warn!("Import finished with {} row error(s)", response.errors.len());
        for err in &response.errors {
            tracing::debug!("Import row error: {}", err);
        }
    }

    Ok(ImportReport {
        imported_count: response.imported_count,
        errors: response.errors,
    })
}
