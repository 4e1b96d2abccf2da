use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{error, info};
use url::Url;

use super::archive;
use crate::process::{self, Table};

/// Substitute the `{year}` placeholder in a filename template.
pub fn render_year(template: &str, year: i32) -> String {
    template.replace("{year}", &year.to_string())
}

/// Fetch the year range `[start, end)` of yearly ZIP bundles and concatenate
/// the named CSV member of each into a single table.
///
/// Years are visited in ascending order, one request at a time. A year that
/// fails (transport error, non-2xx, malformed archive, missing member) is
/// logged with its cause and contributes zero rows; the loop never aborts and
/// nothing is retried. An empty range performs no network activity. The
/// result is empty (zero rows, zero columns) iff no year succeeded.
pub async fn fetch_year_range(
    client: &Client,
    start: i32,
    end: i32,
    base_url: &str,
    zip_template: &str,
    csv_template: &str,
) -> Table {
    let mut tables: Vec<Table> = Vec::new();
    for year in start..end {
        match fetch_year(client, year, base_url, zip_template, csv_template).await {
            Ok(table) => {
                // a year whose header row drifted from the first retrieved
                // year would corrupt the aggregate; skip it like any failure
                if let Some(first) = tables.first() {
                    if table.headers != first.headers {
                        error!(
                            year,
                            expected = first.headers.len(),
                            got = table.headers.len(),
                            "header row differs from first retrieved year; skipping"
                        );
                        continue;
                    }
                }
                info!(year, rows = table.rows.len(), "year retrieved");
                tables.push(table);
            }
            Err(e) => error!(year, error = %e, "year skipped"),
        }
    }
    Table::concat(tables)
}

async fn fetch_year(
    client: &Client,
    year: i32,
    base_url: &str,
    zip_template: &str,
    csv_template: &str,
) -> Result<Table> {
    let url = Url::parse(&format!("{}{}", base_url, render_year(zip_template, year)))
        .context("assembled archive URL is invalid")?;
    let body = archive::download(client, &url).await?;
    process::read_member_table(&body, &render_year(csv_template, year))
}
