// src/forms.rs
use once_cell::sync::Lazy;
use reqwest::Client;
use tracing::info;

use crate::catalog::{self, Catalog, COMPANY_QUALIFIER};
use crate::error::Error;
use crate::fetch::{archive, years};
use crate::process::{self, Table};

/// Portal root for yearly disclosure document bundles.
const DOC_ROOT: &str = "https://dados.cvm.gov.br/dados/CIA_ABERTA/DOC/";

/// Dataset pages live under the portal's catalog app, not the file tree.
const DATASET_PAGE_ROOT: &str = "https://dados.cvm.gov.br/dataset/cia_aberta-doc-";

/// Registration records for all open companies, one plain unzipped CSV.
pub const CADASTRAL_URL: &str =
    "https://dados.cvm.gov.br/dados/CIA_ABERTA/CAD/DADOS/cad_cia_aberta.csv";

/// Archive directory for a disclosure document code ("itr", "dfp", "vlmo",
/// "ipe", "icbgc", ...). Useful for assembling a [`FormType`] for documents
/// the portal lists without a published catalog.
pub fn doc_base_url(code: &str) -> String {
    format!("{}{}/DADOS/", DOC_ROOT, code.to_uppercase())
}

static FCA_CATALOG: Lazy<Catalog> = Lazy::new(|| {
    [
        ("auditor", "fca_cia_aberta_auditor_{year}.csv"),
        ("canal_divulgacao", "fca_cia_aberta_canal_divulgacao_{year}.csv"),
        (
            "departamento_acionistas",
            "fca_cia_aberta_departamento_acionistas_{year}.csv",
        ),
        ("dri", "fca_cia_aberta_dri_{year}.csv"),
        ("endereco", "fca_cia_aberta_endereco_{year}.csv"),
        ("escriturador", "fca_cia_aberta_escriturador_{year}.csv"),
        ("geral", "fca_cia_aberta_geral_{year}.csv"),
        (
            "pais_estrangeiro_negociacao",
            "fca_cia_aberta_pais_estrangeiro_negociacao_{year}.csv",
        ),
        ("valor_mobiliario", "fca_cia_aberta_valor_mobiliario_{year}.csv"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
});

static FRE_CATALOG: Lazy<Catalog> = Lazy::new(|| {
    [
        ("responsavel", "fre_cia_responsavel_{year}.csv"),
        ("auditor", "fre_cia_auditor_{year}.csv"),
        ("auditor_responsavel", "fre_cia_auditor_responsavel_{year}.csv"),
        (
            "informacao_financeira",
            "fre_cia_informacao_financeira_{year}.csv",
        ),
        (
            "distribuicao_dividendos",
            "distribuicao_dividendos_{year}.csv",
        ),
        (
            "distribuicao_dividendos_classe_acao",
            "distribuicao_dividendos_classe_acao_{year}.csv",
        ),
        ("endividamento", "endividamento_{year}.csv"),
        ("obrigacao", "obrigacao_{year}.csv"),
        ("emissor", "emissor_{year}.csv"),
        (
            "grupo_economico_reestruturacao",
            "grupo_economico_reestruturacao_{year}.csv",
        ),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
});

/// One disclosure category: a base URL, a ZIP filename template and the
/// catalog of sub-datasets its yearly archives contain.
///
/// Plain configuration data. Behavior never varies by form type, so there is
/// no trait or subtyping here; an incomplete instance is unrepresentable.
#[derive(Debug, Clone)]
pub struct FormType {
    pub name: String,
    pub base_url: String,
    pub zip_template: String,
    pub catalog: Catalog,
}

impl FormType {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        zip_template: impl Into<String>,
        catalog: Catalog,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            zip_template: zip_template.into(),
            catalog,
        }
    }

    /// Cadastral Form, with its long-published sub-dataset registry.
    pub fn fca() -> Self {
        Self::new(
            "fca_cia_aberta",
            doc_base_url("fca"),
            "fca_cia_aberta_{year}.zip",
            FCA_CATALOG.clone(),
        )
    }

    /// Reference Form.
    pub fn fre() -> Self {
        Self::new(
            "fre_cia_aberta",
            doc_base_url("fre"),
            "fre_cia_aberta_{year}.zip",
            FRE_CATALOG.clone(),
        )
    }

    /// Build a form type by scraping its dataset page for the current
    /// catalog. Only form types in a recognized discovery family can be
    /// built this way; discovery failures propagate uncaught.
    pub async fn discovered(client: &Client, name: &str) -> Result<Self, Error> {
        let code = name.strip_suffix(COMPANY_QUALIFIER).unwrap_or(name);
        let page = format!("{}{}", DATASET_PAGE_ROOT, code);
        let catalog = catalog::discover(client, name, &page).await?;
        info!(form = name, datasets = catalog.len(), "catalog discovered");
        Ok(Self::new(
            name,
            doc_base_url(code),
            format!("{}_{{year}}.zip", name),
            catalog,
        ))
    }

    /// Retrieve one sub-dataset across the year range `[start, end)`.
    ///
    /// An unknown key fails immediately with the list of valid keys and
    /// performs no network activity. Per-year failures inside the range are
    /// logged and skipped, so the result covers the years that succeeded.
    pub async fn get_data(
        &self,
        client: &Client,
        dataset: &str,
        start: i32,
        end: i32,
    ) -> Result<Table, Error> {
        let csv_template = self
            .catalog
            .get(dataset)
            .ok_or_else(|| Error::UnknownDataset {
                dataset: dataset.to_string(),
                known: self.catalog.keys().cloned().collect(),
            })?;
        Ok(years::fetch_year_range(
            client,
            start,
            end,
            &self.base_url,
            &self.zip_template,
            csv_template,
        )
        .await)
    }
}

/// Fetch a `;`-separated latin-1 registry CSV published outside the yearly
/// ZIP scheme.
pub async fn fetch_registry(client: &Client, url: &str) -> Result<Table, Error> {
    let resp = client
        .get(url)
        .timeout(archive::DOWNLOAD_TIMEOUT)
        .send()
        .await?
        .error_for_status()?;
    let raw = resp.bytes().await?;
    Ok(process::parse_table(&raw)?)
}

/// Fetch the open-company registration table ([`CADASTRAL_URL`]).
pub async fn fetch_cadastral(client: &Client) -> Result<Table, Error> {
    fetch_registry(client, CADASTRAL_URL).await
}
