// src/catalog.rs
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::Error;

/// Sub-dataset key → CSV filename template (with a `{year}` placeholder).
/// Built once per form type and never mutated. Callers must not depend on
/// iteration order.
pub type Catalog = BTreeMap<String, String>;

/// Annotation the portal appends to disclosures that were renamed.
const FORMER_NAME_MARK: &str = "(anteriormente";

/// Qualifier suffix shared by every open-company form-type identifier.
pub(crate) const COMPANY_QUALIFIER: &str = "_cia_aberta";

/// Form-type families with a known listing-page delimiter rule. Anything
/// else is a configuration error: no default is guessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFamily {
    /// Cadastral form pages; the disclosure name ends at the first `(`.
    Cadastral,
    /// Reference form pages; the name is followed by `:` and a description.
    Reference,
}

impl FormFamily {
    /// Classify a form-type identifier, or `None` for unrecognized families.
    pub fn of(form_type: &str) -> Option<FormFamily> {
        if form_type.starts_with("fca") {
            Some(FormFamily::Cadastral)
        } else if form_type.starts_with("fre") {
            Some(FormFamily::Reference)
        } else {
            None
        }
    }

    fn delimiter(self) -> char {
        match self {
            FormFamily::Cadastral => '(',
            FormFamily::Reference => ':',
        }
    }
}

/// Extract the sub-dataset catalog from a form type's dataset page.
///
/// The portal marks each disclosure name as a bold entry in a bullet list and
/// publishes no machine-readable catalog, so the mapping is recovered from
/// the flattened item text: keep items starting with the qualifier-stripped
/// form id, truncate at the family delimiter, drop any former-name
/// annotation, then split the remainder into key and filename template. A
/// page with zero qualifying items yields an empty catalog, which is valid.
pub fn parse_listing(html: &str, form_type: &str) -> Result<Catalog, Error> {
    let family = FormFamily::of(form_type).ok_or_else(|| Error::UnknownFamily {
        form_type: form_type.to_string(),
    })?;
    let prefix = form_type
        .strip_suffix(COMPANY_QUALIFIER)
        .unwrap_or(form_type);

    let doc = Html::parse_document(html);
    let items = Selector::parse("li").expect("CSS selector for list items should be valid");
    let marker = Selector::parse("b, strong").expect("CSS selector for bold markers should be valid");

    let mut catalog = Catalog::new();
    for item in doc.select(&items) {
        if item.select(&marker).next().is_none() {
            continue;
        }
        let text: String = item.text().collect();
        let text = text.trim();
        if !text.starts_with(prefix) {
            continue;
        }

        let mut name = text.split(family.delimiter()).next().unwrap_or(text);
        if let Some(cut) = name.find(FORMER_NAME_MARK) {
            name = &name[..cut];
        }
        let name = name.trim();
        if name.is_empty() {
            continue;
        }

        let (key, template) = if name.contains(form_type) {
            let key = name
                .strip_prefix(form_type)
                .map(|rest| rest.trim_start_matches('_'))
                .filter(|k| !k.is_empty())
                .unwrap_or(name);
            (key.to_string(), format!("{}_{{year}}.csv", name))
        } else {
            let key = name
                .strip_prefix(prefix)
                .map(|rest| rest.trim_start_matches('_'))
                .filter(|k| !k.is_empty())
                .unwrap_or(name);
            (
                key.to_string(),
                format!("{}_{}_{{year}}.csv", form_type, key),
            )
        };
        debug!(%key, %template, "catalog entry");
        catalog.insert(key, template);
    }
    Ok(catalog)
}

/// Fetch a form type's dataset page and derive its catalog.
///
/// The page fetch carries no timeout and any network failure propagates
/// uncaught: a partial catalog is worse than none.
pub async fn discover(client: &Client, form_type: &str, page_url: &str) -> Result<Catalog, Error> {
    // reject unrecognized families before touching the network
    FormFamily::of(form_type).ok_or_else(|| Error::UnknownFamily {
        form_type: form_type.to_string(),
    })?;
    let html = client
        .get(page_url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    parse_listing(&html, form_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cadastral_item_with_former_name() {
        let html = r#"<ul>
            <li><b>fca_cia_aberta_geral(anteriormente fca_cia_aberta_old)</b></li>
        </ul>"#;
        let catalog = parse_listing(html, "fca_cia_aberta").unwrap();
        assert_eq!(
            catalog.get("geral").map(String::as_str),
            Some("fca_cia_aberta_geral_{year}.csv")
        );
    }

    #[test]
    fn reference_item_with_description() {
        let html = r#"<ul>
            <li><b>fre_cia_aberta_responsavel</b>: dados do responsável pelo formulário</li>
        </ul>"#;
        let catalog = parse_listing(html, "fre_cia_aberta").unwrap();
        assert_eq!(
            catalog.get("responsavel").map(String::as_str),
            Some("fre_cia_aberta_responsavel_{year}.csv")
        );
    }

    #[test]
    fn reference_item_without_full_form_id() {
        // templates for short-named members still carry the full form prefix
        let html = r#"<li><b>fre_endividamento</b>: posição consolidada</li>"#;
        let catalog = parse_listing(html, "fre_cia_aberta").unwrap();
        assert_eq!(
            catalog.get("endividamento").map(String::as_str),
            Some("fre_cia_aberta_endividamento_{year}.csv")
        );
    }

    #[test]
    fn former_name_annotation_before_delimiter_is_dropped() {
        let html =
            r#"<li><b>fre_cia_aberta_emissor (anteriormente fre_emissor)</b>: capital social</li>"#;
        let catalog = parse_listing(html, "fre_cia_aberta").unwrap();
        assert_eq!(
            catalog.get("emissor").map(String::as_str),
            Some("fre_cia_aberta_emissor_{year}.csv")
        );
    }

    #[test]
    fn items_without_marker_or_prefix_are_ignored() {
        let html = r#"<ul>
            <li>fca_cia_aberta_geral: sem negrito</li>
            <li><b>Observação geral sobre o conjunto</b></li>
            <li><b>fca_cia_aberta_auditor(dados do auditor)</b></li>
        </ul>"#;
        let catalog = parse_listing(html, "fca_cia_aberta").unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get("auditor").map(String::as_str),
            Some("fca_cia_aberta_auditor_{year}.csv")
        );
    }

    #[test]
    fn page_with_no_qualifying_items_yields_empty_catalog() {
        let catalog = parse_listing("<html><body><p>nada</p></body></html>", "fca_cia_aberta");
        assert!(catalog.unwrap().is_empty());
    }

    #[test]
    fn unrecognized_family_is_a_configuration_error() {
        let err = parse_listing("<li><b>x</b></li>", "itr_cia_aberta").unwrap_err();
        assert!(matches!(err, Error::UnknownFamily { .. }));
    }
}
