use thiserror::Error;

/// Caller-facing failures. Per-year transient errors during batched retrieval
/// are never surfaced here; they are logged and the year is skipped (see
/// [`crate::fetch::years::fetch_year_range`]).
#[derive(Debug, Error)]
pub enum Error {
    /// The requested sub-dataset key is absent from the form type's catalog.
    /// Raised before any network activity.
    #[error("dataset '{dataset}' not found; choose from: {known:?}")]
    UnknownDataset { dataset: String, known: Vec<String> },

    /// The form type belongs to no family with a known listing-page
    /// delimiter rule, so its catalog cannot be discovered.
    #[error("no catalog discovery rule for form type '{form_type}'")]
    UnknownFamily { form_type: String },

    /// A catalog page or registry fetch failed. No partial result exists.
    #[error("portal request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The portal answered but the payload could not be parsed.
    #[error(transparent)]
    Payload(#[from] anyhow::Error),
}
