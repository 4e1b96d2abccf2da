//! Batched retrieval of yearly disclosure bundles from the CVM open-data
//! portal.
//!
//! The portal publishes each disclosure form as one ZIP per year, holding a
//! set of `;`-separated latin-1 CSV members, and exposes no machine-readable
//! catalog of which members exist. This crate scrapes the per-form dataset
//! page to recover that catalog ([`catalog`]), then drives a per-year
//! fetch/extract/parse loop with partial-failure tolerance ([`fetch`]),
//! returning one unified [`Table`].

pub mod catalog;
pub mod error;
pub mod fetch;
pub mod forms;
pub mod process;

pub use error::Error;
pub use forms::FormType;
pub use process::Table;
