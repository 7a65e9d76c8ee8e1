//! Data access layer of the CineDive filmography explorer.
//!
//! * [`catalog::DatasetCatalog`] – one memoized loader per dataset file
//!   (oscar titles, top movies per year, credit list, graph snapshots).
//! * [`selection::SelectionStore`] – observable selection sets for movies
//!   and people.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod data;
pub mod error;
pub mod selection;
pub mod source;

pub use catalog::{DatasetCatalog, DatasetId, DatasetSummary};
pub use config::Config;
pub use data::model::{Dataset, FieldValue, Graph, Record};
pub use error::{LoadError, Result};
pub use selection::{SelectionStore, Selections, Subscription};
