//! Remote import: slugged payloads upserted in batches over REST.
//!
//! # Example
//!
//! ```no_run
//! use orgsheet::import::{build_payload, BatchUpserter, ImportConfig, RestClient};
//! use orgsheet::TagFormat;
//!
//! let config = ImportConfig::from_env()?;
//! let orgs = orgsheet::parse_file(&config.input_path, TagFormat::List)?;
//! let payload = build_payload(&orgs, &config.owner_id);
//!
//! let upserter = BatchUpserter::new(RestClient::new(&config)?);
//! let report = upserter.upsert_all(&payload)?;
//! println!("Upserted {} organizations.", report.upserted);
//! # Ok::<(), orgsheet::Error>(())
//! ```

mod config;
mod payload;
mod slug;
mod upsert;

pub use config::{ImportConfig, DEFAULT_INPUT_PATH};
pub use payload::{build_payload, OrganizationPayload};
pub use slug::{org_slug, slugify};
pub use upsert::{BatchResponse, BatchUpserter, RestClient, UpsertClient, UpsertReport, DEFAULT_BATCH_SIZE};
