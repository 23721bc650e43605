//! Import run configuration, read once from the environment.

use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Workbook read when `IMPORT_XLSX_PATH` is not set, relative to the
/// working directory.
pub const DEFAULT_INPUT_PATH: &str = "Organization_Event.xlsx";

const URL_VARS: [&str; 2] = ["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"];
const SERVICE_ROLE_KEY_VAR: &str = "SUPABASE_SERVICE_ROLE_KEY";
const OWNER_ID_VAR: &str = "IMPORT_OWNER_ID";
const INPUT_PATH_VAR: &str = "IMPORT_XLSX_PATH";

/// Everything an import run needs, validated up front.
#[derive(Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// Backend base URL without a trailing slash
    pub base_url: String,
    /// Service-role key, sent as both `apikey` and bearer token
    pub service_role_key: String,
    /// Owner stamped on every imported organization
    pub owner_id: String,
    /// Workbook to import
    pub input_path: PathBuf,
}

impl ImportConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), None)
    }

    /// Load configuration through `lookup`; `input` overrides `IMPORT_XLSX_PATH`.
    ///
    /// Empty values count as missing. Checks run in a fixed order and the
    /// first failure is returned.
    pub fn from_lookup<F>(lookup: F, input: Option<PathBuf>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let base_url = URL_VARS
            .iter()
            .find_map(|key| get(key))
            .ok_or_else(|| Error::Config(format!("Missing {} or {}.", URL_VARS[0], URL_VARS[1])))?;
        let service_role_key = get(SERVICE_ROLE_KEY_VAR)
            .ok_or_else(|| Error::Config(format!("Missing {}.", SERVICE_ROLE_KEY_VAR)))?;
        let owner_id = get(OWNER_ID_VAR)
            .ok_or_else(|| Error::Config(format!("Missing {} (auth.users id).", OWNER_ID_VAR)))?;

        let input_path = input
            .or_else(|| get(INPUT_PATH_VAR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_PATH));
        if !input_path.exists() {
            return Err(Error::Config(format!(
                "Missing XLSX at {}",
                input_path.display()
            )));
        }

        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            service_role_key,
            owner_id,
            input_path,
        })
    }

    /// Upsert endpoint for the `organizations` table, keyed on `slug`.
    pub fn organizations_url(&self) -> String {
        format!("{}/rest/v1/organizations?on_conflict=slug", self.base_url)
    }
}

impl std::fmt::Debug for ImportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportConfig")
            .field("base_url", &self.base_url)
            .field("service_role_key", &"<redacted>")
            .field("owner_id", &self.owner_id)
            .field("input_path", &self.input_path)
            .finish()
    }
}
