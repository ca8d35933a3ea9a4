// Run configuration, read once at startup from the environment (and `.env`).
// Nothing below `main` touches environment variables.

use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::core::monsters::{SheetLocation, SheetSchema};

pub const DEFAULT_RANGE: &str = "A1:AA68";
pub const DEFAULT_JSON_PATH: &str = "output/monsters.json";
pub const DEFAULT_TXT_PATH: &str = "output/monsters.txt";

/// Which credentials to use for the Sheets API, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    ServiceAccountFile(PathBuf),
    ServiceAccountJson(String),
    AuthorizedUserFile(PathBuf),
    ApiKey(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub location: SheetLocation,
    pub schema: SheetSchema,
    pub output_paths: Vec<PathBuf>,
    pub credentials: CredentialSource,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let Some(spreadsheet_id) = get("SPREADSHEET_ID") else {
            bail!("Missing SPREADSHEET_ID environment variable! Set it in .env or the shell.");
        };

        let credentials = if let Some(path) = get("GOOGLE_SERVICE_ACCOUNT_KEY") {
            CredentialSource::ServiceAccountFile(PathBuf::from(path))
        } else if let Some(json) = get("GOOGLE_SERVICE_ACCOUNT_JSON") {
            CredentialSource::ServiceAccountJson(json)
        } else if let Some(path) = get("GOOGLE_AUTHORIZED_USER_FILE") {
            CredentialSource::AuthorizedUserFile(PathBuf::from(path))
        } else if let Some(key) = get("GOOGLE_API_KEY") {
            CredentialSource::ApiKey(key)
        } else {
            bail!(
                "No Google credentials configured. Set one of GOOGLE_SERVICE_ACCOUNT_KEY, \
                 GOOGLE_SERVICE_ACCOUNT_JSON, GOOGLE_AUTHORIZED_USER_FILE or GOOGLE_API_KEY."
            );
        };

        let json_path = get("OUTPUT_JSON_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_JSON_PATH));
        let txt_path = get("OUTPUT_TXT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TXT_PATH));
        if json_path == txt_path {
            bail!(
                "OUTPUT_JSON_PATH and OUTPUT_TXT_PATH both point at {}; they must differ.",
                json_path.display()
            );
        }

        Ok(Self {
            location: SheetLocation {
                spreadsheet_id,
                range: get("SHEET_RANGE").unwrap_or_else(|| DEFAULT_RANGE.to_string()),
            },
            schema: SheetSchema::default(),
            output_paths: vec![json_path, txt_path],
            credentials,
        })
    }
}
