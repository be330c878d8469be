// Service account resolution
// Finds the Firebase service account JSON from flags or environment and
// checks it is usable for a server-side grant before anything is written.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const GUIDANCE: &str = "Tip: Use Firebase Console > Project settings > Service accounts > \
Generate new private key (not gcloud user credentials).";

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("Missing credentials. Set GOOGLE_APPLICATION_CREDENTIALS or FIREBASE_SERVICE_ACCOUNT_JSON.")]
    Missing,

    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Service account JSON is missing or invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Service account JSON is missing or invalid JSON.")]
    NotAnObject,

    #[error("Expected a service account JSON (type=service_account), got type={0}.")]
    WrongType(String),

    #[error("Service account JSON is missing required fields (project_id/client_email/private_key).")]
    MissingFields,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CredentialSource {
    File(PathBuf),
    InlineJson(String),
}

#[derive(Clone, PartialEq)]
pub struct ServiceAccount {
    pub project_id: String,
    pub client_email: String,
    pub private_key: String,
    pub token_uri: Option<String>,
}

// Keep the private key out of logs.
impl std::fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .finish_non_exhaustive()
    }
}

/// Looks a variable up in the process environment, treating empty as unset.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn looks_like_json_path(arg: &str) -> bool {
    !arg.starts_with('-') && arg.to_lowercase().ends_with(".json") && Path::new(arg).exists()
}

/// Resolution order: `--creds`, a bare `*.json` argument that exists,
/// `GOOGLE_APPLICATION_CREDENTIALS`, `npm_config_creds` (if the file exists),
/// then inline `FIREBASE_SERVICE_ACCOUNT_JSON`.
pub fn resolve_source(
    creds_flag: Option<&Path>,
    positional: Option<&str>,
    env: &dyn Fn(&str) -> Option<String>,
) -> Option<CredentialSource> {
    if let Some(path) = creds_flag {
        return Some(CredentialSource::File(path.to_path_buf()));
    }
    if let Some(arg) = positional.filter(|a| looks_like_json_path(a)) {
        return Some(CredentialSource::File(PathBuf::from(arg)));
    }
    if let Some(path) = env("GOOGLE_APPLICATION_CREDENTIALS") {
        return Some(CredentialSource::File(PathBuf::from(path)));
    }
    if let Some(path) = env("npm_config_creds").filter(|p| Path::new(p).exists()) {
        return Some(CredentialSource::File(PathBuf::from(path)));
    }
    env("FIREBASE_SERVICE_ACCOUNT_JSON").map(CredentialSource::InlineJson)
}

fn string_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| value.get(*k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Validates a parsed credential document. Accepts both snake_case and
/// camelCase field names.
pub fn parse_service_account(value: &Value) -> Result<ServiceAccount, CredentialsError> {
    if !value.is_object() {
        return Err(CredentialsError::NotAnObject);
    }

    // User ADC files carry type=authorized_user and cannot mint server tokens.
    match value.get("type") {
        None | Some(Value::Null) => {}
        Some(Value::String(kind)) if kind == "service_account" => {}
        Some(Value::String(kind)) => return Err(CredentialsError::WrongType(kind.clone())),
        Some(other) => return Err(CredentialsError::WrongType(other.to_string())),
    }

    let project_id = string_field(value, &["project_id", "projectId"]);
    let client_email = string_field(value, &["client_email", "clientEmail"]);
    let private_key = string_field(value, &["private_key", "privateKey"]);

    match (project_id, client_email, private_key) {
        (Some(project_id), Some(client_email), Some(private_key)) => Ok(ServiceAccount {
            project_id,
            client_email,
            private_key,
            token_uri: string_field(value, &["token_uri"]),
        }),
        _ => Err(CredentialsError::MissingFields),
    }
}

pub fn load_service_account(source: &CredentialSource) -> Result<ServiceAccount, CredentialsError> {
    let raw = match source {
        CredentialSource::File(path) => fs::read_to_string(path).map_err(|source| {
            CredentialsError::Read {
                path: path.clone(),
                source,
            }
        })?,
        CredentialSource::InlineJson(json) => json.clone(),
    };
    let value: Value = serde_json::from_str(&raw)?;
    parse_service_account(&value)
}
