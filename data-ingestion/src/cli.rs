use crate::credentials::{resolve_source, CredentialSource};
use crate::services::overpass::{parse_endpoints, OverpassError, DEFAULT_ENDPOINTS};
use std::path::PathBuf;
use structopt::StructOpt;
use thiserror::Error;
use url::Url;

pub const DEFAULT_TOTAL_COUNT: usize = 100;
pub const DEFAULT_MIN_RESULTS: usize = 20;

const EXAMPLES: &str = r#"Credentials (first match wins):
  --creds <path>
  a bare path to a *.json file as an argument
  GOOGLE_APPLICATION_CREDENTIALS=/absolute/path/to/serviceAccount.json
  npm_config_creds=/absolute/path/to/serviceAccount.json
  FIREBASE_SERVICE_ACCOUNT_JSON='{"type":"service_account",...}'

Examples:
  GOOGLE_APPLICATION_CREDENTIALS=/secrets/serviceAccount.json seed-firestore
  seed-firestore --creds /secrets/serviceAccount.json
  seed-firestore /secrets/serviceAccount.json
  seed-firestore --real --count 120
  seed-firestore --static
  seed-firestore --delete-seed"#;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "seed-firestore",
    about = "Seed Firestore with places for the app.",
    after_help = EXAMPLES
)]
pub struct SeedOpts {
    /// Path to serviceAccount.json (alternative to env vars)
    #[structopt(long, parse(from_os_str))]
    pub creds: Option<PathBuf>,

    /// Total places to seed [default: 100]
    #[structopt(long)]
    pub count: Option<usize>,

    /// Fetch real places from OpenStreetMap (default behaviour)
    #[structopt(long)]
    pub real: bool,

    /// Use the built-in static sample list
    #[structopt(long = "static")]
    pub use_static: bool,

    /// Deletes only documents created by this script (where uid=seed-script)
    #[structopt(long)]
    pub delete_seed: bool,

    /// Fewest fetched places accepted before falling back to the static list [default: 20]
    #[structopt(long)]
    pub min_results: Option<usize>,

    /// Path to serviceAccount.json, for runners that drop the --creds flag
    #[structopt(name = "CREDS_JSON")]
    pub positional: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error(transparent)]
    Overpass(#[from] OverpassError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    Real,
    Static,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeedConfig {
    pub total_count: usize,
    pub mode: SourceMode,
    pub delete_seed: bool,
    pub min_results: usize,
    pub overpass_endpoints: Vec<Url>,
    pub credentials: Option<CredentialSource>,
}

impl SeedConfig {
    /// Fewest fetched places that may replace the static list.
    pub fn acceptance_threshold(&self) -> usize {
        self.min_results.min(self.total_count)
    }
}

/// npm forwards `--flag` to scripts as `npm_config_flag=true`.
fn npm_flag(env: &dyn Fn(&str) -> Option<String>, name: &str) -> bool {
    matches!(
        env(&format!("npm_config_{}", name)).as_deref(),
        Some("true") | Some("1")
    )
}

fn parse_count(
    name: &'static str,
    raw: Option<String>,
) -> Result<Option<usize>, ConfigError> {
    raw.map(|value| {
        value
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidNumber { name, value })
    })
    .transpose()
}

impl SeedConfig {
    pub fn from_opts(opts: &SeedOpts, env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let total_count = match opts.count {
            Some(count) => count,
            None => parse_count("npm_config_count", env("npm_config_count"))?
                .unwrap_or(DEFAULT_TOTAL_COUNT),
        };

        let min_results = match opts.min_results {
            Some(min) => min,
            None => parse_count("SEED_MIN_RESULTS", env("SEED_MIN_RESULTS"))?
                .unwrap_or(DEFAULT_MIN_RESULTS),
        };

        let use_static = opts.use_static || npm_flag(env, "static");
        let use_real = opts.real || npm_flag(env, "real") || !use_static;
        let mode = if use_real { SourceMode::Real } else { SourceMode::Static };

        let overpass_endpoints = match env("OVERPASS_ENDPOINTS") {
            Some(list) => parse_endpoints(list.split(',').filter(|e| !e.trim().is_empty()))?,
            None => parse_endpoints(DEFAULT_ENDPOINTS)?,
        };

        Ok(Self {
            total_count,
            mode,
            delete_seed: opts.delete_seed || npm_flag(env, "delete_seed"),
            min_results,
            overpass_endpoints,
            credentials: resolve_source(opts.creds.as_deref(), opts.positional.as_deref(), env),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn opts(args: &[&str]) -> SeedOpts {
        SeedOpts::from_iter_safe(std::iter::once("seed-firestore").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = SeedConfig::from_opts(&opts(&[]), &env_from(&[])).unwrap();
        assert_eq!(config.total_count, 100);
        assert_eq!(config.mode, SourceMode::Real);
        assert!(!config.delete_seed);
        assert_eq!(config.min_results, 20);
        assert_eq!(config.acceptance_threshold(), 20);
        assert_eq!(config.overpass_endpoints.len(), 3);
        assert_eq!(config.credentials, None);
    }

    #[test]
    fn test_flags() {
        let config = SeedConfig::from_opts(
            &opts(&["--static", "--count", "12", "--delete-seed", "--creds", "/c.json"]),
            &env_from(&[]),
        )
        .unwrap();
        assert_eq!(config.mode, SourceMode::Static);
        assert_eq!(config.total_count, 12);
        assert_eq!(config.acceptance_threshold(), 12);
        assert!(config.delete_seed);
        assert_eq!(
            config.credentials,
            Some(CredentialSource::File("/c.json".into()))
        );

        let config =
            SeedConfig::from_opts(&opts(&["--static", "--real"]), &env_from(&[])).unwrap();
        assert_eq!(config.mode, SourceMode::Real);
    }

    #[test]
    fn test_npm_style_environment() {
        let env = env_from(&[
            ("npm_config_count", "30"),
            ("npm_config_static", "true"),
            ("npm_config_delete_seed", "1"),
            ("SEED_MIN_RESULTS", "5"),
            ("OVERPASS_ENDPOINTS", "https://a.example/api, https://b.example/api"),
        ]);
        let config = SeedConfig::from_opts(&opts(&[]), &env).unwrap();
        assert_eq!(config.total_count, 30);
        assert_eq!(config.mode, SourceMode::Static);
        assert!(config.delete_seed);
        assert_eq!(config.min_results, 5);
        assert_eq!(config.overpass_endpoints[1].as_str(), "https://b.example/api");
    }

    #[test]
    fn test_flag_overrides_npm_count() {
        let env = env_from(&[("npm_config_count", "30")]);
        let config = SeedConfig::from_opts(&opts(&["--count", "9"]), &env).unwrap();
        assert_eq!(config.total_count, 9);
    }

    #[test]
    fn test_invalid_numbers() {
        let env = env_from(&[("npm_config_count", "lots")]);
        assert!(matches!(
            SeedConfig::from_opts(&opts(&[]), &env),
            Err(ConfigError::InvalidNumber { name: "npm_config_count", .. })
        ));
        assert!(SeedOpts::from_iter_safe(["seed-firestore", "--count", "-3"]).is_err());
    }
}
