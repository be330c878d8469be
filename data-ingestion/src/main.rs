use anyhow::Context;
use data_ingestion::actions::seed;
use data_ingestion::cli::{SeedConfig, SeedOpts};
use data_ingestion::credentials::{
    load_service_account, process_env, CredentialsError, ServiceAccount, GUIDANCE,
};
use data_ingestion::services::firestore::FirestoreClient;
use data_ingestion::services::overpass::OverpassClient;
use dotenv::dotenv;
use std::io::{self, Write};
use std::process::ExitCode;
use structopt::StructOpt;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    data_ingestion::init_tracing();

    let opts = SeedOpts::from_args();
    let config = match SeedConfig::from_opts(&opts, &process_env) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let account = match config
        .credentials
        .as_ref()
        .ok_or(CredentialsError::Missing)
        .and_then(load_service_account)
    {
        Ok(account) => account,
        Err(err) => {
            report_credentials_error(&err);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        "Using service account: {} (project: {})",
        account.client_email,
        account.project_id
    );

    match run(&config, account).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &SeedConfig, account: ServiceAccount) -> anyhow::Result<()> {
    let store = match process_env("FIRESTORE_EMULATOR_HOST") {
        Some(host) => {
            tracing::info!(%host, "using Firestore emulator");
            FirestoreClient::emulator(&host, &account.project_id)?
        }
        None => FirestoreClient::new(account)?,
    };
    let source = OverpassClient::new(config.overpass_endpoints.clone())
        .context("building Overpass client")?;

    seed::run(&source, &store, config)
        .await
        .context("writing to the places collection")?;
    Ok(())
}

fn report_credentials_error(err: &CredentialsError) {
    match err {
        CredentialsError::Missing => tracing::error!("{}", err),
        _ => {
            tracing::error!("Invalid Firebase service account JSON: {}", err);
            tracing::error!("{}", GUIDANCE);
        }
    }
    if let Err(err) = write_usage(&mut io::stdout().lock()) {
        tracing::warn!(error = %err, "could not print usage");
    }
}

fn write_usage<W: Write>(out: &mut W) -> io::Result<()> {
    SeedOpts::clap()
        .write_help(out)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;
    writeln!(out)
}
