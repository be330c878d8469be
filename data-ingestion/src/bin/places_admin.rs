// Places Admin Listing
// Prints every place in the collection as a sortable table, optionally
// narrowed with the same filters the guest map uses.

use anyhow::Context;
use data_ingestion::actions::list::{list_places, render_table, ListOptions};
use data_ingestion::credentials::{
    load_service_account, process_env, resolve_source, CredentialsError, GUIDANCE,
};
use data_ingestion::services::firestore::FirestoreClient;
use shared_types::listing::{PlaceColumn, SortDirection};
use shared_types::PlaceFilter;
use std::path::PathBuf;
use std::process::ExitCode;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "places-admin", about = "List places as the admin table shows them.")]
struct AdminOpts {
    /// Path to serviceAccount.json (alternative to env vars)
    #[structopt(long, parse(from_os_str))]
    creds: Option<PathBuf>,

    /// City filter ("City" for any)
    #[structopt(long, default_value = "City")]
    city: String,

    /// Category filter ("Category" for any)
    #[structopt(long, default_value = "Category")]
    category: String,

    /// Supply filter ("Supply" for any)
    #[structopt(long, default_value = "Supply")]
    supply: String,

    /// Only show approved places, as guests see them
    #[structopt(long)]
    approved_only: bool,

    /// Case-insensitive name search
    #[structopt(long)]
    search: Option<String>,

    /// Column to sort by: name, address, category, user, created, approved, id
    #[structopt(long)]
    sort: Option<PlaceColumn>,

    /// Sort descending
    #[structopt(long)]
    desc: bool,
}

impl AdminOpts {
    fn list_options(&self) -> anyhow::Result<ListOptions> {
        let mut filter = PlaceFilter::from_selection(&self.city, &self.category, &self.supply)?;
        filter.approved_only = self.approved_only;

        let direction = if self.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };

        Ok(ListOptions {
            filter,
            search: self.search.clone(),
            sort: self.sort.map(|column| (column, direction)),
        })
    }
}

async fn run(opts: &AdminOpts) -> anyhow::Result<()> {
    let options = opts.list_options()?;

    let source = resolve_source(opts.creds.as_deref(), None, &process_env)
        .ok_or(CredentialsError::Missing)?;
    let account = load_service_account(&source).map_err(|err| {
        tracing::error!("{}", GUIDANCE);
        err
    })?;

    let store = match process_env("FIRESTORE_EMULATOR_HOST") {
        Some(host) => FirestoreClient::emulator(&host, &account.project_id)?,
        None => FirestoreClient::new(account)?,
    };

    let places = list_places(&store, &options)
        .await
        .context("reading the places collection")?;
    tracing::info!(count = places.len(), project = store.project_id(), "loaded places");

    println!("{}", render_table(&places));
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    data_ingestion::init_tracing();

    let opts = AdminOpts::from_args();
    match run(&opts).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
