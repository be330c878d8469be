use crate::cli::{SeedConfig, SourceMode};
use crate::osm_parser::place_from_element;
use crate::seeding::{document_id, hash_string, shuffle_deterministic};
use crate::services::firestore::FirestoreError;
use crate::services::overpass::{ElementSource, OverpassError};
use crate::services::store::PlaceStore;
use crate::static_places::static_places;
use indicatif::{ProgressBar, ProgressStyle};
use shared_types::{City, Place, SEED_UID};
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    NothingToDelete,
    Deleted(usize),
}

/// Splits `total` across `cities`; the remainder goes one each to the first
/// cities in order.
pub fn distribute_count(total: usize, cities: &[City]) -> Vec<(City, usize)> {
    if cities.is_empty() {
        return Vec::new();
    }
    let per_city = total / cities.len();
    let remainder = total % cities.len();
    cities
        .iter()
        .enumerate()
        .map(|(i, city)| (*city, per_city + usize::from(i < remainder)))
        .collect()
}

fn spinner(city: City) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("Fetching {} from Overpass", city));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Fetches each city in turn and keeps up to its share of usable elements,
/// picked in a reproducible shuffled order.
pub async fn build_real_places<S>(source: &S, total_count: usize) -> Result<Vec<Place>, OverpassError>
where
    S: ElementSource + ?Sized,
{
    let mut all = Vec::new();

    for (city, target) in distribute_count(total_count, City::ALL) {
        let pb = spinner(city);
        let elements = source.fetch_city(city).await;
        pb.finish_and_clear();
        let elements = elements?;

        let shuffled = shuffle_deterministic(
            &elements,
            hash_string(&format!("seed:{}:{}", city, total_count)),
        );
        let before = all.len();
        all.extend(
            shuffled
                .iter()
                .filter_map(|el| place_from_element(el, city))
                .take(target),
        );

        tracing::info!(
            city = %city,
            elements = elements.len(),
            kept = all.len() - before,
            quota = target,
            "processed city"
        );
    }

    Ok(all)
}

/// Picks what to write: fetched places when the fetch succeeds with enough
/// results, otherwise the static sample list.
pub async fn select_places<S>(source: &S, config: &SeedConfig) -> Vec<Place>
where
    S: ElementSource + ?Sized,
{
    if config.mode == SourceMode::Static {
        return static_places();
    }

    tracing::info!(
        "Fetching ~{} real places from OpenStreetMap (Overpass)...",
        config.total_count
    );
    match build_real_places(source, config.total_count).await {
        Ok(real) if real.len() >= config.acceptance_threshold() => {
            tracing::info!("Fetched {} real place(s).", real.len());
            real
        }
        Ok(real) => {
            tracing::warn!(
                "OSM fetch returned only {} result(s). Falling back to static demo list.",
                real.len()
            );
            static_places()
        }
        Err(err) => {
            tracing::warn!(error = %err, "OSM fetch failed. Falling back to static demo list.");
            static_places()
        }
    }
}

/// Pairs each place with its stable document id. A second place mapping to an
/// id already taken is dropped, since one batch cannot write a document twice.
pub fn keyed_places(places: Vec<Place>) -> Vec<(String, Place)> {
    let mut seen = HashSet::with_capacity(places.len());
    let mut keyed = Vec::with_capacity(places.len());
    for place in places {
        let city = place.city.map(|c| c.as_str()).unwrap_or_default();
        let id = document_id(city, &place.name);
        if seen.insert(id.clone()) {
            keyed.push((id, place));
        } else {
            tracing::debug!(%id, name = %place.name, "skipping duplicate place");
        }
    }
    keyed
}

/// Merge-writes all places in one batch and returns how many documents were written.
pub async fn seed_places<St>(store: &St, places: Vec<Place>) -> Result<usize, FirestoreError>
where
    St: PlaceStore + ?Sized,
{
    let keyed = keyed_places(places);
    store.upsert_places(&keyed).await?;
    tracing::info!("Seeded {} place(s) into 'places'.", keyed.len());
    Ok(keyed.len())
}

/// Deletes every document owned by the seed script. No commit is made when
/// there is nothing to delete.
pub async fn delete_seed<St>(store: &St) -> Result<DeleteOutcome, FirestoreError>
where
    St: PlaceStore + ?Sized,
{
    let ids = store.ids_owned_by(SEED_UID).await?;
    if ids.is_empty() {
        tracing::info!(
            "No seed documents found (uid={}). Nothing to delete.",
            SEED_UID
        );
        return Ok(DeleteOutcome::NothingToDelete);
    }

    store.delete_places(&ids).await?;
    tracing::info!("Deleted {} seed place(s).", ids.len());
    Ok(DeleteOutcome::Deleted(ids.len()))
}

/// Entry point for one seed-firestore run once credentials are in place.
pub async fn run<S, St>(source: &S, store: &St, config: &SeedConfig) -> Result<(), FirestoreError>
where
    S: ElementSource + ?Sized,
    St: PlaceStore + ?Sized,
{
    if config.delete_seed {
        delete_seed(store).await?;
        return Ok(());
    }

    let places = select_places(source, config).await;
    seed_places(store, places).await?;
    Ok(())
}
