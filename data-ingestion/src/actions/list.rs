use crate::services::firestore::FirestoreError;
use crate::services::store::PlaceStore;
use shared_types::listing::{search_by_name, sort_places, PlaceColumn, SortDirection};
use shared_types::{Place, PlaceFilter};

#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub filter: PlaceFilter,
    pub search: Option<String>,
    pub sort: Option<(PlaceColumn, SortDirection)>,
}

/// Reads the places matching the filter, narrows them by name and sorts them
/// the way the admin table does.
pub async fn list_places<St>(store: &St, options: &ListOptions) -> Result<Vec<Place>, FirestoreError>
where
    St: PlaceStore + ?Sized,
{
    let places = store.query_places(&options.filter).await?;
    let mut places: Vec<Place> = match options.search.as_deref() {
        Some(query) => search_by_name(&places, query).into_iter().cloned().collect(),
        None => places,
    };
    if let Some((column, direction)) = options.sort {
        sort_places(&mut places, column, direction);
    }
    Ok(places)
}

/// Plain-text table with one column per [`PlaceColumn`].
pub fn render_table(places: &[Place]) -> String {
    let rows: Vec<Vec<String>> = places
        .iter()
        .map(|place| PlaceColumn::ALL.iter().map(|c| c.cell(place)).collect())
        .collect();

    let widths: Vec<usize> = PlaceColumn::ALL
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.header().len()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let format_row = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(PlaceColumn::ALL.iter().map(|c| c.header()).collect())];
    lines.extend(rows.iter().map(|row| format_row(row.iter().map(String::as_str).collect())));
    lines.join("\n")
}
