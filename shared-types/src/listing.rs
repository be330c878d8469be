// Sidebar search and table sorting over an already-fetched place list.

use crate::place::Place;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Case-insensitive substring match on the place name. An empty query keeps everything.
pub fn search_by_name<'a>(places: &'a [Place], query: &str) -> Vec<&'a Place> {
    let needle = query.to_lowercase();
    places
        .iter()
        .filter(|place| place.name.to_lowercase().contains(&needle))
        .collect()
}

/// One-line address as shown in the admin table and the place popup.
pub fn format_address(place: &Place) -> String {
    let street = match place.address_number.as_deref() {
        Some(number) if !place.street_address.is_empty() => {
            format!("{} {}", place.street_address, number)
        }
        _ => place.street_address.clone(),
    };
    let locality = [
        place.zip_code.as_deref().unwrap_or_default(),
        place.city.map(|c| c.as_str()).unwrap_or_default(),
    ]
    .iter()
    .filter(|s| !s.is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join(" ");

    [
        street.as_str(),
        place.neighborhood.as_deref().unwrap_or_default(),
        locality.as_str(),
    ]
    .iter()
    .filter(|s| !s.is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join(", ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceColumn {
    Name,
    Address,
    Category,
    User,
    Created,
    Approved,
    Id,
}

impl PlaceColumn {
    pub const ALL: [PlaceColumn; 7] = [
        PlaceColumn::Name,
        PlaceColumn::Address,
        PlaceColumn::Category,
        PlaceColumn::User,
        PlaceColumn::Created,
        PlaceColumn::Approved,
        PlaceColumn::Id,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            PlaceColumn::Name => "Name",
            PlaceColumn::Address => "Address",
            PlaceColumn::Category => "Category",
            PlaceColumn::User => "User",
            PlaceColumn::Created => "Created",
            PlaceColumn::Approved => "Approved",
            PlaceColumn::Id => "Id",
        }
    }

    /// Cell text for `place` in this column.
    pub fn cell(&self, place: &Place) -> String {
        match self {
            PlaceColumn::Name => place.name.clone(),
            PlaceColumn::Address => format_address(place),
            PlaceColumn::Category => place.category.to_string(),
            PlaceColumn::User => place.uid.clone(),
            PlaceColumn::Created => place
                .created_at
                .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            PlaceColumn::Approved => place.is_approved.to_string(),
            PlaceColumn::Id => place.id.clone(),
        }
    }

    fn compare(&self, a: &Place, b: &Place) -> Ordering {
        match self {
            PlaceColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            PlaceColumn::Address => format_address(a)
                .to_lowercase()
                .cmp(&format_address(b).to_lowercase()),
            PlaceColumn::Category => a.category.as_str().cmp(b.category.as_str()),
            PlaceColumn::User => a.uid.cmp(&b.uid),
            PlaceColumn::Created => a.created_at.cmp(&b.created_at),
            PlaceColumn::Approved => a.is_approved.cmp(&b.is_approved),
            PlaceColumn::Id => a.id.cmp(&b.id),
        }
    }
}

impl fmt::Display for PlaceColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for PlaceColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(PlaceColumn::Name),
            "address" => Ok(PlaceColumn::Address),
            "category" => Ok(PlaceColumn::Category),
            "user" | "uid" => Ok(PlaceColumn::User),
            "created" | "createdat" => Ok(PlaceColumn::Created),
            "approved" | "isapproved" => Ok(PlaceColumn::Approved),
            "id" | "edit" => Ok(PlaceColumn::Id),
            other => Err(format!("unknown column: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Stable sort; ties keep their incoming order in both directions.
pub fn sort_places(places: &mut [Place], column: PlaceColumn, direction: SortDirection) {
    places.sort_by(|a, b| match direction {
        SortDirection::Ascending => column.compare(a, b),
        SortDirection::Descending => column.compare(b, a),
    });
}
