// Built-in demo list, written when --static is passed or when the
// OpenStreetMap fetch fails or comes back too small.

use shared_types::{Category, City, LatLng, Place, Supply, SEED_UID};

struct SamplePlace {
    name: &'static str,
    city: City,
    category: Category,
    supply: Supply,
    description: &'static str,
    street_address: &'static str,
    address_number: &'static str,
    neighborhood: &'static str,
    zip_code: &'static str,
    lat: f64,
    lng: f64,
}

impl SamplePlace {
    fn to_place(&self) -> Place {
        Place {
            id: String::new(),
            name: self.name.to_string(),
            city: Some(self.city),
            category: self.category,
            supply: self.supply,
            description: self.description.to_string(),
            street_address: self.street_address.to_string(),
            address_number: Some(self.address_number.to_string()),
            neighborhood: Some(self.neighborhood.to_string()),
            zip_code: Some(self.zip_code.to_string()),
            location: LatLng {
                lat: self.lat,
                lng: self.lng,
            },
            is_approved: true,
            uid: SEED_UID.to_string(),
            created_at: None,
            website: None,
            telephone: None,
        }
    }
}

const SAMPLES: &[SamplePlace] = &[
    SamplePlace {
        name: "Paulista Corner Café",
        city: City::SaoPaulo,
        category: Category::Cafe,
        supply: Supply::BreakfastBrunch,
        description: "Coffee and light bites near the avenue.",
        street_address: "Avenida Paulista",
        address_number: "1000",
        neighborhood: "Bela Vista",
        zip_code: "01310-100",
        lat: -23.5632,
        lng: -46.6544,
    },
    SamplePlace {
        name: "Centro Lunch Bar",
        city: City::SaoPaulo,
        category: Category::FastFood,
        supply: Supply::Lunch,
        description: "Quick lunch plates and sandwiches.",
        street_address: "Rua Direita",
        address_number: "250",
        neighborhood: "Sé",
        zip_code: "01002-000",
        lat: -23.5506,
        lng: -46.634,
    },
    SamplePlace {
        name: "Vila Madalena Taproom",
        city: City::SaoPaulo,
        category: Category::Pub,
        supply: Supply::AfterWork,
        description: "Draft beers and small plates.",
        street_address: "Rua Harmonia",
        address_number: "420",
        neighborhood: "Vila Madalena",
        zip_code: "05435-000",
        lat: -23.5561,
        lng: -46.6946,
    },
    SamplePlace {
        name: "Ibirapuera Garden Grill",
        city: City::SaoPaulo,
        category: Category::KioskGrill,
        supply: Supply::Dinner,
        description: "Simple grilled options close to the park.",
        street_address: "Avenida Pedro Álvares Cabral",
        address_number: "1",
        neighborhood: "Ibirapuera",
        zip_code: "04094-050",
        lat: -23.5874,
        lng: -46.658,
    },
    SamplePlace {
        name: "Pinheiros Food Truck Spot",
        city: City::SaoPaulo,
        category: Category::FoodTruck,
        supply: Supply::GeneralMenu,
        description: "Rotating menu with street-style favorites.",
        street_address: "Rua dos Pinheiros",
        address_number: "800",
        neighborhood: "Pinheiros",
        zip_code: "05422-001",
        lat: -23.5618,
        lng: -46.6893,
    },
    SamplePlace {
        name: "Moema Dinner House",
        city: City::SaoPaulo,
        category: Category::Restaurant,
        supply: Supply::Dinner,
        description: "Casual dinner spot with a varied menu.",
        street_address: "Avenida Ibirapuera",
        address_number: "3100",
        neighborhood: "Moema",
        zip_code: "04028-013",
        lat: -23.6002,
        lng: -46.6638,
    },
    SamplePlace {
        name: "Möllan Morning Café",
        city: City::Malmo,
        category: Category::Cafe,
        supply: Supply::BreakfastBrunch,
        description: "Fresh pastries and hot drinks.",
        street_address: "Södra Förstadsgatan",
        address_number: "90",
        neighborhood: "Möllevången",
        zip_code: "214 28",
        lat: 55.5912,
        lng: 13.0136,
    },
    SamplePlace {
        name: "Gamla Väster Bistro",
        city: City::Malmo,
        category: Category::Restaurant,
        supply: Supply::Dinner,
        description: "Relaxed bistro vibes and seasonal plates.",
        street_address: "Västergatan",
        address_number: "6",
        neighborhood: "Gamla Väster",
        zip_code: "211 21",
        lat: 55.6041,
        lng: 13.0006,
    },
    SamplePlace {
        name: "Västra Hamnen Afterwork Pub",
        city: City::Malmo,
        category: Category::Pub,
        supply: Supply::AfterWork,
        description: "Afterwork hangout by the water.",
        street_address: "Lilla Varvsgatan",
        address_number: "14",
        neighborhood: "Västra Hamnen",
        zip_code: "211 15",
        lat: 55.6138,
        lng: 12.9766,
    },
    SamplePlace {
        name: "Triangeln Quick Bites",
        city: City::Malmo,
        category: Category::FastFood,
        supply: Supply::Lunch,
        description: "Quick bites and take-away options.",
        street_address: "Södra Förstadsgatan",
        address_number: "41",
        neighborhood: "Triangeln",
        zip_code: "211 43",
        lat: 55.5965,
        lng: 13.0016,
    },
    SamplePlace {
        name: "Kungsparken Grill Kiosk",
        city: City::Malmo,
        category: Category::KioskGrill,
        supply: Supply::GeneralMenu,
        description: "Classic kiosk-grill menu near the park.",
        street_address: "Slottsgatan",
        address_number: "33",
        neighborhood: "Slottsstaden",
        zip_code: "211 33",
        lat: 55.603,
        lng: 12.9915,
    },
    SamplePlace {
        name: "Malmö Street Food Truck",
        city: City::Malmo,
        category: Category::FoodTruck,
        supply: Supply::GeneralMenu,
        description: "Street food classics with rotating specials.",
        street_address: "Norra Vallgatan",
        address_number: "64",
        neighborhood: "Centrum",
        zip_code: "211 22",
        lat: 55.607,
        lng: 12.9993,
    },
    SamplePlace {
        name: "Nørrebro Coffee Corner",
        city: City::Copenhagen,
        category: Category::Cafe,
        supply: Supply::BreakfastBrunch,
        description: "Cozy coffee spot in the neighborhood.",
        street_address: "Nørrebrogade",
        address_number: "55",
        neighborhood: "Nørrebro",
        zip_code: "2200",
        lat: 55.6953,
        lng: 12.5508,
    },
    SamplePlace {
        name: "Vesterbro Dinner Table",
        city: City::Copenhagen,
        category: Category::Restaurant,
        supply: Supply::Dinner,
        description: "Casual dinner with a simple menu.",
        street_address: "Istedgade",
        address_number: "92",
        neighborhood: "Vesterbro",
        zip_code: "1650",
        lat: 55.6674,
        lng: 12.5496,
    },
    SamplePlace {
        name: "Nyhavn Afterwork Pub",
        city: City::Copenhagen,
        category: Category::Pub,
        supply: Supply::AfterWork,
        description: "Afterwork drinks near the canal.",
        street_address: "Nyhavn",
        address_number: "18",
        neighborhood: "Indre By",
        zip_code: "1051",
        lat: 55.6795,
        lng: 12.5903,
    },
    SamplePlace {
        name: "Østerbro Lunch Stop",
        city: City::Copenhagen,
        category: Category::FastFood,
        supply: Supply::Lunch,
        description: "Fast lunch and grab-and-go.",
        street_address: "Østerbrogade",
        address_number: "120",
        neighborhood: "Østerbro",
        zip_code: "2100",
        lat: 55.7062,
        lng: 12.5763,
    },
    SamplePlace {
        name: "Frederiksberg Grill Kiosk",
        city: City::Copenhagen,
        category: Category::KioskGrill,
        supply: Supply::GeneralMenu,
        description: "Classic grill kiosk with comfort food.",
        street_address: "Falkoner Allé",
        address_number: "58",
        neighborhood: "Frederiksberg",
        zip_code: "2000",
        lat: 55.6792,
        lng: 12.5346,
    },
    SamplePlace {
        name: "Copenhagen Street Food Truck",
        city: City::Copenhagen,
        category: Category::FoodTruck,
        supply: Supply::GeneralMenu,
        description: "Street food favorites with rotating specials.",
        street_address: "Refshalevej",
        address_number: "167",
        neighborhood: "Refshaleøen",
        zip_code: "1432",
        lat: 55.6838,
        lng: 12.6141,
    },
];

pub fn static_places() -> Vec<Place> {
    SAMPLES.iter().map(SamplePlace::to_place).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_city_and_category_is_covered() {
        let places = static_places();
        assert_eq!(places.len(), 18);
        for city in City::ALL {
            for category in Category::ALL {
                assert!(
                    places
                        .iter()
                        .any(|p| p.city == Some(*city) && p.category == *category),
                    "missing {} in {}",
                    category,
                    city
                );
            }
        }
        assert!(places.iter().all(|p| p.is_seeded() && p.is_approved));
    }
}
