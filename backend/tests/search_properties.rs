use chrono::Utc;
use marketplace_store::{
    filter_properties, haversine_km, search_properties, ApprovalStatus, Location, MemoryStorage,
    NewProperty, Property, SearchFilters, Store,
};
use proptest::prelude::*;

const CITIES: [&str; 4] = ["London", "Leeds", "Bristol", "Liverpool"];
const TYPES: [&str; 3] = ["house", "flat", "bungalow"];

fn arb_property() -> impl Strategy<Value = Property> {
    (
        0..CITIES.len(),
        0..TYPES.len(),
        50_000u64..2_000_000,
        0u32..6,
        0u32..4,
    )
        .prop_map(|(city, kind, price, bedrooms, bathrooms)| {
            Property::from_new(
                String::new(),
                NewProperty {
                    title: "Generated".to_string(),
                    price,
                    property_type: TYPES[kind].to_string(),
                    bedrooms,
                    bathrooms,
                    location: Location {
                        city: CITIES[city].to_string(),
                        ..Default::default()
                    },
                    approval_status: ApprovalStatus::Approved,
                    ..Default::default()
                },
                Utc::now(),
            )
        })
}

fn arb_filters() -> impl Strategy<Value = SearchFilters> {
    (
        proptest::option::of(0..TYPES.len()),
        proptest::option::of(prop_oneof![Just("lon"), Just("LEEDS"), Just("l"), Just("pool")]),
        proptest::option::of(0u64..2_000_000),
        proptest::option::of(0u64..2_000_000),
        proptest::option::of(0u32..6),
        proptest::option::of(0u32..4),
    )
        .prop_map(|(kind, city, min_price, max_price, bedrooms, bathrooms)| SearchFilters {
            property_type: kind.map(|k| TYPES[k].to_string()),
            listing_type: None,
            city: city.map(str::to_string),
            min_price,
            max_price,
            bedrooms,
            bathrooms,
        })
}

/// Ids are the index in the vector, so order checks survive duplicates.
fn arb_properties() -> impl Strategy<Value = Vec<Property>> {
    proptest::collection::vec(arb_property(), 0..40).prop_map(|mut properties| {
        for (i, p) in properties.iter_mut().enumerate() {
            p.id = i.to_string();
        }
        properties
    })
}

/// Each `Some` field of `filters` on its own.
fn single_filters(filters: &SearchFilters) -> Vec<SearchFilters> {
    let mut singles = Vec::new();
    if filters.property_type.is_some() {
        singles.push(SearchFilters {
            property_type: filters.property_type.clone(),
            ..Default::default()
        });
    }
    if filters.city.is_some() {
        singles.push(SearchFilters {
            city: filters.city.clone(),
            ..Default::default()
        });
    }
    if filters.min_price.is_some() {
        singles.push(SearchFilters {
            min_price: filters.min_price,
            ..Default::default()
        });
    }
    if filters.max_price.is_some() {
        singles.push(SearchFilters {
            max_price: filters.max_price,
            ..Default::default()
        });
    }
    if filters.bedrooms.is_some() {
        singles.push(SearchFilters {
            bedrooms: filters.bedrooms,
            ..Default::default()
        });
    }
    if filters.bathrooms.is_some() {
        singles.push(SearchFilters {
            bathrooms: filters.bathrooms,
            ..Default::default()
        });
    }
    singles
}

proptest! {
    #[test]
    fn combined_filters_are_a_subset_of_each_single_filter(
        properties in arb_properties(),
        filters in arb_filters(),
    ) {
        let combined = filter_properties(&properties, &filters);
        for single in single_filters(&filters) {
            let alone = filter_properties(&properties, &single);
            for p in &combined {
                prop_assert!(alone.contains(p));
            }
        }
    }

    #[test]
    fn filtering_preserves_relative_order(
        properties in arb_properties(),
        filters in arb_filters(),
    ) {
        let combined = filter_properties(&properties, &filters);
        let positions: Vec<usize> = combined
            .iter()
            .map(|p| p.id.parse::<usize>().unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn city_filter_ignores_case(
        properties in arb_properties(),
        city in prop_oneof![Just("london"), Just("leeds"), Just("ool")],
    ) {
        let lower = SearchFilters { city: Some(city.to_string()), ..Default::default() };
        let upper = SearchFilters { city: Some(city.to_uppercase()), ..Default::default() };
        prop_assert_eq!(
            filter_properties(&properties, &lower),
            filter_properties(&properties, &upper)
        );
    }

    #[test]
    fn store_search_matches_pure_filter_over_approved(
        properties in arb_properties(),
        statuses in proptest::collection::vec(0..ApprovalStatus::ALL.len(), 40),
        filters in arb_filters(),
    ) {
        let mut store = Store::new(MemoryStorage::new());
        store.initialize().unwrap();
        for (i, p) in properties.iter().enumerate() {
            store
                .create_property(NewProperty {
                    title: p.title.clone(),
                    price: p.price,
                    property_type: p.property_type.clone(),
                    bedrooms: p.bedrooms,
                    bathrooms: p.bathrooms,
                    location: p.location.clone(),
                    approval_status: ApprovalStatus::ALL[statuses[i]],
                    ..Default::default()
                })
                .unwrap();
        }

        let approved = store.get_approved_properties().unwrap();
        prop_assert_eq!(
            search_properties(&store, &filters).unwrap(),
            filter_properties(&approved, &filters)
        );
    }

    #[test]
    fn haversine_is_non_negative_and_symmetric(
        lat1 in -90.0f64..90.0, lng1 in -180.0f64..180.0,
        lat2 in -90.0f64..90.0, lng2 in -180.0f64..180.0,
    ) {
        let there = haversine_km(lat1, lng1, lat2, lng2);
        let back = haversine_km(lat2, lng2, lat1, lng1);
        prop_assert!(there >= 0.0);
        prop_assert!((there - back).abs() < 1e-6);
        prop_assert_eq!(haversine_km(lat1, lng1, lat1, lng1), 0.0);
    }
}
