//! Read-only views over the property collection.
//!
//! Nothing here mutates the Store; every function works from a fresh read.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::db::Storage;
use crate::error::StoreResult;
use crate::models::{ApprovalStatus, ListingType, Property, Role};
use crate::store::Store;

/// Search criteria. Each `Some` field is one conjunct; blank text filters
/// count as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub listing_type: Option<ListingType>,
    pub city: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
}

impl SearchFilters {
    pub fn matches(&self, property: &Property) -> bool {
        if let Some(kind) = non_blank(&self.property_type) {
            if property.property_type != kind {
                return false;
            }
        }
        if let Some(listing_type) = self.listing_type {
            if property.listing_type != listing_type {
                return false;
            }
        }
        if let Some(city) = non_blank(&self.city) {
            let wanted = city.to_lowercase();
            if !property.location.city.to_lowercase().contains(&wanted) {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if property.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if property.price > max {
                return false;
            }
        }
        if let Some(bedrooms) = self.bedrooms {
            if property.bedrooms < bedrooms {
                return false;
            }
        }
        if let Some(bathrooms) = self.bathrooms {
            if property.bathrooms < bathrooms {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

pub fn filter_properties(properties: &[Property], filters: &SearchFilters) -> Vec<Property> {
    properties
        .iter()
        .filter(|p| filters.matches(p))
        .cloned()
        .collect()
}

/// Approved properties matching `filters`, in stored order.
pub fn search_properties<S: Storage>(
    store: &Store<S>,
    filters: &SearchFilters,
) -> StoreResult<Vec<Property>> {
    Ok(filter_properties(&store.get_approved_properties()?, filters))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    PriceAscending,
    PriceDescending,
    Newest,
}

/// Stable sort, so ties keep their stored order.
pub fn sort_properties(properties: &mut [Property], order: SortOrder) {
    match order {
        SortOrder::PriceAscending => properties.sort_by_key(|p| p.price),
        SortOrder::PriceDescending => properties.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOrder::Newest => properties.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceStats {
    pub total_users: usize,
    pub users_by_role: BTreeMap<Role, usize>,
    pub total_properties: usize,
    pub properties_by_status: BTreeMap<ApprovalStatus, usize>,
    pub properties_by_type: BTreeMap<String, usize>,
    pub total_alerts: usize,
    pub unread_alerts: usize,
}

/// Counts recomputed from a full scan on every call.
pub fn get_stats<S: Storage>(store: &Store<S>) -> StoreResult<MarketplaceStats> {
    let users = store.get_users()?;
    let properties = store.get_properties()?;
    let alerts = store.get_alerts()?;

    let mut users_by_role: BTreeMap<Role, usize> = Role::ALL.iter().map(|r| (*r, 0)).collect();
    for user in &users {
        *users_by_role.entry(user.role).or_default() += 1;
    }

    let mut properties_by_status: BTreeMap<ApprovalStatus, usize> =
        ApprovalStatus::ALL.iter().map(|s| (*s, 0)).collect();
    let mut properties_by_type: BTreeMap<String, usize> = BTreeMap::new();
    for property in &properties {
        *properties_by_status.entry(property.approval_status).or_default() += 1;
        *properties_by_type
            .entry(property.property_type.clone())
            .or_default() += 1;
    }

    Ok(MarketplaceStats {
        total_users: users.len(),
        users_by_role,
        total_properties: properties.len(),
        properties_by_status,
        properties_by_type,
        total_alerts: alerts.len(),
        unread_alerts: alerts.iter().filter(|a| !a.read).count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, NewProperty};
    use chrono::{Duration, Utc};

    fn property(id: &str, city: &str, price: u64, bedrooms: u32) -> Property {
        Property::from_new(
            id.to_string(),
            NewProperty {
                title: id.to_string(),
                price,
                property_type: "house".to_string(),
                bedrooms,
                bathrooms: 1,
                location: Location {
                    city: city.to_string(),
                    ..Default::default()
                },
                approval_status: ApprovalStatus::Approved,
                ..Default::default()
            },
            Utc::now(),
        )
    }

    #[test]
    fn empty_filters_match_everything() {
        let all = vec![property("a", "Leeds", 1, 1), property("b", "York", 2, 2)];
        assert_eq!(filter_properties(&all, &SearchFilters::default()), all);
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let all = vec![
            property("a", "Leeds", 100, 1),
            property("b", "Leeds", 200, 1),
            property("c", "Leeds", 300, 1),
        ];
        let filters = SearchFilters {
            min_price: Some(100),
            max_price: Some(200),
            ..Default::default()
        };
        let ids: Vec<_> = filter_properties(&all, &filters)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn city_is_a_case_insensitive_substring() {
        let all = vec![
            property("a", "Newcastle upon Tyne", 1, 1),
            property("b", "York", 1, 1),
        ];
        let filters = SearchFilters {
            city: Some("CASTLE".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_properties(&all, &filters).len(), 1);
    }

    #[test]
    fn blank_text_filters_are_ignored() {
        let all = vec![property("a", "Leeds", 1, 1)];
        let filters = SearchFilters {
            city: Some("   ".to_string()),
            property_type: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(filter_properties(&all, &filters).len(), 1);
    }

    #[test]
    fn bedroom_filter_is_a_minimum() {
        let all = vec![property("a", "Leeds", 1, 1), property("b", "Leeds", 1, 4)];
        let filters = SearchFilters {
            bedrooms: Some(3),
            ..Default::default()
        };
        assert_eq!(filter_properties(&all, &filters)[0].id, "b");
    }

    #[test]
    fn sort_orders() {
        let mut all = vec![
            property("mid", "Leeds", 200, 1),
            property("low", "Leeds", 100, 1),
            property("high", "Leeds", 300, 1),
        ];
        all[2].created_at = Utc::now() + Duration::hours(1);

        sort_properties(&mut all, SortOrder::PriceAscending);
        assert_eq!(all[0].id, "low");
        sort_properties(&mut all, SortOrder::PriceDescending);
        assert_eq!(all[0].id, "high");
        sort_properties(&mut all, SortOrder::Newest);
        assert_eq!(all[0].id, "high");
    }
}
