use crate::db::Storage;
use crate::error::StoreResult;
use crate::models::Property;
use crate::store::Store;

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// Great-circle distance in kilometres between two points given in degrees.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    // rounding can push near-antipodal points just past 1
    let a = a.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

pub fn distance_to(property: &Property, lat: f64, lng: f64) -> f64 {
    haversine_km(lat, lng, property.location.lat, property.location.lng)
}

/// Keeps the properties within `radius_km` of `(lat, lng)`, in their
/// original order.
pub fn within_radius(properties: Vec<Property>, lat: f64, lng: f64, radius_km: f64) -> Vec<Property> {
    properties
        .into_iter()
        .filter(|p| distance_to(p, lat, lng) <= radius_km)
        .collect()
}

/// Approved properties within `radius_km` of `(lat, lng)`. Unsorted.
pub fn get_nearby_properties<S: Storage>(
    store: &Store<S>,
    lat: f64,
    lng: f64,
    radius_km: f64,
) -> StoreResult<Vec<Property>> {
    Ok(within_radius(store.get_approved_properties()?, lat, lng, radius_km))
}

/// Like [`get_nearby_properties`], paired with each distance and sorted
/// nearest first. Equal distances keep their stored order.
pub fn rank_by_distance<S: Storage>(
    store: &Store<S>,
    lat: f64,
    lng: f64,
    radius_km: f64,
) -> StoreResult<Vec<(Property, f64)>> {
    let mut ranked: Vec<(Property, f64)> = store
        .get_approved_properties()?
        .into_iter()
        .map(|p| {
            let d = distance_to(&p, lat, lng);
            (p, d)
        })
        .filter(|(_, d)| *d <= radius_km)
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    Ok(ranked)
}
