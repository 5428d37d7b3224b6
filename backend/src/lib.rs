//! Persisted record store and property query engine for the real-estate
//! marketplace.
//!
//! [`Store`] owns the `users`, `properties` and `alerts` collections over any
//! [`Storage`] backend; [`query`] and [`geo`] derive read-only views from it.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod geo;
pub mod ids;
pub mod listing;
pub mod models;
pub mod query;
pub mod schema;
pub mod seed;
pub mod store;
pub mod validation;

pub use db::{MemoryStorage, SqliteStorage, Storage};
pub use error::{StoreError, StoreResult};
pub use geo::{get_nearby_properties, haversine_km, rank_by_distance, DEFAULT_RADIUS_KM};
pub use models::{
    Alert, AlertKind, ApprovalStatus, ListingType, Location, NewAlert, NewProperty, NewUser,
    Property, PropertyPatch, Role, User, UserPatch,
};
pub use query::{filter_properties, get_stats, search_properties, SearchFilters, SortOrder};
pub use store::Store;
