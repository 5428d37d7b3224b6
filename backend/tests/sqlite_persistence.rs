use marketplace_store::auth;
use marketplace_store::store::{PROPERTIES_KEY, USERS_KEY};
use marketplace_store::{
    ApprovalStatus, Location, NewProperty, SqliteStorage, Storage, Store, UserPatch,
};
use tempfile::tempdir;

fn listing() -> NewProperty {
    NewProperty {
        title: "Harbour view".to_string(),
        price: 725_000,
        property_type: "apartment".to_string(),
        bedrooms: 2,
        bathrooms: 2,
        location: Location {
            address: "3 Quay".to_string(),
            city: "Bristol".to_string(),
            postcode: "BS1 4RN".to_string(),
            lat: 51.4484,
            lng: -2.5977,
        },
        agent_id: "user-demo-agent".to_string(),
        approval_status: ApprovalStatus::Approved,
        ..Default::default()
    }
}

#[test]
fn collections_survive_reopening_the_database() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("marketplace.db");
    let url = path.to_str().unwrap();

    let created = {
        let mut store = Store::new(SqliteStorage::open(url).unwrap());
        store.initialize().unwrap();
        auth::login(&mut store, "buyer@demo.com", "buyer123").unwrap();
        store.create_property(listing()).unwrap()
    };

    let mut store = Store::new(SqliteStorage::open(url).unwrap());
    store.initialize().unwrap();

    assert_eq!(store.get_users().unwrap().len(), 5);
    assert_eq!(store.get_property_by_id(&created.id).unwrap(), Some(created));
    assert_eq!(
        auth::current_user(&store).unwrap().map(|u| u.email),
        Some("buyer@demo.com".to_string())
    );

    store
        .update_user(
            "user-demo-buyer",
            UserPatch {
                credit_score: Some(720),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(
        auth::current_user(&store).unwrap().and_then(|u| u.credit_score),
        Some(720)
    );
}

#[test]
fn collections_are_stored_as_json_arrays() {
    let mut store = Store::new(SqliteStorage::open(":memory:").unwrap());
    store.initialize().unwrap();
    store.create_property(listing()).unwrap();

    let storage = store.into_storage();
    let users: serde_json::Value =
        serde_json::from_str(&storage.get_item(USERS_KEY).unwrap().unwrap()).unwrap();
    let properties: serde_json::Value =
        serde_json::from_str(&storage.get_item(PROPERTIES_KEY).unwrap().unwrap()).unwrap();

    assert_eq!(users.as_array().map(Vec::len), Some(5));
    assert_eq!(properties[0]["location"]["city"], "Bristol");
    assert_eq!(properties[0]["approvalStatus"], "approved");
    assert_eq!(
        storage.keys().unwrap(),
        vec!["alerts", "properties", "users"]
    );
}

#[test]
fn malformed_collection_is_recovered_as_empty() {
    let mut storage = SqliteStorage::open(":memory:").unwrap();
    storage.set_item(PROPERTIES_KEY, "[{\"broken\": ").unwrap();

    let mut store = Store::new(storage);
    store.initialize().unwrap();
    assert!(store.get_properties().unwrap().is_empty());

    store.create_property(listing()).unwrap();
    assert_eq!(store.get_properties().unwrap().len(), 1);
}
