use log::info;
use thiserror::Error;

use crate::auth::{has_any_role, has_role};
use crate::db::Storage;
use crate::error::StoreError;
use crate::models::{
    AlertKind, ApprovalStatus, NewAlert, NewProperty, Property, PropertyPatch, Role, User,
};
use crate::store::Store;
use crate::validation::{validate_listing, ValidationErrors};

pub const SUBMITTER_ROLES: [Role; 3] = [Role::Agent, Role::Landlord, Role::Admin];

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("A {role} account cannot {action}")]
    PermissionDenied { role: Role, action: &'static str },

    #[error("Property {0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Stores a new listing owned by `submitter`, held for review.
///
/// Whatever status the caller put on `listing` is replaced by `Pending`,
/// and every admin gets a `new_listing` alert.
pub fn submit_listing<S: Storage>(
    store: &mut Store<S>,
    submitter: &User,
    mut listing: NewProperty,
) -> Result<Property, ListingError> {
    if !has_any_role(submitter, &SUBMITTER_ROLES) {
        return Err(ListingError::PermissionDenied {
            role: submitter.role,
            action: "submit listings",
        });
    }
    validate_listing(&listing)?;

    listing.approval_status = ApprovalStatus::Pending;
    listing.agent_id = submitter.id.clone();
    let property = store.create_property(listing)?;

    let admins: Vec<User> = store
        .get_users()?
        .into_iter()
        .filter(|u| has_role(u, Role::Admin))
        .collect();
    for admin in &admins {
        store.create_alert(
            NewAlert::new(
                &admin.id,
                AlertKind::NewListing,
                "New listing awaiting review",
                format!("{} submitted \"{}\"", submitter.name, property.title),
            )
            .for_property(&property.id),
        )?;
    }
    info!(
        "Listing {} submitted by {} ({} admin(s) notified)",
        property.id,
        submitter.id,
        admins.len()
    );
    Ok(property)
}

pub fn approve_listing<S: Storage>(
    store: &mut Store<S>,
    reviewer: &User,
    property_id: &str,
) -> Result<Property, ListingError> {
    review(store, reviewer, property_id, ApprovalStatus::Approved)
}

pub fn reject_listing<S: Storage>(
    store: &mut Store<S>,
    reviewer: &User,
    property_id: &str,
) -> Result<Property, ListingError> {
    review(store, reviewer, property_id, ApprovalStatus::Rejected)
}

fn review<S: Storage>(
    store: &mut Store<S>,
    reviewer: &User,
    property_id: &str,
    status: ApprovalStatus,
) -> Result<Property, ListingError> {
    if !has_role(reviewer, Role::Admin) {
        return Err(ListingError::PermissionDenied {
            role: reviewer.role,
            action: "review listings",
        });
    }
    let property = store
        .update_property(property_id, PropertyPatch::status(status))?
        .ok_or_else(|| ListingError::NotFound(property_id.to_string()))?;

    let (kind, title) = match status {
        ApprovalStatus::Approved => (AlertKind::ListingApproved, "Listing approved"),
        _ => (AlertKind::ListingRejected, "Listing rejected"),
    };
    store.create_alert(
        NewAlert::new(
            &property.agent_id,
            kind,
            title,
            format!("\"{}\" is now {}", property.title, status),
        )
        .for_property(&property.id),
    )?;
    info!("Listing {} {} by {}", property.id, status, reviewer.id);
    Ok(property)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStorage;
    use crate::models::Location;

    fn seeded() -> Store<MemoryStorage> {
        let mut store = Store::new(MemoryStorage::new());
        store.initialize().unwrap();
        store
    }

    fn user(store: &Store<MemoryStorage>, id: &str) -> User {
        store.get_user_by_id(id).unwrap().unwrap()
    }

    fn listing() -> NewProperty {
        NewProperty {
            title: "Garden flat".to_string(),
            price: 310_000,
            property_type: "flat".to_string(),
            bedrooms: 2,
            bathrooms: 1,
            location: Location {
                address: "14 Elm Row".to_string(),
                city: "Edinburgh".to_string(),
                postcode: "EH7 4AA".to_string(),
                lat: 55.9592,
                lng: -3.1838,
            },
            approval_status: ApprovalStatus::Approved,
            ..Default::default()
        }
    }

    #[test]
    fn submission_is_forced_to_pending_and_owned() {
        let mut store = seeded();
        let landlord = user(&store, "user-demo-landlord");
        let property = submit_listing(&mut store, &landlord, listing()).unwrap();

        assert_eq!(property.approval_status, ApprovalStatus::Pending);
        assert_eq!(property.agent_id, landlord.id);

        let admin_alerts = store.get_alerts_by_user("user-demo-admin").unwrap();
        assert_eq!(admin_alerts.len(), 1);
        assert_eq!(admin_alerts[0].kind, AlertKind::NewListing);
        assert_eq!(admin_alerts[0].property_id.as_deref(), Some(property.id.as_str()));
    }

    #[test]
    fn tenants_cannot_submit() {
        let mut store = seeded();
        let tenant = user(&store, "user-demo-tenant");
        let err = submit_listing(&mut store, &tenant, listing()).unwrap_err();
        assert!(matches!(err, ListingError::PermissionDenied { role: Role::Tenant, .. }));
        assert!(store.get_properties().unwrap().is_empty());
    }

    #[test]
    fn invalid_listing_is_not_stored() {
        let mut store = seeded();
        let agent = user(&store, "user-demo-agent");
        let mut bad = listing();
        bad.price = 0;
        let err = submit_listing(&mut store, &agent, bad).unwrap_err();
        assert!(matches!(err, ListingError::Validation(_)));
        assert!(store.get_properties().unwrap().is_empty());
    }

    #[test]
    fn admin_review_notifies_owner() {
        let mut store = seeded();
        let agent = user(&store, "user-demo-agent");
        let admin = user(&store, "user-demo-admin");
        let property = submit_listing(&mut store, &agent, listing()).unwrap();

        let approved = approve_listing(&mut store, &admin, &property.id).unwrap();
        assert!(approved.is_approved());

        let rejected = reject_listing(&mut store, &admin, &property.id).unwrap();
        assert_eq!(rejected.approval_status, ApprovalStatus::Rejected);

        let kinds: Vec<AlertKind> = store
            .get_alerts_by_user(&agent.id)
            .unwrap()
            .into_iter()
            .map(|a| a.kind)
            .collect();
        assert_eq!(kinds, vec![AlertKind::ListingApproved, AlertKind::ListingRejected]);
    }

    #[test]
    fn review_requires_admin_and_existing_listing() {
        let mut store = seeded();
        let agent = user(&store, "user-demo-agent");
        let admin = user(&store, "user-demo-admin");
        let property = submit_listing(&mut store, &agent, listing()).unwrap();

        assert!(matches!(
            approve_listing(&mut store, &agent, &property.id),
            Err(ListingError::PermissionDenied { .. })
        ));
        assert!(matches!(
            approve_listing(&mut store, &admin, "prop-missing"),
            Err(ListingError::NotFound(_))
        ));
    }
}
