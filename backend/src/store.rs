use chrono::Utc;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::Storage;
use crate::error::{StoreError, StoreResult};
use crate::ids::{generate_id, ALERT_PREFIX, PROPERTY_PREFIX, USER_PREFIX};
use crate::models::{
    Alert, NewAlert, NewProperty, NewUser, Property, PropertyPatch, Role, User, UserPatch,
};
use crate::seed;

pub const USERS_KEY: &str = "users";
pub const PROPERTIES_KEY: &str = "properties";
pub const ALERTS_KEY: &str = "alerts";
pub const CURRENT_USER_KEY: &str = "currentUser";
pub const CURRENT_USER_ID_KEY: &str = "currentUserId";

/// Owner of the `users`, `properties` and `alerts` collections.
///
/// Every mutation is a read-modify-write of the whole collection, so the
/// Store is single-writer only: two Stores over the same backend will
/// overwrite each other's changes (last write wins).
pub struct Store<S: Storage> {
    storage: S,
}

impl<S: Storage> Store<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Seeds missing collections. Existing collections are never touched,
    /// so calling this repeatedly is safe.
    pub fn initialize(&mut self) -> StoreResult<()> {
        if self.storage.get_item(USERS_KEY)?.is_none() {
            let users = seed::demo_users();
            info!("Seeding {} demo accounts", users.len());
            self.save(USERS_KEY, &users)?;
        }
        if self.storage.get_item(PROPERTIES_KEY)?.is_none() {
            self.save::<Property>(PROPERTIES_KEY, &[])?;
        }
        if self.storage.get_item(ALERTS_KEY)?.is_none() {
            self.save::<Alert>(ALERTS_KEY, &[])?;
        }
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        let Some(raw) = self.storage.get_item(key)? else {
            return Ok(Vec::new());
        };
        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                warn!("Collection '{}' is malformed, treating it as empty: {}", key, e);
                return Ok(Vec::new());
            }
        };
        // A bad row is dropped on its own; the rest of the collection survives.
        let records = values
            .into_iter()
            .enumerate()
            .filter_map(|(i, value)| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping malformed record {} in '{}': {}", i, key, e);
                    None
                }
            })
            .collect();
        Ok(records)
    }

    fn save<T: Serialize>(&mut self, key: &str, records: &[T]) -> StoreResult<()> {
        let raw = serde_json::to_string(records).map_err(|source| StoreError::Serialization {
            key: key.to_string(),
            source,
        })?;
        self.storage.set_item(key, &raw)
    }

    // Users

    pub fn get_users(&self) -> StoreResult<Vec<User>> {
        self.load(USERS_KEY)
    }

    pub fn get_user_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.get_users()?.into_iter().find(|u| u.id == id))
    }

    /// Emails match case-insensitively, ignoring surrounding whitespace.
    pub fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let wanted = email.trim().to_lowercase();
        Ok(self
            .get_users()?
            .into_iter()
            .find(|u| u.email.trim().to_lowercase() == wanted))
    }

    /// Appends a user. Email uniqueness is the caller's job (see `auth::signup`).
    pub fn create_user(&mut self, new: NewUser) -> StoreResult<User> {
        let mut users = self.get_users()?;
        let user = User::from_new(generate_id(USER_PREFIX), new, Utc::now());
        users.push(user.clone());
        self.save(USERS_KEY, &users)?;
        debug!("Created user {} ({})", user.id, user.role);
        Ok(user)
    }

    pub fn update_user(&mut self, id: &str, patch: UserPatch) -> StoreResult<Option<User>> {
        let mut users = self.get_users()?;
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            debug!("update_user: no user {}", id);
            return Ok(None);
        };
        patch.apply(user);
        let updated = user.clone();
        self.save(USERS_KEY, &users)?;

        if self.session_user_id()?.as_deref() == Some(id) {
            self.set_session_user(&updated)?;
        }
        debug!("Updated user {}", id);
        Ok(Some(updated))
    }

    pub fn delete_user(&mut self, id: &str) -> StoreResult<bool> {
        let mut users = self.get_users()?;
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Ok(false);
        }
        self.save(USERS_KEY, &users)?;

        if self.session_user_id()?.as_deref() == Some(id) {
            self.clear_session()?;
        }
        debug!("Deleted user {}", id);
        Ok(true)
    }

    /// Adds `property_id` to the user's saved list, or removes it if already
    /// saved. Returns the new saved state, or `None` for an unknown user.
    pub fn toggle_saved_property(
        &mut self,
        user_id: &str,
        property_id: &str,
    ) -> StoreResult<Option<bool>> {
        let Some(user) = self.get_user_by_id(user_id)? else {
            return Ok(None);
        };
        let mut saved = user.saved_properties;
        let now_saved = if let Some(pos) = saved.iter().position(|p| p == property_id) {
            saved.remove(pos);
            false
        } else {
            saved.push(property_id.to_string());
            true
        };
        let patch = UserPatch {
            saved_properties: Some(saved),
            ..UserPatch::default()
        };
        Ok(self.update_user(user_id, patch)?.map(|_| now_saved))
    }

    // Properties

    pub fn get_properties(&self) -> StoreResult<Vec<Property>> {
        self.load(PROPERTIES_KEY)
    }

    pub fn get_property_by_id(&self, id: &str) -> StoreResult<Option<Property>> {
        Ok(self.get_properties()?.into_iter().find(|p| p.id == id))
    }

    pub fn get_properties_by_agent(&self, agent_id: &str) -> StoreResult<Vec<Property>> {
        let mut properties = self.get_properties()?;
        properties.retain(|p| p.agent_id == agent_id);
        Ok(properties)
    }

    pub fn get_approved_properties(&self) -> StoreResult<Vec<Property>> {
        let mut properties = self.get_properties()?;
        properties.retain(Property::is_approved);
        Ok(properties)
    }

    pub fn create_property(&mut self, new: NewProperty) -> StoreResult<Property> {
        let mut properties = self.get_properties()?;
        let property = Property::from_new(generate_id(PROPERTY_PREFIX), new, Utc::now());
        properties.push(property.clone());
        self.save(PROPERTIES_KEY, &properties)?;
        debug!(
            "Created property {} for agent {} ({})",
            property.id, property.agent_id, property.approval_status
        );
        Ok(property)
    }

    /// Merges `patch` into the property and refreshes `updatedAt`.
    pub fn update_property(
        &mut self,
        id: &str,
        patch: PropertyPatch,
    ) -> StoreResult<Option<Property>> {
        let mut properties = self.get_properties()?;
        let Some(property) = properties.iter_mut().find(|p| p.id == id) else {
            debug!("update_property: no property {}", id);
            return Ok(None);
        };
        patch.apply(property);
        property.updated_at = Utc::now();
        let updated = property.clone();
        self.save(PROPERTIES_KEY, &properties)?;
        debug!("Updated property {}", id);
        Ok(Some(updated))
    }

    pub fn delete_property(&mut self, id: &str) -> StoreResult<bool> {
        let mut properties = self.get_properties()?;
        let before = properties.len();
        properties.retain(|p| p.id != id);
        if properties.len() == before {
            return Ok(false);
        }
        self.save(PROPERTIES_KEY, &properties)?;
        debug!("Deleted property {}", id);
        Ok(true)
    }

    // Alerts

    pub fn get_alerts(&self) -> StoreResult<Vec<Alert>> {
        self.load(ALERTS_KEY)
    }

    pub fn get_alerts_by_user(&self, user_id: &str) -> StoreResult<Vec<Alert>> {
        let mut alerts = self.get_alerts()?;
        alerts.retain(|a| a.user_id == user_id);
        Ok(alerts)
    }

    pub fn create_alert(&mut self, new: NewAlert) -> StoreResult<Alert> {
        let mut alerts = self.get_alerts()?;
        let alert = Alert::from_new(generate_id(ALERT_PREFIX), new, Utc::now());
        alerts.push(alert.clone());
        self.save(ALERTS_KEY, &alerts)?;
        debug!("Created alert {} for user {}", alert.id, alert.user_id);
        Ok(alert)
    }

    pub fn mark_alert_as_read(&mut self, id: &str) -> StoreResult<bool> {
        let mut alerts = self.get_alerts()?;
        let Some(alert) = alerts.iter_mut().find(|a| a.id == id) else {
            return Ok(false);
        };
        alert.read = true;
        self.save(ALERTS_KEY, &alerts)?;
        Ok(true)
    }

    /// Marks every unread alert of `user_id` as read; returns how many changed.
    pub fn mark_all_alerts_as_read(&mut self, user_id: &str) -> StoreResult<usize> {
        let mut alerts = self.get_alerts()?;
        let mut changed = 0;
        for alert in alerts.iter_mut().filter(|a| a.user_id == user_id && !a.read) {
            alert.read = true;
            changed += 1;
        }
        if changed > 0 {
            self.save(ALERTS_KEY, &alerts)?;
        }
        Ok(changed)
    }

    pub fn delete_alert(&mut self, id: &str) -> StoreResult<bool> {
        let mut alerts = self.get_alerts()?;
        let before = alerts.len();
        alerts.retain(|a| a.id != id);
        if alerts.len() == before {
            return Ok(false);
        }
        self.save(ALERTS_KEY, &alerts)?;
        Ok(true)
    }

    /// Administrative reset: drops every property and alert and every
    /// non-admin user. Irreversible.
    pub fn clear_all_data(&mut self) -> StoreResult<()> {
        let mut users = self.get_users()?;
        users.retain(|u| u.role == Role::Admin);
        info!("Clearing all data, keeping {} admin account(s)", users.len());

        self.save(USERS_KEY, &users)?;
        self.save::<Property>(PROPERTIES_KEY, &[])?;
        self.save::<Alert>(ALERTS_KEY, &[])?;

        if let Some(current) = self.session_user_id()? {
            if !users.iter().any(|u| u.id == current) {
                self.clear_session()?;
            }
        }
        Ok(())
    }

    // Session: a cached snapshot of one `users` row plus its id.

    pub fn set_session_user(&mut self, user: &User) -> StoreResult<()> {
        let raw = serde_json::to_string(user).map_err(|source| StoreError::Serialization {
            key: CURRENT_USER_KEY.to_string(),
            source,
        })?;
        self.storage.set_item(CURRENT_USER_KEY, &raw)?;
        self.storage.set_item(CURRENT_USER_ID_KEY, &user.id)
    }

    pub fn session_user_id(&self) -> StoreResult<Option<String>> {
        self.storage.get_item(CURRENT_USER_ID_KEY)
    }

    pub fn session_user(&self) -> StoreResult<Option<User>> {
        let Some(raw) = self.storage.get_item(CURRENT_USER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!("Session snapshot is malformed, ignoring it: {}", e);
                Ok(None)
            }
        }
    }

    pub fn clear_session(&mut self) -> StoreResult<()> {
        self.storage.remove_item(CURRENT_USER_KEY)?;
        self.storage.remove_item(CURRENT_USER_ID_KEY)
    }
}
