use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Tenant,
    Landlord,
    Buyer,
    Agent,
    Admin,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Tenant,
        Role::Landlord,
        Role::Buyer,
        Role::Agent,
        Role::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tenant => "tenant",
            Role::Landlord => "landlord",
            Role::Buyer => "buyer",
            Role::Agent => "agent",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marketplace visibility gate. Only `Approved` listings are searchable.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub const ALL: [ApprovalStatus; 3] = [
        ApprovalStatus::Pending,
        ApprovalStatus::Approved,
        ApprovalStatus::Rejected,
    ];
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    #[default]
    Sale,
    Rent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    NewListing,
    PriceChange,
    ListingApproved,
    ListingRejected,
    Message,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_income: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_score: Option<u32>,
    #[serde(default)]
    pub preferred_locations: Vec<String>,
    #[serde(default)]
    pub saved_properties: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn from_new(id: String, new: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            password: new.password,
            role: new.role,
            phone: new.phone,
            avatar: new.avatar,
            annual_income: new.annual_income,
            credit_score: new.credit_score,
            preferred_locations: new.preferred_locations,
            saved_properties: new.saved_properties,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub annual_income: Option<u64>,
    #[serde(default)]
    pub credit_score: Option<u32>,
    #[serde(default)]
    pub preferred_locations: Vec<String>,
    #[serde(default)]
    pub saved_properties: Vec<String>,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role,
            phone: None,
            avatar: None,
            annual_income: None,
            credit_score: None,
            preferred_locations: Vec::new(),
            saved_properties: Vec::new(),
        }
    }
}

/// Partial user update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub annual_income: Option<u64>,
    pub credit_score: Option<u32>,
    pub preferred_locations: Option<Vec<String>>,
    pub saved_properties: Option<Vec<String>>,
}

impl UserPatch {
    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(password) = self.password {
            user.password = password;
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(phone) = self.phone {
            user.phone = Some(phone);
        }
        if let Some(avatar) = self.avatar {
            user.avatar = Some(avatar);
        }
        if let Some(income) = self.annual_income {
            user.annual_income = Some(income);
        }
        if let Some(score) = self.credit_score {
            user.credit_score = Some(score);
        }
        if let Some(locations) = self.preferred_locations {
            user.preferred_locations = locations;
        }
        if let Some(saved) = self.saved_properties {
            user.saved_properties = saved;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address: String,
    pub city: String,
    pub postcode: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: u64,
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(default)]
    pub listing_type: ListingType,
    pub bedrooms: u32,
    pub bathrooms: u32,
    #[serde(default)]
    pub area: f64,
    pub location: Location,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub agent_id: String,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Free-form enrichment blocks, displayed as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commute_options: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood_vibe: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifestyle_scores: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographics: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investment_insights: Option<Value>,
}

impl Property {
    pub fn from_new(id: String, new: NewProperty, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            price: new.price,
            property_type: new.property_type,
            listing_type: new.listing_type,
            bedrooms: new.bedrooms,
            bathrooms: new.bathrooms,
            area: new.area,
            location: new.location,
            images: new.images,
            features: new.features,
            agent_id: new.agent_id,
            approval_status: new.approval_status,
            created_at: now,
            updated_at: now,
            commute_options: new.commute_options,
            neighborhood_vibe: new.neighborhood_vibe,
            lifestyle_scores: new.lifestyle_scores,
            demographics: new.demographics,
            investment_insights: new.investment_insights,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.approval_status == ApprovalStatus::Approved
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: u64,
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(default)]
    pub listing_type: ListingType,
    pub bedrooms: u32,
    pub bathrooms: u32,
    #[serde(default)]
    pub area: f64,
    pub location: Location,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub agent_id: String,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
    #[serde(default)]
    pub commute_options: Option<Value>,
    #[serde(default)]
    pub neighborhood_vibe: Option<Value>,
    #[serde(default)]
    pub lifestyle_scores: Option<Value>,
    #[serde(default)]
    pub demographics: Option<Value>,
    #[serde(default)]
    pub investment_insights: Option<Value>,
}

/// Partial property update. `None` leaves the field untouched; `id` and
/// `createdAt` cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub listing_type: Option<ListingType>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub area: Option<f64>,
    pub location: Option<Location>,
    pub images: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub agent_id: Option<String>,
    pub approval_status: Option<ApprovalStatus>,
    pub commute_options: Option<Value>,
    pub neighborhood_vibe: Option<Value>,
    pub lifestyle_scores: Option<Value>,
    pub demographics: Option<Value>,
    pub investment_insights: Option<Value>,
}

impl PropertyPatch {
    pub fn status(status: ApprovalStatus) -> Self {
        Self {
            approval_status: Some(status),
            ..Self::default()
        }
    }

    pub fn apply(self, property: &mut Property) {
        if let Some(title) = self.title {
            property.title = title;
        }
        if let Some(description) = self.description {
            property.description = description;
        }
        if let Some(price) = self.price {
            property.price = price;
        }
        if let Some(property_type) = self.property_type {
            property.property_type = property_type;
        }
        if let Some(listing_type) = self.listing_type {
            property.listing_type = listing_type;
        }
        if let Some(bedrooms) = self.bedrooms {
            property.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = self.bathrooms {
            property.bathrooms = bathrooms;
        }
        if let Some(area) = self.area {
            property.area = area;
        }
        if let Some(location) = self.location {
            property.location = location;
        }
        if let Some(images) = self.images {
            property.images = images;
        }
        if let Some(features) = self.features {
            property.features = features;
        }
        if let Some(agent_id) = self.agent_id {
            property.agent_id = agent_id;
        }
        if let Some(status) = self.approval_status {
            property.approval_status = status;
        }
        if self.commute_options.is_some() {
            property.commute_options = self.commute_options;
        }
        if self.neighborhood_vibe.is_some() {
            property.neighborhood_vibe = self.neighborhood_vibe;
        }
        if self.lifestyle_scores.is_some() {
            property.lifestyle_scores = self.lifestyle_scores;
        }
        if self.demographics.is_some() {
            property.demographics = self.demographics;
        }
        if self.investment_insights.is_some() {
            property.investment_insights = self.investment_insights;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    pub fn from_new(id: String, new: NewAlert, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: new.user_id,
            property_id: new.property_id,
            kind: new.kind,
            title: new.title,
            message: new.message,
            read: false,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlert {
    pub user_id: String,
    #[serde(default)]
    pub property_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

impl NewAlert {
    pub fn new(
        user_id: impl Into<String>,
        kind: AlertKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            property_id: None,
            kind,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn for_property(mut self, property_id: impl Into<String>) -> Self {
        self.property_id = Some(property_id.into());
        self
    }
}
