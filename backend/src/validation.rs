use std::fmt;

use crate::models::{NewProperty, Role};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every failed check, in the order the checks ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|e| e.field).collect()
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.message.clone()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// (field name, label shown to the user, accessor)
type RequiredField<T> = (&'static str, &'static str, fn(&T) -> &str);

fn check_required<T>(value: &T, fields: &[RequiredField<T>], errors: &mut ValidationErrors) {
    for &(field, label, get) in fields {
        if get(value).trim().is_empty() {
            errors.push(field, format!("{} is required", label));
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Option<Role>,
    pub phone: Option<String>,
}

const SIGNUP_REQUIRED: [RequiredField<SignupForm>; 4] = [
    ("name", "Full name", |f| f.name.as_str()),
    ("email", "Email", |f| f.email.as_str()),
    ("password", "Password", |f| f.password.as_str()),
    ("confirmPassword", "Password confirmation", |f| f.confirm_password.as_str()),
];

pub fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

pub fn validate_signup(form: &SignupForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_required(form, &SIGNUP_REQUIRED, &mut errors);
    if form.role.is_none() {
        errors.push("role", "Account type is required");
    }

    if !form.email.trim().is_empty() && !looks_like_email(&form.email) {
        errors.push("email", "Please enter a valid email address");
    }
    if !form.password.is_empty() && form.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        );
    }
    if !form.confirm_password.is_empty() && form.password != form.confirm_password {
        errors.push("confirmPassword", "Passwords do not match");
    }
    errors.into_result()
}

const LISTING_REQUIRED: [RequiredField<NewProperty>; 4] = [
    ("title", "Title", |p| p.title.as_str()),
    ("address", "Address", |p| p.location.address.as_str()),
    ("city", "City", |p| p.location.city.as_str()),
    ("postcode", "Postcode", |p| p.location.postcode.as_str()),
];

pub fn validate_listing(listing: &NewProperty) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_required(listing, &LISTING_REQUIRED, &mut errors);

    if listing.price == 0 {
        errors.push("price", "Price must be greater than zero");
    }
    if !(-90.0..=90.0).contains(&listing.location.lat) {
        errors.push("lat", "Latitude must be between -90 and 90");
    }
    if !(-180.0..=180.0).contains(&listing.location.lng) {
        errors.push("lng", "Longitude must be between -180 and 180");
    }
    errors.into_result()
}
