use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Role, User};

struct DemoAccount {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
}

const DEMO_ACCOUNTS: [DemoAccount; 5] = [
    DemoAccount {
        id: "user-demo-tenant",
        name: "Demo Tenant",
        email: "tenant@demo.com",
        password: "tenant123",
        role: Role::Tenant,
    },
    DemoAccount {
        id: "user-demo-landlord",
        name: "Demo Landlord",
        email: "landlord@demo.com",
        password: "landlord123",
        role: Role::Landlord,
    },
    DemoAccount {
        id: "user-demo-buyer",
        name: "Demo Buyer",
        email: "buyer@demo.com",
        password: "buyer123",
        role: Role::Buyer,
    },
    DemoAccount {
        id: "user-demo-agent",
        name: "Demo Agent",
        email: "agent@demo.com",
        password: "agent123",
        role: Role::Agent,
    },
    DemoAccount {
        id: "user-demo-admin",
        name: "Demo Admin",
        email: "admin@demo.com",
        password: "admin123",
        role: Role::Admin,
    },
];

fn seeded_at() -> DateTime<Utc> {
    Utc.timestamp_opt(0, 0).single().unwrap_or_else(Utc::now)
}

/// One fixed account per role. Ids and timestamps are constant so that
/// reseeding an empty store always produces the same rows.
pub fn demo_users() -> Vec<User> {
    let created_at = seeded_at();
    DEMO_ACCOUNTS
        .iter()
        .map(|account| User {
            id: account.id.to_string(),
            name: account.name.to_string(),
            email: account.email.to_string(),
            password: account.password.to_string(),
            role: account.role,
            phone: None,
            avatar: None,
            annual_income: None,
            credit_score: None,
            preferred_locations: Vec::new(),
            saved_properties: Vec::new(),
            created_at,
        })
        .collect()
}
