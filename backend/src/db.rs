use std::cell::RefCell;
use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::{error, info};

use crate::error::StoreResult;
use crate::schema::kv_entries;

/// A flat string key-value store, the contract of the browser storage the
/// Store was designed against.
pub trait Storage {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()>;
    fn remove_item(&mut self, key: &str) -> StoreResult<()>;
}

/// Process-local storage; everything is lost when it is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from pre-existing entries, as if a previous session had written them.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Storage backed by a single SQLite table, one row per key.
pub struct SqliteStorage {
    conn: RefCell<SqliteConnection>,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `database_url` and makes sure the
    /// key-value table exists. `":memory:"` gives a throwaway database.
    pub fn open(database_url: &str) -> StoreResult<Self> {
        let mut conn = establish_connection(database_url)?;
        diesel::sql_query(
            "CREATE TABLE IF NOT EXISTS kv_entries (key TEXT PRIMARY KEY NOT NULL, value TEXT NOT NULL)",
        )
        .execute(&mut conn)?;
        Ok(Self {
            conn: RefCell::new(conn),
        })
    }

    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let mut conn = self.conn.borrow_mut();
        let keys = kv_entries::table
            .select(kv_entries::key)
            .order_by(kv_entries::key.asc())
            .load::<String>(&mut *conn)?;
        Ok(keys)
    }
}

impl Storage for SqliteStorage {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.borrow_mut();
        let value = kv_entries::table
            .find(key)
            .select(kv_entries::value)
            .first::<String>(&mut *conn)
            .optional()?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()> {
        diesel::replace_into(kv_entries::table)
            .values((kv_entries::key.eq(key), kv_entries::value.eq(value)))
            .execute(self.conn.get_mut())?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StoreResult<()> {
        diesel::delete(kv_entries::table.find(key)).execute(self.conn.get_mut())?;
        Ok(())
    }
}

pub fn establish_connection(database_url: &str) -> StoreResult<SqliteConnection> {
    info!("Attempting to open database at: {}", database_url);
    match SqliteConnection::establish(database_url) {
        Ok(conn) => {
            info!("Database connection established successfully");
            Ok(conn)
        }
        Err(e) => {
            error!("Failed to establish database connection: {}", e);
            Err(e.into())
        }
    }
}
