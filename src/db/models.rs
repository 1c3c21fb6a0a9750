//! Database models
//!
//! Data structures representing database tables

use serde::{Deserialize, Serialize};

/// User record in the database
///
/// `password` always holds a bcrypt digest once persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub avatar: String,
    pub created_at: String,
}

impl User {
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            user_name: row.get(3)?,
            email: row.get(4)?,
            password: row.get(5)?,
            address: row.get(6)?,
            phone: row.get(7)?,
            avatar: row.get(8)?,
            created_at: row.get(9)?,
        })
    }
}
