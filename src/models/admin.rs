use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: AdminRole,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum AdminRole {
    Owner,
    Staff,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Owner => "Owner",
            AdminRole::Staff => "Staff",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "Owner" => AdminRole::Owner,
            _ => AdminRole::Staff,
        }
    }
}
