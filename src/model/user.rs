use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ModelError;

/// Role of a platform account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    DealershipAdmin,
    Salesperson,
    Driver,
}

impl UserRole {
    /// Text form stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::DealershipAdmin => "DEALERSHIP_ADMIN",
            UserRole::Salesperson => "SALESPERSON",
            UserRole::Driver => "DRIVER",
        }
    }
}

impl FromStr for UserRole {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(UserRole::Admin),
            "DEALERSHIP_ADMIN" => Ok(UserRole::DealershipAdmin),
            "SALESPERSON" => Ok(UserRole::Salesperson),
            "DRIVER" => Ok(UserRole::Driver),
            other => Err(ModelError::UnknownRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A platform account.
///
/// The password hash never leaves the process: it is skipped during
/// serialization so API responses cannot leak it.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique identifier (uuid v4).
    pub id: String,
    /// Login email, unique across the platform.
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Display name.
    pub name: String,
    /// Optional contact phone.
    pub phone: Option<String>,
    /// Account role.
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [
            UserRole::Admin,
            UserRole::DealershipAdmin,
            UserRole::Salesperson,
            UserRole::Driver,
        ] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        let err = "MECHANIC".parse::<UserRole>().unwrap_err();
        assert!(err.to_string().contains("MECHANIC"));
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: "u-1".to_string(),
            email: "a@b.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            name: "A".to_string(),
            phone: None,
            role: UserRole::Driver,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"role\":\"DRIVER\""));
    }
}
