use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Buyer,
    Seller,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Seller => "seller",
        }
    }

    /// Landing route for the role after sign-in.
    pub fn home_path(&self) -> &'static str {
        match self {
            Self::Buyer => "/buyer",
            Self::Seller => "/seller",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "buyer" => Ok(Self::Buyer),
            "seller" => Ok(Self::Seller),
            other => Err(DomainError::InvariantViolation(format!("unknown user role `{other}`"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.user_id.0.trim().is_empty() {
            return Err(DomainError::InvariantViolation("user id is required".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::InvariantViolation("name is required".to_string()));
        }
        if !self.email.contains('@') {
            return Err(DomainError::InvariantViolation(format!(
                "`{}` is not an email address",
                self.email
            )));
        }
        Ok(())
    }
}
