use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two static roles an account can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Something a front-end route requires before it will run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Recording vessels, voyages, crew, visits and catches.
    RecordFleetData,
    /// Browsing the whole fleet from the admin area.
    ReviewFleet,
    /// Registering fishing banks.
    ManageBanks,
    /// Running the aggregate reports.
    ViewReports,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Returns whether this role is allowed to exercise `capability`.
    ///
    /// The two roles do not overlap: an admin does not inherit the data-entry
    /// pages of a regular user.
    pub fn grants(&self, capability: Capability) -> bool {
        matches!(
            (self, capability),
            (Role::User, Capability::RecordFleetData)
                | (
                    Role::Admin,
                    Capability::ReviewFleet | Capability::ManageBanks | Capability::ViewReports
                )
        )
    }
}

/// How productive a bank turned out to be during a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitQuality {
    Excellent,
    Good,
    Poor,
}

impl VisitQuality {
    pub const ALL: [VisitQuality; 3] = [VisitQuality::Excellent, VisitQuality::Good, VisitQuality::Poor];

    pub fn as_str(&self) -> &'static str {
        match self {
            VisitQuality::Excellent => "excellent",
            VisitQuality::Good => "good",
            VisitQuality::Poor => "poor",
        }
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(CoreError::InvalidInput(
                "role".to_string(),
                format!("неизвестная роль «{other}»"),
            )),
        }
    }
}

impl FromStr for VisitQuality {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "excellent" => Ok(VisitQuality::Excellent),
            "good" => Ok(VisitQuality::Good),
            "poor" => Ok(VisitQuality::Poor),
            other => Err(CoreError::InvalidInput(
                "quality".to_string(),
                format!("неизвестная оценка «{other}»"),
            )),
        }
    }
}

// Both enums are stored as TEXT; `sqlx(try_from = "String")` goes through these.
impl TryFrom<String> for Role {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for VisitQuality {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for VisitQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
