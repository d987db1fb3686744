use crate::enums::{Role, VisitQuality};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An account able to sign in to the web front end.
///
/// Deliberately not `Serialize`: the hash only leaves the API through
/// [`UserCredentials`], the one endpoint the front end verifies logins against.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
}

/// The login-verification view of a user: `GET /users/{username}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredentials {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// The listing view of a user, without the hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl User {
    pub fn credentials(&self) -> UserCredentials {
        UserCredentials {
            username: self.username.clone(),
            password_hash: self.password_hash.clone(),
            role: self.role,
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

/// A fishing boat.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Vessel {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub vessel_type: Option<String>,
    /// Displacement in tonnes.
    pub displacement: Option<Decimal>,
    pub build_date: Option<NaiveDate>,
}

/// A single trip of a vessel.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Voyage {
    pub id: i64,
    pub vessel_id: i64,
    pub depart_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: i64,
    pub voyage_id: i64,
    pub name: String,
    pub position: Option<String>,
    pub address: Option<String>,
}

/// A named fishing ground.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Bank {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
}

/// A stop made by a voyage at a bank.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Visit {
    pub id: i64,
    pub voyage_id: i64,
    pub bank_id: i64,
    pub arrival_date: NaiveDate,
    pub departure_date: Option<NaiveDate>,
    #[sqlx(try_from = "String")]
    pub quality: VisitQuality,
}

/// A weighed quantity of one species landed during a visit.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Catch {
    pub id: i64,
    pub visit_id: i64,
    pub species: String,
    /// Weight in kilograms.
    pub weight: Decimal,
}
