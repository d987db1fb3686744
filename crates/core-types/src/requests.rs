//! Typed create requests and list filters.
//!
//! Every write enters the system as one of the `New*` structs below. Required
//! fields are plain types, so a body missing one never deserializes; the
//! remaining rules (non-blank names, quantities that fit the stored precision, date ordering)
//! are checked by [`Validate`] before the store is touched.

use crate::enums::{Role, VisitQuality};
use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Boundary validation for create requests.
pub trait Validate {
    fn validate(&self) -> Result<(), CoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVessel {
    pub name: String,
    #[serde(rename = "type", default)]
    pub vessel_type: Option<String>,
    #[serde(default)]
    pub displacement: Option<Decimal>,
    #[serde(default)]
    pub build_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVoyage {
    pub vessel_id: i64,
    pub depart_date: NaiveDate,
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCrewMember {
    pub voyage_id: i64,
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBank {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVisit {
    pub voyage_id: i64,
    pub bank_id: i64,
    pub arrival_date: NaiveDate,
    #[serde(default)]
    pub departure_date: Option<NaiveDate>,
    pub quality: VisitQuality,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCatch {
    pub visit_id: i64,
    pub species: String,
    pub weight: Decimal,
}

fn require_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::invalid(field, "поле обязательно для заполнения"));
    }
    Ok(())
}

/// Weights and displacements are stored as `NUMERIC(12,3)`.
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 3);
pub const QUANTITY_SCALE: u32 = 3;

fn require_quantity(field: &str, value: Decimal) -> Result<(), CoreError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(CoreError::invalid(field, "значение не может быть отрицательным"));
    }
    if value > MAX_QUANTITY {
        return Err(CoreError::invalid(field, format!("значение не может превышать {MAX_QUANTITY}")));
    }
    if value.normalize().scale() > QUANTITY_SCALE {
        return Err(CoreError::invalid(
            field,
            format!("допускается не более {QUANTITY_SCALE} знаков после запятой"),
        ));
    }
    Ok(())
}

fn require_ordered(field: &str, start: NaiveDate, end: Option<NaiveDate>) -> Result<(), CoreError> {
    match end {
        Some(end) if end < start => Err(CoreError::invalid(
            field,
            format!("дата {end} раньше начальной даты {start}"),
        )),
        _ => Ok(()),
    }
}

impl Validate for NewUser {
    fn validate(&self) -> Result<(), CoreError> {
        require_text("username", &self.username)?;
        require_text("password_hash", &self.password_hash)
    }
}

impl Validate for NewVessel {
    fn validate(&self) -> Result<(), CoreError> {
        require_text("name", &self.name)?;
        if let Some(displacement) = self.displacement {
            require_quantity("displacement", displacement)?;
        }
        Ok(())
    }
}

impl Validate for NewVoyage {
    fn validate(&self) -> Result<(), CoreError> {
        require_ordered("return_date", self.depart_date, self.return_date)
    }
}

impl Validate for NewCrewMember {
    fn validate(&self) -> Result<(), CoreError> {
        require_text("name", &self.name)
    }
}

impl Validate for NewBank {
    fn validate(&self) -> Result<(), CoreError> {
        require_text("name", &self.name)
    }
}

impl Validate for NewVisit {
    fn validate(&self) -> Result<(), CoreError> {
        require_ordered("departure_date", self.arrival_date, self.departure_date)
    }
}

impl Validate for NewCatch {
    fn validate(&self) -> Result<(), CoreError> {
        require_text("species", &self.species)?;
        require_quantity("weight", self.weight)
    }
}

// --- List filters ---
// Absent fields match everything.

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoyageFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vessel_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voyage_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voyage_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatchFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
}
