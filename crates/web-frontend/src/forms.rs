//! HTML form bodies and their conversion into typed create requests.
//!
//! Browsers send every field as text, and an empty input as an empty string,
//! so each form is a bag of `String`s. Blank optional fields become `None`;
//! required ones that fail to parse reject the whole form.

use crate::error::FrontError;
use chrono::NaiveDate;
use core_types::{
    NewBank, NewCatch, NewCrewMember, NewVessel, NewVisit, NewVoyage, Role, Validate, VisitQuality,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn bad(field: &str, value: &str) -> FrontError {
    FrontError::BadForm(format!("Некорректное значение поля «{field}»: «{value}»"))
}

fn parse<T: FromStr>(field: &str, value: &str) -> Result<T, FrontError> {
    value.trim().parse().map_err(|_| bad(field, value))
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, FrontError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| bad(field, value))
}

fn parse_optional_date(field: &str, value: &str) -> Result<Option<NaiveDate>, FrontError> {
    optional(value).map(|v| parse_date(field, &v)).transpose()
}

/// Runs the same boundary checks the API applies, so the user sees them first.
fn checked<T: Validate>(request: T) -> Result<T, FrontError> {
    request.validate()?;
    Ok(request)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub role: String,
}

impl RegisterForm {
    pub fn role(&self) -> Result<Role, FrontError> {
        Ok(self.role.trim().parse::<Role>()?)
    }

    pub fn check(&self) -> Result<(), FrontError> {
        if self.username.trim().is_empty() {
            return Err(bad("username", &self.username));
        }
        if self.password.is_empty() {
            return Err(FrontError::BadForm("Пароль не может быть пустым".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VesselForm {
    pub name: String,
    #[serde(rename = "type")]
    pub vessel_type: String,
    pub displacement: String,
    pub build_date: String,
}

impl TryFrom<VesselForm> for NewVessel {
    type Error = FrontError;

    fn try_from(form: VesselForm) -> Result<Self, Self::Error> {
        checked(NewVessel {
            name: form.name.trim().to_string(),
            vessel_type: optional(&form.vessel_type),
            displacement: optional(&form.displacement)
                .map(|v| parse::<Decimal>("displacement", &v))
                .transpose()?,
            build_date: parse_optional_date("build_date", &form.build_date)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VoyageForm {
    pub vessel_id: String,
    pub depart_date: String,
    pub return_date: String,
}

impl TryFrom<VoyageForm> for NewVoyage {
    type Error = FrontError;

    fn try_from(form: VoyageForm) -> Result<Self, Self::Error> {
        checked(NewVoyage {
            vessel_id: parse("vessel_id", &form.vessel_id)?,
            depart_date: parse_date("depart_date", &form.depart_date)?,
            return_date: parse_optional_date("return_date", &form.return_date)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CrewForm {
    pub voyage_id: String,
    pub name: String,
    pub position: String,
    pub address: String,
}

impl TryFrom<CrewForm> for NewCrewMember {
    type Error = FrontError;

    fn try_from(form: CrewForm) -> Result<Self, Self::Error> {
        checked(NewCrewMember {
            voyage_id: parse("voyage_id", &form.voyage_id)?,
            name: form.name.trim().to_string(),
            position: optional(&form.position),
            address: optional(&form.address),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BankForm {
    pub name: String,
    pub location: String,
}

impl TryFrom<BankForm> for NewBank {
    type Error = FrontError;

    fn try_from(form: BankForm) -> Result<Self, Self::Error> {
        checked(NewBank {
            name: form.name.trim().to_string(),
            location: optional(&form.location),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VisitForm {
    pub voyage_id: String,
    pub bank_id: String,
    pub arrival_date: String,
    pub departure_date: String,
    pub quality: String,
}

impl TryFrom<VisitForm> for NewVisit {
    type Error = FrontError;

    fn try_from(form: VisitForm) -> Result<Self, Self::Error> {
        checked(NewVisit {
            voyage_id: parse("voyage_id", &form.voyage_id)?,
            bank_id: parse("bank_id", &form.bank_id)?,
            arrival_date: parse_date("arrival_date", &form.arrival_date)?,
            departure_date: parse_optional_date("departure_date", &form.departure_date)?,
            quality: form.quality.trim().parse::<VisitQuality>()?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatchForm {
    pub visit_id: String,
    pub species: String,
    pub weight: String,
}

impl TryFrom<CatchForm> for NewCatch {
    type Error = FrontError;

    fn try_from(form: CatchForm) -> Result<Self, Self::Error> {
        checked(NewCatch {
            visit_id: parse("visit_id", &form.visit_id)?,
            species: form.species.trim().to_string(),
            weight: parse("weight", &form.weight)?,
        })
    }
}
