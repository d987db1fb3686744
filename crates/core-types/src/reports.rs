use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One catch flattened with everything the reports group or filter on.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CatchFact {
    pub visit_id: i64,
    pub vessel_id: i64,
    pub vessel_name: String,
    pub bank_id: i64,
    pub bank_name: String,
    pub species: String,
    pub weight: Decimal,
    pub arrival_date: NaiveDate,
}

/// An inclusive range of visit arrival dates. Open ends match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Period {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Period {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// Validated report parameters, shared by every report and by the store's
/// catch-fact query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub species: Option<String>,
    pub bank_id: Option<i64>,
    pub period: Period,
}

impl ReportFilter {
    pub fn matches(&self, fact: &CatchFact) -> bool {
        self.species.as_deref().is_none_or(|s| fact.species == s)
            && self.bank_id.is_none_or(|id| fact.bank_id == id)
            && self.period.contains(fact.arrival_date)
    }
}

/// Raw report query parameters as they arrive on the wire.
///
/// Everything is a string so that blank form fields (`?species=`) can be told
/// apart from malformed ones and reported with a proper message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_id: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(field: &str, value: &Option<String>) -> Result<Option<NaiveDate>, CoreError> {
    non_blank(value)
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                CoreError::invalid(field, format!("ожидается дата в формате ГГГГ-ММ-ДД, получено «{raw}»"))
            })
        })
        .transpose()
}

impl ReportQuery {
    pub fn parse(&self) -> Result<ReportFilter, CoreError> {
        let from = parse_date("date_from", &self.date_from)?;
        let to = parse_date("date_to", &self.date_to)?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(CoreError::invalid(
                    "date_from",
                    format!("начало периода {from} позже его конца {to}"),
                ));
            }
        }
        let bank_id = non_blank(&self.bank_id)
            .map(|raw| {
                raw.parse::<i64>()
                    .map_err(|_| CoreError::invalid("bank_id", format!("ожидается число, получено «{raw}»")))
            })
            .transpose()?;

        Ok(ReportFilter {
            species: non_blank(&self.species).map(str::to_string),
            bank_id,
            period: Period { from, to },
        })
    }
}

// --- Report rows ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VesselTotal {
    pub vessel: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAverage {
    pub bank_id: i64,
    pub bank: String,
    /// Number of visits with at least one matching catch.
    pub visits: u64,
    /// Mean landed weight per visit.
    pub average: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VesselAverage {
    pub vessel: String,
    pub average: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesBankTotal {
    pub bank_id: i64,
    pub bank: String,
    pub species: String,
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn query(from: &str, to: &str) -> ReportQuery {
        ReportQuery {
            date_from: Some(from.to_string()),
            date_to: Some(to.to_string()),
            ..ReportQuery::default()
        }
    }

    #[test]
    fn blank_parameters_are_treated_as_absent() {
        let q = ReportQuery {
            species: Some("  ".into()),
            date_from: Some(String::new()),
            date_to: None,
            bank_id: Some(String::new()),
        };
        assert_eq!(q.parse().unwrap(), ReportFilter::default());
    }

    #[rstest]
    #[case("2024-13-01", "2024-12-31")]
    #[case("yesterday", "")]
    #[case("2024-06-01", "2024-05-01")]
    fn bad_periods_are_rejected(#[case] from: &str, #[case] to: &str) {
        assert!(query(from, to).parse().is_err());
    }

    #[test]
    fn non_numeric_bank_id_is_rejected() {
        let q = ReportQuery { bank_id: Some("north".into()), ..ReportQuery::default() };
        let err = q.parse().unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(field, _) if field == "bank_id"));
    }

    #[test]
    fn period_is_inclusive_of_both_ends() {
        let filter = query("2024-05-01", "2024-05-31").parse().unwrap();
        let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
        assert!(filter.period.contains(day(1)));
        assert!(filter.period.contains(day(31)));
        assert!(!filter.period.contains(NaiveDate::from_ymd_opt(2024, 4, 30).unwrap()));
    }

    #[test]
    fn unset_fields_are_not_serialized() {
        let q = ReportQuery { species: Some("cod".into()), ..ReportQuery::default() };
        assert_eq!(serde_json::to_string(&q).unwrap(), r#"{"species":"cod"}"#);
    }
}
