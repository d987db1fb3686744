//! # Fleetbook Reporting
//!
//! Read-only aggregate reports over Vessel → Voyage → Visit → Catch.
//!
//! Each report follows the same pipeline:
//!
//! 1. **Parse** the raw query into a [`ReportFilter`], keeping only the
//!    parameters the report understands. Malformed values fail here.
//! 2. **Fetch** the matching catch facts from the store, which applies the
//!    filter.
//! 3. **Aggregate** and **rank** them with the pure functions in [`aggregate`].

use crate::error::ReportError;
use core_types::{BankAverage, ReportFilter, ReportQuery, SpeciesBankTotal, VesselAverage, VesselTotal};
use database::FleetStore;

pub mod aggregate;
pub mod error;

/// Total landed weight per vessel, heaviest first.
///
/// Honours `species`, `date_from` and `date_to`.
pub async fn top_vessels(store: &dyn FleetStore, query: &ReportQuery) -> Result<Vec<VesselTotal>, ReportError> {
    let parsed = query.parse()?;
    let filter = ReportFilter {
        species: parsed.species,
        period: parsed.period,
        ..ReportFilter::default()
    };
    let facts = store.catch_facts(&filter).await?;
    let report = aggregate::vessel_totals(&facts)?;
    tracing::debug!(facts = facts.len(), rows = report.len(), "Computed top-vessels report.");
    Ok(report)
}

/// Mean catch per visit for every bank, best first.
///
/// Honours `date_from` and `date_to`.
pub async fn avg_catch_per_bank(store: &dyn FleetStore, query: &ReportQuery) -> Result<Vec<BankAverage>, ReportError> {
    let parsed = query.parse()?;
    let filter = ReportFilter { period: parsed.period, ..ReportFilter::default() };
    let facts = store.catch_facts(&filter).await?;
    let report = aggregate::bank_averages(&facts)?;
    tracing::debug!(facts = facts.len(), rows = report.len(), "Computed bank-average report.");
    Ok(report)
}

/// Vessels that out-fish the average visit at `bank_id`.
///
/// Honours `date_from` and `date_to`. An unknown bank simply has no facts and
/// yields an empty report.
pub async fn above_average(
    store: &dyn FleetStore,
    bank_id: i64,
    query: &ReportQuery,
) -> Result<Vec<VesselAverage>, ReportError> {
    let parsed = query.parse()?;
    let filter = ReportFilter {
        bank_id: Some(bank_id),
        period: parsed.period,
        ..ReportFilter::default()
    };
    let facts = store.catch_facts(&filter).await?;
    let report = aggregate::vessels_above_average(&facts)?;
    tracing::debug!(bank_id, facts = facts.len(), rows = report.len(), "Computed above-average report.");
    Ok(report)
}

/// Landed weight broken down by bank and species.
///
/// Honours `species` and `bank_id`.
pub async fn species_by_bank(
    store: &dyn FleetStore,
    query: &ReportQuery,
) -> Result<Vec<SpeciesBankTotal>, ReportError> {
    let parsed = query.parse()?;
    let filter = ReportFilter {
        species: parsed.species,
        bank_id: parsed.bank_id,
        ..ReportFilter::default()
    };
    let facts = store.catch_facts(&filter).await?;
    let report = aggregate::species_by_bank(&facts)?;
    tracing::debug!(facts = facts.len(), rows = report.len(), "Computed species-by-bank report.");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::{NewBank, NewCatch, NewVessel, NewVisit, NewVoyage, VisitQuality};
    use database::MemoryStore;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// "Storm" with voyage A (cod 10 + cod 5, visit on 2024-05-10 at bank 1)
    /// and voyage B (salmon 20, visit on 2024-06-20 at bank 2).
    async fn storm_fleet() -> MemoryStore {
        let store = MemoryStore::new();
        let storm = store
            .create_vessel(&NewVessel { name: "Storm".into(), vessel_type: None, displacement: None, build_date: None })
            .await
            .unwrap();
        let north = store.create_bank(&NewBank { name: "North".into(), location: None }).await.unwrap();
        let south = store.create_bank(&NewBank { name: "South".into(), location: None }).await.unwrap();

        let trips = [
            (date(2024, 5, 1), north.id, date(2024, 5, 10), vec![("cod", dec!(10)), ("cod", dec!(5))]),
            (date(2024, 6, 15), south.id, date(2024, 6, 20), vec![("salmon", dec!(20))]),
        ];
        for (depart, bank_id, arrival, catches) in trips {
            let voyage = store
                .create_voyage(&NewVoyage { vessel_id: storm.id, depart_date: depart, return_date: None })
                .await
                .unwrap();
            let visit = store
                .create_visit(&NewVisit {
                    voyage_id: voyage.id,
                    bank_id,
                    arrival_date: arrival,
                    departure_date: None,
                    quality: VisitQuality::Good,
                })
                .await
                .unwrap();
            for (species, weight) in catches {
                store
                    .create_catch(&NewCatch { visit_id: visit.id, species: species.into(), weight })
                    .await
                    .unwrap();
            }
        }
        store
    }

    fn query() -> ReportQuery {
        ReportQuery::default()
    }

    #[tokio::test]
    async fn top_vessels_sums_every_voyage() {
        let store = storm_fleet().await;
        let report = top_vessels(&store, &query()).await.unwrap();
        assert_eq!(report, vec![VesselTotal { vessel: "Storm".into(), total: dec!(35) }]);
    }

    #[tokio::test]
    async fn top_vessels_by_species() {
        let store = storm_fleet().await;
        let cod = ReportQuery { species: Some("cod".into()), ..query() };
        assert_eq!(
            top_vessels(&store, &cod).await.unwrap(),
            vec![VesselTotal { vessel: "Storm".into(), total: dec!(15) }]
        );

        let haddock = ReportQuery { species: Some("haddock".into()), ..query() };
        assert!(top_vessels(&store, &haddock).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn top_vessels_period_includes_both_endpoints() {
        let store = storm_fleet().await;
        let may_tenth = ReportQuery {
            date_from: Some("2024-05-10".into()),
            date_to: Some("2024-05-10".into()),
            ..query()
        };
        assert_eq!(top_vessels(&store, &may_tenth).await.unwrap()[0].total, dec!(15));

        let june = ReportQuery { date_from: Some("2024-06-01".into()), ..query() };
        assert_eq!(top_vessels(&store, &june).await.unwrap()[0].total, dec!(20));
    }

    #[tokio::test]
    async fn malformed_date_is_an_invalid_query() {
        let store = storm_fleet().await;
        let bad = ReportQuery { date_to: Some("10.05.2024".into()), ..query() };
        assert!(matches!(top_vessels(&store, &bad).await, Err(ReportError::InvalidQuery(_))));
    }

    #[tokio::test]
    async fn top_vessels_ignores_bank_parameter() {
        let store = storm_fleet().await;
        let with_bank = ReportQuery { bank_id: Some("1".into()), ..query() };
        assert_eq!(top_vessels(&store, &with_bank).await.unwrap()[0].total, dec!(35));
    }

    #[tokio::test]
    async fn unknown_bank_yields_empty_reports() {
        let store = storm_fleet().await;
        assert!(above_average(&store, 999, &query()).await.unwrap().is_empty());

        let q = ReportQuery { bank_id: Some("999".into()), ..query() };
        assert!(species_by_bank(&store, &q).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bank_averages_cover_each_bank() {
        let store = storm_fleet().await;
        let report = avg_catch_per_bank(&store, &query()).await.unwrap();
        let pairs: Vec<_> = report.iter().map(|r| (r.bank.as_str(), r.average)).collect();
        assert_eq!(pairs, vec![("South", dec!(20)), ("North", dec!(15))]);
    }

    #[tokio::test]
    async fn bank_averages_honour_the_period() {
        let store = storm_fleet().await;
        let may = ReportQuery {
            date_from: Some("2024-05-01".into()),
            date_to: Some("2024-05-31".into()),
            ..query()
        };
        let report = avg_catch_per_bank(&store, &may).await.unwrap();
        let pairs: Vec<_> = report.iter().map(|r| (r.bank.as_str(), r.visits, r.average)).collect();
        assert_eq!(pairs, vec![("North", 1, dec!(15))]);
    }

    #[tokio::test]
    async fn above_average_honours_the_period() {
        let store = storm_fleet().await;
        // Gull visits North on 2024-07-01 and lands 3, so North averages (15 + 3) / 2.
        let gull = store
            .create_vessel(&NewVessel { name: "Gull".into(), vessel_type: None, displacement: None, build_date: None })
            .await
            .unwrap();
        let voyage = store
            .create_voyage(&NewVoyage { vessel_id: gull.id, depart_date: date(2024, 6, 28), return_date: None })
            .await
            .unwrap();
        let visit = store
            .create_visit(&NewVisit {
                voyage_id: voyage.id,
                bank_id: 1,
                arrival_date: date(2024, 7, 1),
                departure_date: None,
                quality: VisitQuality::Poor,
            })
            .await
            .unwrap();
        store
            .create_catch(&NewCatch { visit_id: visit.id, species: "cod".into(), weight: dec!(3) })
            .await
            .unwrap();

        assert_eq!(
            above_average(&store, 1, &query()).await.unwrap(),
            vec![VesselAverage { vessel: "Storm".into(), average: dec!(15) }]
        );

        let may = ReportQuery { date_to: Some("2024-05-31".into()), ..query() };
        assert!(above_average(&store, 1, &may).await.unwrap().is_empty());

        let july = ReportQuery { date_from: Some("2024-07-01".into()), ..query() };
        assert!(above_average(&store, 1, &july).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn species_breakdown_respects_species_filter() {
        let store = storm_fleet().await;
        let q = ReportQuery { species: Some("salmon".into()), ..query() };
        let report = species_by_bank(&store, &q).await.unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!((report[0].bank.as_str(), report[0].total), ("South", dec!(20)));
    }
}
