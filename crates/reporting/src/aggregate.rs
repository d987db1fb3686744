//! Grouping and ranking over already-filtered catch facts.
//!
//! Every function here is pure; the store has applied the filters, these only
//! group, aggregate and sort. Groups without facts never appear in the output.
//! Sums are checked: a total that leaves `Decimal`'s range is an error.

use crate::error::ReportError;
use core_types::{BankAverage, CatchFact, SpeciesBankTotal, VesselAverage, VesselTotal};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Averages are reported with the same scale the store keeps weights in.
const AVERAGE_DP: u32 = 3;

fn accumulate(total: &mut Decimal, weight: Decimal) -> Result<(), ReportError> {
    *total = total.checked_add(weight).ok_or(ReportError::Overflow)?;
    Ok(())
}

/// Running total of landed weight and the visits it came from.
#[derive(Debug, Default)]
struct Tally {
    total: Decimal,
    visits: BTreeSet<i64>,
}

impl Tally {
    fn add(&mut self, fact: &CatchFact) -> Result<(), ReportError> {
        accumulate(&mut self.total, fact.weight)?;
        self.visits.insert(fact.visit_id);
        Ok(())
    }

    /// Mean landed weight per visit. A tally only exists once a fact was
    /// added, so `visits` is never empty.
    fn per_visit(&self) -> Decimal {
        self.total / Decimal::from(self.visits.len() as u64)
    }
}

fn by_value_desc_then_name(a: (&Decimal, &str), b: (&Decimal, &str)) -> Ordering {
    b.0.cmp(a.0).then_with(|| a.1.cmp(b.1))
}

/// Σ weight per vessel name, heaviest first; ties by name.
pub fn vessel_totals(facts: &[CatchFact]) -> Result<Vec<VesselTotal>, ReportError> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for fact in facts {
        accumulate(totals.entry(fact.vessel_name.as_str()).or_default(), fact.weight)?;
    }

    let mut ranked: Vec<VesselTotal> = totals
        .into_iter()
        .map(|(vessel, total)| VesselTotal { vessel: vessel.to_string(), total })
        .collect();
    ranked.sort_by(|a, b| by_value_desc_then_name((&a.total, &a.vessel), (&b.total, &b.vessel)));
    Ok(ranked)
}

/// Mean landed weight per visit for each bank, best bank first; ties by name.
pub fn bank_averages(facts: &[CatchFact]) -> Result<Vec<BankAverage>, ReportError> {
    let mut banks: BTreeMap<i64, (&str, Tally)> = BTreeMap::new();
    for fact in facts {
        banks
            .entry(fact.bank_id)
            .or_insert_with(|| (fact.bank_name.as_str(), Tally::default()))
            .1
            .add(fact)?;
    }

    let mut ranked: Vec<BankAverage> = banks
        .into_iter()
        .map(|(bank_id, (bank, tally))| BankAverage {
            bank_id,
            bank: bank.to_string(),
            visits: tally.visits.len() as u64,
            average: tally.per_visit().round_dp(AVERAGE_DP),
        })
        .collect();
    ranked.sort_by(|a, b| by_value_desc_then_name((&a.average, &a.bank), (&b.average, &b.bank)));
    Ok(ranked)
}

/// Vessels whose mean catch per visit beats the mean over all visits in
/// `facts`, which must all belong to a single bank.
///
/// The comparison is strict and uses unrounded averages, so a vessel that is
/// the bank's only visitor never qualifies.
pub fn vessels_above_average(facts: &[CatchFact]) -> Result<Vec<VesselAverage>, ReportError> {
    if facts.is_empty() {
        return Ok(Vec::new());
    }

    let mut overall = Tally::default();
    let mut vessels: BTreeMap<&str, Tally> = BTreeMap::new();
    for fact in facts {
        overall.add(fact)?;
        vessels.entry(fact.vessel_name.as_str()).or_default().add(fact)?;
    }
    let threshold = overall.per_visit();

    let mut ranked: Vec<VesselAverage> = vessels
        .into_iter()
        .filter_map(|(vessel, tally)| {
            let average = tally.per_visit();
            (average > threshold).then(|| VesselAverage {
                vessel: vessel.to_string(),
                average: average.round_dp(AVERAGE_DP),
            })
        })
        .collect();
    ranked.sort_by(|a, b| by_value_desc_then_name((&a.average, &a.vessel), (&b.average, &b.vessel)));
    Ok(ranked)
}

/// Σ weight per (bank, species). Banks in name order, species heaviest first
/// within each bank.
pub fn species_by_bank(facts: &[CatchFact]) -> Result<Vec<SpeciesBankTotal>, ReportError> {
    let mut groups: BTreeMap<(i64, &str), (&str, Decimal)> = BTreeMap::new();
    for fact in facts {
        let (_, total) = groups
            .entry((fact.bank_id, fact.species.as_str()))
            .or_insert_with(|| (fact.bank_name.as_str(), Decimal::ZERO));
        accumulate(total, fact.weight)?;
    }

    let mut rows: Vec<SpeciesBankTotal> = groups
        .into_iter()
        .map(|((bank_id, species), (bank, total))| SpeciesBankTotal {
            bank_id,
            bank: bank.to_string(),
            species: species.to_string(),
            total,
        })
        .collect();
    rows.sort_by(|a, b| {
        a.bank
            .cmp(&b.bank)
            .then_with(|| a.bank_id.cmp(&b.bank_id))
            .then_with(|| by_value_desc_then_name((&a.total, &a.species), (&b.total, &b.species)))
    });
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn fact(visit_id: i64, vessel: &str, bank_id: i64, species: &str, weight: Decimal) -> CatchFact {
        CatchFact {
            visit_id,
            vessel_id: 0,
            vessel_name: vessel.to_string(),
            bank_id,
            bank_name: format!("bank-{bank_id}"),
            species: species.to_string(),
            weight,
            arrival_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        }
    }

    #[test]
    fn vessel_totals_sum_per_vessel_and_sort_descending() {
        let facts = vec![
            fact(1, "Storm", 1, "cod", dec!(10)),
            fact(1, "Storm", 1, "cod", dec!(5)),
            fact(2, "Storm", 1, "salmon", dec!(20)),
            fact(3, "Gull", 1, "cod", dec!(50)),
        ];
        let totals = vessel_totals(&facts).unwrap();
        assert_eq!(
            totals,
            vec![
                VesselTotal { vessel: "Gull".into(), total: dec!(50) },
                VesselTotal { vessel: "Storm".into(), total: dec!(35) },
            ]
        );
    }

    #[test]
    fn equal_totals_are_ordered_by_name() {
        let facts = vec![
            fact(1, "Zephyr", 1, "cod", dec!(7)),
            fact(2, "Albatross", 1, "cod", dec!(7)),
            fact(3, "Marlin", 1, "cod", dec!(7)),
        ];
        let names: Vec<_> = vessel_totals(&facts).unwrap().into_iter().map(|t| t.vessel).collect();
        assert_eq!(names, ["Albatross", "Marlin", "Zephyr"]);
    }

    #[test]
    fn no_facts_means_no_rows() {
        assert!(vessel_totals(&[]).unwrap().is_empty());
        assert!(bank_averages(&[]).unwrap().is_empty());
        assert!(vessels_above_average(&[]).unwrap().is_empty());
        assert!(species_by_bank(&[]).unwrap().is_empty());
    }

    #[test]
    fn bank_average_is_per_visit_not_per_catch() {
        // Bank 1: visit 1 lands 10 + 20, visit 2 lands 30 -> 60 over 2 visits.
        // Bank 2: a single visit landing 40.
        let facts = vec![
            fact(1, "Storm", 1, "cod", dec!(10)),
            fact(1, "Storm", 1, "herring", dec!(20)),
            fact(2, "Gull", 1, "cod", dec!(30)),
            fact(3, "Gull", 2, "cod", dec!(40)),
        ];
        let averages = bank_averages(&facts).unwrap();
        assert_eq!(averages.len(), 2);
        assert_eq!((averages[0].bank_id, averages[0].visits, averages[0].average), (2, 1, dec!(40)));
        assert_eq!((averages[1].bank_id, averages[1].visits, averages[1].average), (1, 2, dec!(30)));
    }

    #[test]
    fn averages_are_rounded_to_three_places() {
        let facts = vec![
            fact(1, "Storm", 1, "cod", dec!(10)),
            fact(2, "Storm", 1, "cod", dec!(0)),
            fact(3, "Storm", 1, "cod", dec!(0)),
        ];
        assert_eq!(bank_averages(&facts).unwrap()[0].average, dec!(3.333));
    }

    #[test]
    fn above_average_keeps_only_vessels_beating_the_bank_mean() {
        // Bank mean: (30 + 10 + 20) / 3 visits = 20.
        let facts = vec![
            fact(1, "Storm", 1, "cod", dec!(30)),
            fact(2, "Gull", 1, "cod", dec!(10)),
            fact(3, "Tern", 1, "cod", dec!(20)),
        ];
        assert_eq!(
            vessels_above_average(&facts).unwrap(),
            vec![VesselAverage { vessel: "Storm".into(), average: dec!(30) }]
        );
    }

    #[test]
    fn sole_visitor_is_never_above_its_own_average() {
        let facts = vec![fact(1, "Storm", 1, "cod", dec!(30))];
        assert!(vessels_above_average(&facts).unwrap().is_empty());
    }

    #[test]
    fn overflowing_totals_are_an_error() {
        let huge = Decimal::MAX;
        let facts = vec![fact(1, "Storm", 1, "cod", huge), fact(2, "Storm", 1, "cod", huge)];
        assert!(matches!(vessel_totals(&facts), Err(ReportError::Overflow)));
        assert!(matches!(bank_averages(&facts), Err(ReportError::Overflow)));
        assert!(matches!(vessels_above_average(&facts), Err(ReportError::Overflow)));
        assert!(matches!(species_by_bank(&facts), Err(ReportError::Overflow)));
    }

    #[test]
    fn species_breakdown_groups_by_bank_then_species() {
        let facts = vec![
            fact(1, "Storm", 2, "cod", dec!(5)),
            fact(1, "Storm", 2, "herring", dec!(8)),
            fact(2, "Gull", 1, "cod", dec!(4)),
            fact(3, "Gull", 2, "cod", dec!(6)),
        ];
        let rows: Vec<_> = species_by_bank(&facts).unwrap()
            .into_iter()
            .map(|r| (r.bank_id, r.species, r.total))
            .collect();
        assert_eq!(
            rows,
            vec![
                (1, "cod".to_string(), dec!(4)),
                (2, "cod".to_string(), dec!(11)),
                (2, "herring".to_string(), dec!(8)),
            ]
        );
    }
}
