use crate::error::DbError;
use crate::store::FleetStore;
use async_trait::async_trait;
use core_types::{
    Bank, Catch, CatchFact, CatchFilter, CrewFilter, CrewMember, NewBank, NewCatch, NewCrewMember, NewUser, NewVessel,
    NewVisit, NewVoyage, ReportFilter, User, Vessel, Visit, VisitFilter, Voyage, VoyageFilter,
};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// A [`FleetStore`] kept entirely in process memory.
///
/// Each write validates its references and inserts under a single write lock,
/// which gives the same all-or-nothing behaviour as the PostgreSQL store.
/// Ids are per-table sequences starting at 1.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    vessels: BTreeMap<i64, Vessel>,
    voyages: BTreeMap<i64, Voyage>,
    crew_members: BTreeMap<i64, CrewMember>,
    banks: BTreeMap<i64, Bank>,
    visits: BTreeMap<i64, Visit>,
    catches: BTreeMap<i64, Catch>,
}

fn next_id<T>(table: &BTreeMap<i64, T>) -> i64 {
    table.keys().next_back().map_or(1, |last| last + 1)
}

fn require<T>(table: &BTreeMap<i64, T>, column: &str, id: i64) -> Result<(), DbError> {
    if table.contains_key(&id) {
        Ok(())
    } else {
        Err(DbError::ForeignKey(format!("{column} = {id}")))
    }
}

fn fetch<T: Clone>(table: &BTreeMap<i64, T>, entity: &str, id: i64) -> Result<T, DbError> {
    table.get(&id).cloned().ok_or_else(|| DbError::not_found(entity, id))
}

fn select<T: Clone>(table: &BTreeMap<i64, T>, predicate: impl Fn(&T) -> bool) -> Vec<T> {
    table.values().filter(|row| predicate(row)).cloned().collect()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FleetStore for MemoryStore {
    async fn create_user(&self, new: &NewUser) -> Result<User, DbError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == new.username) {
            return Err(DbError::Duplicate(format!("username «{}»", new.username)));
        }
        let user = User {
            id: next_id(&tables.users),
            username: new.username.clone(),
            password_hash: new.password_hash.clone(),
            role: new.role,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, username: &str) -> Result<User, DbError> {
        let tables = self.tables.read().await;
        tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
            .ok_or_else(|| DbError::not_found("user", username))
    }

    async fn list_users(&self) -> Result<Vec<User>, DbError> {
        Ok(select(&self.tables.read().await.users, |_| true))
    }

    async fn create_vessel(&self, new: &NewVessel) -> Result<Vessel, DbError> {
        let mut tables = self.tables.write().await;
        let vessel = Vessel {
            id: next_id(&tables.vessels),
            name: new.name.clone(),
            vessel_type: new.vessel_type.clone(),
            displacement: new.displacement,
            build_date: new.build_date,
        };
        tables.vessels.insert(vessel.id, vessel.clone());
        Ok(vessel)
    }

    async fn get_vessel(&self, id: i64) -> Result<Vessel, DbError> {
        fetch(&self.tables.read().await.vessels, "vessel", id)
    }

    async fn list_vessels(&self) -> Result<Vec<Vessel>, DbError> {
        Ok(select(&self.tables.read().await.vessels, |_| true))
    }

    async fn create_voyage(&self, new: &NewVoyage) -> Result<Voyage, DbError> {
        let mut tables = self.tables.write().await;
        require(&tables.vessels, "vessel_id", new.vessel_id)?;
        let voyage = Voyage {
            id: next_id(&tables.voyages),
            vessel_id: new.vessel_id,
            depart_date: new.depart_date,
            return_date: new.return_date,
        };
        tables.voyages.insert(voyage.id, voyage.clone());
        Ok(voyage)
    }

    async fn get_voyage(&self, id: i64) -> Result<Voyage, DbError> {
        fetch(&self.tables.read().await.voyages, "voyage", id)
    }

    async fn list_voyages(&self, filter: &VoyageFilter) -> Result<Vec<Voyage>, DbError> {
        Ok(select(&self.tables.read().await.voyages, |v| {
            filter.vessel_id.is_none_or(|id| v.vessel_id == id)
        }))
    }

    async fn create_crew_member(&self, new: &NewCrewMember) -> Result<CrewMember, DbError> {
        let mut tables = self.tables.write().await;
        require(&tables.voyages, "voyage_id", new.voyage_id)?;
        let member = CrewMember {
            id: next_id(&tables.crew_members),
            voyage_id: new.voyage_id,
            name: new.name.clone(),
            position: new.position.clone(),
            address: new.address.clone(),
        };
        tables.crew_members.insert(member.id, member.clone());
        Ok(member)
    }

    async fn get_crew_member(&self, id: i64) -> Result<CrewMember, DbError> {
        fetch(&self.tables.read().await.crew_members, "crew member", id)
    }

    async fn list_crew_members(&self, filter: &CrewFilter) -> Result<Vec<CrewMember>, DbError> {
        Ok(select(&self.tables.read().await.crew_members, |m| {
            filter.voyage_id.is_none_or(|id| m.voyage_id == id)
        }))
    }

    async fn create_bank(&self, new: &NewBank) -> Result<Bank, DbError> {
        let mut tables = self.tables.write().await;
        let bank = Bank {
            id: next_id(&tables.banks),
            name: new.name.clone(),
            location: new.location.clone(),
        };
        tables.banks.insert(bank.id, bank.clone());
        Ok(bank)
    }

    async fn get_bank(&self, id: i64) -> Result<Bank, DbError> {
        fetch(&self.tables.read().await.banks, "bank", id)
    }

    async fn list_banks(&self) -> Result<Vec<Bank>, DbError> {
        Ok(select(&self.tables.read().await.banks, |_| true))
    }

    async fn create_visit(&self, new: &NewVisit) -> Result<Visit, DbError> {
        let mut tables = self.tables.write().await;
        require(&tables.voyages, "voyage_id", new.voyage_id)?;
        require(&tables.banks, "bank_id", new.bank_id)?;
        let visit = Visit {
            id: next_id(&tables.visits),
            voyage_id: new.voyage_id,
            bank_id: new.bank_id,
            arrival_date: new.arrival_date,
            departure_date: new.departure_date,
            quality: new.quality,
        };
        tables.visits.insert(visit.id, visit.clone());
        Ok(visit)
    }

    async fn get_visit(&self, id: i64) -> Result<Visit, DbError> {
        fetch(&self.tables.read().await.visits, "visit", id)
    }

    async fn list_visits(&self, filter: &VisitFilter) -> Result<Vec<Visit>, DbError> {
        Ok(select(&self.tables.read().await.visits, |v| {
            filter.voyage_id.is_none_or(|id| v.voyage_id == id) && filter.bank_id.is_none_or(|id| v.bank_id == id)
        }))
    }

    async fn create_catch(&self, new: &NewCatch) -> Result<Catch, DbError> {
        let mut tables = self.tables.write().await;
        require(&tables.visits, "visit_id", new.visit_id)?;
        let catch = Catch {
            id: next_id(&tables.catches),
            visit_id: new.visit_id,
            species: new.species.clone(),
            weight: new.weight,
        };
        tables.catches.insert(catch.id, catch.clone());
        Ok(catch)
    }

    async fn get_catch(&self, id: i64) -> Result<Catch, DbError> {
        fetch(&self.tables.read().await.catches, "catch", id)
    }

    async fn list_catches(&self, filter: &CatchFilter) -> Result<Vec<Catch>, DbError> {
        Ok(select(&self.tables.read().await.catches, |c| {
            filter.visit_id.is_none_or(|id| c.visit_id == id)
                && filter.species.as_deref().is_none_or(|s| c.species == s)
        }))
    }

    async fn catch_facts(&self, filter: &ReportFilter) -> Result<Vec<CatchFact>, DbError> {
        let tables = self.tables.read().await;
        let facts = tables
            .catches
            .values()
            .filter_map(|catch| {
                // Writes check every reference, so a broken chain cannot occur.
                let visit = tables.visits.get(&catch.visit_id)?;
                let voyage = tables.voyages.get(&visit.voyage_id)?;
                let vessel = tables.vessels.get(&voyage.vessel_id)?;
                let bank = tables.banks.get(&visit.bank_id)?;
                Some(CatchFact {
                    visit_id: visit.id,
                    vessel_id: vessel.id,
                    vessel_name: vessel.name.clone(),
                    bank_id: bank.id,
                    bank_name: bank.name.clone(),
                    species: catch.species.clone(),
                    weight: catch.weight,
                    arrival_date: visit.arrival_date,
                })
            })
            .filter(|fact| filter.matches(fact))
            .collect();
        Ok(facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::{Period, Role, VisitQuality};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_user(username: &str) -> NewUser {
        NewUser { username: username.into(), password_hash: "$argon2id$hash".into(), role: Role::User }
    }

    /// One vessel, one voyage, one bank, one visit on 2024-05-10.
    async fn seeded() -> (MemoryStore, Visit) {
        let store = MemoryStore::new();
        let vessel = store
            .create_vessel(&NewVessel { name: "Storm".into(), vessel_type: None, displacement: None, build_date: None })
            .await
            .unwrap();
        let voyage = store
            .create_voyage(&NewVoyage { vessel_id: vessel.id, depart_date: date(2024, 5, 1), return_date: None })
            .await
            .unwrap();
        let bank = store.create_bank(&NewBank { name: "Dogger".into(), location: None }).await.unwrap();
        let visit = store
            .create_visit(&NewVisit {
                voyage_id: voyage.id,
                bank_id: bank.id,
                arrival_date: date(2024, 5, 10),
                departure_date: None,
                quality: VisitQuality::Good,
            })
            .await
            .unwrap();
        (store, visit)
    }

    #[tokio::test]
    async fn ids_are_sequential_per_table() {
        let store = MemoryStore::new();
        let a = store.create_bank(&NewBank { name: "A".into(), location: None }).await.unwrap();
        let b = store.create_bank(&NewBank { name: "B".into(), location: None }).await.unwrap();
        let u = store.create_user(&new_user("ann")).await.unwrap();
        assert_eq!((a.id, b.id, u.id), (1, 2, 1));
        assert_eq!(store.get_bank(2).await.unwrap(), b);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected_and_store_unchanged() {
        let store = MemoryStore::new();
        store.create_user(&new_user("ann")).await.unwrap();

        let mut again = new_user("ann");
        again.role = Role::Admin;
        let err = store.create_user(&again).await.unwrap_err();

        assert!(matches!(err, DbError::Duplicate(_)));
        let users = store.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, Role::User);
    }

    #[tokio::test]
    async fn dangling_reference_persists_nothing() {
        let store = MemoryStore::new();
        let err = store
            .create_voyage(&NewVoyage { vessel_id: 42, depart_date: date(2024, 1, 1), return_date: None })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKey(ref col) if col.contains("vessel_id")));
        assert!(store.list_voyages(&VoyageFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(store.get_user("nobody").await, Err(DbError::NotFound(_))));
        assert!(matches!(store.get_catch(7).await, Err(DbError::NotFound(_))));
    }

    #[tokio::test]
    async fn catches_filter_by_visit_and_species() {
        let (store, visit) = seeded().await;
        for (species, weight) in [("cod", dec!(10)), ("cod", dec!(5)), ("salmon", dec!(20))] {
            store
                .create_catch(&NewCatch { visit_id: visit.id, species: species.into(), weight })
                .await
                .unwrap();
        }
        let cod = store
            .list_catches(&CatchFilter { visit_id: Some(visit.id), species: Some("cod".into()) })
            .await
            .unwrap();
        assert_eq!(cod.len(), 2);
        assert!(store
            .list_catches(&CatchFilter { visit_id: Some(visit.id + 1), species: None })
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn catch_facts_join_and_filter_by_period() {
        let (store, visit) = seeded().await;
        store
            .create_catch(&NewCatch { visit_id: visit.id, species: "cod".into(), weight: dec!(12.5) })
            .await
            .unwrap();

        let all = store.catch_facts(&ReportFilter::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].vessel_name, "Storm");
        assert_eq!(all[0].bank_name, "Dogger");
        assert_eq!(all[0].weight, dec!(12.5));

        let on_the_day = ReportFilter {
            period: Period { from: Some(date(2024, 5, 10)), to: Some(date(2024, 5, 10)) },
            ..ReportFilter::default()
        };
        assert_eq!(store.catch_facts(&on_the_day).await.unwrap().len(), 1);

        let later = ReportFilter {
            period: Period { from: Some(date(2024, 5, 11)), to: None },
            ..ReportFilter::default()
        };
        assert!(store.catch_facts(&later).await.unwrap().is_empty());
    }
}
