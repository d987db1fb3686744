use crate::error::DbError;
use async_trait::async_trait;
use core_types::{
    Bank, Catch, CatchFact, CatchFilter, CrewFilter, CrewMember, NewBank, NewCatch, NewCrewMember, NewUser, NewVessel,
    NewVisit, NewVoyage, ReportFilter, User, Vessel, Visit, VisitFilter, Voyage, VoyageFilter,
};

/// The record store: durable create/get/list for every entity, plus the
/// flattened catch query the reports are built on.
///
/// Each `create_*` is atomic. It either stores the full record, with its
/// foreign keys checked, or leaves the store unchanged and returns
/// `Duplicate` / `ForeignKey`. Lists are ordered by id.
#[async_trait]
pub trait FleetStore: Send + Sync {
    async fn create_user(&self, new: &NewUser) -> Result<User, DbError>;
    async fn get_user(&self, username: &str) -> Result<User, DbError>;
    async fn list_users(&self) -> Result<Vec<User>, DbError>;

    async fn create_vessel(&self, new: &NewVessel) -> Result<Vessel, DbError>;
    async fn get_vessel(&self, id: i64) -> Result<Vessel, DbError>;
    async fn list_vessels(&self) -> Result<Vec<Vessel>, DbError>;

    async fn create_voyage(&self, new: &NewVoyage) -> Result<Voyage, DbError>;
    async fn get_voyage(&self, id: i64) -> Result<Voyage, DbError>;
    async fn list_voyages(&self, filter: &VoyageFilter) -> Result<Vec<Voyage>, DbError>;

    async fn create_crew_member(&self, new: &NewCrewMember) -> Result<CrewMember, DbError>;
    async fn get_crew_member(&self, id: i64) -> Result<CrewMember, DbError>;
    async fn list_crew_members(&self, filter: &CrewFilter) -> Result<Vec<CrewMember>, DbError>;

    async fn create_bank(&self, new: &NewBank) -> Result<Bank, DbError>;
    async fn get_bank(&self, id: i64) -> Result<Bank, DbError>;
    async fn list_banks(&self) -> Result<Vec<Bank>, DbError>;

    async fn create_visit(&self, new: &NewVisit) -> Result<Visit, DbError>;
    async fn get_visit(&self, id: i64) -> Result<Visit, DbError>;
    async fn list_visits(&self, filter: &VisitFilter) -> Result<Vec<Visit>, DbError>;

    async fn create_catch(&self, new: &NewCatch) -> Result<Catch, DbError>;
    async fn get_catch(&self, id: i64) -> Result<Catch, DbError>;
    async fn list_catches(&self, filter: &CatchFilter) -> Result<Vec<Catch>, DbError>;

    /// Every catch joined through visit → voyage → vessel and visit → bank,
    /// restricted to rows matching `filter`.
    async fn catch_facts(&self, filter: &ReportFilter) -> Result<Vec<CatchFact>, DbError>;
}
