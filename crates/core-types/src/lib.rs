//! # Fleetbook Core Types
//!
//! The shared vocabulary of the workspace: the persisted entities, the typed
//! requests that create them, and the rows produced by the reports. Every other
//! crate depends on this one and on nothing else in the workspace below it.

pub mod enums;
pub mod error;
pub mod reports;
pub mod requests;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Capability, Role, VisitQuality};
pub use error::CoreError;
pub use reports::{
    BankAverage, CatchFact, Period, ReportFilter, ReportQuery, SpeciesBankTotal, VesselAverage, VesselTotal,
};
pub use requests::{
    CatchFilter, CrewFilter, NewBank, NewCatch, NewCrewMember, NewUser, NewVessel, NewVisit, NewVoyage, Validate,
    VisitFilter, VoyageFilter,
};
pub use structs::{Bank, Catch, CrewMember, User, UserCredentials, UserSummary, Vessel, Visit, Voyage};
