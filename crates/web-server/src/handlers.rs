use crate::{
    error::{AppError, MSG_NOT_FOUND, MSG_USER_EXISTS},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use core_types::{
    Bank, Catch, CatchFilter, CrewFilter, CrewMember, NewBank, NewCatch, NewCrewMember, NewUser, NewVessel, NewVisit,
    NewVoyage, UserCredentials, UserSummary, Validate, Vessel, Visit, VisitFilter, Voyage, VoyageFilter,
};
use database::DbError;
use serde_json::{json, Value};
use std::sync::Arc;

type JsonBody<T> = WithRejection<Json<T>, AppError>;
type Filter<T> = WithRejection<Query<T>, AppError>;
type Id = WithRejection<Path<i64>, AppError>;
type Created<T> = (StatusCode, Json<T>);

/// Unwraps a request body and runs its boundary validation.
fn validated<T: Validate>(body: JsonBody<T>) -> Result<T, AppError> {
    let WithRejection(Json(payload), _) = body;
    payload.validate()?;
    Ok(payload)
}

// --- Users ---

/// # POST /users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    body: JsonBody<NewUser>,
) -> Result<Created<Value>, AppError> {
    let new_user = validated(body)?;
    let user = state.store.create_user(&new_user).await.map_err(|e| match e {
        DbError::Duplicate(_) => AppError::Duplicate(MSG_USER_EXISTS.to_string()),
        other => other.into(),
    })?;
    tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "User registered.");
    Ok((StatusCode::CREATED, Json(json!({ "msg": "created" }))))
}

/// # GET /users/:username
/// The only endpoint that returns a password hash; the front end verifies
/// logins against it.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(username), _): WithRejection<Path<String>, AppError>,
) -> Result<Json<UserCredentials>, AppError> {
    let user = state.store.get_user(&username).await.map_err(|e| match e {
        DbError::NotFound(_) => AppError::NotFound(MSG_NOT_FOUND.to_string()),
        other => other.into(),
    })?;
    Ok(Json(user.credentials()))
}

/// # GET /users
pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserSummary>>, AppError> {
    let users = state.store.list_users().await?;
    Ok(Json(users.iter().map(|u| u.summary()).collect()))
}

// --- Vessels ---

/// # POST /vessels
pub async fn create_vessel(
    State(state): State<Arc<AppState>>,
    body: JsonBody<NewVessel>,
) -> Result<Created<Vessel>, AppError> {
    let vessel = state.store.create_vessel(&validated(body)?).await?;
    tracing::info!(vessel_id = vessel.id, name = %vessel.name, "Vessel created.");
    Ok((StatusCode::CREATED, Json(vessel)))
}

/// # GET /vessels/:id
pub async fn get_vessel(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): Id,
) -> Result<Json<Vessel>, AppError> {
    Ok(Json(state.store.get_vessel(id).await?))
}

/// # GET /vessels
pub async fn list_vessels(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Vessel>>, AppError> {
    Ok(Json(state.store.list_vessels().await?))
}

// --- Voyages ---

/// # POST /voyages
pub async fn create_voyage(
    State(state): State<Arc<AppState>>,
    body: JsonBody<NewVoyage>,
) -> Result<Created<Voyage>, AppError> {
    let voyage = state.store.create_voyage(&validated(body)?).await?;
    tracing::info!(voyage_id = voyage.id, vessel_id = voyage.vessel_id, "Voyage created.");
    Ok((StatusCode::CREATED, Json(voyage)))
}

/// # GET /voyages/:id
pub async fn get_voyage(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): Id,
) -> Result<Json<Voyage>, AppError> {
    Ok(Json(state.store.get_voyage(id).await?))
}

/// # GET /voyages?vessel_id=
pub async fn list_voyages(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(filter), _): Filter<VoyageFilter>,
) -> Result<Json<Vec<Voyage>>, AppError> {
    Ok(Json(state.store.list_voyages(&filter).await?))
}

// --- Crew members ---

/// # POST /crew-members
pub async fn create_crew_member(
    State(state): State<Arc<AppState>>,
    body: JsonBody<NewCrewMember>,
) -> Result<Created<CrewMember>, AppError> {
    let member = state.store.create_crew_member(&validated(body)?).await?;
    tracing::info!(crew_member_id = member.id, voyage_id = member.voyage_id, "Crew member added.");
    Ok((StatusCode::CREATED, Json(member)))
}

/// # GET /crew-members/:id
pub async fn get_crew_member(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): Id,
) -> Result<Json<CrewMember>, AppError> {
    Ok(Json(state.store.get_crew_member(id).await?))
}

/// # GET /crew-members?voyage_id=
pub async fn list_crew_members(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(filter), _): Filter<CrewFilter>,
) -> Result<Json<Vec<CrewMember>>, AppError> {
    Ok(Json(state.store.list_crew_members(&filter).await?))
}

// --- Banks ---

/// # POST /banks
pub async fn create_bank(
    State(state): State<Arc<AppState>>,
    body: JsonBody<NewBank>,
) -> Result<Created<Bank>, AppError> {
    let bank = state.store.create_bank(&validated(body)?).await?;
    tracing::info!(bank_id = bank.id, name = %bank.name, "Bank created.");
    Ok((StatusCode::CREATED, Json(bank)))
}

/// # GET /banks/:id
pub async fn get_bank(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): Id,
) -> Result<Json<Bank>, AppError> {
    Ok(Json(state.store.get_bank(id).await?))
}

/// # GET /banks
pub async fn list_banks(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Bank>>, AppError> {
    Ok(Json(state.store.list_banks().await?))
}

// --- Visits ---

/// # POST /visits
pub async fn create_visit(
    State(state): State<Arc<AppState>>,
    body: JsonBody<NewVisit>,
) -> Result<Created<Visit>, AppError> {
    let visit = state.store.create_visit(&validated(body)?).await?;
    tracing::info!(visit_id = visit.id, voyage_id = visit.voyage_id, bank_id = visit.bank_id, "Visit recorded.");
    Ok((StatusCode::CREATED, Json(visit)))
}

/// # GET /visits/:id
pub async fn get_visit(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): Id,
) -> Result<Json<Visit>, AppError> {
    Ok(Json(state.store.get_visit(id).await?))
}

/// # GET /visits?voyage_id=&bank_id=
pub async fn list_visits(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(filter), _): Filter<VisitFilter>,
) -> Result<Json<Vec<Visit>>, AppError> {
    Ok(Json(state.store.list_visits(&filter).await?))
}

// --- Catches ---

/// # POST /catches
pub async fn create_catch(
    State(state): State<Arc<AppState>>,
    body: JsonBody<NewCatch>,
) -> Result<Created<Catch>, AppError> {
    let catch = state.store.create_catch(&validated(body)?).await?;
    tracing::info!(catch_id = catch.id, visit_id = catch.visit_id, species = %catch.species, "Catch recorded.");
    Ok((StatusCode::CREATED, Json(catch)))
}

/// # GET /catches/:id
pub async fn get_catch(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id), _): Id,
) -> Result<Json<Catch>, AppError> {
    Ok(Json(state.store.get_catch(id).await?))
}

/// # GET /catches?visit_id=&species=
pub async fn list_catches(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(filter), _): Filter<CatchFilter>,
) -> Result<Json<Vec<Catch>>, AppError> {
    Ok(Json(state.store.list_catches(&filter).await?))
}
