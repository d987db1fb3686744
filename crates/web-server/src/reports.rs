use crate::{error::AppError, AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use core_types::{BankAverage, ReportQuery, SpeciesBankTotal, VesselAverage, VesselTotal};
use std::sync::Arc;

type Params = WithRejection<Query<ReportQuery>, AppError>;

/// # GET /reports/top-vessels?species=&date_from=&date_to=
pub async fn top_vessels(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): Params,
) -> Result<Json<Vec<VesselTotal>>, AppError> {
    Ok(Json(reporting::top_vessels(state.store.as_ref(), &query).await?))
}

/// # GET /reports/avg-catch-per-bank?date_from=&date_to=
pub async fn avg_catch_per_bank(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): Params,
) -> Result<Json<Vec<BankAverage>>, AppError> {
    Ok(Json(reporting::avg_catch_per_bank(state.store.as_ref(), &query).await?))
}

/// # GET /reports/above-average/:bank_id?date_from=&date_to=
pub async fn above_average(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(bank_id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Query(query), _): Params,
) -> Result<Json<Vec<VesselAverage>>, AppError> {
    Ok(Json(reporting::above_average(state.store.as_ref(), bank_id, &query).await?))
}

/// # GET /reports/species-bank?species=&bank_id=
pub async fn species_by_bank(
    State(state): State<Arc<AppState>>,
    WithRejection(Query(query), _): Params,
) -> Result<Json<Vec<SpeciesBankTotal>>, AppError> {
    Ok(Json(reporting::species_by_bank(state.store.as_ref(), &query).await?))
}
