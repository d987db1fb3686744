//! Data-entry pages for crews recording their fleet.

use crate::{
    error::FrontError,
    forms::{CatchForm, CrewForm, VesselForm, VisitForm, VoyageForm},
    render::{self, opt},
    session::Session,
    FormBody, FrontState, Page, QueryParams,
};
use axum::{
    extract::{Query, State},
    response::Redirect,
    Form,
};
use axum_extra::extract::WithRejection;
use core_types::{
    Capability, CatchFilter, CrewFilter, NewCatch, NewCrewMember, NewVessel, NewVisit, NewVoyage, VisitFilter,
    VisitQuality, VoyageFilter,
};

// --- Vessels ---

pub async fn vessels(State(state): State<FrontState>, session: Session) -> Page {
    session.require(Capability::RecordFleetData)?;
    let rows: Vec<Vec<String>> = state
        .api
        .list_vessels()
        .await?
        .into_iter()
        .map(|v| vec![v.id.to_string(), v.name, opt(&v.vessel_type), opt(&v.displacement), opt(&v.build_date)])
        .collect();
    let form = render::form(
        "/user/vessels/add",
        &[
            render::input("name", "Название", "text", true),
            render::input("type", "Тип", "text", false),
            render::input("displacement", "Водоизмещение", "text", false),
            render::input("build_date", "Дата постройки", "date", false),
        ],
        "Добавить судно",
    );
    let body = render::table(&["ID", "Название", "Тип", "Водоизмещение", "Дата постройки"], &rows) + &form;
    Ok(render::page("Суда", Some(&session), &body))
}

pub async fn add_vessel(
    State(state): State<FrontState>,
    session: Session,
    WithRejection(Form(form), _): FormBody<VesselForm>,
) -> Result<Redirect, FrontError> {
    session.require(Capability::RecordFleetData)?;
    let vessel = state.api.create_vessel(&NewVessel::try_from(form)?).await?;
    tracing::info!(username = %session.username, vessel_id = vessel.id, "Vessel added.");
    Ok(Redirect::to("/user/vessels"))
}

// --- Voyages ---

pub async fn voyages(
    State(state): State<FrontState>,
    session: Session,
    WithRejection(Query(filter), _): QueryParams<VoyageFilter>,
) -> Page {
    session.require(Capability::RecordFleetData)?;
    let rows: Vec<Vec<String>> = state
        .api
        .list_voyages(&filter)
        .await?
        .into_iter()
        .map(|v| vec![v.id.to_string(), v.vessel_id.to_string(), v.depart_date.to_string(), opt(&v.return_date)])
        .collect();
    let form = render::form(
        "/user/voyages/add",
        &[
            render::input("vessel_id", "ID судна", "number", true),
            render::input("depart_date", "Дата выхода", "date", true),
            render::input("return_date", "Дата возвращения", "date", false),
        ],
        "Добавить рейс",
    );
    let body = render::table(&["ID", "Судно", "Выход", "Возвращение"], &rows) + &form;
    Ok(render::page("Рейсы", Some(&session), &body))
}

pub async fn add_voyage(
    State(state): State<FrontState>,
    session: Session,
    WithRejection(Form(form), _): FormBody<VoyageForm>,
) -> Result<Redirect, FrontError> {
    session.require(Capability::RecordFleetData)?;
    let voyage = state.api.create_voyage(&NewVoyage::try_from(form)?).await?;
    tracing::info!(username = %session.username, voyage_id = voyage.id, "Voyage added.");
    Ok(Redirect::to("/user/voyages"))
}

// --- Crew ---

pub async fn crew(
    State(state): State<FrontState>,
    session: Session,
    WithRejection(Query(filter), _): QueryParams<CrewFilter>,
) -> Page {
    session.require(Capability::RecordFleetData)?;
    let rows: Vec<Vec<String>> = state
        .api
        .list_crew_members(&filter)
        .await?
        .into_iter()
        .map(|m| vec![m.id.to_string(), m.voyage_id.to_string(), m.name, opt(&m.position), opt(&m.address)])
        .collect();
    let form = render::form(
        "/user/crew/add",
        &[
            render::input("voyage_id", "ID рейса", "number", true),
            render::input("name", "ФИО", "text", true),
            render::input("position", "Должность", "text", false),
            render::input("address", "Адрес", "text", false),
        ],
        "Добавить члена экипажа",
    );
    let body = render::table(&["ID", "Рейс", "ФИО", "Должность", "Адрес"], &rows) + &form;
    Ok(render::page("Экипаж", Some(&session), &body))
}

pub async fn add_crew_member(
    State(state): State<FrontState>,
    session: Session,
    WithRejection(Form(form), _): FormBody<CrewForm>,
) -> Result<Redirect, FrontError> {
    session.require(Capability::RecordFleetData)?;
    let member = state.api.create_crew_member(&NewCrewMember::try_from(form)?).await?;
    tracing::info!(username = %session.username, crew_member_id = member.id, "Crew member added.");
    Ok(Redirect::to("/user/crew"))
}

// --- Visits ---

pub async fn visits(
    State(state): State<FrontState>,
    session: Session,
    WithRejection(Query(filter), _): QueryParams<VisitFilter>,
) -> Page {
    session.require(Capability::RecordFleetData)?;
    let rows: Vec<Vec<String>> = state
        .api
        .list_visits(&filter)
        .await?
        .into_iter()
        .map(|v| {
            vec![
                v.id.to_string(),
                v.voyage_id.to_string(),
                v.bank_id.to_string(),
                v.arrival_date.to_string(),
                opt(&v.departure_date),
                v.quality.to_string(),
            ]
        })
        .collect();
    let qualities: Vec<(&str, &str)> = VisitQuality::ALL.iter().map(|q| (q.as_str(), q.as_str())).collect();
    let form = render::form(
        "/user/visits/add",
        &[
            render::input("voyage_id", "ID рейса", "number", true),
            render::input("bank_id", "ID банки", "number", true),
            render::input("arrival_date", "Дата прихода", "date", true),
            render::input("departure_date", "Дата ухода", "date", false),
            render::select("quality", "Качество", &qualities),
        ],
        "Добавить посещение",
    );
    let body = render::table(&["ID", "Рейс", "Банка", "Приход", "Уход", "Качество"], &rows) + &form;
    Ok(render::page("Посещения банок", Some(&session), &body))
}

pub async fn add_visit(
    State(state): State<FrontState>,
    session: Session,
    WithRejection(Form(form), _): FormBody<VisitForm>,
) -> Result<Redirect, FrontError> {
    session.require(Capability::RecordFleetData)?;
    let visit = state.api.create_visit(&NewVisit::try_from(form)?).await?;
    tracing::info!(username = %session.username, visit_id = visit.id, "Visit added.");
    Ok(Redirect::to("/user/visits"))
}

// --- Catches ---

pub async fn catches(
    State(state): State<FrontState>,
    session: Session,
    WithRejection(Query(filter), _): QueryParams<CatchFilter>,
) -> Page {
    session.require(Capability::RecordFleetData)?;
    let rows: Vec<Vec<String>> = state
        .api
        .list_catches(&filter)
        .await?
        .into_iter()
        .map(|c| vec![c.id.to_string(), c.visit_id.to_string(), c.species, c.weight.to_string()])
        .collect();
    let form = render::form(
        "/user/catches/add",
        &[
            render::input("visit_id", "ID посещения", "number", true),
            render::input("species", "Вид рыбы", "text", true),
            render::input("weight", "Вес", "text", true),
        ],
        "Добавить улов",
    );
    let body = render::table(&["ID", "Посещение", "Вид", "Вес"], &rows) + &form;
    Ok(render::page("Улов", Some(&session), &body))
}

pub async fn add_catch(
    State(state): State<FrontState>,
    session: Session,
    WithRejection(Form(form), _): FormBody<CatchForm>,
) -> Result<Redirect, FrontError> {
    session.require(Capability::RecordFleetData)?;
    let catch = state.api.create_catch(&NewCatch::try_from(form)?).await?;
    tracing::info!(username = %session.username, catch_id = catch.id, "Catch added.");
    Ok(Redirect::to("/user/catches"))
}
