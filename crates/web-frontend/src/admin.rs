use crate::{
    error::FrontError,
    forms::BankForm,
    render::{self, escape, opt},
    session::Session,
    FormBody, FrontState, Page, PathParam, QueryParams,
};
use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Form,
};
use axum_extra::extract::WithRejection;
use core_types::{Capability, NewBank, ReportQuery};

fn period_fields() -> [String; 2] {
    [
        render::input("date_from", "С", "date", false),
        render::input("date_to", "По", "date", false),
    ]
}

pub async fn vessels(State(state): State<FrontState>, session: Session) -> Page {
    session.require(Capability::ReviewFleet)?;
    let rows: Vec<Vec<String>> = state
        .api
        .list_vessels()
        .await?
        .into_iter()
        .map(|v| vec![v.id.to_string(), v.name, opt(&v.vessel_type), opt(&v.displacement), opt(&v.build_date)])
        .collect();
    let body = render::table(&["ID", "Название", "Тип", "Водоизмещение", "Дата постройки"], &rows);
    Ok(render::page("Все суда", Some(&session), &body))
}

pub async fn banks(State(state): State<FrontState>, session: Session) -> Page {
    session.require(Capability::ManageBanks)?;
    let rows: Vec<Vec<String>> = state
        .api
        .list_banks()
        .await?
        .into_iter()
        .map(|b| vec![b.id.to_string(), b.name, opt(&b.location)])
        .collect();
    let form = render::form(
        "/admin/banks/add",
        &[
            render::input("name", "Название", "text", true),
            render::input("location", "Местоположение", "text", false),
        ],
        "Добавить банку",
    );
    let body = render::table(&["ID", "Название", "Местоположение"], &rows) + &form;
    Ok(render::page("Банки", Some(&session), &body))
}

pub async fn add_bank(
    State(state): State<FrontState>,
    session: Session,
    WithRejection(Form(form), _): FormBody<BankForm>,
) -> Result<Redirect, FrontError> {
    session.require(Capability::ManageBanks)?;
    let bank = state.api.create_bank(&NewBank::try_from(form)?).await?;
    tracing::info!(username = %session.username, bank_id = bank.id, "Bank added.");
    Ok(Redirect::to("/admin/banks"))
}

// --- Reports ---

/// # GET /admin/reports
/// Overall vessel ranking plus links to the parameterised reports.
pub async fn reports(State(state): State<FrontState>, session: Session) -> Page {
    session.require(Capability::ViewReports)?;
    let ranking: Vec<Vec<String>> = state
        .api
        .top_vessels(&ReportQuery::default())
        .await?
        .into_iter()
        .map(|r| vec![r.vessel, r.total.to_string()])
        .collect();
    let mut body = String::from(
        "<ul>\
<li><a href=\"/admin/reports/top_vessels_period\">Лучшие суда за период</a></li>\
<li><a href=\"/admin/reports/bank_avg\">Средний улов по банкам</a></li>\
<li><a href=\"/admin/reports/species_bank\">Улов по видам и банкам</a></li>\
</ul><h2>Суда по общему улову</h2>",
    );
    body.push_str(&render::table(&["Судно", "Улов"], &ranking));

    body.push_str("<h2>Суда с уловом выше среднего</h2><ul>");
    for bank in state.api.list_banks().await? {
        body.push_str(&format!(
            "<li><a href=\"/admin/reports/above_avg/{}\">{}</a></li>",
            bank.id,
            escape(&bank.name)
        ));
    }
    body.push_str("</ul>");
    Ok(render::page("Отчёты", Some(&session), &body))
}

fn top_vessels_form() -> String {
    let [from, to] = period_fields();
    render::form(
        "/admin/reports/top_vessels_period",
        &[render::input("species", "Вид рыбы", "text", false), from, to],
        "Показать",
    )
}

pub async fn top_vessels_period_page(session: Session) -> Page {
    session.require(Capability::ViewReports)?;
    Ok(render::page("Лучшие суда за период", Some(&session), &top_vessels_form()))
}

pub async fn top_vessels_period(
    State(state): State<FrontState>,
    session: Session,
    WithRejection(Form(query), _): FormBody<ReportQuery>,
) -> Page {
    session.require(Capability::ViewReports)?;
    let rows: Vec<Vec<String>> = state
        .api
        .top_vessels(&query)
        .await?
        .into_iter()
        .map(|r| vec![r.vessel, r.total.to_string()])
        .collect();
    let body = top_vessels_form() + &render::table(&["Судно", "Улов"], &rows);
    Ok(render::page("Лучшие суда за период", Some(&session), &body))
}

fn bank_avg_form() -> String {
    render::form("/admin/reports/bank_avg", &period_fields(), "Показать")
}

pub async fn bank_avg_page(session: Session) -> Page {
    session.require(Capability::ViewReports)?;
    Ok(render::page("Средний улов по банкам", Some(&session), &bank_avg_form()))
}

pub async fn bank_avg(
    State(state): State<FrontState>,
    session: Session,
    WithRejection(Form(query), _): FormBody<ReportQuery>,
) -> Page {
    session.require(Capability::ViewReports)?;
    let rows: Vec<Vec<String>> = state
        .api
        .avg_catch_per_bank(&query)
        .await?
        .into_iter()
        .map(|r| vec![r.bank_id.to_string(), r.bank, r.visits.to_string(), r.average.to_string()])
        .collect();
    let body = bank_avg_form() + &render::table(&["ID", "Банка", "Посещений", "Средний улов"], &rows);
    Ok(render::page("Средний улов по банкам", Some(&session), &body))
}

/// # GET /admin/reports/above_avg/:bank_id?date_from=&date_to=
pub async fn above_avg(
    State(state): State<FrontState>,
    session: Session,
    WithRejection(Path(bank_id), _): PathParam<i64>,
    WithRejection(Query(query), _): QueryParams<ReportQuery>,
) -> Page {
    session.require(Capability::ViewReports)?;
    let rows: Vec<Vec<String>> = state
        .api
        .above_average(bank_id, &query)
        .await?
        .into_iter()
        .map(|r| vec![r.vessel, r.average.to_string()])
        .collect();
    let form = render::get_form(&format!("/admin/reports/above_avg/{bank_id}"), &period_fields(), "Показать");
    let body = form + &render::table(&["Судно", "Средний улов за посещение"], &rows);
    Ok(render::page(&format!("Суда выше среднего, банка {bank_id}"), Some(&session), &body))
}

fn species_bank_form() -> String {
    render::form(
        "/admin/reports/species_bank",
        &[
            render::input("species", "Вид рыбы", "text", false),
            render::input("bank_id", "ID банки", "number", false),
        ],
        "Показать",
    )
}

pub async fn species_bank_page(session: Session) -> Page {
    session.require(Capability::ViewReports)?;
    Ok(render::page("Улов по видам и банкам", Some(&session), &species_bank_form()))
}

pub async fn species_bank(
    State(state): State<FrontState>,
    session: Session,
    WithRejection(Form(query), _): FormBody<ReportQuery>,
) -> Page {
    session.require(Capability::ViewReports)?;
    let rows: Vec<Vec<String>> = state
        .api
        .species_by_bank(&query)
        .await?
        .into_iter()
        .map(|r| vec![r.bank, r.species, r.total.to_string()])
        .collect();
    let body = species_bank_form() + &render::table(&["Банка", "Вид", "Улов"], &rows);
    Ok(render::page("Улов по видам и банкам", Some(&session), &body))
}
