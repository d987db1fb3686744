use crate::error::ApiError;
use async_trait::async_trait;
use configuration::settings::WebSettings;
use core_types::{
    Bank, BankAverage, Catch, CatchFilter, CrewFilter, CrewMember, NewBank, NewCatch, NewCrewMember, NewUser,
    NewVessel, NewVisit, NewVoyage, ReportQuery, SpeciesBankTotal, UserCredentials, Vessel, VesselAverage,
    VesselTotal, Visit, VisitFilter, Voyage, VoyageFilter,
};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

pub mod error;
pub mod responses;

// --- Public API ---
pub use responses::{ApiErrorResponse, CreatedResponse};

/// The interface the front end uses to reach the fleet API.
/// Handlers only see this trait, so tests can swap the HTTP client for a stub.
#[async_trait]
pub trait ApiClient: Send + Sync {
    // --- Users ---
    async fn create_user(&self, user: &NewUser) -> Result<(), ApiError>;
    /// Fetches the stored hash and role for a login attempt.
    async fn get_user(&self, username: &str) -> Result<UserCredentials, ApiError>;

    // --- Records ---
    async fn list_vessels(&self) -> Result<Vec<Vessel>, ApiError>;
    async fn create_vessel(&self, vessel: &NewVessel) -> Result<Vessel, ApiError>;
    async fn list_voyages(&self, filter: &VoyageFilter) -> Result<Vec<Voyage>, ApiError>;
    async fn create_voyage(&self, voyage: &NewVoyage) -> Result<Voyage, ApiError>;
    async fn list_crew_members(&self, filter: &CrewFilter) -> Result<Vec<CrewMember>, ApiError>;
    async fn create_crew_member(&self, member: &NewCrewMember) -> Result<CrewMember, ApiError>;
    async fn list_banks(&self) -> Result<Vec<Bank>, ApiError>;
    async fn create_bank(&self, bank: &NewBank) -> Result<Bank, ApiError>;
    async fn list_visits(&self, filter: &VisitFilter) -> Result<Vec<Visit>, ApiError>;
    async fn create_visit(&self, visit: &NewVisit) -> Result<Visit, ApiError>;
    async fn list_catches(&self, filter: &CatchFilter) -> Result<Vec<Catch>, ApiError>;
    async fn create_catch(&self, catch: &NewCatch) -> Result<Catch, ApiError>;

    // --- Reports ---
    async fn top_vessels(&self, query: &ReportQuery) -> Result<Vec<VesselTotal>, ApiError>;
    async fn avg_catch_per_bank(&self, query: &ReportQuery) -> Result<Vec<BankAverage>, ApiError>;
    async fn above_average(&self, bank_id: i64, query: &ReportQuery) -> Result<Vec<VesselAverage>, ApiError>;
    async fn species_by_bank(&self, query: &ReportQuery) -> Result<Vec<SpeciesBankTotal>, ApiError>;
}

/// A concrete implementation of the `ApiClient` over HTTP/JSON.
#[derive(Clone)]
pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        reqwest::Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &WebSettings) -> Result<Self, ApiError> {
        Self::new(&settings.api_url, Duration::from_secs(settings.request_timeout_secs))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, ApiError> {
        let response = self.client.get(self.url(path)).query(query).send().await?;
        Self::read_json(path, response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::read_json(path, response).await
    }

    async fn read_json<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str::<T>(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
        } else {
            let message = serde_json::from_str::<ApiErrorResponse>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            tracing::debug!(path, status = status.as_u16(), %message, "API request rejected.");
            Err(ApiError::Rejected { status, message })
        }
    }
}

/// Serializes to an empty query string.
#[derive(Serialize)]
struct NoQuery;

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn create_user(&self, user: &NewUser) -> Result<(), ApiError> {
        self.post_json::<CreatedResponse, _>("/users", user).await?;
        Ok(())
    }

    async fn get_user(&self, username: &str) -> Result<UserCredentials, ApiError> {
        // Usernames are free text; keep them a single path segment.
        let mut url = reqwest::Url::parse(&self.url("/users/")).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push(username);
        let response = self.client.get(url).send().await?;
        Self::read_json("/users/{username}", response).await
    }

    async fn list_vessels(&self) -> Result<Vec<Vessel>, ApiError> {
        self.get_json("/vessels", &NoQuery).await
    }

    async fn create_vessel(&self, vessel: &NewVessel) -> Result<Vessel, ApiError> {
        self.post_json("/vessels", vessel).await
    }

    async fn list_voyages(&self, filter: &VoyageFilter) -> Result<Vec<Voyage>, ApiError> {
        self.get_json("/voyages", filter).await
    }

    async fn create_voyage(&self, voyage: &NewVoyage) -> Result<Voyage, ApiError> {
        self.post_json("/voyages", voyage).await
    }

    async fn list_crew_members(&self, filter: &CrewFilter) -> Result<Vec<CrewMember>, ApiError> {
        self.get_json("/crew-members", filter).await
    }

    async fn create_crew_member(&self, member: &NewCrewMember) -> Result<CrewMember, ApiError> {
        self.post_json("/crew-members", member).await
    }

    async fn list_banks(&self) -> Result<Vec<Bank>, ApiError> {
        self.get_json("/banks", &NoQuery).await
    }

    async fn create_bank(&self, bank: &NewBank) -> Result<Bank, ApiError> {
        self.post_json("/banks", bank).await
    }

    async fn list_visits(&self, filter: &VisitFilter) -> Result<Vec<Visit>, ApiError> {
        self.get_json("/visits", filter).await
    }

    async fn create_visit(&self, visit: &NewVisit) -> Result<Visit, ApiError> {
        self.post_json("/visits", visit).await
    }

    async fn list_catches(&self, filter: &CatchFilter) -> Result<Vec<Catch>, ApiError> {
        self.get_json("/catches", filter).await
    }

    async fn create_catch(&self, catch: &NewCatch) -> Result<Catch, ApiError> {
        self.post_json("/catches", catch).await
    }

    async fn top_vessels(&self, query: &ReportQuery) -> Result<Vec<VesselTotal>, ApiError> {
        self.get_json("/reports/top-vessels", query).await
    }

    async fn avg_catch_per_bank(&self, query: &ReportQuery) -> Result<Vec<BankAverage>, ApiError> {
        self.get_json("/reports/avg-catch-per-bank", query).await
    }

    async fn above_average(&self, bank_id: i64, query: &ReportQuery) -> Result<Vec<VesselAverage>, ApiError> {
        self.get_json(&format!("/reports/above-average/{bank_id}"), query).await
    }

    async fn species_by_bank(&self, query: &ReportQuery) -> Result<Vec<SpeciesBankTotal>, ApiError> {
        self.get_json("/reports/species-bank", query).await
    }
}
