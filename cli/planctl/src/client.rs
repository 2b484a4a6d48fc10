//! HTTP client for the planning service.

use std::time::Duration;

use anyhow::Context;
use planner_id::{ComponentId, PeriodId, ProjectId, SkillId};
use planner_model::{
    AssignContributorRequest, AssignmentBatch, ContributorList, EstimatedWeeksUpdate,
    NewComponent, NewContributor, NewPeriod, NewProject, Period, PeriodProjects, Skill,
};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::PlannerError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// API client for communicating with the planning service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client from config.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Self::from_base_url(config.api_url())
    }

    /// Create a new API client for an explicit base URL.
    pub fn from_base_url(base_url: &str) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // =========================================================================
    // Reference data
    // =========================================================================

    pub async fn list_periods(&self) -> Result<Vec<Period>, PlannerError> {
        self.get("/periods", "Failed to fetch periods").await
    }

    pub async fn list_skills(&self) -> Result<Vec<Skill>, PlannerError> {
        self.get("/skills", "Failed to fetch skills").await
    }

    /// Projects and components of a period, with assignment bitmaps.
    pub async fn period_projects(&self, period_id: PeriodId) -> Result<PeriodProjects, PlannerError> {
        self.get(
            &format!("/period/{period_id}/projects"),
            "Failed to refresh projects",
        )
        .await
    }

    /// Contributors holding `skill_id`.
    pub async fn contributors_by_skill(
        &self,
        skill_id: SkillId,
    ) -> Result<ContributorList, PlannerError> {
        self.get(
            &format!("/contributors/get_contributors_by_skill/{skill_id}"),
            "Failed to fetch contributors",
        )
        .await
    }

    // =========================================================================
    // Assignments and components
    // =========================================================================

    /// Commit one batch of week edits.
    pub async fn submit_assignments(&self, batch: &AssignmentBatch) -> Result<(), PlannerError> {
        self.send(
            Method::POST,
            "/assignment",
            Some(batch),
            "Failed to update assignments",
        )
        .await
    }

    /// Assign a contributor to a component, or unassign it with `None`.
    pub async fn assign_contributor(
        &self,
        component_id: ComponentId,
        request: &AssignContributorRequest,
    ) -> Result<(), PlannerError> {
        self.send(
            Method::POST,
            &format!("/component/{component_id}/assign_contributor"),
            Some(request),
            "Failed to assign contributor",
        )
        .await
    }

    pub async fn clear_assignments(&self, component_id: ComponentId) -> Result<(), PlannerError> {
        self.send::<()>(
            Method::DELETE,
            &format!("/component/{component_id}/assignments"),
            None,
            "Failed to clear assignments",
        )
        .await
    }

    pub async fn delete_component(&self, component_id: ComponentId) -> Result<(), PlannerError> {
        self.send::<()>(
            Method::DELETE,
            &format!("/component/{component_id}"),
            None,
            "Failed to delete component",
        )
        .await
    }

    pub async fn delete_project(&self, project_id: ProjectId) -> Result<(), PlannerError> {
        self.send::<()>(
            Method::DELETE,
            &format!("/project/{project_id}"),
            None,
            "Failed to delete project",
        )
        .await
    }

    pub async fn update_estimated_weeks(
        &self,
        component_id: ComponentId,
        request: &EstimatedWeeksUpdate,
    ) -> Result<(), PlannerError> {
        request.validate()?;
        self.send(
            Method::PUT,
            &format!("/component/{component_id}/estimated_weeks"),
            Some(request),
            "Failed to update estimated weeks",
        )
        .await
    }

    pub async fn create_component(&self, request: &NewComponent) -> Result<(), PlannerError> {
        request.validate()?;
        self.send(
            Method::POST,
            "/component",
            Some(request),
            "Failed to add component",
        )
        .await
    }

    // =========================================================================
    // Create forms
    // =========================================================================

    pub async fn create_period(&self, request: &NewPeriod) -> Result<(), PlannerError> {
        request.validate()?;
        self.send(
            Method::POST,
            "/period",
            Some(request),
            "Failed to create period",
        )
        .await
    }

    pub async fn create_project(&self, request: &NewProject) -> Result<(), PlannerError> {
        request.validate()?;
        self.send(
            Method::POST,
            "/project",
            Some(request),
            "Failed to create project",
        )
        .await
    }

    pub async fn create_contributor(&self, request: &NewContributor) -> Result<(), PlannerError> {
        request.validate()?;
        self.send(
            Method::POST,
            "/contributor",
            Some(request),
            "Failed to create contributor",
        )
        .await
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// Make a GET request and decode the JSON body.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        default_message: &str,
    ) -> Result<T, PlannerError> {
        let response = self
            .dispatch(self.client.get(self.url(path)), "GET", path, default_message)
            .await?;

        response
            .json()
            .await
            .map_err(|e| PlannerError::InvalidResponse {
                message: default_message.to_string(),
                detail: e.to_string(),
            })
    }

    /// Make a request whose response body is not needed.
    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        default_message: &str,
    ) -> Result<(), PlannerError> {
        let verb = method.to_string();
        let mut request = self.client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }

        self.dispatch(request, &verb, path, default_message)
            .await
            .map(|_| ())
    }

    async fn dispatch(
        &self,
        request: RequestBuilder,
        verb: &str,
        path: &str,
        default_message: &str,
    ) -> Result<reqwest::Response, PlannerError> {
        debug!(method = verb, path, "Sending request");

        let response = request.send().await.map_err(|e| {
            warn!(method = verb, path, error = %e, "Request failed");
            PlannerError::network(default_message, e)
        })?;

        let status = response.status();
        debug!(method = verb, path, status = status.as_u16(), "Received response");

        if status.is_success() {
            Ok(response)
        } else {
            Err(self.handle_error(response, default_message).await)
        }
    }

    /// Turn a non-2xx response into an error, preferring the body's `error`.
    async fn handle_error(&self, response: reqwest::Response, default_message: &str) -> PlannerError {
        let status = response.status().as_u16();

        let message = response
            .json::<ApiErrorResponse>()
            .await
            .ok()
            .and_then(|body| body.error)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| default_message.to_string());

        warn!(status, message = %message, "Service returned an error");
        PlannerError::api(status, message)
    }
}

/// Error body returned by the service.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    error: Option<String>,
}
