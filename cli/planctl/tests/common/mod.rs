//! Shared fixtures for tests against a mocked planning service.

#![allow(dead_code)]

use planctl::ApiClient;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PERIOD: u64 = 1;
pub const PROJECT: u64 = 10;
pub const COMPONENT: u64 = 5;
pub const OTHER_COMPONENT: u64 = 6;
pub const CONTRIBUTOR: u64 = 9;

pub fn client(server: &MockServer) -> ApiClient {
    ApiClient::from_base_url(&server.uri()).unwrap()
}

/// A component payload as the service returns it.
pub fn component(id: u64, contributor: Option<u64>, assignments: &[bool]) -> Value {
    json!({
        "component_id": id,
        "component_name": format!("Component {id}"),
        "skill_id": 2,
        "contributor_id": contributor,
        "contributor_name": contributor.map(|_| "Grace Hopper"),
        "estimated_weeks": 3,
        "assigned_weeks": assignments.iter().filter(|a| **a).count(),
        "assignments": assignments,
    })
}

/// Period projects with one project holding `components`.
pub fn board(components: Vec<Value>) -> Value {
    json!({
        "projects": [{
            "project_id": PROJECT,
            "project_name": "Checkout",
            "components": components,
        }]
    })
}

/// Board with one assigned component and one unassigned component.
pub fn standard_board(assignments: &[bool]) -> Value {
    board(vec![
        component(COMPONENT, Some(CONTRIBUTOR), assignments),
        component(OTHER_COMPONENT, None, &[false, false, false, false]),
    ])
}

pub fn projects_path(period: u64) -> String {
    format!("/period/{period}/projects")
}

/// Serve `body` for the period's projects, at most `times` times.
pub async fn mount_board_once(server: &MockServer, period: u64, body: Value, times: u64) {
    Mock::given(method("GET"))
        .and(path(projects_path(period)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .up_to_n_times(times)
        .mount(server)
        .await;
}

/// Serve `body` for the period's projects on every request.
pub async fn mount_board(server: &MockServer, period: u64, body: Value) {
    Mock::given(method("GET"))
        .and(path(projects_path(period)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// (method, path) of every request the server saw, in arrival order.
pub async fn request_log(server: &MockServer) -> Vec<(String, String)> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| (r.method.to_string(), r.url.path().to_string()))
        .collect()
}
