mod common;

use common::*;
use planctl::roster::Roster;
use planner_id::{ContributorId, PeriodId, SkillId};
use planner_view::eligible_assignees;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_contributors(server: &MockServer, skill: u64, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/contributors/get_contributors_by_skill/{skill}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_contributors_are_fetched_once_per_skill() {
    let server = MockServer::start().await;
    mount_contributors(
        &server,
        2,
        json!({"contributors": [
            {"contributor_id": CONTRIBUTOR, "first_name": "Grace", "last_name": "Hopper"},
            {"contributor_id": 11, "first_name": "Alan", "last_name": "Turing"}
        ]}),
    )
    .await;

    let client = client(&server);
    let mut roster = Roster::new();
    let skill = SkillId::new(2);

    assert_eq!(roster.ensure(&client, skill).await.unwrap().len(), 2);
    assert_eq!(roster.ensure(&client, skill).await.unwrap().len(), 2);

    // Entries are tagged with the skill they were listed under.
    let eligible = eligible_assignees(roster.eligible(skill), skill);
    assert_eq!(eligible.len(), 2);
    assert_eq!(
        roster.find(ContributorId::new(11)).unwrap().display_name(),
        "Alan Turing"
    );

    assert!(roster.eligible(SkillId::new(3)).is_empty());
}

#[tokio::test]
async fn test_ensure_for_board_fetches_each_required_skill() {
    let server = MockServer::start().await;
    // Both components on the standard board need skill 2.
    mount_board(&server, PERIOD, standard_board(&[false, false, false, false])).await;
    mount_contributors(
        &server,
        2,
        json!({"contributors": [
            {"contributor_id": CONTRIBUTOR, "first_name": "Grace", "last_name": "Hopper"}
        ]}),
    )
    .await;

    let client = client(&server);
    let board = client.period_projects(PeriodId::new(PERIOD)).await.unwrap();

    let mut roster = Roster::new();
    roster.ensure_for_board(&client, &board).await.unwrap();
    assert!(roster.find(ContributorId::new(CONTRIBUTOR)).is_some());

    roster.clear();
    assert!(roster.find(ContributorId::new(CONTRIBUTOR)).is_none());
}
