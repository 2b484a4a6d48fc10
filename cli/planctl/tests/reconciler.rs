//! Integration tests for the assignment reconciler.
//!
//! Every test runs against a mocked planning service:
//! 1. Load a period
//! 2. Toggle week cells locally
//! 3. Submit and observe the optimistic board, the request and the refetch

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use planctl::{PlannerError, Reconciler, SubmitOutcome};
use planner_id::{ComponentId, ContributorId, PeriodId, ProjectId};
use planner_reconcile::ComponentPhase;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ID: ComponentId = ComponentId::new(COMPONENT);
const WHO: ContributorId = ContributorId::new(CONTRIBUTOR);

async fn loaded(server: &MockServer) -> Arc<Reconciler> {
    let reconciler = Arc::new(Reconciler::new(client(server)));
    reconciler.load_period(PeriodId::new(PERIOD)).await.unwrap();
    reconciler
}

/// Wait until the component reports `phase`, failing after a second.
async fn wait_for_phase(reconciler: &Reconciler, phase: ComponentPhase) {
    let mut rx = reconciler.subscribe();
    tokio::time::timeout(Duration::from_secs(1), async {
        while reconciler.phase(ID).await != phase {
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("phase not reached");
}

#[tokio::test]
async fn test_submit_patches_board_before_response_then_refetches() {
    let server = MockServer::start().await;
    mount_board_once(&server, PERIOD, standard_board(&[false, false, false, false]), 1).await;
    // The service also booked week 3 by the time we refetch.
    mount_board(&server, PERIOD, standard_board(&[false, false, true, true])).await;

    Mock::given(method("POST"))
        .and(path("/assignment"))
        .and(body_json(json!({
            "component_id": COMPONENT,
            "contributor_id": CONTRIBUTOR,
            "added_weeks": [2],
            "removed_weeks": []
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "ok"}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reconciler = loaded(&server).await;
    reconciler.toggle_cell(ID, 2).await.unwrap();
    assert_eq!(reconciler.phase(ID).await, ComponentPhase::Pending);

    let task = {
        let reconciler = reconciler.clone();
        tokio::spawn(async move { reconciler.submit(ID, Some(WHO)).await })
    };

    wait_for_phase(&reconciler, ComponentPhase::Submitting).await;

    // Optimistic state while the request is in flight.
    let board = reconciler.board().await;
    let component = board.component(ID).unwrap();
    assert_eq!(component.assignments, vec![false, false, true, false]);
    assert_eq!(component.assigned_weeks, 1);
    assert!(reconciler.pending(ID).await.is_none());

    let outcome = task.await.unwrap().unwrap();
    match outcome {
        SubmitOutcome::Committed(batch) => {
            assert_eq!(batch.added_weeks, vec![2]);
            assert!(batch.removed_weeks.is_empty());
        }
        SubmitOutcome::Skipped => panic!("expected a committed submit"),
    }

    // Server truth replaces the optimistic patch.
    let board = reconciler.board().await;
    let component = board.component(ID).unwrap();
    assert_eq!(component.assignments, vec![false, false, true, true]);
    assert_eq!(component.assigned_weeks, 2);
    assert_eq!(reconciler.phase(ID).await, ComponentPhase::Clean);
}

#[tokio::test]
async fn test_failed_submit_restores_server_state() {
    let server = MockServer::start().await;
    mount_board_once(&server, PERIOD, standard_board(&[true, false, false, false]), 1).await;
    mount_board(&server, PERIOD, standard_board(&[true, false, false, true])).await;

    Mock::given(method("POST"))
        .and(path("/assignment"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "Contributor is overbooked"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reconciler = loaded(&server).await;
    reconciler.toggle_cell(ID, 0).await.unwrap();
    reconciler.toggle_cell(ID, 1).await.unwrap();

    let err = reconciler.submit(ID, Some(WHO)).await.unwrap_err();
    match &err {
        PlannerError::Api { status, message } => {
            assert_eq!(*status, 400);
            assert_eq!(message, "Contributor is overbooked");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let board = reconciler.board().await;
    let component = board.component(ID).unwrap();
    assert_eq!(component.assignments, vec![true, false, false, true]);
    assert_eq!(component.assigned_weeks, 2);
    assert!(reconciler.pending(ID).await.is_none());
    assert_eq!(reconciler.phase(ID).await, ComponentPhase::Clean);
}

#[tokio::test]
async fn test_failed_submit_without_error_body_uses_default_message() {
    let server = MockServer::start().await;
    mount_board(&server, PERIOD, standard_board(&[false, false, false, false])).await;

    Mock::given(method("POST"))
        .and(path("/assignment"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let reconciler = loaded(&server).await;
    reconciler.toggle_cell(ID, 3).await.unwrap();

    let err = reconciler.submit(ID, Some(WHO)).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.user_message(), "Failed to update assignments");
}

#[tokio::test]
async fn test_submit_without_contributor_sends_nothing() {
    let server = MockServer::start().await;
    mount_board(&server, PERIOD, standard_board(&[false, false, false, false])).await;

    Mock::given(method("POST"))
        .and(path("/assignment"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let reconciler = loaded(&server).await;
    let other = ComponentId::new(OTHER_COMPONENT);
    reconciler.toggle_cell(other, 1).await.unwrap();

    let outcome = reconciler.submit_component(other).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Skipped);

    let pending = reconciler.pending(other).await.unwrap();
    assert_eq!(pending.added(), vec![1]);
    assert_eq!(reconciler.phase(other).await, ComponentPhase::Pending);

    let board = reconciler.board().await;
    assert_eq!(board.component(other).unwrap().assigned_weeks, 0);
}

#[tokio::test]
async fn test_empty_batch_is_still_posted() {
    let server = MockServer::start().await;
    mount_board(&server, PERIOD, standard_board(&[false, false, false, false])).await;

    Mock::given(method("POST"))
        .and(path("/assignment"))
        .and(body_json(json!({
            "component_id": COMPONENT,
            "contributor_id": CONTRIBUTOR,
            "added_weeks": [],
            "removed_weeks": []
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let reconciler = loaded(&server).await;
    let outcome = reconciler.submit(ID, Some(WHO)).await.unwrap();
    assert!(outcome.is_committed());
}

#[tokio::test]
async fn test_overlapping_submits_for_one_component_are_serialized() {
    let server = MockServer::start().await;
    mount_board(&server, PERIOD, standard_board(&[false, false, false, false])).await;

    Mock::given(method("POST"))
        .and(path("/assignment"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(200)))
        .expect(2)
        .mount(&server)
        .await;

    let reconciler = loaded(&server).await;
    reconciler.toggle_cell(ID, 0).await.unwrap();

    let first = {
        let reconciler = reconciler.clone();
        tokio::spawn(async move { reconciler.submit(ID, Some(WHO)).await })
    };
    wait_for_phase(&reconciler, ComponentPhase::Submitting).await;

    // Toggled while the first batch is in flight: a fresh batch.
    reconciler.toggle_cell(ID, 1).await.unwrap();
    let second = {
        let reconciler = reconciler.clone();
        tokio::spawn(async move { reconciler.submit(ID, Some(WHO)).await })
    };

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let projects = projects_path(PERIOD);
    let log = request_log(&server).await;
    assert_eq!(
        log,
        vec![
            ("GET".to_string(), projects.clone()),
            ("POST".to_string(), "/assignment".to_string()),
            ("GET".to_string(), projects.clone()),
            ("POST".to_string(), "/assignment".to_string()),
            ("GET".to_string(), projects),
        ]
    );

    let posts: Vec<serde_json::Value> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .map(|r| r.body_json().unwrap())
        .collect();
    assert_eq!(posts[0]["added_weeks"], json!([0]));
    assert_eq!(posts[1]["added_weeks"], json!([1]));
}

#[tokio::test]
async fn test_toggle_cell_validates_against_board() {
    let server = MockServer::start().await;
    mount_board(&server, PERIOD, standard_board(&[true, false, false, false])).await;
    let reconciler = loaded(&server).await;

    let err = reconciler.toggle_cell(ID, 4).await.unwrap_err();
    assert!(matches!(err, PlannerError::Validation(_)));

    let err = reconciler
        .toggle_cell(ComponentId::new(404), 0)
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::NotFound(_)));

    // Assigned week becomes a removal.
    reconciler.toggle_cell(ID, 0).await.unwrap();
    assert_eq!(reconciler.pending(ID).await.unwrap().removed(), vec![0]);

    let views = reconciler.project().await;
    assert_eq!(
        views[0].rows[0].cells[0],
        planner_view::CellState::Removed
    );
}

#[tokio::test]
async fn test_toggles_bump_revision() {
    let server = MockServer::start().await;
    mount_board(&server, PERIOD, standard_board(&[false, false, false, false])).await;
    let reconciler = loaded(&server).await;

    let mut rx = reconciler.subscribe();
    let before = reconciler.revision();

    reconciler.toggle_cell(ID, 1).await.unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), before + 1);

    assert!(reconciler.discard(ID).await);
    assert!(!reconciler.discard(ID).await);
    assert_eq!(reconciler.revision(), before + 2);
}

#[tokio::test]
async fn test_switching_period_drops_pending() {
    let server = MockServer::start().await;
    mount_board(&server, PERIOD, standard_board(&[false, false, false, false])).await;
    mount_board(&server, 2, board(vec![])).await;

    let reconciler = loaded(&server).await;
    reconciler.toggle_cell(ID, 1).await.unwrap();

    // Reloading the same period keeps edits.
    reconciler.load_period(PeriodId::new(PERIOD)).await.unwrap();
    assert_eq!(reconciler.pending_components().await, vec![ID]);

    reconciler.load_period(PeriodId::new(2)).await.unwrap();
    assert!(reconciler.pending_components().await.is_empty());
    assert_eq!(reconciler.active_period().await, Some(PeriodId::new(2)));
}

#[tokio::test]
async fn test_submit_requires_a_loaded_period() {
    let server = MockServer::start().await;
    let reconciler = Reconciler::new(client(&server));

    let err = reconciler.submit(ID, Some(WHO)).await.unwrap_err();
    assert!(matches!(err, PlannerError::Validation(_)));
    assert!(request_log(&server).await.is_empty());
}

#[tokio::test]
async fn test_unassign_posts_null_and_refetches() {
    let server = MockServer::start().await;
    mount_board_once(&server, PERIOD, standard_board(&[true, false, false, false]), 1).await;
    mount_board(
        &server,
        PERIOD,
        board(vec![component(COMPONENT, None, &[true, false, false, false])]),
    )
    .await;

    Mock::given(method("POST"))
        .and(path(format!("/component/{COMPONENT}/assign_contributor")))
        .and(body_json(json!({ "contributor_id": null })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let reconciler = loaded(&server).await;
    reconciler.assign_contributor(ID, None).await.unwrap();

    let board = reconciler.board().await;
    assert_eq!(board.component(ID).unwrap().contributor_id, None);
}

#[tokio::test]
async fn test_component_edits_call_endpoint_then_refetch() {
    let server = MockServer::start().await;
    mount_board(&server, PERIOD, standard_board(&[true, true, false, false])).await;

    Mock::given(method("DELETE"))
        .and(path(format!("/component/{COMPONENT}/assignments")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/component/{COMPONENT}/estimated_weeks")))
        .and(body_json(json!({ "estimated_weeks": 6 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/component/{OTHER_COMPONENT}")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/project/{PROJECT}")))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"error": "Project has assignments"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reconciler = loaded(&server).await;
    reconciler.clear_assignments(ID).await.unwrap();
    reconciler.update_estimated_weeks(ID, 6).await.unwrap();
    reconciler
        .delete_component(ComponentId::new(OTHER_COMPONENT))
        .await
        .unwrap();

    let err = reconciler
        .delete_project(ProjectId::new(PROJECT))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Project has assignments");

    // One load plus one refetch per successful edit.
    let refetches = request_log(&server)
        .await
        .into_iter()
        .filter(|(m, p)| m == "GET" && *p == projects_path(PERIOD))
        .count();
    assert_eq!(refetches, 4);
}

#[tokio::test]
async fn test_zero_estimate_is_rejected_before_sending() {
    let server = MockServer::start().await;
    mount_board(&server, PERIOD, standard_board(&[false, false, false, false])).await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let reconciler = loaded(&server).await;
    let err = reconciler.update_estimated_weeks(ID, 0).await.unwrap_err();
    assert!(matches!(err, PlannerError::Validation(_)));
}

#[tokio::test]
async fn test_accepted_batch_stays_committed_when_refetch_fails() {
    let server = MockServer::start().await;
    mount_board_once(&server, PERIOD, standard_board(&[false, false, false, false]), 1).await;
    Mock::given(method("GET"))
        .and(path(projects_path(PERIOD)))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/assignment"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let reconciler = loaded(&server).await;
    reconciler.toggle_cell(ID, 2).await.unwrap();

    let outcome = reconciler.submit(ID, Some(WHO)).await.unwrap();
    assert!(outcome.is_committed());

    // The optimistic patch stays until the next successful refresh.
    let board = reconciler.board().await;
    assert_eq!(
        board.component(ID).unwrap().assignments,
        vec![false, false, true, false]
    );
    assert!(reconciler.pending(ID).await.is_none());
    assert_eq!(reconciler.phase(ID).await, ComponentPhase::Clean);
}

#[tokio::test]
async fn test_queued_submit_does_not_post_after_period_switch() {
    let server = MockServer::start().await;
    mount_board(&server, PERIOD, standard_board(&[false, false, false, false])).await;
    mount_board(&server, 2, board(vec![])).await;

    Mock::given(method("POST"))
        .and(path("/assignment"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(300)))
        .expect(1)
        .mount(&server)
        .await;

    let reconciler = loaded(&server).await;
    reconciler.toggle_cell(ID, 0).await.unwrap();

    let first = {
        let reconciler = reconciler.clone();
        tokio::spawn(async move { reconciler.submit(ID, Some(WHO)).await })
    };
    wait_for_phase(&reconciler, ComponentPhase::Submitting).await;

    let second = {
        let reconciler = reconciler.clone();
        tokio::spawn(async move { reconciler.submit(ID, Some(WHO)).await })
    };
    reconciler.load_period(PeriodId::new(2)).await.unwrap();

    assert!(first.await.unwrap().unwrap().is_committed());
    let err = second.await.unwrap().unwrap_err();
    assert!(matches!(err, PlannerError::NotFound(_)));

    // The late refetch of the old period does not replace the new board.
    assert_eq!(reconciler.active_period().await, Some(PeriodId::new(2)));
    assert!(reconciler.board().await.component(ID).is_none());
}
