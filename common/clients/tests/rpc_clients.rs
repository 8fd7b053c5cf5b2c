use std::time::Duration;

use common_clients::{
    ClientError, HttpProfileServices, HttpProjectClient, NewProject, ProfileRequest, ProfileServices,
    ProjectClient, ProjectStatus,
};
use httpmock::prelude::*;
use serde_json::json;

fn profile_request() -> ProfileRequest {
    ProfileRequest {
        user_id: 42,
        name: "Alice".into(),
        email: "alice".into(),
        password: "$argon2id$v=19$hash".into(),
    }
}

#[tokio::test]
async fn client_profile_is_created_with_camel_case_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/clients/create")
                .json_body(json!({
                    "userId": 42,
                    "name": "Alice",
                    "email": "alice",
                    "password": "$argon2id$v=19$hash"
                }));
            then.status(200).json_body(json!({"profileId": 7, "userId": 42}));
        })
        .await;

    let services = HttpProfileServices::new(&server.base_url(), "http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let profile = services.create_client_profile(&profile_request()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(profile.profile_id, 7);
    assert_eq!(profile.user_id, 42);
}

#[tokio::test]
async fn freelancer_profile_error_status_is_surfaced() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/freelancers/create");
            then.status(500).body("database down");
        })
        .await;

    let services = HttpProfileServices::new("http://127.0.0.1:9", &server.base_url(), Duration::from_secs(2)).unwrap();
    let err = services.create_freelancer_profile(&profile_request()).await.unwrap_err();

    match err {
        ClientError::Status { service, status, body } => {
            assert_eq!(service, "freelancer-service");
            assert_eq!(status, 500);
            assert_eq!(body, "database down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn undecodable_body_is_a_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/clients/create");
            then.status(200).body("not json");
        })
        .await;

    let services = HttpProfileServices::new(&server.base_url(), &server.base_url(), Duration::from_secs(2)).unwrap();
    let err = services.create_client_profile(&profile_request()).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode { .. }), "{err:?}");
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/clients/create");
            then.status(200)
                .delay(Duration::from_millis(1500))
                .json_body(json!({"profileId": 7, "userId": 42}));
        })
        .await;

    let services = HttpProfileServices::new(&server.base_url(), &server.base_url(), Duration::from_millis(200)).unwrap();
    let err = services.create_client_profile(&profile_request()).await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout { .. }), "{err:?}");
}

#[tokio::test]
async fn unreachable_upstream_is_a_transport_error() {
    // Port 9 (discard) is not expected to be listening locally.
    let services = HttpProfileServices::new("http://127.0.0.1:9", "http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let err = services.create_client_profile(&profile_request()).await.unwrap_err();
    assert!(
        matches!(err, ClientError::Transport { .. } | ClientError::Timeout { .. }),
        "{err:?}"
    );
}

#[tokio::test]
async fn project_round_trip_through_project_service() {
    let server = MockServer::start_async().await;
    let record = json!({
        "id": 11,
        "clientId": 42,
        "title": "Logo",
        "description": "New logo",
        "budget": 250.0,
        "durationDays": 14,
        "status": "OPEN",
        "assignedFreelancerId": null,
        "createdAt": "2026-03-01T12:00:00Z"
    });
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/projects/create")
                .json_body(json!({
                    "clientId": 42, "title": "Logo", "description": "New logo",
                    "budget": 250.0, "duration": 14
                }));
            then.status(200).json_body(record.clone());
        })
        .await;
    let fetch = server
        .mock_async(|when, then| {
            when.method(GET).path("/projects/getProject/11");
            then.status(200).json_body(record.clone());
        })
        .await;

    let projects = HttpProjectClient::new(&format!("{}/", server.base_url()), Duration::from_secs(2)).unwrap();
    let created = projects
        .create_project(&NewProject {
            client_id: 42,
            title: "Logo".into(),
            description: "New logo".into(),
            budget: 250.0,
            duration: 14,
        })
        .await
        .unwrap();
    let fetched = projects.get_project_by_id(11).await.unwrap();

    create.assert_async().await;
    fetch.assert_async().await;
    assert_eq!(created, fetched);
    assert_eq!(created.status, ProjectStatus::Open);
    assert_eq!(created.assigned_freelancer_id, None);
}

#[tokio::test]
async fn missing_project_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/projects/getProject/99");
            then.status(404).json_body(json!({"code": "unknown_project"}));
        })
        .await;

    let projects = HttpProjectClient::new(&server.base_url(), Duration::from_secs(2)).unwrap();
    let err = projects.get_project_by_id(99).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.service(), "project-service");
}
