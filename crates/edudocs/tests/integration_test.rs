use edudocs::config::AppConfig;
use edudocs::lifecycle::AppSystem;
use edudocs::model::{CategoryCreate, DashboardStats, Role};
use resource_store::mock::RecordingNotifier;
use resource_store::Severity;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer, role: Role) -> AppConfig {
    AppConfig {
        api_url: server.uri(),
        api_token: Some("secret".into()),
        role,
        timeout: Duration::from_secs(5),
        buffer_size: 8,
    }
}

#[tokio::test]
async fn test_category_page_against_rest_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{
                "id": "c1",
                "name": "Mathematics",
                "isActive": true,
                "documentCount": 3,
                "createdAt": "2024-01-10T08:00:00Z",
                "updatedAt": "2024-01-10T08:00:00Z"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": {
                "id": "c2",
                "name": "Lesson Plans",
                "description": "Weekly plans",
                "isActive": true,
                "createdAt": "2024-03-01T08:00:00Z",
                "updatedAt": "2024-03-01T08:00:00Z"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = RecordingNotifier::new();
    let system = AppSystem::connect(&config(&server, Role::Teacher), Arc::new(notifier.clone()))
        .unwrap();
    let screen = system.categories_screen();

    screen.mount().await.unwrap();
    assert_eq!(screen.state().data.len(), 1);

    screen
        .create(CategoryCreate::new("Lesson Plans", "Weekly plans"))
        .await
        .unwrap();
    let names: Vec<_> = screen.visible().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Lesson Plans", "Mathematics"]);

    // The category with documents is refused locally.
    assert!(screen.delete("c1".into()).await.is_err());

    assert_eq!(notifier.count(Severity::Success), 1);
    assert_eq!(notifier.count(Severity::Error), 1);

    drop(screen);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_admin_dashboard_against_rest_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dashboard/admin-stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "totalUsers": 42,
                "totalDocuments": 310,
                "totalCategories": 12,
                "flaggedDocuments": 3,
                "totalDownloads": 5120,
                "recentUploads": 18
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = RecordingNotifier::new();
    let system =
        AppSystem::connect(&config(&server, Role::Admin), Arc::new(notifier.clone())).unwrap();
    let screen = system.dashboard_screen();

    screen.mount().await.unwrap();
    match screen.stats() {
        Some(DashboardStats::Admin(stats)) => assert_eq!(stats.flagged_documents, 3),
        other => panic!("expected admin stats, got {other:?}"),
    }
    assert!(notifier.notifications().is_empty());

    drop(screen);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_server_outage_surfaces_on_the_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let notifier = RecordingNotifier::new();
    let system = AppSystem::connect(&config(&server, Role::Teacher), Arc::new(notifier.clone()))
        .unwrap();
    let screen = system.documents_screen();

    let err = screen.mount().await.unwrap_err();
    assert_eq!(err.kind(), resource_store::FailureKind::Transport);
    assert!(screen.state().error.unwrap().contains("503"));
    // One notice per failed store.
    assert_eq!(notifier.count(Severity::Error), 2);

    drop(screen);
    system.shutdown().await.unwrap();
}
