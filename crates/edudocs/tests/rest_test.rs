use edudocs::http::{HttpApi, RestCollection, RestDocument};
use edudocs::model::{
    Category, CategoryAction, CategoryCreate, Document, DocumentAction, SystemSettings,
    SystemSettingsUpdate,
};
use resource_store::{ApiError, ResourceApi, SingletonApi};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http(server: &MockServer) -> Arc<HttpApi> {
    Arc::new(HttpApi::new(server.uri(), Some("secret".into()), Duration::from_secs(5)).unwrap())
}

fn category_json(id: &str, name: &str, active: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "",
        "isActive": active,
        "documentCount": 0,
        "createdAt": "2024-01-10T08:00:00Z",
        "updatedAt": "2024-01-10T08:00:00Z"
    })
}

fn document_json(id: &str, flagged: bool) -> Value {
    json!({
        "id": id,
        "title": "Fractions",
        "description": "Worksheet",
        "categoryId": "c1",
        "categoryName": "Mathematics",
        "fileName": "fractions.pdf",
        "fileType": "pdf",
        "fileSize": 20480,
        "uploadedBy": "Ms. Rivera",
        "status": "published",
        "isFlagged": flagged,
        "downloadCount": 7,
        "createdAt": "2024-02-01T09:00:00Z",
        "updatedAt": "2024-02-01T09:00:00Z"
    })
}

#[tokio::test]
async fn test_list_sends_bearer_token_and_decodes_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/categories"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [category_json("c1", "Mathematics", true), category_json("c2", "Science", false)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = RestCollection::<Category>::new(http(&server));
    let envelope = api.list().await.unwrap();

    assert!(envelope.success);
    let items = envelope.data.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].name, "Science");
    assert!(!items[1].is_active);
}

#[tokio::test]
async fn test_create_posts_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/categories"))
        .and(body_partial_json(json!({"name": "Lesson Plans", "isActive": true})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": category_json("c9", "Lesson Plans", true),
            "message": "Category created successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = RestCollection::<Category>::new(http(&server));
    let envelope = api
        .create(CategoryCreate::new("Lesson Plans", "Weekly plans"))
        .await
        .unwrap();

    assert_eq!(envelope.data.unwrap().id.0, "c9");
    assert_eq!(envelope.message.as_deref(), Some("Category created successfully"));
}

#[tokio::test]
async fn test_toggle_active_patches_flag() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/categories/c1/toggle-active"))
        .and(body_json(json!({"isActive": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": category_json("c1", "Mathematics", false)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = RestCollection::<Category>::new(http(&server));
    let updated = api
        .perform("c1".into(), CategoryAction::SetActive(false))
        .await
        .unwrap()
        .data
        .unwrap();
    assert!(!updated.is_active);
}

#[tokio::test]
async fn test_document_actions_use_their_routes() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/documents/d1/flag"))
        .and(body_json(json!({"isFlagged": true, "reason": "Outdated"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": document_json("d1", true)
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/documents/d1/archive"))
        .and(body_json(json!({"archived": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": document_json("d1", true)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = RestCollection::<Document>::new(http(&server));
    let flagged = api
        .perform(
            "d1".into(),
            DocumentAction::Flag {
                reason: "Outdated".into(),
            },
        )
        .await
        .unwrap();
    assert!(flagged.data.unwrap().is_flagged);
    api.perform("d1".into(), DocumentAction::Archive)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_ignores_returned_data() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/categories/c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"id": "c2"},
            "message": "Category deleted successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = RestCollection::<Category>::new(http(&server));
    let envelope = api.delete("c2".into()).await.unwrap();
    assert!(envelope.success);
    assert_eq!(envelope.data, Some(()));
}

#[tokio::test]
async fn test_id_is_sent_as_one_encoded_segment() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/categories/a%20b%2Fc/toggle-active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": category_json("a b/c", "Mathematics", true)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = RestCollection::<Category>::new(http(&server));
    let updated = api
        .perform("a b/c".into(), CategoryAction::SetActive(true))
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(updated.id.to_string(), "a b/c");
}

#[tokio::test]
async fn test_declining_error_status_keeps_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/categories/c1"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "success": false,
            "message": "Category has documents"
        })))
        .mount(&server)
        .await;

    let api = RestCollection::<Category>::new(http(&server));
    let envelope = api.delete("c1".into()).await.unwrap();
    assert!(!envelope.success);
    assert_eq!(envelope.message.as_deref(), Some("Category has documents"));
}

#[tokio::test]
async fn test_error_page_becomes_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>Oops</html>"))
        .mount(&server)
        .await;

    let api = RestCollection::<Document>::new(http(&server));
    let err = api.list().await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 500,
            message: "Internal Server Error".into()
        }
    );
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"id": "c1"}]
        })))
        .mount(&server)
        .await;

    let api = RestCollection::<Category>::new(http(&server));
    assert!(matches!(api.list().await, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let server = MockServer::builder().start().await;
    let uri = server.uri();
    drop(server);

    let api = HttpApi::new(uri, None, Duration::from_secs(2)).unwrap();
    let api = RestCollection::<Category>::new(Arc::new(api));
    assert!(matches!(api.list().await, Err(ApiError::Network(_))));
}

#[tokio::test]
async fn test_settings_get_and_put() {
    let server = MockServer::start().await;
    let settings = json!({
        "siteName": "EduDocs",
        "maxUploadSizeMb": 50,
        "allowedFileTypes": ["pdf"],
        "maintenanceMode": false,
        "defaultLanguage": "en"
    });
    Mock::given(method("GET"))
        .and(path("/settings/system"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": settings})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/settings/system"))
        .and(body_json(json!({"maintenanceMode": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "siteName": "EduDocs",
                "maxUploadSizeMb": 50,
                "allowedFileTypes": ["pdf"],
                "maintenanceMode": true,
                "defaultLanguage": "en"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = RestDocument::<SystemSettings>::new(http(&server));
    let loaded = api.get().await.unwrap().data.unwrap();
    assert_eq!(loaded.max_upload_size_mb, 50);

    let saved = api
        .update(SystemSettingsUpdate {
            maintenance_mode: Some(true),
            ..Default::default()
        })
        .await
        .unwrap()
        .data
        .unwrap();
    assert!(saved.maintenance_mode);
}
