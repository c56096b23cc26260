use chrono::{TimeZone, Utc};
use edudocs::error::{CategoryError, DashboardError, DocumentError, SettingsError};
use edudocs::lifecycle::{Apis, AppSystem};
use edudocs::model::{
    ActivityLog, AdminStats, Category, CategoryCreate, CategoryId, CategorySort, Document,
    DocumentId, DocumentStatus, DashboardStats, NotificationSettings, Role, SecuritySettings,
    SecuritySettingsUpdate, SystemSettings, SystemSettingsUpdate, TeacherStats,
};
use resource_store::mock::{gate, MockApi, MockSingletonApi, RecordingNotifier};
use resource_store::{Direction, FailureKind, Severity, StoreError};
use std::sync::Arc;

// --- Fixtures ---

struct Mocks {
    categories: MockApi<Category>,
    documents: MockApi<Document>,
    logs: MockApi<ActivityLog>,
    system: MockSingletonApi<SystemSettings>,
    security: MockSingletonApi<SecuritySettings>,
    notifications: MockSingletonApi<NotificationSettings>,
    admin: MockSingletonApi<AdminStats>,
    teacher: MockSingletonApi<TeacherStats>,
}

impl Mocks {
    fn new() -> Self {
        Self {
            categories: MockApi::new(),
            documents: MockApi::new(),
            logs: MockApi::new(),
            system: MockSingletonApi::new(),
            security: MockSingletonApi::new(),
            notifications: MockSingletonApi::new(),
            admin: MockSingletonApi::new(),
            teacher: MockSingletonApi::new(),
        }
    }

    fn apis(&self) -> Apis {
        Apis {
            categories: Arc::new(self.categories.clone()),
            documents: Arc::new(self.documents.clone()),
            activity_logs: Arc::new(self.logs.clone()),
            system_settings: Arc::new(self.system.clone()),
            security_settings: Arc::new(self.security.clone()),
            notification_settings: Arc::new(self.notifications.clone()),
            admin_stats: Arc::new(self.admin.clone()),
            teacher_stats: Arc::new(self.teacher.clone()),
        }
    }
}

fn start(role: Role) -> (AppSystem, Mocks, RecordingNotifier) {
    let mocks = Mocks::new();
    let notifier = RecordingNotifier::new();
    let system = AppSystem::with_apis(mocks.apis(), role, 10, Arc::new(notifier.clone()));
    (system, mocks, notifier)
}

fn category(id: &str, name: &str, document_count: u32, is_active: bool) -> Category {
    let at = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
    Category {
        id: id.into(),
        name: name.into(),
        description: format!("{name} resources"),
        color: None,
        is_active,
        document_count,
        created_at: at,
        updated_at: at,
    }
}

fn document(id: &str, title: &str, category_id: &str, status: DocumentStatus) -> Document {
    let at = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
    Document {
        id: id.into(),
        title: title.into(),
        description: String::new(),
        category_id: category_id.into(),
        category_name: None,
        file_name: format!("{id}.pdf"),
        file_type: "pdf".into(),
        file_size: 1024,
        uploaded_by: "Ms. Rivera".into(),
        status,
        is_flagged: false,
        flag_reason: None,
        download_count: 0,
        created_at: at,
        updated_at: at,
    }
}

fn shelf() -> Vec<Category> {
    vec![
        category("c1", "Mathematics", 4, true),
        category("c2", "Science", 0, false),
        category("c3", "History", 1, true),
    ]
}

// --- Categories ---

#[tokio::test]
async fn test_delete_of_category_with_documents_never_reaches_store() {
    let (system, mocks, notifier) = start(Role::Admin);
    let screen = system.categories_screen();

    mocks.categories.expect_list().return_ok(shelf());
    screen.mount().await.unwrap();

    let err = screen.delete("c1".into()).await.unwrap_err();
    assert_eq!(
        err,
        CategoryError::HasDocuments {
            name: "Mathematics".into(),
            count: 4
        }
    );
    assert_eq!(err.kind(), FailureKind::Validation);
    // Only the list call went out.
    assert_eq!(mocks.categories.calls(), 1);
    assert_eq!(screen.state().data.len(), 3);
    assert_eq!(screen.state().error, None);

    let notice = notifier.last().unwrap();
    assert_eq!(notice.severity, Severity::Error);
    assert_eq!(notice.title, "Cannot delete category");
    mocks.categories.verify();

    drop(screen);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_delete_of_empty_category_removes_it() {
    let (system, mocks, notifier) = start(Role::Admin);
    let screen = system.categories_screen();

    mocks.categories.expect_list().return_ok(shelf());
    screen.mount().await.unwrap();

    mocks.categories.expect_delete("c2".into()).return_envelope(resource_store::Envelope::done());
    screen.delete("c2".into()).await.unwrap();

    let items = screen.state().data;
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|c| c.id != CategoryId::from("c2")));
    assert_eq!(notifier.last().unwrap().title, "Category deleted");
}

#[tokio::test]
async fn test_create_lesson_plans() {
    let (system, mocks, notifier) = start(Role::Teacher);
    let screen = system.categories_screen();

    mocks.categories.expect_list().return_ok(shelf());
    screen.mount().await.unwrap();
    let before = screen.state().data.len();

    mocks
        .categories
        .expect_create()
        .return_ok(category("c4", "Lesson Plans", 0, true));
    screen
        .create(CategoryCreate::new("Lesson Plans", "Weekly plans"))
        .await
        .unwrap();

    let items = screen.state().data;
    assert_eq!(items.len(), before + 1);
    assert_eq!(items.last().unwrap().name, "Lesson Plans");
    assert_eq!(notifier.count(Severity::Success), 1);
    assert_eq!(notifier.last().unwrap().title, "Category created");
}

#[tokio::test]
async fn test_create_while_mounting_keeps_the_loaded_list() {
    let (system, mocks, notifier) = start(Role::Teacher);
    let screen = system.categories_screen();

    let (list_gate, list_latch) = gate();
    mocks
        .categories
        .expect_list()
        .held_by(list_latch)
        .return_ok(shelf());
    mocks
        .categories
        .expect_create()
        .return_ok(category("c4", "Lesson Plans", 0, true));

    // The create lands while the page is still loading.
    let creating = async {
        mocks.categories.wait_for_calls(1).await;
        let created = screen
            .create(CategoryCreate::new("Lesson Plans", "Weekly plans"))
            .await;
        list_gate.open();
        created
    };
    let (mounted, created) = tokio::join!(screen.mount(), creating);
    mounted.unwrap();
    created.unwrap();

    let state = screen.state();
    let names: Vec<_> = state.data.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Mathematics", "Science", "History", "Lesson Plans"]);
    assert!(!state.is_loading);
    assert_eq!(state.error, None);
    assert_eq!(notifier.count(Severity::Error), 0);
    mocks.categories.verify();
}

#[tokio::test]
async fn test_create_rejects_blank_and_duplicate_names() {
    let (system, mocks, notifier) = start(Role::Teacher);
    let screen = system.categories_screen();

    mocks.categories.expect_list().return_ok(shelf());
    screen.mount().await.unwrap();

    let err = screen.create(CategoryCreate::new("   ", "")).await.unwrap_err();
    assert_eq!(err, CategoryError::Invalid("Category name is required".into()));

    let err = screen
        .create(CategoryCreate::new("science", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, CategoryError::Invalid(msg) if msg.contains("already exists")));

    assert_eq!(mocks.categories.calls(), 1);
    assert_eq!(notifier.count(Severity::Error), 2);
}

#[tokio::test]
async fn test_toggle_status_twice_restores_flag() {
    let (system, mocks, _) = start(Role::Admin);
    let screen = system.categories_screen();

    mocks.categories.expect_list().return_ok(shelf());
    screen.mount().await.unwrap();

    mocks
        .categories
        .expect_action("c3".into())
        .return_ok(category("c3", "History", 1, false));
    let toggled = screen.toggle_status("c3".into()).await.unwrap();
    assert!(!toggled.is_active);

    mocks
        .categories
        .expect_action("c3".into())
        .return_ok(category("c3", "History", 1, true));
    let restored = screen.toggle_status("c3".into()).await.unwrap();
    assert!(restored.is_active);
    assert_eq!(screen.state().data, shelf());
    mocks.categories.verify();
}

#[tokio::test]
async fn test_declined_fetch_shows_error() {
    let (system, mocks, notifier) = start(Role::Admin);
    let screen = system.categories_screen();

    mocks.categories.expect_list().return_declined("Service unavailable");
    let err = screen.mount().await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::Structural);
    let state = screen.state();
    assert!(state.data.is_empty());
    assert_eq!(state.error.as_deref(), Some("Service unavailable"));
    assert_eq!(notifier.count(Severity::Error), 1);

    screen.clear_error().await.unwrap();
    assert_eq!(screen.state().error, None);
}

#[tokio::test]
async fn test_visible_categories_follow_query() {
    let (system, mocks, _) = start(Role::Admin);
    let mut screen = system.categories_screen();

    mocks.categories.expect_list().return_ok(shelf());
    screen.mount().await.unwrap();

    let names = |s: &edudocs::screens::CategoriesScreen| {
        s.visible().into_iter().map(|c| c.name).collect::<Vec<_>>()
    };
    assert_eq!(names(&screen), vec!["History", "Mathematics", "Science"]);

    screen.filter_active(Some(true));
    screen.sort_by(CategorySort::DocumentCount, Direction::Descending);
    assert_eq!(names(&screen), vec!["Mathematics", "History"]);

    screen.filter_active(None);
    screen.search("SCI");
    assert_eq!(names(&screen), vec!["Science"]);
}

// --- Documents ---

fn library() -> Vec<Document> {
    let mut flagged = document("d2", "Cell biology", "c2", DocumentStatus::Published);
    flagged.is_flagged = true;
    flagged.flag_reason = Some("Wrong diagrams".into());
    vec![
        document("d1", "Fractions", "c1", DocumentStatus::Published),
        flagged,
        document("d3", "Roman empire", "c3", DocumentStatus::Archived),
    ]
}

async fn mounted_documents(
    role: Role,
) -> (AppSystem, Mocks, RecordingNotifier, edudocs::screens::DocumentsScreen) {
    let (system, mocks, notifier) = start(role);
    let screen = system.documents_screen();
    mocks.documents.expect_list().return_ok(library());
    mocks.categories.expect_list().return_ok(shelf());
    screen.mount().await.unwrap();
    (system, mocks, notifier, screen)
}

#[tokio::test]
async fn test_flag_requires_reason() {
    let (_system, mocks, notifier, screen) = mounted_documents(Role::Teacher).await;

    let err = screen.flag("d1".into(), "  ").await.unwrap_err();
    assert!(matches!(err, DocumentError::Invalid(_)));
    assert_eq!(mocks.documents.calls(), 1);
    assert_eq!(notifier.last().unwrap().title, "Cannot flag document");

    let mut flagged = document("d1", "Fractions", "c1", DocumentStatus::Published);
    flagged.is_flagged = true;
    flagged.flag_reason = Some("Contains errors".into());
    mocks.documents.expect_action("d1".into()).return_ok(flagged);
    let doc = screen.flag("d1".into(), " Contains errors ").await.unwrap();

    assert!(doc.is_flagged);
    assert_eq!(notifier.last().unwrap().title, "Document flagged");
    mocks.documents.verify();
}

#[tokio::test]
async fn test_toggle_archive_picks_direction() {
    let (_system, mocks, notifier, screen) = mounted_documents(Role::Admin).await;

    mocks
        .documents
        .expect_action("d3".into())
        .return_ok(document("d3", "Roman empire", "c3", DocumentStatus::Draft));
    screen.toggle_archive("d3".into()).await.unwrap();
    assert_eq!(notifier.last().unwrap().title, "Document restored");

    mocks
        .documents
        .expect_action("d1".into())
        .return_ok(document("d1", "Fractions", "c1", DocumentStatus::Archived));
    screen.toggle_archive("d1".into()).await.unwrap();
    assert_eq!(notifier.last().unwrap().title, "Document archived");

    let err = screen.toggle_archive("nope".into()).await.unwrap_err();
    assert_eq!(err, DocumentError::NotFound(DocumentId::from("nope")));
}

#[tokio::test]
async fn test_document_filters_and_category_names() {
    let (_system, _mocks, _, mut screen) = mounted_documents(Role::Admin).await;

    screen.filter_flagged(Some(true));
    let visible = screen.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(screen.category_name(&visible[0]), "Science");

    screen.filter_flagged(None);
    screen.filter_status(Some(DocumentStatus::Published));
    screen.filter_category(Some("c1".into()));
    let titles: Vec<_> = screen.visible().into_iter().map(|d| d.title).collect();
    assert_eq!(titles, vec!["Fractions"]);

    screen.filter_category(None);
    screen.filter_status(None);
    screen.search("rivera");
    assert_eq!(screen.visible().len(), 3);
}

#[tokio::test]
async fn test_create_document_checks_category() {
    let (_system, mocks, _, screen) = mounted_documents(Role::Teacher).await;

    let form = edudocs::model::DocumentCreate {
        title: "Algebra".into(),
        description: String::new(),
        category_id: "missing".into(),
        file_name: "algebra.pdf".into(),
        file_type: "pdf".into(),
        file_size: 10,
        status: DocumentStatus::Draft,
    };
    let err = screen.create(form).await.unwrap_err();
    assert_eq!(err, DocumentError::Invalid("Unknown category missing".into()));
    assert_eq!(mocks.documents.calls(), 1);
}

#[tokio::test]
async fn test_upload_refreshes_counts_used_by_category_delete() {
    let (system, mocks, notifier, screen) = mounted_documents(Role::Teacher).await;
    let categories = system.categories_screen();

    let form = edudocs::model::DocumentCreate {
        title: "Cells".into(),
        description: String::new(),
        category_id: "c2".into(),
        file_name: "cells.pdf".into(),
        file_type: "pdf".into(),
        file_size: 10,
        status: DocumentStatus::Draft,
    };
    mocks
        .documents
        .expect_create()
        .return_ok(document("d4", "Cells", "c2", DocumentStatus::Draft));
    let mut refreshed = shelf();
    refreshed[1].document_count = 1;
    mocks.categories.expect_list().return_ok(refreshed);
    screen.create(form).await.unwrap();
    assert_eq!(mocks.categories.calls(), 2);

    // Science was empty at mount; the upload filled it.
    let err = categories.delete("c2".into()).await.unwrap_err();
    assert_eq!(
        err,
        CategoryError::HasDocuments {
            name: "Science".into(),
            count: 1
        }
    );
    assert_eq!(mocks.categories.calls(), 2);
    assert_eq!(notifier.last().unwrap().title, "Cannot delete category");
}

#[tokio::test]
async fn test_document_delete_refreshes_counts() {
    let (_system, mocks, notifier, screen) = mounted_documents(Role::Admin).await;

    mocks
        .documents
        .expect_delete("d1".into())
        .return_envelope(resource_store::Envelope::done());
    let mut refreshed = shelf();
    refreshed[0].document_count = 3;
    mocks.categories.expect_list().return_ok(refreshed);
    screen.delete("d1".into()).await.unwrap();

    let maths = screen
        .categories()
        .into_iter()
        .find(|c| c.id == CategoryId::from("c1"))
        .unwrap();
    assert_eq!(maths.document_count, 3);
    assert_eq!(notifier.last().unwrap().title, "Document deleted");
    mocks.categories.verify();
}

// --- Settings ---

#[tokio::test]
async fn test_teacher_cannot_touch_system_settings() {
    let (system, mocks, notifier) = start(Role::Teacher);
    let screen = system.settings_screen();

    let err = screen
        .save_system(SystemSettingsUpdate {
            maintenance_mode: Some(true),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        SettingsError::Forbidden {
            section: "System settings",
            role: Role::Teacher
        }
    );
    assert_eq!(mocks.system.calls(), 0);
    assert_eq!(notifier.last().unwrap().title, "Cannot save settings");
}

#[tokio::test]
async fn test_admin_mount_loads_settings_and_logs() {
    let (system, mocks, notifier) = start(Role::Admin);
    let mut screen = system.settings_screen();

    mocks.system.expect_get().return_ok(SystemSettings {
        site_name: "EduDocs".into(),
        max_upload_size_mb: 50,
        allowed_file_types: vec!["pdf".into(), "docx".into()],
        maintenance_mode: false,
        default_language: "en".into(),
    });
    mocks.security.expect_get().return_ok(SecuritySettings {
        session_timeout_minutes: 60,
        password_min_length: 8,
        require_two_factor: false,
        max_login_attempts: 5,
    });
    let at = |h| Utc.with_ymd_and_hms(2024, 3, 1, h, 0, 0).unwrap();
    mocks.logs.expect_list().return_ok(vec![
        ActivityLog {
            id: edudocs::model::ActivityLogId("l1".into()),
            user_name: "admin".into(),
            action: "login".into(),
            target: "session".into(),
            details: None,
            ip_address: Some("10.0.0.1".into()),
            created_at: at(8),
        },
        ActivityLog {
            id: edudocs::model::ActivityLogId("l2".into()),
            user_name: "rivera".into(),
            action: "upload".into(),
            target: "Fractions".into(),
            details: Some("fractions.pdf".into()),
            ip_address: None,
            created_at: at(9),
        },
    ]);

    screen.mount().await.unwrap();
    assert_eq!(screen.system().unwrap().site_name, "EduDocs");
    assert_eq!(screen.security().unwrap().password_min_length, 8);
    assert_eq!(screen.notifications(), None);
    assert!(!screen.is_loading());

    // Newest first.
    let logs = screen.activity_logs();
    assert_eq!(logs[0].action, "upload");
    screen.filter_log_action(Some("login".into()));
    assert_eq!(screen.activity_logs().len(), 1);

    assert!(notifier.notifications().is_empty());
    assert_eq!(mocks.notifications.calls(), 0);
}

#[tokio::test]
async fn test_security_settings_are_validated_before_saving() {
    let (system, mocks, notifier) = start(Role::Admin);
    let screen = system.settings_screen();

    let err = screen
        .save_security(SecuritySettingsUpdate {
            session_timeout_minutes: Some(1),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, SettingsError::Invalid(_)));
    assert_eq!(mocks.security.calls(), 0);
    assert_eq!(notifier.last().unwrap().title, "Invalid security settings");

    mocks.security.expect_update().return_ok(SecuritySettings {
        session_timeout_minutes: 30,
        password_min_length: 8,
        require_two_factor: true,
        max_login_attempts: 5,
    });
    let saved = screen
        .save_security(SecuritySettingsUpdate {
            session_timeout_minutes: Some(30),
            require_two_factor: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(saved.require_two_factor);
    assert_eq!(notifier.last().unwrap().title, "Security settings saved");
}

#[tokio::test]
async fn test_declined_save_keeps_old_value() {
    let (system, mocks, _) = start(Role::Teacher);
    let screen = system.settings_screen();

    mocks.notifications.expect_get().return_ok(NotificationSettings {
        email_notifications: true,
        new_document_alerts: true,
        weekly_digest: false,
        flagged_content_alerts: false,
    });
    screen.mount().await.unwrap();

    mocks.notifications.expect_update().return_declined("Mail server not configured");
    let err = screen
        .save_notifications(Default::default())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        SettingsError::Store(StoreError::Declined("Mail server not configured".into()))
    );
    assert!(screen.notifications().unwrap().email_notifications);
    assert_eq!(screen.error().as_deref(), Some("Mail server not configured"));
}

// --- Dashboard ---

#[tokio::test]
async fn test_dashboard_variant_follows_role() {
    let (system, mocks, _) = start(Role::Teacher);
    let screen = system.dashboard_screen();

    mocks.teacher.expect_get().return_ok(TeacherStats {
        my_documents: 12,
        my_downloads: 340,
        draft_documents: 2,
        published_documents: 10,
    });
    screen.mount().await.unwrap();

    match screen.stats() {
        Some(DashboardStats::Teacher(stats)) => assert_eq!(stats.my_documents, 12),
        other => panic!("expected teacher stats, got {other:?}"),
    }
    assert_eq!(mocks.admin.calls(), 0);
}

#[tokio::test]
async fn test_students_have_no_dashboard() {
    let (system, mocks, _) = start(Role::Student);
    let screen = system.dashboard_screen();

    let err = screen.mount().await.unwrap_err();
    assert_eq!(err, DashboardError::Unavailable(Role::Student));
    assert_eq!(screen.stats(), None);
    assert_eq!(mocks.admin.calls() + mocks.teacher.calls(), 0);
}
