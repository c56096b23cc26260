use crate::clients::{
    ActivityLogClient, CategoryClient, DashboardClient, DocumentClient, SettingsClient,
};
use crate::config::AppConfig;
use crate::http::{HttpApi, RestCollection, RestDocument};
use crate::model::{
    ActivityLog, AdminStats, Category, Document, NotificationSettings, Role, SecuritySettings,
    SystemSettings, TeacherStats,
};
use crate::screens::{CategoriesScreen, DashboardScreen, DocumentsScreen, SettingsScreen};
use resource_store::{
    ApiError, Notifier, ResourceActor, ResourceApi, SingletonActor, SingletonApi,
};
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::info;

/// One endpoint binding per store.
#[derive(Clone)]
pub struct Apis {
    pub categories: Arc<dyn ResourceApi<Category>>,
    pub documents: Arc<dyn ResourceApi<Document>>,
    pub activity_logs: Arc<dyn ResourceApi<ActivityLog>>,
    pub system_settings: Arc<dyn SingletonApi<SystemSettings>>,
    pub security_settings: Arc<dyn SingletonApi<SecuritySettings>>,
    pub notification_settings: Arc<dyn SingletonApi<NotificationSettings>>,
    pub admin_stats: Arc<dyn SingletonApi<AdminStats>>,
    pub teacher_stats: Arc<dyn SingletonApi<TeacherStats>>,
}

impl Apis {
    /// REST bindings sharing one HTTP client.
    pub fn rest(http: Arc<HttpApi>) -> Self {
        Self {
            categories: Arc::new(RestCollection::<Category>::new(http.clone())),
            documents: Arc::new(RestCollection::<Document>::new(http.clone())),
            activity_logs: Arc::new(RestCollection::<ActivityLog>::new(http.clone())),
            system_settings: Arc::new(RestDocument::<SystemSettings>::new(http.clone())),
            security_settings: Arc::new(RestDocument::<SecuritySettings>::new(http.clone())),
            notification_settings: Arc::new(RestDocument::<NotificationSettings>::new(http.clone())),
            admin_stats: Arc::new(RestDocument::<AdminStats>::new(http.clone())),
            teacher_stats: Arc::new(RestDocument::<TeacherStats>::new(http)),
        }
    }
}

/// The running set of stores for one signed-in user.
pub struct AppSystem {
    pub role: Role,
    pub category_client: CategoryClient,
    pub document_client: DocumentClient,
    pub dashboard_client: DashboardClient,
    pub settings_client: SettingsClient,
    notifier: Arc<dyn Notifier>,
    handles: Vec<JoinHandle<()>>,
}

impl AppSystem {
    /// Starts every store against the REST API described by `config`.
    pub fn connect(config: &AppConfig, notifier: Arc<dyn Notifier>) -> Result<Self, ApiError> {
        let http = HttpApi::new(&config.api_url, config.api_token.clone(), config.timeout)?;
        info!(api_url = %config.api_url, role = %config.role, "Connecting");
        Ok(Self::with_apis(
            Apis::rest(Arc::new(http)),
            config.role,
            config.buffer_size,
            notifier,
        ))
    }

    /// Starts every store against the given bindings.
    pub fn with_apis(
        apis: Apis,
        role: Role,
        buffer_size: usize,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (category_actor, categories) = ResourceActor::<Category>::new(buffer_size);
        let (document_actor, documents) = ResourceActor::<Document>::new(buffer_size);
        let (log_actor, logs) = ResourceActor::<ActivityLog>::new(buffer_size);
        let (system_actor, system) = SingletonActor::<SystemSettings>::new(buffer_size);
        let (security_actor, security) = SingletonActor::<SecuritySettings>::new(buffer_size);
        let (notification_actor, notifications) =
            SingletonActor::<NotificationSettings>::new(buffer_size);
        let (admin_actor, admin_stats) = SingletonActor::<AdminStats>::new(buffer_size);
        let (teacher_actor, teacher_stats) = SingletonActor::<TeacherStats>::new(buffer_size);

        let handles = vec![
            tokio::spawn(category_actor.run(apis.categories, notifier.clone())),
            tokio::spawn(document_actor.run(apis.documents, notifier.clone())),
            tokio::spawn(log_actor.run(apis.activity_logs, notifier.clone())),
            tokio::spawn(system_actor.run(apis.system_settings, notifier.clone())),
            tokio::spawn(security_actor.run(apis.security_settings, notifier.clone())),
            tokio::spawn(notification_actor.run(apis.notification_settings, notifier.clone())),
            tokio::spawn(admin_actor.run(apis.admin_stats, notifier.clone())),
            tokio::spawn(teacher_actor.run(apis.teacher_stats, notifier.clone())),
        ];
        info!(%role, stores = handles.len(), "System started");

        Self {
            role,
            category_client: CategoryClient::new(categories),
            document_client: DocumentClient::new(documents),
            dashboard_client: DashboardClient::new(role, admin_stats, teacher_stats),
            settings_client: SettingsClient::new(
                role,
                system,
                security,
                notifications,
                ActivityLogClient::new(logs),
            ),
            notifier,
            handles,
        }
    }

    pub fn categories_screen(&self) -> CategoriesScreen {
        CategoriesScreen::new(self.category_client.clone(), self.notifier.clone())
    }

    pub fn documents_screen(&self) -> DocumentsScreen {
        DocumentsScreen::new(
            self.document_client.clone(),
            self.category_client.clone(),
            self.notifier.clone(),
        )
    }

    pub fn dashboard_screen(&self) -> DashboardScreen {
        DashboardScreen::new(self.dashboard_client.clone())
    }

    pub fn settings_screen(&self) -> SettingsScreen {
        SettingsScreen::new(self.settings_client.clone(), self.notifier.clone())
    }

    /// Drops the clients and waits for every store to stop.
    pub async fn shutdown(self) -> Result<(), JoinError> {
        info!("Shutting down");
        let Self {
            category_client,
            document_client,
            dashboard_client,
            settings_client,
            handles,
            ..
        } = self;
        drop(category_client);
        drop(document_client);
        drop(dashboard_client);
        drop(settings_client);

        for handle in handles {
            handle.await?;
        }
        info!("All stores stopped");
        Ok(())
    }
}
