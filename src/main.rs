use std::sync::Arc;

use carevault_backend::api::{AuditApi, AuthApi, HealthApi, MedicalRecordApi, PatientApi};
use carevault_backend::config::Settings;
use carevault_backend::services::notifier::{self, LogSink};
use carevault_backend::services::{
    AccessControl, AuditTrail, AuthService, MedicalRecordService, Notifier, PatientService,
    TokenService,
};
use carevault_backend::stores::{AuditStore, MedicalRecordStore, PatientStore, UserStore};
use migration::{Migrator, MigratorTrait};
use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;
use sea_orm::{Database, DatabaseConnection};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let settings = Settings::from_env().expect("Failed to load configuration");

    // Connect to database and bring the schema up to date
    let db: DatabaseConnection = Database::connect(&settings.database_url)
        .await
        .expect("Failed to connect to database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    tracing::info!(database_url = %settings.database_url, "database ready");

    // Stores
    let user_store = Arc::new(UserStore::new(db.clone()));
    let patient_store = Arc::new(PatientStore::new(db.clone()));
    let record_store = Arc::new(MedicalRecordStore::new(db.clone()));
    let audit_store = Arc::new(AuditStore::new(db.clone()));

    // Services
    let token_service = Arc::new(TokenService::new(
        settings.jwt_secret.clone(),
        settings.jwt_expiration_hours,
    ));
    let auth_service = Arc::new(AuthService::new(
        user_store.clone(),
        token_service.clone(),
        settings.min_password_length,
    ));
    let access_control = Arc::new(AccessControl::new(user_store, token_service));
    let audit_trail = Arc::new(AuditTrail::new(audit_store));

    // Notification worker drains the queue off the request path
    let (notifier_handle, notification_rx) = Notifier::channel(settings.notification_queue_depth);
    tokio::spawn(notifier::run_worker(notification_rx, Arc::new(LogSink)));

    let patient_service = Arc::new(PatientService::new(
        patient_store.clone(),
        audit_trail.clone(),
        notifier_handle.clone(),
    ));
    let medical_record_service = Arc::new(MedicalRecordService::new(
        record_store,
        patient_store,
        audit_trail.clone(),
        notifier_handle,
    ));

    let api_service = OpenApiService::new(
        (
            HealthApi,
            AuthApi::new(auth_service),
            PatientApi::new(patient_service, access_control.clone()),
            MedicalRecordApi::new(medical_record_service, access_control.clone()),
            AuditApi::new(audit_trail, access_control),
        ),
        "carevault-backend",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!(
        "http://{}:{}",
        settings.server_host, settings.server_port
    ));
    let ui = api_service.swagger_ui();
    let app = Route::new().nest("/docs", ui).nest("/", api_service);

    let address = format!("{}:{}", settings.server_host, settings.server_port);
    tracing::info!(%address, "starting server");

    Server::new(TcpListener::bind(address)).run(app).await
}
