// End-to-end flow through the service layer: registration, login, role
// checks, patient lifecycle, ledger, and audit trail against one database.

use std::sync::Arc;

use carevault_backend::errors::{AuthError, PatientError, ServiceError};
use carevault_backend::services::auth_service::Registration;
use carevault_backend::services::medical_record_service::NewMedicalRecord;
use carevault_backend::services::patient_service::PatientUpdate;
use carevault_backend::services::{
    AccessControl, AuditTrail, AuthService, MedicalRecordService, Notifier, PatientService,
    TokenService,
};
use carevault_backend::stores::{AuditStore, MedicalRecordStore, PatientStore, UserStore};
use carevault_backend::types::internal::role::Role;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

struct TestApp {
    auth_service: AuthService,
    access_control: AccessControl,
    patient_service: PatientService,
    medical_record_service: MedicalRecordService,
    audit_trail: Arc<AuditTrail>,
}

async fn setup() -> TestApp {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let user_store = Arc::new(UserStore::new(db.clone()));
    let patient_store = Arc::new(PatientStore::new(db.clone()));
    let record_store = Arc::new(MedicalRecordStore::new(db.clone()));
    let audit_trail = Arc::new(AuditTrail::new(Arc::new(AuditStore::new(db.clone()))));
    let token_service = Arc::new(TokenService::new(
        "test-secret-key-minimum-32-characters-long".to_string(),
        24,
    ));
    let (notifier, _rx) = Notifier::channel(64);

    TestApp {
        auth_service: AuthService::new(user_store.clone(), token_service.clone(), 6),
        access_control: AccessControl::new(user_store, token_service),
        patient_service: PatientService::new(
            patient_store.clone(),
            audit_trail.clone(),
            notifier.clone(),
        ),
        medical_record_service: MedicalRecordService::new(
            record_store,
            patient_store,
            audit_trail.clone(),
            notifier,
        ),
        audit_trail,
    }
}

async fn register_and_login(app: &TestApp, email: &str, username: &str, role: &str) -> String {
    app.auth_service
        .register(Registration {
            full_name: format!("{} {}", role, username),
            email: email.to_string(),
            username: username.to_string(),
            password: "secret1".to_string(),
            role: role.to_string(),
            phone: None,
        })
        .await
        .expect("Failed to register");

    let (token, _user) = app
        .auth_service
        .authenticate(email, "secret1")
        .await
        .expect("Failed to authenticate");

    token
}

#[tokio::test]
async fn test_full_patient_lifecycle_with_role_gating_and_audit() {
    let app = setup().await;

    let doctor_token = register_and_login(&app, "doc@x.com", "doc", "doctor").await;
    let admin_token = register_and_login(&app, "admin@x.com", "admin", "admin").await;
    let staff_token = register_and_login(&app, "staff@x.com", "staff", "staff").await;

    // Staff may not create patients
    let staff = app
        .access_control
        .authorize(&staff_token, &[Role::Admin, Role::Doctor, Role::Nurse])
        .await;
    assert!(matches!(
        staff,
        Err(ServiceError::Auth(AuthError::Forbidden { .. }))
    ));

    // Doctor creates a patient
    let doctor = app
        .access_control
        .authorize(&doctor_token, &[Role::Admin, Role::Doctor, Role::Nurse])
        .await
        .expect("Doctor should be authorized");
    let patient = app
        .patient_service
        .create("Jo Lee", 34, "0171234567", &doctor.email)
        .await
        .expect("Failed to create patient");

    // One CREATE audit entry with the field snapshot
    let entries = app
        .audit_trail
        .list_for_entity("patient", patient.id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "CREATE");
    assert_eq!(entries[0].user_email, "doc@x.com");
    let changes: serde_json::Value =
        serde_json::from_str(entries[0].changes.as_deref().unwrap()).unwrap();
    assert!(changes.get("name").is_some());
    assert!(changes.get("age").is_some());
    assert!(changes.get("contact").is_some());

    // Doctor appends a medical record; staff can still read the ledger
    app.medical_record_service
        .create(
            patient.id,
            NewMedicalRecord {
                diagnosis: "Flu".to_string(),
                prescription: Some("Rest".to_string()),
                notes: None,
            },
            &doctor.email,
        )
        .await
        .expect("Failed to create record");
    app.access_control
        .authorize(&staff_token, &Role::ALL)
        .await
        .expect("Any authenticated user may list records");
    let records = app
        .medical_record_service
        .list_for_patient(patient.id)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);

    // Update through the registry, then read back
    app.patient_service
        .update(
            patient.id,
            PatientUpdate {
                age: Some(35),
                ..Default::default()
            },
            &doctor.email,
        )
        .await
        .unwrap();
    assert_eq!(app.patient_service.get(patient.id).await.unwrap().age, 35);

    // Soft delete requires admin; afterwards the patient leaves the default
    // view but stays in the include_deleted view
    let admin = app
        .access_control
        .authorize(&admin_token, &[Role::Admin])
        .await
        .expect("Admin should be authorized");
    app.patient_service
        .soft_delete(patient.id, &admin.email)
        .await
        .unwrap();

    let (visible, _meta) = app
        .patient_service
        .list(None, None, None, false)
        .await
        .unwrap();
    assert!(visible.is_empty());
    let (all, _meta) = app.patient_service.list(None, None, None, true).await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].is_deleted);

    // Restore brings it back; the trail now reads RESTORE > DELETE > UPDATE > CREATE
    app.patient_service
        .restore(patient.id, &admin.email)
        .await
        .unwrap();
    assert!(!app.patient_service.get(patient.id).await.unwrap().is_deleted);

    let entries = app
        .audit_trail
        .list_for_entity("patient", patient.id)
        .await
        .unwrap();
    let actions: Vec<_> = entries.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, vec!["RESTORE", "DELETE", "UPDATE", "CREATE"]);
}

#[tokio::test]
async fn test_login_scenario_wrong_password_then_inactive() {
    let app = setup().await;

    let user = app
        .auth_service
        .register(Registration {
            full_name: "A Doctor".to_string(),
            email: "a@x.com".to_string(),
            username: "a".to_string(),
            password: "secret1".to_string(),
            role: "doctor".to_string(),
            phone: None,
        })
        .await
        .unwrap();
    assert_eq!(user.role, "doctor");

    let wrong = app.auth_service.authenticate("a@x.com", "wrongpass").await;
    assert!(matches!(
        wrong,
        Err(ServiceError::Auth(AuthError::InvalidCredentials))
    ));
}

#[tokio::test]
async fn test_hard_delete_cascades_to_records() {
    let app = setup().await;

    let doctor_token = register_and_login(&app, "doc@x.com", "doc", "doctor").await;
    let doctor = app
        .access_control
        .authorize(&doctor_token, &Role::ALL)
        .await
        .unwrap();

    let patient = app
        .patient_service
        .create("Jo Lee", 34, "0171234567", &doctor.email)
        .await
        .unwrap();
    app.medical_record_service
        .create(
            patient.id,
            NewMedicalRecord {
                diagnosis: "Flu".to_string(),
                prescription: None,
                notes: None,
            },
            &doctor.email,
        )
        .await
        .unwrap();

    app.patient_service
        .hard_delete(patient.id, "admin@x.com")
        .await
        .unwrap();

    let listing = app.medical_record_service.list_for_patient(patient.id).await;
    assert!(matches!(
        listing,
        Err(ServiceError::Patient(PatientError::NotFound(_)))
    ));
}
