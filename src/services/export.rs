use crate::errors::ServiceError;
use crate::types::db::{medical_record, patient};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, ServiceError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ServiceError::parse("csv", e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ServiceError::parse("csv", e.to_string()))
}

/// Serialize patients to CSV
///
/// The header and field order are fixed; identical input ordering always
/// produces identical output.
pub fn patients_to_csv(patients: &[patient::Model]) -> Result<String, ServiceError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["ID", "Name", "Age", "Contact", "Created At", "Created By"])
        .map_err(|e| ServiceError::parse("csv", e.to_string()))?;

    for patient in patients {
        writer
            .write_record(&[
                patient.id.to_string(),
                patient.name.clone(),
                patient.age.to_string(),
                patient.contact.clone(),
                patient.created_at.format(TIMESTAMP_FORMAT).to_string(),
                patient.created_by.clone(),
            ])
            .map_err(|e| ServiceError::parse("csv", e.to_string()))?;
    }

    finish(writer)
}

/// Serialize one patient's medical records to CSV
///
/// Fixed header and field order, like `patients_to_csv`. A missing
/// prescription is rendered as "N/A".
pub fn medical_records_to_csv(
    patient: &patient::Model,
    records: &[medical_record::Model],
) -> Result<String, ServiceError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record([
            "ID",
            "Patient ID",
            "Patient Name",
            "Diagnosis",
            "Prescription",
            "Visit Date",
            "Doctor",
        ])
        .map_err(|e| ServiceError::parse("csv", e.to_string()))?;

    for record in records {
        writer
            .write_record(&[
                record.id.to_string(),
                record.patient_id.to_string(),
                patient.name.clone(),
                record.diagnosis.clone(),
                record.prescription.clone().unwrap_or_else(|| "N/A".to_string()),
                record.visit_date.format(TIMESTAMP_FORMAT).to_string(),
                record.created_by.clone(),
            ])
            .map_err(|e| ServiceError::parse("csv", e.to_string()))?;
    }

    finish(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_patient(id: i32, name: &str) -> patient::Model {
        let created = Utc.with_ymd_and_hms(2026, 1, 12, 9, 30, 0).unwrap();
        patient::Model {
            id,
            name: name.to_string(),
            age: 34,
            contact: "0171234567".to_string(),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
            created_at: created,
            created_by: "doc@x.com".to_string(),
            updated_at: created,
            updated_by: "doc@x.com".to_string(),
        }
    }

    fn sample_record(id: i32, prescription: Option<&str>) -> medical_record::Model {
        let visited = Utc.with_ymd_and_hms(2026, 1, 13, 14, 0, 0).unwrap();
        medical_record::Model {
            id,
            patient_id: 1,
            diagnosis: "Flu".to_string(),
            prescription: prescription.map(str::to_string),
            notes: None,
            visit_date: visited,
            created_by: "doc@x.com".to_string(),
            created_at: visited,
        }
    }

    #[test]
    fn test_patients_csv_has_fixed_header_and_rows() {
        let csv = patients_to_csv(&[sample_patient(1, "Jo Lee")]).unwrap();

        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("ID,Name,Age,Contact,Created At,Created By"));
        assert_eq!(
            lines.next(),
            Some("1,Jo Lee,34,0171234567,2026-01-12 09:30:00,doc@x.com")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_patients_csv_is_deterministic() {
        let patients = vec![sample_patient(1, "Jo Lee"), sample_patient(2, "Bob Jones")];

        let first = patients_to_csv(&patients).unwrap();
        let second = patients_to_csv(&patients).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_patients_csv_quotes_fields_containing_commas() {
        let csv = patients_to_csv(&[sample_patient(1, "Lee, Jo")]).unwrap();

        assert!(csv.lines().nth(1).unwrap().starts_with("1,\"Lee, Jo\","));
    }

    #[test]
    fn test_records_csv_renders_missing_prescription_as_na() {
        let patient = sample_patient(1, "Jo Lee");
        let csv = medical_records_to_csv(
            &patient,
            &[sample_record(10, Some("Rest")), sample_record(11, None)],
        )
        .unwrap();

        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("ID,Patient ID,Patient Name,Diagnosis,Prescription,Visit Date,Doctor")
        );
        assert_eq!(
            lines.next(),
            Some("10,1,Jo Lee,Flu,Rest,2026-01-13 14:00:00,doc@x.com")
        );
        assert_eq!(
            lines.next(),
            Some("11,1,Jo Lee,Flu,N/A,2026-01-13 14:00:00,doc@x.com")
        );
    }

    #[test]
    fn test_empty_input_yields_header_only() {
        let csv = patients_to_csv(&[]).unwrap();

        assert_eq!(csv.trim_end(), "ID,Name,Age,Contact,Created At,Created By");
    }
}
