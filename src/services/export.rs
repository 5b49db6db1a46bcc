// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CSV export of stored predictions.

use crate::models::PredictionRecord;

/// Download file name for the export.
pub const EXPORT_FILE_NAME: &str = "hospital_predictions_export.csv";

const HEADER: [&str; 7] = [
    "PatientId",
    "Age",
    "Gender",
    "Prediction",
    "Hypertension",
    "Diabetes",
    "Timestamp",
];

/// Render predictions as CSV, one row per record in the given order.
/// Every line, the header included, ends with `\n`.
///
/// Fields containing a comma, quote or line break are quoted; everything
/// else is written verbatim. Timestamps are rendered as `YYYY-MM-DD`, or
/// `N/A` when the record has none.
pub fn predictions_to_csv(records: &[PredictionRecord]) -> String {
    let mut out = HEADER.join(",");
    out.push('\n');

    let rows: Vec<String> = records
        .iter()
        .map(|r| {
            let timestamp = r
                .timestamp
                .map(|ts| ts.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "N/A".to_string());

            [
                r.patient_id.as_str(),
                r.age.as_str(),
                r.gender.as_str(),
                r.prediction.as_str(),
                r.hypertension.as_str(),
                r.diabetes.as_str(),
                timestamp.as_str(),
            ]
            .iter()
            .map(|field| escape_field(field))
            .collect::<Vec<_>>()
            .join(",")
        })
        .collect();

    for row in rows {
        out.push_str(&row);
        out.push('\n');
    }
    out
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scoring::Label;
    use chrono::{TimeZone, Utc};

    fn record(patient_id: &str, timestamp: Option<chrono::DateTime<Utc>>) -> PredictionRecord {
        PredictionRecord {
            id: None,
            fid: "F".to_string(),
            patient_id: patient_id.to_string(),
            icu_appointment_id: String::new(),
            gender: "Female".to_string(),
            scheduled_day: String::new(),
            appointment_day: String::new(),
            age: "64".to_string(),
            scheduled_doctor: String::new(),
            scholarship: String::new(),
            hypertension: "Yes".to_string(),
            diabetes: "No".to_string(),
            alcoholism: String::new(),
            handicap: String::new(),
            sms_received: String::new(),
            patient_diagnosis: String::new(),
            prediction: Label::Bad,
            confidence: Some(61),
            models: None,
            timestamp,
            user_id: None,
        }
    }

    #[test]
    fn test_header_only_when_empty() {
        assert_eq!(
            predictions_to_csv(&[]),
            "PatientId,Age,Gender,Prediction,Hypertension,Diabetes,Timestamp\n"
        );
    }

    #[test]
    fn test_rows_in_order() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 17, 23, 10, 0).unwrap();
        let csv = predictions_to_csv(&[record("P-1", Some(ts)), record("P-2", None)]);

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "P-1,64,Female,Bad,Yes,No,2024-05-17");
        assert_eq!(lines[2], "P-2,64,Female,Bad,Yes,No,N/A");
        assert!(csv.ends_with("N/A\n"));
        assert_eq!(csv.matches('\n').count(), 3);
    }

    #[test]
    fn test_embedded_comma_is_quoted() {
        let csv = predictions_to_csv(&[record("Doe, \"J\"", None)]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "\"Doe, \"\"J\"\"\",64,Female,Bad,Yes,No,N/A");
    }
}
