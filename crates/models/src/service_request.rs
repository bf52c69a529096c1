use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a service request.
///
/// Soft deletion is modelled as the terminal `Complete` state; no transition
/// is defined out of it (hard delete would be the extension point).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CurrentStatus {
    Created,
    InProgress,
    Complete,
}

/// A building service request as stored and served over the wire.
///
/// The camelCase field names are a stable boundary contract; `created_by` and
/// `created_date` are written once at creation and never overwritten, while
/// the `last_modified_*` pair stays empty until the first update.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub id: Uuid,
    pub building_code: String,
    pub description: String,
    pub current_status: CurrentStatus,
    pub created_by: String,
    pub created_date: DateTime<Utc>,
    pub last_modified_by: Option<String>,
    pub last_modified_date: Option<DateTime<Utc>>,
}

/// Caller input for create/update. Ids and actor names are optional; date
/// fields are never taken from the payload, the store stamps them itself.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequestPayload {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub building_code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub current_status: Option<CurrentStatus>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub last_modified_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_field_names_are_camel_case() {
        let rec = ServiceRequest {
            id: Uuid::new_v4(),
            building_code: "B1".into(),
            description: "broken elevator".into(),
            current_status: CurrentStatus::Created,
            created_by: "System admin".into(),
            created_date: Utc::now(),
            last_modified_by: None,
            last_modified_date: None,
        };
        let json = serde_json::to_value(&rec).expect("serialize");
        for key in [
            "id",
            "buildingCode",
            "description",
            "currentStatus",
            "createdBy",
            "createdDate",
            "lastModifiedBy",
            "lastModifiedDate",
        ] {
            assert!(json.get(key).is_some(), "missing wire field {key}");
        }
        assert_eq!(json["currentStatus"], "Created");
    }

    #[test]
    fn payload_tolerates_minimal_body() {
        let payload: ServiceRequestPayload =
            serde_json::from_str(r#"{"buildingCode":"B2","description":"leak"}"#)
                .expect("deserialize");
        assert_eq!(payload.building_code, "B2");
        assert!(payload.id.is_none());
        assert!(payload.created_by.is_none());
        assert!(payload.current_status.is_none());
    }
}
