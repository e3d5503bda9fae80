//! Registration record and its identifier.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Record identifier.
///
/// UUID v7, so identifiers sort by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationId(Uuid);

impl RegistrationId {
    /// Generate a new identifier (UUID v7)
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for RegistrationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for RegistrationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// One applicant's exam registration.
///
/// Created once on a successful submission; never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: RegistrationId,
    /// 13-digit identity number; unique across all records.
    pub citizen_id: String,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub education_level: String,
    pub school: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub exam_center: String,
    pub subjects: Vec<String>,
    /// URL of the stored photo.
    pub photo_path: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip_through_display() {
        let id = RegistrationId::new();
        let parsed: RegistrationId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert_eq!(id.to_string().len(), 32);
    }

    #[test]
    fn test_ids_are_time_ordered() {
        let a = RegistrationId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = RegistrationId::new();
        assert!(a < b);
    }

    #[test]
    fn test_record_uses_camel_case() {
        let record = Registration {
            id: RegistrationId::new(),
            citizen_id: "1234567890121".into(),
            title: "นาย".into(),
            first_name: "Somchai".into(),
            last_name: "Jaidee".into(),
            birth_date: NaiveDate::from_ymd_opt(2005, 4, 1).unwrap(),
            education_level: "M.6".into(),
            school: "Triam Udom".into(),
            address: "Bangkok".into(),
            phone: "0812345678".into(),
            email: "somchai@example.com".into(),
            exam_center: "Bangkok".into(),
            subjects: vec!["ฟิสิกส์".into()],
            photo_path: "/uploads/photo-1.jpg".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["citizenId"], "1234567890121");
        assert_eq!(json["birthDate"], "2005-04-01");
        assert!(json.get("createdAt").is_some());
        let back: Registration = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
