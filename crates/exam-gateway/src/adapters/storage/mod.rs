//! Storage Adapters
//!
//! Implementations of the `RegistrationStore` port.

mod memory;
#[cfg(feature = "rocksdb")]
mod rocks;

pub use memory::InMemoryRegistrationStore;
#[cfg(feature = "rocksdb")]
pub use rocks::{RocksDbConfig, RocksDbRegistrationStore};

#[cfg(test)]
pub(crate) fn test_record(citizen_id: &str) -> crate::domain::Registration {
    use crate::domain::{Registration, RegistrationId};
    use chrono::{NaiveDate, TimeZone, Utc};

    Registration {
        id: RegistrationId::new(),
        citizen_id: citizen_id.to_string(),
        title: "นาย".to_string(),
        first_name: "Anan".to_string(),
        last_name: "Prasert".to_string(),
        birth_date: NaiveDate::from_ymd_opt(2006, 1, 15).unwrap_or_default(),
        education_level: "M.6".to_string(),
        school: "Suankularb".to_string(),
        address: "12 Tri Phet Rd, Bangkok".to_string(),
        phone: "0812345678".to_string(),
        email: "anan@example.com".to_string(),
        exam_center: "Bangkok".to_string(),
        subjects: vec!["คณิตศาสตร์".to_string()],
        photo_path: "/uploads/photo-1700000000000.jpg".to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
    }
}
