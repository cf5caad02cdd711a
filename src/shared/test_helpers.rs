#[cfg(test)]
use crate::core::error::{AppError, Result};
#[cfg(test)]
use crate::features::students::models::StudentRecord;
#[cfg(test)]
use crate::modules::storage::ObjectStorage;

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Arc, Mutex};

/// Object storage kept in a map, for tests that must not touch disk or network
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

#[cfg(test)]
impl MemoryStorage {
    /// Stored keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<()> {
        crate::modules::storage::validate_key(key)?;
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), data);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("File '{}' not found", key)))
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.objects.lock().unwrap().contains_key(key))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("http://localhost:3000/media/{}", key)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
pub fn memory_storage() -> Arc<dyn ObjectStorage> {
    Arc::new(MemoryStorage::default())
}

/// Student "Student <id>" of issuer 1 ("Acme U"), issued 2024-05-01 12:00 UTC
#[cfg(test)]
pub fn student_record(id: i64) -> StudentRecord {
    use chrono::{TimeZone, Utc};

    StudentRecord {
        id,
        student_name: format!("Student {}", id),
        student_id: 1000 + id,
        programm: "Computer Science".to_string(),
        degree_obtained: "Bachelor of Science".to_string(),
        issuer_id: 1,
        template_id: None,
        issue_date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        qr_code_link: None,
        issuer_name: "Acme U".to_string(),
        issuer_uuid: uuid::Uuid::nil(),
    }
}
