use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::models::department::{filter_by_id, BushoCommand, Department, Outcome};

/// Result of one read-modify-write cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub records: Vec<Department>,
    pub outcome: Outcome,
}

/// Flat JSON file holding every department.
///
/// Every load and every read-modify-write holds `lock`, so two mutations
/// never interleave between reading the file and writing it back.
#[derive(Debug)]
pub struct BushoStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl BushoStore {
    /// The file is not created here; a missing file surfaces as a storage
    /// error on first use.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if !path.exists() {
            warn!("store file {} does not exist yet", path.display());
        }
        BushoStore {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn select(&self, id: Option<&str>) -> Result<Vec<Department>, AppError> {
        let _guard = self.lock.lock().await;
        let records = self.load().await?;
        Ok(filter_by_id(records, id))
    }

    pub async fn apply(&self, command: &BushoCommand) -> Result<Applied, AppError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        let outcome = command.apply(&mut records);

        match outcome {
            Outcome::Applied => {
                self.save(&records).await?;
                info!("{} busho {}: {} record(s) stored", command.verb(), command.id(), records.len());
            }
            Outcome::AlreadyExists => warn!("add busho {}: id already exists, nothing stored", command.id()),
            Outcome::NotFound => warn!("{} busho {}: no such id, nothing stored", command.verb(), command.id()),
        }

        Ok(Applied { records, outcome })
    }

    async fn load(&self) -> Result<Vec<Department>, AppError> {
        let raw = tokio::fs::read(&self.path).await.map_err(|err| {
            error!("failed to read {}: {}", self.path.display(), err);
            if err.kind() == ErrorKind::NotFound {
                AppError::StorageError(format!("store file {} not found", self.path.display()))
            } else {
                AppError::from(err)
            }
        })?;
        serde_json::from_slice(&raw).map_err(|err| {
            error!("failed to parse {}: {}", self.path.display(), err);
            AppError::StorageError(format!("store file {} is malformed: {}", self.path.display(), err))
        })
    }

    /// Writes a sibling file first and renames it over the store file.
    async fn save(&self, records: &[Department]) -> Result<(), AppError> {
        let body = serde_json::to_vec(records)?;
        let tmp = tmp_path(&self.path);

        if let Err(err) = tokio::fs::write(&tmp, &body).await {
            error!("failed to write {}: {}", tmp.display(), err);
            remove_leftover(&tmp).await;
            return Err(AppError::from(err));
        }
        if let Err(err) = tokio::fs::rename(&tmp, &self.path).await {
            error!("failed to replace {}: {}", self.path.display(), err);
            remove_leftover(&tmp).await;
            return Err(AppError::from(err));
        }
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf().into_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

async fn remove_leftover(tmp: &Path) {
    match tokio::fs::remove_file(tmp).await {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => warn!("failed to remove {}: {}", tmp.display(), err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn store_with(contents: &str) -> (TempDir, BushoStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("busho.json");
        std::fs::write(&path, contents).unwrap();
        (dir, BushoStore::open(path))
    }

    #[actix_web::test]
    async fn add_then_select_by_id() {
        let (_dir, store) = store_with("[]");
        let add = BushoCommand::Add { id: "10".into(), name: "Sales".into() };
        let applied = store.apply(&add).await.unwrap();
        assert_eq!(applied.outcome, Outcome::Applied);
        assert_eq!(
            store.select(Some("10")).await.unwrap(),
            vec![Department::new("10", "Sales")]
        );
    }

    #[actix_web::test]
    async fn file_is_written_as_compact_array() {
        let (_dir, store) = store_with("[]");
        store
            .apply(&BushoCommand::Add { id: "10".into(), name: "Sales".into() })
            .await
            .unwrap();
        let written = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(written, r#"[{"id":"10","name":"Sales"}]"#);
    }

    #[actix_web::test]
    async fn duplicate_add_does_not_touch_file() {
        let original = r#"[{"id":"10","name":"Sales"}]"#;
        let (_dir, store) = store_with(original);
        let applied = store
            .apply(&BushoCommand::Add { id: "10".into(), name: "Other".into() })
            .await
            .unwrap();
        assert_eq!(applied.outcome, Outcome::AlreadyExists);
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), original);
    }

    #[actix_web::test]
    async fn missing_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = BushoStore::open(dir.path().join("absent.json"));
        assert!(matches!(store.select(None).await, Err(AppError::StorageError(_))));
    }

    #[actix_web::test]
    async fn malformed_file_is_storage_error() {
        let (_dir, store) = store_with("{not json");
        let result = store.apply(&BushoCommand::Delete { id: "10".into() }).await;
        assert!(matches!(result, Err(AppError::StorageError(_))));
    }

    #[actix_web::test]
    async fn failed_replace_leaves_no_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        // a directory in place of the store file makes the rename fail
        let path = dir.path().join("busho.json");
        std::fs::create_dir(&path).unwrap();
        let store = BushoStore::open(path.clone());

        let result = store.save(&[Department::new("10", "Sales")]).await;
        assert!(matches!(result, Err(AppError::StorageError(_))));
        assert!(!tmp_path(&path).exists());
        assert!(path.is_dir());
    }

    #[actix_web::test]
    async fn concurrent_adds_are_not_lost() {
        let (_dir, store) = store_with("[]");
        let store = Arc::new(store);
        let mut handles = Vec::new();
        for n in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let cmd = BushoCommand::Add { id: n.to_string(), name: format!("dept {}", n) };
                store.apply(&cmd).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.select(None).await.unwrap().len(), 16);
    }
}
