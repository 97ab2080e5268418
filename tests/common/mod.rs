#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use busho_master::db::BushoStore;
use busho_master::handlers::graphql::{build_schema, BushoSchema};
use busho_master::models::department::Department;
use tempfile::TempDir;

pub struct Fixture {
    pub dir: TempDir,
    pub path: PathBuf,
    pub store: Arc<BushoStore>,
}

impl Fixture {
    pub fn with_records(records: &[(&str, &str)]) -> Self {
        let records: Vec<Department> = records
            .iter()
            .map(|(id, name)| Department::new(*id, *name))
            .collect();
        Self::with_raw(&serde_json::to_string(&records).unwrap())
    }

    pub fn with_raw(contents: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("busho.json");
        std::fs::write(&path, contents).unwrap();
        let store = Arc::new(BushoStore::open(path.clone()));
        Fixture { dir, path, store }
    }

    pub fn without_file() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("busho.json");
        let store = Arc::new(BushoStore::open(path.clone()));
        Fixture { dir, path, store }
    }

    pub fn schema(&self, strict: bool) -> BushoSchema {
        build_schema(Arc::clone(&self.store), strict)
    }

    pub fn stored(&self) -> Vec<Department> {
        serde_json::from_str(&self.raw()).unwrap()
    }

    pub fn raw(&self) -> String {
        std::fs::read_to_string(&self.path).unwrap()
    }
}
