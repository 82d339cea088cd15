//! In-process document store with Elasticsearch-like responses, for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::DocumentApi;
use crate::error::{AppError, Result};
use crate::models::{Collection, IndexDocument};

#[derive(Default)]
pub struct MemoryIndex {
    docs: Mutex<HashMap<(Collection, String), Map<String, Value>>>,
    failing: Mutex<HashSet<String>>,
}

impl MemoryIndex {
    pub fn get(&self, collection: Collection, id: &str) -> Option<Value> {
        self.docs
            .lock()
            .unwrap()
            .get(&(collection, id.to_string()))
            .cloned()
            .map(Value::Object)
    }

    pub fn len(&self, collection: Collection) -> usize {
        self.docs
            .lock()
            .unwrap()
            .keys()
            .filter(|(c, _)| *c == collection)
            .count()
    }

    pub fn seed(&self, collection: Collection, id: &str, doc: Value) {
        let Value::Object(map) = doc else {
            panic!("seed expects a JSON object");
        };
        self.docs
            .lock()
            .unwrap()
            .insert((collection, id.to_string()), map);
    }

    /// Every operation on `id` answers with a 500 from now on.
    pub fn fail_on(&self, id: &str) {
        self.failing.lock().unwrap().insert(id.to_string());
    }

    pub fn recover(&self, id: &str) {
        self.failing.lock().unwrap().remove(id);
    }

    fn check(&self, id: &str) -> Result<()> {
        if self.failing.lock().unwrap().contains(id) {
            return Err(AppError::SearchIndex {
                status: 500,
                body: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

fn fields(doc: &IndexDocument) -> Map<String, Value> {
    match serde_json::to_value(doc) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn not_found(id: &str) -> AppError {
    AppError::SearchIndex {
        status: 404,
        body: format!("document_missing_exception: [{}]", id),
    }
}

#[async_trait]
impl DocumentApi for MemoryIndex {
    async fn update(&self, collection: Collection, id: &str, doc: &IndexDocument) -> Result<()> {
        self.check(id)?;
        let mut docs = self.docs.lock().unwrap();
        let existing = docs
            .get_mut(&(collection, id.to_string()))
            .ok_or_else(|| not_found(id))?;
        existing.extend(fields(doc));
        Ok(())
    }

    async fn create(&self, collection: Collection, id: &str, doc: &IndexDocument) -> Result<()> {
        self.check(id)?;
        let mut docs = self.docs.lock().unwrap();
        let key = (collection, id.to_string());
        if docs.contains_key(&key) {
            return Err(AppError::SearchIndex {
                status: 409,
                body: format!("version_conflict_engine_exception: [{}]", id),
            });
        }
        docs.insert(key, fields(doc));
        Ok(())
    }

    async fn remove(&self, collection: Collection, id: &str) -> Result<()> {
        self.check(id)?;
        self.docs
            .lock()
            .unwrap()
            .remove(&(collection, id.to_string()))
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }
}
