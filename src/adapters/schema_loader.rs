//! Schema loader with a per-identifier cache
//!
//! Each form identifier gets its own cell. Concurrent loads of the same
//! identifier share one fetch; a successful result is reused for the rest of
//! the session. Failures leave the cell empty so the next load retries.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};
use tracing::debug;

use crate::domain::{FormSchema, SchemaPort};
use crate::form::error::LoadError;

type SchemaCell = Arc<OnceCell<Arc<FormSchema>>>;

pub struct SchemaLoader {
    source: Arc<dyn SchemaPort>,
    cache: RwLock<HashMap<String, SchemaCell>>,
}

impl SchemaLoader {
    pub fn new(source: Arc<dyn SchemaPort>) -> Self {
        Self {
            source,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolves the schema for `form_id`.
    ///
    /// Returns `Ok(None)` without touching the network when no identifier is
    /// available yet.
    pub async fn load(&self, form_id: Option<&str>) -> Result<Option<Arc<FormSchema>>, LoadError> {
        let Some(form_id) = form_id else {
            return Ok(None);
        };

        let cell = self.cell(form_id).await;
        if let Some(schema) = cell.get() {
            debug!("Schema cache hit for form '{}'", form_id);
            return Ok(Some(schema.clone()));
        }

        let schema = cell
            .get_or_try_init(|| async {
                debug!("Fetching schema for form '{}'", form_id);
                let body = self.source.fetch_schema(form_id).await?;
                FormSchema::from_value(form_id, body).map(Arc::new)
            })
            .await?;

        Ok(Some(schema.clone()))
    }

    /// Drops the cached schema for one identifier.
    pub async fn invalidate(&self, form_id: &str) {
        self.cache.write().await.remove(form_id);
    }

    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }

    pub async fn is_cached(&self, form_id: &str) -> bool {
        self.cache
            .read()
            .await
            .get(form_id)
            .map(|cell| cell.initialized())
            .unwrap_or(false)
    }

    async fn cell(&self, form_id: &str) -> SchemaCell {
        if let Some(cell) = self.cache.read().await.get(form_id) {
            return cell.clone();
        }
        let mut cache = self.cache.write().await;
        cache
            .entry(form_id.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }
}
