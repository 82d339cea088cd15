use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Collection, Entity};

/// A destination that entities are replicated into.
///
/// `upsert` creates the entity when it is missing and otherwise merges the
/// mutable fields (title and description) into what is stored; calling it
/// twice with the same entity leaves the same state. `delete` succeeds when
/// the id is already gone.
#[async_trait]
pub trait Sink: Send + Sync {
    fn name(&self) -> &'static str;

    async fn upsert(&self, entity: &Entity) -> Result<()>;

    async fn delete(&self, collection: Collection, id: &str) -> Result<()>;
}
