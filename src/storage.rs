use crate::{error::StoreError, models::SavedImage};
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// ImageStore
///
/// Abstract contract for the `images` collection: binary blobs addressed by
/// an opaque string identifier, with the declared content type carried
/// alongside the payload. Images are create-and-fetch only; there is no
/// update or delete surface.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Ensures the `images` collection exists. Startup convenience for the
    /// local environment.
    async fn ensure_collection(&self) -> Result<(), StoreError>;

    /// Stores a blob, keyed on `image.id`. Persistence is an upsert: a
    /// colliding identifier silently overwrites the prior blob.
    async fn put_image(&self, image: &SavedImage) -> Result<(), StoreError>;

    /// Looks up a blob by identifier. `None` for unknown identifiers.
    async fn get_image(&self, id: &str) -> Result<Option<SavedImage>, StoreError>;
}

/// ImageState
///
/// The concrete type used to share the image store across the application state.
pub type ImageState = Arc<dyn ImageStore>;

/// PostgresImageStore
///
/// The deployed implementation: one identifier-keyed table with the payload
/// in a BYTEA column. Portfolio images are small and few, so they live next
/// to the projects rather than behind a separate object-storage tier.
pub struct PostgresImageStore {
    pool: PgPool,
}

impl PostgresImageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageStore for PostgresImageStore {
    async fn ensure_collection(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS images (
                id TEXT PRIMARY KEY,
                content_type TEXT,
                data BYTEA NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn put_image(&self, image: &SavedImage) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO images (id, content_type, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET
                content_type = EXCLUDED.content_type,
                data = EXCLUDED.data
            "#,
        )
        .bind(&image.id)
        .bind(&image.content_type)
        .bind(&image.data)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_image(&self, id: &str) -> Result<Option<SavedImage>, StoreError> {
        let image = sqlx::query_as::<_, SavedImage>(
            "SELECT id, content_type, data FROM images WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(image)
    }
}

/// InMemoryImageStore
///
/// Map-backed double for tests. `new_failing()` simulates a store outage.
#[derive(Default)]
pub struct InMemoryImageStore {
    blobs: Mutex<HashMap<String, SavedImage>>,
    should_fail: bool,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            blobs: Mutex::new(HashMap::new()),
            should_fail: true,
        }
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.should_fail {
            return Err(StoreError::Unavailable("simulated image store outage"));
        }
        Ok(())
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn ensure_collection(&self) -> Result<(), StoreError> {
        self.check_available()
    }

    async fn put_image(&self, image: &SavedImage) -> Result<(), StoreError> {
        self.check_available()?;
        self.blobs
            .lock()
            .await
            .insert(image.id.clone(), image.clone());
        Ok(())
    }

    async fn get_image(&self, id: &str) -> Result<Option<SavedImage>, StoreError> {
        self.check_available()?;
        Ok(self.blobs.lock().await.get(id).cloned())
    }
}
