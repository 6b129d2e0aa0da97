use crate::{error::StoreError, models::Project};
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// ProjectRepository
///
/// Defines the abstract contract for all persistence operations on the
/// `projects` collection. Handlers interact with this trait only, so the
/// concrete store (Postgres in deployment, in-memory in tests) can be swapped
/// without touching the HTTP layer.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn ProjectRepository>`) shareable across axum's task boundaries.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Ensures the `projects` collection exists. Called once at startup in
    /// the local environment; no-op everywhere it already exists.
    async fn ensure_collection(&self) -> Result<(), StoreError>;

    /// Returns every project, in whatever order the store yields.
    /// Display ordering is owned by the service layer, not the store.
    async fn list_projects(&self) -> Result<Vec<Project>, StoreError>;

    /// Upsert keyed on `project.id`: insert when the identifier is new,
    /// otherwise replace the full record. There is no partial update.
    async fn save_project(&self, project: &Project) -> Result<(), StoreError>;

    /// Removes a project by identifier. Deleting an unknown identifier is a
    /// silent no-op, not an error.
    async fn delete_project(&self, id: &str) -> Result<(), StoreError>;
}

/// RepositoryState
///
/// The concrete type used to share the project store across the application state.
pub type RepositoryState = Arc<dyn ProjectRepository>;

/// PostgresRepository
///
/// The deployed implementation. The `projects` collection is a single
/// identifier-keyed table; `technologies` is stored as a text array so the
/// record round-trips without a join table.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PostgresRepository {
    async fn ensure_collection(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                image_id TEXT,
                brief TEXT NOT NULL,
                description TEXT NOT NULL,
                technologies TEXT[] NOT NULL,
                order_index INT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT id, title, image_id, brief, description, technologies, order_index \
             FROM projects",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(projects)
    }

    /// Full-record replacement on conflict. Every column is overwritten, so a
    /// save with an existing identifier behaves exactly like delete+insert.
    async fn save_project(&self, project: &Project) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO projects (id, title, image_id, brief, description, technologies, order_index)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                image_id = EXCLUDED.image_id,
                brief = EXCLUDED.brief,
                description = EXCLUDED.description,
                technologies = EXCLUDED.technologies,
                order_index = EXCLUDED.order_index
            "#,
        )
        .bind(&project.id)
        .bind(&project.title)
        .bind(&project.image_id)
        .bind(&project.brief)
        .bind(&project.description)
        .bind(&project.technologies)
        .bind(project.order_index)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_project(&self, id: &str) -> Result<(), StoreError> {
        // rows_affected is deliberately not inspected: unknown ids are absorbed.
        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// InMemoryRepository
///
/// Identifier-keyed map used by the integration tests, so the full router can
/// be exercised without a database. `new_failing()` yields a double whose
/// every operation errors, for exercising the 500 paths.
#[derive(Default)]
pub struct InMemoryRepository {
    records: Mutex<HashMap<String, Project>>,
    should_fail: bool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            should_fail: true,
        }
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.should_fail {
            return Err(StoreError::Unavailable("simulated project store outage"));
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryRepository {
    async fn ensure_collection(&self) -> Result<(), StoreError> {
        self.check_available()
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        self.check_available()?;
        Ok(self.records.lock().await.values().cloned().collect())
    }

    async fn save_project(&self, project: &Project) -> Result<(), StoreError> {
        self.check_available()?;
        self.records
            .lock()
            .await
            .insert(project.id.clone(), project.clone());
        Ok(())
    }

    async fn delete_project(&self, id: &str) -> Result<(), StoreError> {
        self.check_available()?;
        self.records.lock().await.remove(id);
        Ok(())
    }
}
