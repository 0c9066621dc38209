use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseManager, StoreError};
use crate::database::models::{Image, ImageUpdate, NewImage, Project, StoredBlob, User};
use crate::database::Store;
use crate::files;

/// PostgreSQL-backed store. `images.coords` is JSONB, image bytes live in
/// `image_blobs` keyed by the unique filename.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Unique and foreign key violations become domain errors; everything else
/// goes through the connection classifier.
fn map_write_error(err: sqlx::Error, conflict: &str, missing: &str) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::Conflict(conflict.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return StoreError::NotFound(missing.to_string());
        }
    }
    StoreError::from_sqlx(err)
}

#[async_trait]
impl Store for PgStore {
    async fn add_user(&self, username: &str, salt: &str, hash: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, salt, hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, now(), now())
            RETURNING id, username, salt, hash, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(salt)
        .bind(hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Username already exists.", "User not found."))
    }

    async fn get_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, salt, hash, created_at, updated_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }

    async fn add_project(&self, user_id: Uuid, title: &str) -> Result<Project, StoreError> {
        sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (id, title, created_by, created_at)
            VALUES ($1, $2, $3, now())
            RETURNING id, title, created_by, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "A project with that name already exists.", "User not found."))
    }

    async fn get_project(&self, user_id: Uuid, title: &str) -> Result<Option<Project>, StoreError> {
        sqlx::query_as::<_, Project>(
            "SELECT id, title, created_by, created_at FROM projects WHERE created_by = $1 AND title = $2",
        )
        .bind(user_id)
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }

    async fn get_project_by_id(&self, project_id: Uuid) -> Result<Option<Project>, StoreError> {
        sqlx::query_as::<_, Project>("SELECT id, title, created_by, created_at FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn list_projects(&self, user_id: Uuid) -> Result<Vec<Project>, StoreError> {
        sqlx::query_as::<_, Project>(
            "SELECT id, title, created_by, created_at FROM projects WHERE created_by = $1 ORDER BY created_at, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }

    async fn add_image(&self, image: NewImage) -> Result<Image, StoreError> {
        let file_unique = files::unique_filename(&image.filename);

        let mut tx = self.pool.begin().await.map_err(StoreError::from_sqlx)?;

        sqlx::query(
            r#"
            INSERT INTO image_blobs (file_unique, data, mimetype, created_by, project_id, created_at)
            VALUES ($1, $2, $3, $4, $5, now())
            "#,
        )
        .bind(&file_unique)
        .bind(&image.bytes)
        .bind(&image.mimetype)
        .bind(image.user_id)
        .bind(image.project_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Duplicate file.", "Project not found."))?;

        let record = sqlx::query_as::<_, Image>(
            r#"
            INSERT INTO images (id, file_unique, filename, mimetype, project_id, created_by, coords, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, '[]'::jsonb, now())
            RETURNING id, file_unique, filename, mimetype, project_id, created_by, coords, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&file_unique)
        .bind(&image.filename)
        .bind(&image.mimetype)
        .bind(image.project_id)
        .bind(image.user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Duplicate file.", "Project not found."))?;

        tx.commit().await.map_err(StoreError::from_sqlx)?;

        Ok(record)
    }

    async fn list_images(&self, user_id: Uuid, project_id: Uuid) -> Result<Vec<Image>, StoreError> {
        sqlx::query_as::<_, Image>(
            r#"
            SELECT id, file_unique, filename, mimetype, project_id, created_by, coords, created_at
            FROM images
            WHERE created_by = $1 AND project_id = $2
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }

    async fn update_image(&self, file_unique: &str, update: &ImageUpdate) -> Result<Option<Image>, StoreError> {
        // Only allow-listed columns are ever written
        let query = match &update.coords {
            Some(coords) => sqlx::query_as::<_, Image>(
                r#"
                UPDATE images SET coords = $2
                WHERE file_unique = $1
                RETURNING id, file_unique, filename, mimetype, project_id, created_by, coords, created_at
                "#,
            )
            .bind(file_unique)
            .bind(coords.clone()),
            None => sqlx::query_as::<_, Image>(
                r#"
                SELECT id, file_unique, filename, mimetype, project_id, created_by, coords, created_at
                FROM images WHERE file_unique = $1
                "#,
            )
            .bind(file_unique),
        };

        query
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn get_image_bytes(&self, file_unique: &str) -> Result<Option<StoredBlob>, StoreError> {
        sqlx::query_as::<_, StoredBlob>("SELECT data, mimetype FROM image_blobs WHERE file_unique = $1")
            .bind(file_unique)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
