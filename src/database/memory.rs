use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::StoreError;
use crate::database::models::{Image, ImageUpdate, NewImage, Project, StoredBlob, User};
use crate::database::Store;
use crate::files;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<Project>,
    images: Vec<Image>,
    blobs: HashMap<String, StoredBlob>,
}

/// Process-local store with the same constraints as the PostgreSQL schema.
/// Used by tests and `--in-memory` runs; nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn add_user(&self, username: &str, salt: &str, hash: &str) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == username) {
            return Err(StoreError::Conflict("Username already exists.".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            salt: salt.to_string(),
            hash: hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn add_project(&self, user_id: Uuid, title: &str) -> Result<Project, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(StoreError::NotFound("User not found.".to_string()));
        }
        if tables
            .projects
            .iter()
            .any(|p| p.created_by == user_id && p.title == title)
        {
            return Err(StoreError::Conflict(
                "A project with that name already exists.".to_string(),
            ));
        }

        let project = Project {
            id: Uuid::new_v4(),
            title: title.to_string(),
            created_by: user_id,
            created_at: Utc::now(),
        };
        tables.projects.push(project.clone());
        Ok(project)
    }

    async fn get_project(&self, user_id: Uuid, title: &str) -> Result<Option<Project>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .projects
            .iter()
            .find(|p| p.created_by == user_id && p.title == title)
            .cloned())
    }

    async fn get_project_by_id(&self, project_id: Uuid) -> Result<Option<Project>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.projects.iter().find(|p| p.id == project_id).cloned())
    }

    async fn list_projects(&self, user_id: Uuid) -> Result<Vec<Project>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .projects
            .iter()
            .filter(|p| p.created_by == user_id)
            .cloned()
            .collect())
    }

    async fn add_image(&self, image: NewImage) -> Result<Image, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.projects.iter().any(|p| p.id == image.project_id) {
            return Err(StoreError::NotFound("Project not found.".to_string()));
        }
        if !tables.users.iter().any(|u| u.id == image.user_id) {
            return Err(StoreError::NotFound("User not found.".to_string()));
        }

        let file_unique = files::unique_filename(&image.filename);
        if tables.blobs.contains_key(&file_unique) {
            return Err(StoreError::Conflict("Duplicate file.".to_string()));
        }

        tables.blobs.insert(
            file_unique.clone(),
            StoredBlob {
                data: image.bytes,
                mimetype: image.mimetype.clone(),
            },
        );

        let record = Image {
            id: Uuid::new_v4(),
            file_unique,
            filename: image.filename,
            mimetype: image.mimetype,
            project_id: image.project_id,
            created_by: image.user_id,
            coords: json!([]),
            created_at: Utc::now(),
        };
        tables.images.push(record.clone());
        Ok(record)
    }

    async fn list_images(&self, user_id: Uuid, project_id: Uuid) -> Result<Vec<Image>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .images
            .iter()
            .filter(|i| i.created_by == user_id && i.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn update_image(&self, file_unique: &str, update: &ImageUpdate) -> Result<Option<Image>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .images
            .iter_mut()
            .find(|i| i.file_unique == file_unique)
            .map(|image| {
                update.apply(image);
                image.clone()
            }))
    }

    async fn get_image_bytes(&self, file_unique: &str) -> Result<Option<StoredBlob>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.blobs.get(file_unique).cloned())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
