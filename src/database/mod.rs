pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;

use async_trait::async_trait;
use uuid::Uuid;

pub use manager::{DatabaseManager, StoreError};
pub use memory::MemoryStore;
pub use models::{Image, ImageUpdate, NewImage, Project, StoredBlob, User};
pub use repository::PgStore;

/// Typed persistence operations for users, projects and images.
///
/// Each method maps to a single store call. Image bytes are kept apart from
/// the image records, keyed by the generated unique filename.
#[async_trait]
pub trait Store: Send + Sync {
    async fn add_user(&self, username: &str, salt: &str, hash: &str) -> Result<User, StoreError>;

    async fn get_user(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn add_project(&self, user_id: Uuid, title: &str) -> Result<Project, StoreError>;

    async fn get_project(&self, user_id: Uuid, title: &str) -> Result<Option<Project>, StoreError>;

    async fn get_project_by_id(&self, project_id: Uuid) -> Result<Option<Project>, StoreError>;

    /// Oldest first
    async fn list_projects(&self, user_id: Uuid) -> Result<Vec<Project>, StoreError>;

    /// Stores the bytes and inserts a record with empty coords
    async fn add_image(&self, image: NewImage) -> Result<Image, StoreError>;

    /// Metadata only, oldest first
    async fn list_images(&self, user_id: Uuid, project_id: Uuid) -> Result<Vec<Image>, StoreError>;

    /// `None` when no image has that unique filename
    async fn update_image(&self, file_unique: &str, update: &ImageUpdate) -> Result<Option<Image>, StoreError>;

    async fn get_image_bytes(&self, file_unique: &str) -> Result<Option<StoredBlob>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
