pub mod image;
pub mod project;
pub mod user;

pub use image::{Image, ImageUpdate, ImageView, NewImage, StoredBlob};
pub use project::{Project, ProjectView};
pub use user::User;
