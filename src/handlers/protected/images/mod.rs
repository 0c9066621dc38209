// handlers/protected/images/mod.rs - Image endpoints
//
// Uploads land in the object store under a generated unique filename; the
// JSON endpoints only ever carry metadata and annotation coords.

pub mod list; // POST /api/projects/images
pub mod serve; // GET /api/image/*path
pub mod update; // POST /api/projects/update
pub mod upload; // POST /api/projects/upload

pub use list::project_images;
pub use serve::serve_image;
pub use update::update_image;
pub use upload::project_upload;
