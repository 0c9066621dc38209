// handlers/protected/projects/mod.rs - Project endpoints

pub mod create; // POST /api/projects/create
pub mod list; // POST /api/projects/list

pub use create::project_create;
pub use list::project_list;
