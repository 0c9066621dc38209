// handlers/protected/mod.rs - Protected handlers (session required)
//
// Every route here sits behind `session_auth_middleware`, which injects the
// `AuthUser` extension the handlers read.
//
// Route Prefix: /api (session, projects/*, image/*)

pub mod auth; // Session check
pub mod images; // Image listing, upload, update and serving
pub mod projects; // Project create and list
pub mod utils;
