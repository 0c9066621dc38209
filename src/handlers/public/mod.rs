// handlers/public/mod.rs - Public handlers (no session required)
//
// Route Prefix: /api (login, registration, logout)
// Middleware: none

pub mod auth;

pub use auth::*;
