// handlers/mod.rs - Two-tier handler layout
//
// Public (no session) -> Protected (session cookie required)
pub mod protected; // Tier 2: routes behind session_auth_middleware
pub mod public; // Tier 1: login, registration, logout
