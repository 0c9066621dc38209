// handlers/public/auth/mod.rs - Public authentication handlers
//
// Session acquisition and release; none of these require a session.

pub mod login; // POST /api/login - authenticate and open a session
pub mod logout; // GET /api/logout - drop the session
pub mod register; // POST /api/registration - create account and open a session
pub mod utils;

pub use login::login;
pub use logout::logout;
pub use register::register;
pub use utils::{Credentials, SessionInfo};
