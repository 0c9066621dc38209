pub mod session;

pub use session::session_check;
