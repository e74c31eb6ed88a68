// Request middleware
pub mod session;

pub use session::{session_middleware, ReqSession, SessionId, SESSION_HEADER};
