pub mod session;

pub use session::{
    ADMIN_COOKIE, clear_session_cookie, extract_session_token, is_admin,
    require_admin, session_cookie,
};
