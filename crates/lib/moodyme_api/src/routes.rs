//! Route paths.

pub const ROOT: &str = "/";

pub const AUTH_LOGIN: &str = "/api/auth/login";
pub const AUTH_LOGOUT: &str = "/api/auth/logout";
pub const AUTH_VERIFY: &str = "/api/auth/verify";

/// Every admin API route lives under this prefix; the paths below are
/// relative to it.
pub const ADMIN_API: &str = "/api/admin";
pub const ADMIN_STATS: &str = "/stats";
pub const ADMIN_CONTENT: &str = "/content";
pub const ADMIN_CONTENT_DOC: &str = "/content/docs/{doc_name}";
pub const ADMIN_CONTENT_ID: &str = "/content/{id}";
pub const ADMIN_USERS: &str = "/users";
pub const ADMIN_USER_ID: &str = "/users/{id}";
pub const ADMIN_USER_STATUS: &str = "/users/{id}/status";
pub const ADMIN_ADMINS: &str = "/admins";

pub const ADMIN_PAGE: &str = "/admin";
pub const ADMIN_PAGE_INDEX: &str = "/admin/";
pub const ADMIN_PAGES: &str = "/admin/{*path}";
