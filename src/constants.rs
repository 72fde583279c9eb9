pub const CONFIG_PATH_VAR: &str = "PORTFOLIO_CONFIG";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const DEFAULT_CONFIG_PATH: &str = "portfolio.toml";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3030";
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const DEFAULT_POOL_SIZE: u32 = 8;
pub const DEFAULT_ADMIN_REALM: &str = "Portfolio admin";
pub const DEFAULT_ADMIN_PER_PAGE: usize = 100;
pub const MENU_ITEMS: &[(&str, &str)] = &[
    ("Home", "/"),
    ("About", "/about/"),
    ("Projects", "/projects/"),
    ("Resume", "/resume/"),
    ("Contact", "/contact/"),
];
pub const FEATURED_POSTS_LIMIT: i64 = 3;
pub const RECENT_POSTS_LIMIT: i64 = 6;
pub const SLUG_MAX_LENGTH: usize = 50;
pub const CONTACT_SUCCESS_MESSAGE: &str =
    "Thank you for your message! I will get back to you soon.";
