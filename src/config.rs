use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub app_env: String,
    pub request_timeout_secs: u64,

    // PostgreSQL (primary "shows" database and the "music_selections" bind)
    pub database_url: String,
    pub music_selections_database_url: String,
    pub db_max_connections: u32,

    // Search cache
    pub redis_url: Option<String>,
    pub search_cache_ttl_seconds: u64,

    // Pagination
    pub default_page_size: u32,
    pub max_page_size: u32,

    // Admin
    pub admin_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            // Server
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),

            // PostgreSQL
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/shows_db".to_string()),
            music_selections_database_url: env::var("MUSIC_SELECTIONS_DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/music_selections_db".to_string()),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),

            // Search cache
            redis_url: non_empty_var("REDIS_URL"),
            search_cache_ttl_seconds: env::var("SEARCH_CACHE_TTL_SECONDS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .unwrap_or(3600), // 1 hour

            // Pagination
            default_page_size: env::var("DEFAULT_PAGE_SIZE")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .unwrap_or(20),
            max_page_size: env::var("MAX_PAGE_SIZE")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap_or(100),

            // Admin
            admin_key: non_empty_var("ADMIN_KEY"),
        }
    }

    /// Page sizing used by the list and search endpoints
    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default: self.default_page_size.max(1),
            max: self.max_page_size.max(1),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Default and maximum page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default: u32,
    pub max: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default: 20,
            max: 100,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
