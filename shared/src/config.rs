use anyhow::Result;

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            filename: env_or("DATABASE_FILENAME", "campus_parking.db"),
        };
        let auth = AuthConfig {
            // アクセストークンの有効期限（秒）
            ttl: env_or("AUTH_TOKEN_TTL", "86400").parse()?,
        };
        let server = ServerConfig {
            port: env_or("PORT", "8080").parse()?,
        };
        Ok(Self {
            database,
            auth,
            server,
        })
    }
}

pub struct DatabaseConfig {
    pub filename: String,
}

#[derive(Clone, Copy)]
pub struct AuthConfig {
    pub ttl: u64,
}

pub struct ServerConfig {
    pub port: u16,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
