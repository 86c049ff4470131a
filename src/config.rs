use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origin; `None` means permissive.
    pub frontend_url: Option<String>,
    pub environment: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub jwt: JwtConfig,
    pub server: ServerConfig,
}

/// Seven days.
const DEFAULT_TTL_MINUTES: i64 = 7 * 24 * 60;

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let database_url = match get("DATABASE_URL") {
            Some(url) => url,
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                or("DB_USER", "postgres"),
                or("DB_PASSWORD", "password"),
                or("DB_HOST", "localhost"),
                or("DB_PORT", "5432"),
                or("DB_NAME", "getcontact_uzb"),
            ),
        };

        let max_connections = get("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let jwt = JwtConfig {
            secret: get("JWT_SECRET").ok_or_else(|| anyhow::anyhow!("JWT_SECRET is not set"))?,
            issuer: or("JWT_ISSUER", "savedas"),
            audience: or("JWT_AUDIENCE", "savedas-users"),
            ttl_minutes: get("JWT_TTL_MINUTES")
                .and_then(|v| v.parse::<i64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_TTL_MINUTES),
        };

        let port = match get("APP_PORT") {
            Some(p) => p
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("invalid APP_PORT {p:?}: {e}"))?,
            None => 5000,
        };

        let server = ServerConfig {
            host: or("APP_HOST", "0.0.0.0"),
            port,
            frontend_url: get("FRONTEND_URL").filter(|v| !v.trim().is_empty()),
            environment: get("APP_ENV")
                .or_else(|| get("NODE_ENV"))
                .unwrap_or_else(|| "development".into()),
        };

        Ok(Self {
            database_url,
            max_connections,
            jwt,
            server,
        })
    }
}
