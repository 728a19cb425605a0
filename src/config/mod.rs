use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub github: GithubConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// How long issued session tokens stay valid.
    #[serde(default = "default_jwt_validity_hours")]
    pub validity_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    pub client_id: String,
    pub client_secret: String,
}

fn default_jwt_validity_hours() -> i64 {
    720
}

impl Default for Config {
    fn default() -> Self {
        // Secrets must be explicitly set; everything else has a dev default.
        let jwt_secret = std::env::var("PORTAL_JWT_SECRET").expect(
            "PORTAL_JWT_SECRET environment variable must be set. Generate a secure random string (minimum 32 characters).",
        );
        let github_client_id = std::env::var("PORTAL_GITHUB_CLIENT_ID")
            .expect("PORTAL_GITHUB_CLIENT_ID environment variable must be set.");
        let github_client_secret = std::env::var("PORTAL_GITHUB_CLIENT_SECRET")
            .expect("PORTAL_GITHUB_CLIENT_SECRET environment variable must be set.");

        Self {
            server: ServerConfig {
                host: std::env::var("PORTAL_SERVER_HOST")
                    .unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: std::env::var("PORTAL_SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            database: DatabaseConfig {
                url: std::env::var("PORTAL_DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite:portal.db".to_string()),
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                validity_hours: std::env::var("PORTAL_JWT_VALIDITY_HOURS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_jwt_validity_hours),
            },
            github: GithubConfig {
                client_id: github_client_id,
                client_secret: github_client_secret,
            },
        }
    }
}

impl Config {
    /// Structured loading via the `config` crate, e.g. `PORTAL_SERVER__HOST`.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("PORTAL").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
