use std::env;

/// Process-wide configuration, read from the environment once at startup
/// and passed into the components that need it. Nothing outside this module
/// and `main` reads environment variables.
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    /// Bearer token lifetime in days.
    pub token_ttl_days: i64,
    /// Origin the browser client is served from, for CORS.
    pub client_origin: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            token_ttl_days: env::var("TOKEN_TTL_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .expect("TOKEN_TTL_DAYS must be a number"),
            client_origin: env::var("CLIENT_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("DATABASE_URL", "postgres://test");
        env::set_var("JWT_SECRET", "config-test-secret");

        let config = Config::from_env();

        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.jwt_secret, "config-test-secret");
        assert_eq!(config.token_ttl_days, 7);
        assert_eq!(config.client_origin, "http://localhost:5173");

        env::set_var("SERVER_PORT", "3001");
        env::set_var("SERVER_HOST", "0.0.0.0");
        env::set_var("TOKEN_TTL_DAYS", "14");

        let config = Config::from_env();

        assert_eq!(config.server_port, 3001);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.token_ttl_days, 14);
        assert_eq!(config.server_url(), "http://0.0.0.0:3001");

        env::remove_var("SERVER_PORT");
        env::remove_var("SERVER_HOST");
        env::remove_var("TOKEN_TTL_DAYS");
    }
}
