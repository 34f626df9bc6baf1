use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub client_url: String,
    pub jwt: JwtConfig,
    pub smtp: SmtpConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let client_url =
            std::env::var("CLIENT_URL").unwrap_or_else(|_| "http://localhost:5173".into());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "todozen".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "todozen-users".into()),
            // Zero or negative lifetimes would make every token expire on
            // arrival; fall back to the one-day default instead.
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .filter(|minutes| *minutes > 0)
                .unwrap_or(60 * 24),
        };
        let smtp = SmtpConfig {
            host: std::env::var("EMAIL_HOST").unwrap_or_else(|_| "localhost".into()),
            port: std::env::var("EMAIL_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(587),
            user: std::env::var("EMAIL_USER").unwrap_or_default(),
            pass: std::env::var("EMAIL_PASS").unwrap_or_default(),
            from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "Todo App <no-reply@localhost>".into()),
        };
        Ok(Self {
            database_url,
            client_url,
            jwt,
            smtp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the env mutations cannot race a parallel sibling.
    #[test]
    fn non_positive_jwt_ttl_falls_back_to_default() {
        std::env::set_var("DATABASE_URL", "postgres://postgres@localhost/test");
        std::env::set_var("JWT_SECRET", "test");

        std::env::set_var("JWT_TTL_MINUTES", "-5");
        let config = AppConfig::from_env().expect("config");
        assert_eq!(config.jwt.ttl_minutes, 60 * 24);

        std::env::set_var("JWT_TTL_MINUTES", "0");
        let config = AppConfig::from_env().expect("config");
        assert_eq!(config.jwt.ttl_minutes, 60 * 24);

        std::env::set_var("JWT_TTL_MINUTES", "90");
        let config = AppConfig::from_env().expect("config");
        assert_eq!(config.jwt.ttl_minutes, 90);

        std::env::remove_var("JWT_TTL_MINUTES");
    }
}
