use std::fmt;

use super::Settings;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_DBNAME: &str = "wholebif_rdb";
pub const DEFAULT_USER: &str = "wholebif";

/// PostgreSQL login details, resolved once from `POSTGRES_*` variables.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseCredentials {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("POSTGRES_PORT must be a port number, got '{0}'")]
    InvalidPort(String),
}

impl DatabaseCredentials {
    pub fn resolve(settings: &Settings) -> Result<Self, CredentialsError> {
        let port = match settings.get("POSTGRES_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| CredentialsError::InvalidPort(raw.to_string()))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: settings.get_or("POSTGRES_HOST", DEFAULT_HOST).to_string(),
            port,
            dbname: settings.get_or("POSTGRES_DB", DEFAULT_DBNAME).to_string(),
            user: settings.get_or("POSTGRES_USER", DEFAULT_USER).to_string(),
            password: settings.get_or("POSTGRES_PASSWORD", "").to_string(),
        })
    }
}

impl fmt::Debug for DatabaseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseCredentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for DatabaseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}/{}", self.user, self.host, self.port, self.dbname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let creds = DatabaseCredentials::resolve(&Settings::default()).unwrap();
        assert_eq!(creds.host, "localhost");
        assert_eq!(creds.port, 5432);
        assert_eq!(creds.dbname, "wholebif_rdb");
        assert_eq!(creds.user, "wholebif");
        assert_eq!(creds.password, "");
    }

    #[test]
    fn test_values_from_settings() {
        let settings = Settings::from_pairs([
            ("POSTGRES_HOST", "10.0.0.5"),
            ("POSTGRES_PORT", "6432"),
            ("POSTGRES_DB", "bif"),
            ("POSTGRES_USER", "reader"),
            ("POSTGRES_PASSWORD", "hunter2"),
        ]);
        let creds = DatabaseCredentials::resolve(&settings).unwrap();
        assert_eq!(creds.host, "10.0.0.5");
        assert_eq!(creds.port, 6432);
        assert_eq!(creds.dbname, "bif");
        assert_eq!(creds.user, "reader");
        assert_eq!(creds.password, "hunter2");
    }

    #[test]
    fn test_invalid_port() {
        let settings = Settings::from_pairs([("POSTGRES_PORT", "fivefourthreetwo")]);
        let err = DatabaseCredentials::resolve(&settings).unwrap_err();
        assert!(err.to_string().contains("fivefourthreetwo"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let settings = Settings::from_pairs([("POSTGRES_PASSWORD", "hunter2")]);
        let creds = DatabaseCredentials::resolve(&settings).unwrap();
        let debug = format!("{creds:?}");
        assert!(!debug.contains("hunter2"));
        assert_eq!(creds.to_string(), "wholebif@localhost:5432/wholebif_rdb");
    }
}
