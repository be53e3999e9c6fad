//! Environment-sourced application configuration.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::error::ConfigError;

/// Runtime configuration, read from flags or environment variables.
#[derive(Debug, Clone, Parser)]
#[command(name = "shoebox", version, about = "Minimal self-hosted photo sharing")]
pub struct AppConfig {
    /// Address the server binds to.
    #[arg(long, env = "SHOEBOX_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port the server listens on.
    #[arg(long, env = "SHOEBOX_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Comma-separated usernames allowed to log in.
    #[arg(long, env = "SHOEBOX_USERS", value_delimiter = ',', required = true)]
    pub users: Vec<String>,

    /// Shared password checked at login.
    #[arg(long, env = "SHOEBOX_PASSWORD", required = true)]
    pub password: String,

    /// Secret the session cookie signing key is derived from.
    #[arg(long, env = "SHOEBOX_SECRET", required = true)]
    pub secret: String,

    /// Display name shown on the home page.
    #[arg(long, env = "SHOEBOX_NAME", default_value = "Shoebox")]
    pub site_name: String,

    /// Directory photos are stored in. Created if missing.
    #[arg(long, env = "SHOEBOX_PHOTOS_DIR", default_value = "photos")]
    pub photos_dir: PathBuf,

    /// Maximum accepted upload request size in bytes.
    #[arg(long, env = "SHOEBOX_MAX_UPLOAD_BYTES", default_value_t = 64 * 1024 * 1024)]
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Validates invariants clap cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.users.is_empty() {
            return Err(ConfigError::NoUsers);
        }
        if self.users.iter().any(|user| user.trim().is_empty()) {
            return Err(ConfigError::EmptyUser);
        }
        if self.password.is_empty() {
            return Err(ConfigError::EmptyPassword);
        }
        if self.secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Ok(())
    }

    /// Builds the login credential table from this configuration.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            users: self.users.clone(),
            password: self.password.clone(),
        }
    }
}

/// Static credential table: the configured usernames sharing one password.
#[derive(Debug, Clone)]
pub struct Credentials {
    users: Vec<String>,
    password: String,
}

impl Credentials {
    /// Returns `true` when `username` is known and `password` matches.
    pub fn check(&self, username: &str, password: &str) -> bool {
        self.users.iter().any(|user| user == username) && self.password == password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            host: [127, 0, 0, 1].into(),
            port: 8000,
            users: vec!["ansel".to_owned(), "dorothea".to_owned()],
            password: "correct horse".to_owned(),
            secret: "a signing secret".to_owned(),
            site_name: "Shoebox".to_owned(),
            photos_dir: "photos".into(),
            max_upload_bytes: 1024,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn empty_user_list_is_rejected() {
        let mut cfg = config();
        cfg.users.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::NoUsers));
    }

    #[test]
    fn blank_username_is_rejected() {
        let mut cfg = config();
        cfg.users.push("  ".to_owned());
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyUser));
    }

    #[test]
    fn empty_secret_is_rejected() {
        let mut cfg = config();
        cfg.secret.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::EmptySecret));
    }

    #[test]
    fn credentials_require_known_user_and_matching_password() {
        let creds = config().credentials();
        assert!(creds.check("ansel", "correct horse"));
        assert!(creds.check("dorothea", "correct horse"));
        assert!(!creds.check("ansel", "wrong"));
        assert!(!creds.check("stranger", "correct horse"));
    }
}
