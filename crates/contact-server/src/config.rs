// File: src/config.rs
// Purpose: Server and mail settings from the environment

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Where and what the server serves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub public_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_dir: PathBuf::from(default_public_dir()),
        }
    }
}

/// SMTP settings; the endpoint answers "Mail server not configured" without them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub to: String,
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

// 5000 is often taken on macOS
fn default_port() -> u16 {
    5050
}

fn default_public_dir() -> String {
    "public".to_string()
}

fn default_mail_port() -> u16 {
    465
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read `HOST`, `PORT` and `PUBLIC_DIR` through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(port) => port
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT: {}", port))?,
            None => default_port(),
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(default_host),
            port,
            public_dir: PathBuf::from(lookup("PUBLIC_DIR").unwrap_or_else(default_public_dir)),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl MailConfig {
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `None` unless `MAIL_HOST`, `MAIL_USER`, `MAIL_PASS` and `TO_EMAIL` are all set
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("MAIL_PORT") {
            Some(port) => port
                .parse::<u16>()
                .with_context(|| format!("Invalid MAIL_PORT: {}", port))?,
            None => default_mail_port(),
        };

        let setting = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let (Some(host), Some(user), Some(password), Some(to)) = (
            setting("MAIL_HOST"),
            setting("MAIL_USER"),
            setting("MAIL_PASS"),
            setting("TO_EMAIL"),
        ) else {
            return Ok(None);
        };

        Ok(Some(Self {
            host,
            port,
            user,
            password,
            to,
        }))
    }

    /// Port 465 speaks TLS from the start, anything else upgrades with STARTTLS
    pub fn implicit_tls(&self) -> bool {
        self.port == 465
    }
}
