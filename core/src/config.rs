/// Process-wide settings, built once at startup and handed to every invocation.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub database_url: Option<String>,
}

impl Settings {
    pub fn new(database_url: Option<String>) -> Self {
        Self {
            database_url: database_url.filter(|url| !url.is_empty()),
        }
    }

    /// Reads `DATABASE_URL`. Unset and empty are both treated as missing.
    pub fn from_env() -> Self {
        Self::new(std::env::var("DATABASE_URL").ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_url_counts_as_missing() {
        assert!(Settings::new(Some(String::new())).database_url.is_none());
        assert!(Settings::new(None).database_url.is_none());
    }

    #[test]
    fn keeps_configured_url() {
        let settings = Settings::new(Some("postgres://localhost/app".to_string()));
        assert_eq!(settings.database_url.as_deref(), Some("postgres://localhost/app"));
    }
}
