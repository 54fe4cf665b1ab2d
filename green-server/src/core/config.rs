use std::path::PathBuf;

/// Service configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | working directory |
/// | DATABASE_PATH | {WORK_DIR}/green.db | SQLite database file |
/// | UPLOAD_DIR | {WORK_DIR}/uploads | uploaded files |
/// | PUBLIC_BASE_URL | http://localhost:3000/uploads | URL prefix of uploaded files |
/// | LOG_LEVEL | info | tracing filter level |
/// | LOG_DIR | (unset) | rolling log directory, console only when unset |
/// | ENVIRONMENT | development | development, staging or production |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/srv/green LOG_DIR=/srv/green/logs ./green-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub database_path: String,
    pub upload_dir: String,
    pub public_base_url: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from the environment (and `.env` if present)
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let mut config = Self::with_work_dir(work_dir);

        if let Ok(path) = std::env::var("DATABASE_PATH") {
            config.database_path = path;
        }
        if let Ok(dir) = std::env::var("UPLOAD_DIR") {
            config.upload_dir = dir;
        }
        if let Ok(url) = std::env::var("PUBLIC_BASE_URL") {
            config.public_base_url = url;
        }
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = level;
        }
        config.log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty());
        if let Ok(environment) = std::env::var("ENVIRONMENT") {
            config.environment = environment;
        }
        config
    }

    /// Defaults rooted at `work_dir`, ignoring the environment
    ///
    /// Commonly used in tests.
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let work_dir = work_dir.into();
        let root = PathBuf::from(&work_dir);
        Self {
            database_path: root.join("green.db").to_string_lossy().into_owned(),
            upload_dir: root.join("uploads").to_string_lossy().into_owned(),
            work_dir,
            public_base_url: "http://localhost:3000/uploads".into(),
            log_level: "info".into(),
            log_dir: None,
            environment: "development".into(),
        }
    }

    /// Create the working and upload directories
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)?;
        std::fs::create_dir_all(&self.upload_dir)?;
        if let Some(parent) = PathBuf::from(&self.database_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
