use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub swagger: SwaggerConfig,
    pub storage: StorageConfig,
    pub qr: QrConfig,
    pub import: ImportConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    /// Public base URL used for verification links and stored media URLs (no trailing slash)
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Which object storage backend holds uploaded and generated files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    MinIO,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory for the local backend
    pub media_root: PathBuf,
    /// URL prefix the local media directory is served under (leading and trailing slash)
    pub media_url: String,
    pub minio: MinIOConfig,
}

/// MinIO/S3 storage configuration
#[derive(Debug, Clone)]
pub struct MinIOConfig {
    /// MinIO/S3 endpoint URL
    pub endpoint: String,
    /// Public endpoint URL for stored objects (defaults to endpoint)
    pub public_endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub region: String,
}

/// Styling applied to every generated QR code.
///
/// Defaults: black modules on white, 10px modules, 4 module quiet zone, no logo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrConfig {
    pub foreground_color: String,
    pub background_color: String,
    pub logo_path: Option<PathBuf>,
    pub box_size: u32,
    pub border: u32,
}

#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Default issuer policy when the request does not choose one
    pub create_missing_issuers: bool,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            qr: QrConfig::from_env()?,
            import: ImportConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base_url = env::var("BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            base_url,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        Ok(Self {
            url,
            max_connections: parse_env("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: parse_env("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: parse_env(
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_env("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?,
            max_lifetime_secs: parse_env("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Certifications API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Student certificate records, QR verification codes and bulk import/export"
                .to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, String> {
        let backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".to_string())
            .to_lowercase()
            .as_str()
        {
            "local" => StorageBackend::Local,
            "minio" | "s3" => StorageBackend::MinIO,
            other => {
                return Err(format!(
                    "STORAGE_BACKEND must be 'local' or 'minio', got '{}'",
                    other
                ))
            }
        };

        let media_root = PathBuf::from(env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".into()));
        let media_url = normalize_media_url(
            &env::var("MEDIA_URL").unwrap_or_else(|_| "/media/".to_string()),
        );

        Ok(Self {
            backend,
            media_root,
            media_url,
            minio: MinIOConfig::from_env()?,
        })
    }
}

/// Force a leading and a trailing slash so keys can be appended directly
fn normalize_media_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

impl MinIOConfig {
    pub fn from_env() -> Result<Self, String> {
        let endpoint =
            env::var("MINIO_ENDPOINT").unwrap_or_else(|_| "http://localhost:9000".to_string());

        // Public endpoint defaults to the main endpoint if not specified
        let public_endpoint =
            env::var("MINIO_PUBLIC_ENDPOINT").unwrap_or_else(|_| endpoint.clone());

        let access_key = env::var("MINIO_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".to_string());
        let secret_key = env::var("MINIO_SECRET_KEY").unwrap_or_else(|_| "minioadmin".to_string());
        let bucket =
            env::var("MINIO_BUCKET").unwrap_or_else(|_| "certifications-media".to_string());
        let region = env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        Ok(Self {
            endpoint,
            public_endpoint,
            access_key,
            secret_key,
            bucket,
            region,
        })
    }
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            foreground_color: Self::DEFAULT_FOREGROUND.to_string(),
            background_color: Self::DEFAULT_BACKGROUND.to_string(),
            logo_path: None,
            box_size: Self::DEFAULT_BOX_SIZE,
            border: Self::DEFAULT_BORDER,
        }
    }
}

impl QrConfig {
    const DEFAULT_FOREGROUND: &'static str = "#000000";
    const DEFAULT_BACKGROUND: &'static str = "#FFFFFF";
    const DEFAULT_BOX_SIZE: u32 = 10;
    const DEFAULT_BORDER: u32 = 4;

    pub fn from_env() -> Result<Self, String> {
        let foreground_color = env::var("QR_FOREGROUND_COLOR")
            .unwrap_or_else(|_| Self::DEFAULT_FOREGROUND.to_string());
        let background_color = env::var("QR_BACKGROUND_COLOR")
            .unwrap_or_else(|_| Self::DEFAULT_BACKGROUND.to_string());

        for (name, value) in [
            ("QR_FOREGROUND_COLOR", &foreground_color),
            ("QR_BACKGROUND_COLOR", &background_color),
        ] {
            if !crate::shared::validation::HEX_COLOR_REGEX.is_match(value) {
                return Err(format!("{} must be a #RRGGBB color, got '{}'", name, value));
            }
        }

        let logo_path = env::var("QR_LOGO_PATH")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let box_size = parse_env("QR_BOX_SIZE", Self::DEFAULT_BOX_SIZE)?;
        let border = parse_env("QR_BORDER", Self::DEFAULT_BORDER)?;
        if box_size == 0 {
            return Err("QR_BOX_SIZE must be greater than zero".to_string());
        }

        Ok(Self {
            foreground_color,
            background_color,
            logo_path,
            box_size,
            border,
        })
    }
}

impl ImportConfig {
    const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024; // 5MB

    pub fn from_env() -> Result<Self, String> {
        let create_missing_issuers = parse_env("IMPORT_CREATE_MISSING_ISSUERS", false)?;
        let max_upload_bytes =
            parse_env("IMPORT_MAX_UPLOAD_BYTES", Self::DEFAULT_MAX_UPLOAD_BYTES)?;

        Ok(Self {
            create_missing_issuers,
            max_upload_bytes,
        })
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            create_missing_issuers: false,
            max_upload_bytes: Self::DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

fn parse_env<T>(name: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr + ToString,
{
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse::<T>()
        .map_err(|_| format!("{} must be a valid {}", name, std::any::type_name::<T>()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_media_url() {
        assert_eq!(normalize_media_url("/media/"), "/media/");
        assert_eq!(normalize_media_url("media"), "/media/");
        assert_eq!(normalize_media_url("/static/media"), "/static/media/");
        assert_eq!(normalize_media_url(""), "/");
    }

    #[test]
    fn test_qr_config_default() {
        let qr = QrConfig::default();
        assert_eq!(qr.foreground_color, "#000000");
        assert_eq!(qr.background_color, "#FFFFFF");
        assert_eq!(qr.box_size, 10);
        assert_eq!(qr.border, 4);
        assert!(qr.logo_path.is_none());
    }

    #[test]
    fn test_import_config_default_is_strict() {
        let import = ImportConfig::default();
        assert!(!import.create_missing_issuers);
        assert_eq!(import.max_upload_bytes, 5 * 1024 * 1024);
    }
}
