use std::fmt;

#[derive(Debug, Clone)]
pub enum GotolinkError {
    CacheInit(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    AbsolutePath(String),
    InvalidPath(String),
    Conflict(String),
    Serialization(String),
    DateParse(String),
}

impl GotolinkError {
    /// Stable error code, logged and returned to API clients
    pub fn code(&self) -> &'static str {
        match self {
            GotolinkError::CacheInit(_) => "E001",
            GotolinkError::DatabaseConfig(_) => "E002",
            GotolinkError::DatabaseConnection(_) => "E003",
            GotolinkError::DatabaseOperation(_) => "E004",
            GotolinkError::FileOperation(_) => "E005",
            GotolinkError::Validation(_) => "E006",
            GotolinkError::NotFound(_) => "E007",
            GotolinkError::AbsolutePath(_) => "E008",
            GotolinkError::InvalidPath(_) => "E009",
            GotolinkError::Conflict(_) => "E010",
            GotolinkError::Serialization(_) => "E011",
            GotolinkError::DateParse(_) => "E012",
        }
    }

    /// Human-readable error category
    pub fn error_type(&self) -> &'static str {
        match self {
            GotolinkError::CacheInit(_) => "Cache Initialization Error",
            GotolinkError::DatabaseConfig(_) => "Database Configuration Error",
            GotolinkError::DatabaseConnection(_) => "Database Connection Error",
            GotolinkError::DatabaseOperation(_) => "Database Operation Error",
            GotolinkError::FileOperation(_) => "File Operation Error",
            GotolinkError::Validation(_) => "Validation Error",
            GotolinkError::NotFound(_) => "Short URL Not Found",
            GotolinkError::AbsolutePath(_) => "Absolute Path Rejected",
            GotolinkError::InvalidPath(_) => "Invalid Path",
            GotolinkError::Conflict(_) => "UID Conflict",
            GotolinkError::Serialization(_) => "Serialization Error",
            GotolinkError::DateParse(_) => "Date Parse Error",
        }
    }

    /// Error detail text
    pub fn message(&self) -> &str {
        match self {
            GotolinkError::CacheInit(msg) => msg,
            GotolinkError::DatabaseConfig(msg) => msg,
            GotolinkError::DatabaseConnection(msg) => msg,
            GotolinkError::DatabaseOperation(msg) => msg,
            GotolinkError::FileOperation(msg) => msg,
            GotolinkError::Validation(msg) => msg,
            GotolinkError::NotFound(msg) => msg,
            GotolinkError::AbsolutePath(msg) => msg,
            GotolinkError::InvalidPath(msg) => msg,
            GotolinkError::Conflict(msg) => msg,
            GotolinkError::Serialization(msg) => msg,
            GotolinkError::DateParse(msg) => msg,
        }
    }

    /// Colored format for server-mode logs
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// Plain format for CLI output
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GotolinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GotolinkError {}

// Convenience constructors
impl GotolinkError {
    pub fn cache_init<T: Into<String>>(msg: T) -> Self {
        GotolinkError::CacheInit(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        GotolinkError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        GotolinkError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        GotolinkError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        GotolinkError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        GotolinkError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        GotolinkError::NotFound(msg.into())
    }

    pub fn absolute_path<T: Into<String>>(msg: T) -> Self {
        GotolinkError::AbsolutePath(msg.into())
    }

    pub fn invalid_path<T: Into<String>>(msg: T) -> Self {
        GotolinkError::InvalidPath(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        GotolinkError::Conflict(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        GotolinkError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        GotolinkError::DateParse(msg.into())
    }
}

impl From<sea_orm::DbErr> for GotolinkError {
    fn from(err: sea_orm::DbErr) -> Self {
        GotolinkError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for GotolinkError {
    fn from(err: std::io::Error) -> Self {
        GotolinkError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for GotolinkError {
    fn from(err: serde_json::Error) -> Self {
        GotolinkError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for GotolinkError {
    fn from(err: chrono::ParseError) -> Self {
        GotolinkError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GotolinkError>;
