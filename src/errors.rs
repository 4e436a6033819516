use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum VisitlogError {
    /// 本地 / 会话键值存储不可用（可本地恢复）
    StorageUnavailable(String),
    /// 事件存储读写失败（向调用方暴露，不重试）
    Repository(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    Validation(String),
    Serialization(String),
    FileOperation(String),
}

impl VisitlogError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            VisitlogError::StorageUnavailable(_) => "E001",
            VisitlogError::Repository(_) => "E002",
            VisitlogError::DatabaseConfig(_) => "E003",
            VisitlogError::DatabaseConnection(_) => "E004",
            VisitlogError::Validation(_) => "E005",
            VisitlogError::Serialization(_) => "E006",
            VisitlogError::FileOperation(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            VisitlogError::StorageUnavailable(_) => "Storage Unavailable",
            VisitlogError::Repository(_) => "Repository Error",
            VisitlogError::DatabaseConfig(_) => "Database Configuration Error",
            VisitlogError::DatabaseConnection(_) => "Database Connection Error",
            VisitlogError::Validation(_) => "Validation Error",
            VisitlogError::Serialization(_) => "Serialization Error",
            VisitlogError::FileOperation(_) => "File Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            VisitlogError::StorageUnavailable(msg)
            | VisitlogError::Repository(msg)
            | VisitlogError::DatabaseConfig(msg)
            | VisitlogError::DatabaseConnection(msg)
            | VisitlogError::Validation(msg)
            | VisitlogError::Serialization(msg)
            | VisitlogError::FileOperation(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            VisitlogError::Validation(_) => StatusCode::BAD_REQUEST,
            VisitlogError::Repository(_)
            | VisitlogError::DatabaseConnection(_)
            | VisitlogError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
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

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for VisitlogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for VisitlogError {}

// 便捷的构造函数
impl VisitlogError {
    pub fn storage_unavailable<T: Into<String>>(msg: T) -> Self {
        VisitlogError::StorageUnavailable(msg.into())
    }

    pub fn repository<T: Into<String>>(msg: T) -> Self {
        VisitlogError::Repository(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        VisitlogError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        VisitlogError::DatabaseConnection(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        VisitlogError::Validation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        VisitlogError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        VisitlogError::FileOperation(msg.into())
    }
}

impl From<sea_orm::DbErr> for VisitlogError {
    fn from(err: sea_orm::DbErr) -> Self {
        VisitlogError::Repository(err.to_string())
    }
}

impl From<std::io::Error> for VisitlogError {
    fn from(err: std::io::Error) -> Self {
        VisitlogError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for VisitlogError {
    fn from(err: serde_json::Error) -> Self {
        VisitlogError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VisitlogError>;
