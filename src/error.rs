use reqwest::StatusCode;
use thiserror::Error;

/// 通用失败提示（网络异常、未知状态码）
pub const UNKNOWN_ERROR_MESSAGE: &str = "알 수 없는 에러가 발생했습니다.";

/// 上一个请求还没结束时的提示
pub const REQUEST_IN_PROGRESS_MESSAGE: &str = "요청을 처리하고 있어요. 잠시 후 다시 시도해주세요.";

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 认证错误
    #[error("认证错误: {0}")]
    Auth(#[from] AuthError),
    /// 题目相关的后端校验错误
    #[error("题目错误: {0}")]
    Question(#[from] QuestionError),
    /// 分组相关的后端校验错误
    #[error("分组错误: {0}")]
    Group(#[from] GroupError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 业务逻辑错误
    #[error("业务错误: {0}")]
    Business(#[from] BusinessError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败（连接、超时等）
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 服务端返回非 2xx 状态码
    #[error("API返回错误状态 ({endpoint}): {status}")]
    BadStatus { endpoint: String, status: StatusCode },
    /// JSON 解析失败
    #[error("JSON解析失败 ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// 返回 HTTP 状态码（仅 BadStatus 有）
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::BadStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// 认证错误
#[derive(Debug, Error)]
pub enum AuthError {
    /// 没有可用的 access token
    #[error("没有可用的登录凭证")]
    MissingToken,
    /// 刷新 token 失败
    #[error("刷新 token 失败: {reason}")]
    RefreshFailed { reason: String },
    /// 刷新失败后需要重新登录
    #[error("登录已失效，需要重新登录")]
    ReauthenticationRequired,
}

/// 题目接口的业务校验错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuestionError {
    #[error("질문의 길이는 50자 이하여야 합니다.")]
    ExceedMaximumLength,
    #[error("지원하는 카테고리가 아닙니다")]
    InvalidCategory,
    #[error("해당 질문을 삭제할 수 없습니다")]
    NotAuthorization,
    #[error("알 수 없는 에러가 발생했습니다.")]
    UnknownError,
}

impl QuestionError {
    /// 创建/修改题目时的状态码分类：400 超长，404 分类无效
    pub fn from_upload_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST => QuestionError::ExceedMaximumLength,
            StatusCode::NOT_FOUND => QuestionError::InvalidCategory,
            _ => QuestionError::UnknownError,
        }
    }

    /// 删除题目时的状态码分类：403 无权限
    pub fn from_delete_status(status: StatusCode) -> Self {
        match status {
            StatusCode::FORBIDDEN => QuestionError::NotAuthorization,
            _ => QuestionError::UnknownError,
        }
    }
}

/// 分组接口的业务校验错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GroupError {
    #[error("그룹 이름을 확인해주세요.")]
    InvalidName,
    #[error("지원하는 카테고리가 아닙니다")]
    InvalidCategory,
    #[error("알 수 없는 에러가 발생했습니다.")]
    UnknownError,
}

impl GroupError {
    /// 创建/修改分组时的状态码分类：400 名称不合法，404 分类无效
    pub fn from_upsert_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST => GroupError::InvalidName,
            StatusCode::NOT_FOUND => GroupError::InvalidCategory,
            _ => GroupError::UnknownError,
        }
    }
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("TOML序列化失败: {0}")]
    TomlSerializeFailed(#[from] toml::ser::Error),
}

/// 业务逻辑错误
#[derive(Debug, Error)]
pub enum BusinessError {
    /// 状态机不允许的切换
    #[error("不允许的状态切换: {from} -> {event}")]
    InvalidTransition { from: String, event: String },
    /// 分类 ID 不在 1..=12 范围内
    #[error("无效的分类ID: {0}")]
    InvalidCategoryId(i64),
    /// 输入不合法（空文本、占位文本等）
    #[error("输入不合法: {0}")]
    InvalidInput(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    #[error("配置项 {field} 不合法: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl AppError {
    /// 创建网络请求失败错误
    pub fn api_request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        })
    }

    /// 创建状态码错误
    pub fn bad_status(endpoint: impl Into<String>, status: StatusCode) -> Self {
        AppError::Api(ApiError::BadStatus {
            endpoint: endpoint.into(),
            status,
        })
    }

    /// 返回 HTTP 状态码（如果是状态码错误）
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AppError::Api(e) => e.status(),
            _ => None,
        }
    }

    /// 是否为认证失效
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            AppError::Auth(AuthError::ReauthenticationRequired | AuthError::MissingToken)
        )
    }

    /// 转换为界面上展示的提示文案
    pub fn user_message(&self) -> String {
        match self {
            AppError::Question(e) => e.to_string(),
            AppError::Group(e) => e.to_string(),
            AppError::Auth(_) => "로그인이 만료되었어요. 다시 로그인해주세요.".to_string(),
            AppError::Business(BusinessError::InvalidInput(msg)) => msg.clone(),
            AppError::Api(e) => match e.status() {
                Some(StatusCode::BAD_REQUEST) => QuestionError::ExceedMaximumLength.to_string(),
                Some(StatusCode::NOT_FOUND) => QuestionError::InvalidCategory.to_string(),
                Some(StatusCode::FORBIDDEN) => QuestionError::NotAuthorization.to_string(),
                _ => UNKNOWN_ERROR_MESSAGE.to_string(),
            },
            _ => UNKNOWN_ERROR_MESSAGE.to_string(),
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
