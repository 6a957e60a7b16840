use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntegrationErrorCode {
    MissingWebsiteId,
    InvalidOptions,
}

impl IntegrationErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationErrorCode::MissingWebsiteId => "entrolytics/missing-website-id",
            IntegrationErrorCode::InvalidOptions => "entrolytics/invalid-options",
        }
    }
}

#[derive(Clone, Debug)]
pub struct IntegrationError {
    pub code: IntegrationErrorCode,
    message: String,
}

impl IntegrationError {
    pub fn new(code: IntegrationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for IntegrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for IntegrationError {}

pub type IntegrationResult<T> = Result<T, IntegrationError>;

pub fn missing_website_id(message: impl Into<String>) -> IntegrationError {
    IntegrationError::new(IntegrationErrorCode::MissingWebsiteId, message)
}

pub fn invalid_options(message: impl Into<String>) -> IntegrationError {
    IntegrationError::new(IntegrationErrorCode::InvalidOptions, message)
}
