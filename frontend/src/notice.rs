//! 短暂通知（snackbar）的数据模型

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// 短暂展示给用户的通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
