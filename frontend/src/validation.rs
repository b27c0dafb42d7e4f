//! 表单校验
//!
//! 校验结果按字段返回，由页面在对应输入框下方内联展示。

use producer_point_shared::Credentials;
use std::collections::BTreeMap;
use validator::ValidateEmail;

pub const MIN_PASSWORD_LEN: usize = 6;

/// 字段名 -> 错误消息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        // 每个字段只保留第一条错误
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

fn check_email(errors: &mut FieldErrors, field: &'static str, email: &str) {
    if email.is_empty() {
        errors.add(field, "E-mail is required");
    } else if !email.validate_email() {
        errors.add(field, "Enter a valid e-mail");
    }
}

/// 校验登录表单，成功时返回去除空白后的凭据
pub fn validate_sign_in(email: &str, password: &str) -> Result<Credentials, FieldErrors> {
    let credentials = Credentials {
        email: email.to_string(),
        password: password.to_string(),
    }
    .trimmed();

    let mut errors = FieldErrors::new();
    check_email(&mut errors, "email", &credentials.email);
    if credentials.password.is_empty() {
        errors.add("password", "Password is required");
    }
    errors.into_result(credentials)
}

/// 校验找回密码表单中的邮箱
pub fn validate_recovery_email(email: &str) -> Result<String, FieldErrors> {
    let email = email.trim().to_string();
    let mut errors = FieldErrors::new();
    check_email(&mut errors, "email", &email);
    errors.into_result(email)
}

/// 校验新密码及其确认
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();
    if password.is_empty() {
        errors.add("password", "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        );
    }
    if confirmation != password {
        errors.add("confirmation", "Passwords do not match");
    }
    errors.into_result(password.to_string())
}

/// 校验实体表单的名称
pub fn validate_label(label: &str) -> Result<String, FieldErrors> {
    let label = label.trim().to_string();
    let mut errors = FieldErrors::new();
    if label.is_empty() {
        errors.add("label", "Name is required");
    }
    errors.into_result(label)
}
