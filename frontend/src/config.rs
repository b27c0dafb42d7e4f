//! 运行时配置
//!
//! CSR 应用没有进程环境变量，配置在编译期通过 `option_env!` 注入，
//! 未设置时回落到默认值。

/// 这些是默认值，构建时未设置对应环境变量则使用它们
const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_TOKEN_KEY: &str = "producer_point_token";
const DEFAULT_NOTICE_MILLIS: u32 = 6000;

/// 应用配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 后端 API 根地址
    pub api_base_url: String,
    /// LocalStorage 中保存会话令牌的键
    pub token_storage_key: String,
    /// 通知条自动关闭时间（毫秒）
    pub notice_millis: u32,
}

impl AppConfig {
    /// 从构建环境读取配置
    ///
    /// - `PRODUCER_POINT_API_URL`
    /// - `PRODUCER_POINT_TOKEN_KEY`
    /// - `PRODUCER_POINT_NOTICE_MS`
    pub fn from_build_env() -> Self {
        Self::resolve(
            option_env!("PRODUCER_POINT_API_URL"),
            option_env!("PRODUCER_POINT_TOKEN_KEY"),
            option_env!("PRODUCER_POINT_NOTICE_MS"),
        )
    }

    fn resolve(api_url: Option<&str>, token_key: Option<&str>, notice_ms: Option<&str>) -> Self {
        Self {
            api_base_url: api_url
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(DEFAULT_API_URL)
                .to_string(),
            token_storage_key: token_key
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(DEFAULT_TOKEN_KEY)
                .to_string(),
            notice_millis: notice_ms
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_NOTICE_MILLIS),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::resolve(None, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_unset_or_blank() {
        let config = AppConfig::resolve(None, Some("  "), Some("soon"));
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.token_storage_key, DEFAULT_TOKEN_KEY);
        assert_eq!(config.notice_millis, DEFAULT_NOTICE_MILLIS);
    }

    #[test]
    fn test_overrides_are_used() {
        let config = AppConfig::resolve(Some("https://api.example.com"), Some("tok"), Some("1500"));
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.token_storage_key, "tok");
        assert_eq!(config.notice_millis, 1500);
    }
}
