//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 发送请求，并通过 `HttpTransport` trait 与上层解耦，
//! 测试中可替换为内存实现。

use async_trait::async_trait;
use producer_point_shared::protocol::HttpMethod;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

/// HTTP 错误类型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HttpError {
    /// 请求构建失败
    #[error("请求构建失败: {0}")]
    RequestBuildFailed(String),
    /// 网络请求失败
    #[error("网络错误: {0}")]
    NetworkError(String),
    /// 响应解析失败
    #[error("响应解析失败: {0}")]
    ResponseParseFailed(String),
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    /// 添加请求头
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// 设置请求体
    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

/// 通用 HTTP 响应结构（状态码 + 文本）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// HTTP 传输层特性 (Trait)
///
/// 浏览器环境下的 future 不是 `Send` 的，因此使用 `?Send`。
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError>;
}

// =========================================================
// 实现层: 浏览器 fetch
// =========================================================

/// 基于 `window.fetch` 的传输实现
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let headers = Headers::new()
            .map_err(|e| HttpError::RequestBuildFailed(format!("创建 Headers 失败: {:?}", e)))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| HttpError::RequestBuildFailed(format!("设置 Header 失败: {:?}", e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| HttpError::RequestBuildFailed(format!("{:?}", e)))?;

        let window = web_sys::window()
            .ok_or_else(|| HttpError::NetworkError("无法获取 window 对象".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| HttpError::NetworkError(format!("{:?}", e)))?;

        let response: Response = resp_value.dyn_into().map_err(|e| {
            HttpError::ResponseParseFailed(format!("Response 类型转换失败: {:?}", e))
        })?;

        let status = response.status();
        let promise = response
            .text()
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;
        let body = text
            .as_string()
            .ok_or_else(|| HttpError::ResponseParseFailed("无法转换为字符串".to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// 实现层: 测试用脚本化传输
// =========================================================

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    impl HttpRequest {
        /// 按名称查找请求头（不区分大小写）
        pub fn header(&self, key: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v.as_str())
        }
    }

    /// 按顺序返回预设响应，并记录收到的请求
    #[derive(Clone, Default)]
    pub struct ScriptedTransport {
        responses: Rc<RefCell<VecDeque<Result<HttpResponse, HttpError>>>>,
        pub sent: Rc<RefCell<Vec<HttpRequest>>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, status: u16, body: &str) -> Self {
            self.responses
                .borrow_mut()
                .push_back(Ok(HttpResponse::new(status, body)));
            self
        }

        pub fn fail(self, msg: &str) -> Self {
            self.responses
                .borrow_mut()
                .push_back(Err(HttpError::NetworkError(msg.to_string())));
            self
        }

        pub fn sent_count(&self) -> usize {
            self.sent.borrow().len()
        }

        pub fn last_sent(&self) -> Option<HttpRequest> {
            self.sent.borrow().last().cloned()
        }
    }

    #[async_trait(?Send)]
    impl HttpTransport for ScriptedTransport {
        async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
            self.sent.borrow_mut().push(req);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(HttpError::NetworkError("no scripted response".into())))
        }
    }

    #[tokio::test]
    async fn test_scripted_transport_replays_in_order() {
        let transport = ScriptedTransport::new().respond(200, "[]").fail("offline");

        let first = transport
            .send(HttpRequest::new("http://api/x", HttpMethod::Get))
            .await;
        assert_eq!(first, Ok(HttpResponse::new(200, "[]")));

        let second = transport
            .send(HttpRequest::new("http://api/y", HttpMethod::Post))
            .await;
        assert!(matches!(second, Err(HttpError::NetworkError(_))));

        // Exhausted script behaves like a dead network
        let third = transport
            .send(HttpRequest::new("http://api/z", HttpMethod::Get))
            .await;
        assert!(third.is_err());
        assert_eq!(transport.sent_count(), 3);
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = HttpRequest::new("http://api", HttpMethod::Get)
            .with_header("Authorization", "Bearer t");
        assert_eq!(req.header("authorization"), Some("Bearer t"));
        assert_eq!(req.header("Content-Type"), None);
    }
}
