//! 搜索控制台控制器
//!
//! 持有控制台表单状态，并以显式状态机驱动一次搜索提交的完整生命周期：
//! `Idle → Submitting → {Success, Failed}`，成功或失败后可再次提交。

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::api::dto::search_dto::{
    ResultItem, SearchMode, SearchRequest, SearchResponse, SourceFilter,
};
use crate::error::{AppError, Result};
use crate::services::trace::TraceIdGenerator;
use crate::services::viewmodel::view_results;

/// 网关响应（控制器视角，未解析）
#[derive(Debug, Clone)]
pub struct BackendReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl BackendReply {
    /// 状态码是否在 2xx 范围
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 控制台到网关的调用通道
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, request: &SearchRequest, trace_id: &str) -> Result<BackendReply>;
}

/// 基于 reqwest 的网关客户端
pub struct HttpSearchBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSearchBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, request: &SearchRequest, trace_id: &str) -> Result<BackendReply> {
        let response = self
            .client
            .post(format!("{}/api/search", self.base_url))
            .header("X-Trace-Id", trace_id)
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(BackendReply { status, body })
    }
}

pub fn create_search_backend(base_url: &str) -> Result<Box<dyn SearchBackend>> {
    Ok(Box::new(HttpSearchBackend::new(base_url)?))
}

/// 控制台状态机
///
/// `Success` 持有当前结果集，`Failed` 持有用户可见的错误消息；
/// 新的提交整体替换旧状态，不做合并。
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConsoleState {
    #[default]
    Idle,
    Submitting,
    Success(SearchResponse),
    Failed(String),
}

/// 搜索控制台控制器
pub struct SearchConsoleController {
    backend: Arc<dyn SearchBackend>,
    trace: Arc<dyn TraceIdGenerator>,
    /// 查询文本
    pub query: String,
    /// 展示结果数量上限
    pub top_k: u32,
    /// 评分模式
    pub mode: SearchMode,
    /// 结果来源过滤
    pub filter: SourceFilter,
    state: ConsoleState,
}

impl SearchConsoleController {
    pub fn new(backend: Box<dyn SearchBackend>, trace: Box<dyn TraceIdGenerator>) -> Self {
        Self {
            backend: Arc::from(backend),
            trace: Arc::from(trace),
            query: String::new(),
            top_k: 20,
            mode: SearchMode::Hybrid,
            filter: SourceFilter::None,
            state: ConsoleState::Idle,
        }
    }

    pub fn state(&self) -> &ConsoleState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ConsoleState::Submitting)
    }

    /// 提交按钮文案，提交中显示忙碌标签
    pub fn submit_label(&self) -> &'static str {
        if self.is_loading() {
            "Searching..."
        } else {
            "Search"
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ConsoleState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn current_result(&self) -> Option<&SearchResponse> {
        match &self.state {
            ConsoleState::Success(response) => Some(response),
            _ => None,
        }
    }

    /// 当前模式/topK 下的展示列表
    ///
    /// 仅在 `Success` 状态下非空；模式或 topK 变化后重新调用即可。
    pub fn view_results(&self) -> Vec<ResultItem> {
        match &self.state {
            ConsoleState::Success(response) => view_results(response, self.mode, self.top_k),
            _ => Vec::new(),
        }
    }

    /// 提交一次搜索
    ///
    /// 提交中忽略重复提交；请求字段在发送前捕获，topK 钳制到 >= 1。
    /// 2xx 响应解析为 `SearchResponse` 进入 `Success`，其余情况进入
    /// `Failed` 并清空旧结果。
    pub async fn submit(&mut self) -> &ConsoleState {
        if self.is_loading() {
            return &self.state;
        }

        let request = SearchRequest {
            query: self.query.clone(),
            top_k: self.top_k.max(1),
            mode: self.mode,
            filter: self.filter,
        };
        self.state = ConsoleState::Submitting;

        let trace_id = self.trace.generate();
        debug!(trace_id = %trace_id, query = %request.query, "Submitting search");

        self.state = match self.backend.search(&request, &trace_id).await {
            Ok(reply) if reply.is_ok() => {
                match serde_json::from_slice::<SearchResponse>(&reply.body) {
                    Ok(parsed) => ConsoleState::Success(parsed),
                    Err(e) => ConsoleState::Failed(format!("Invalid response payload: {}", e)),
                }
            }
            Ok(reply) => ConsoleState::Failed(failure_message(&reply)),
            Err(err) => {
                let message = err.to_string();
                ConsoleState::Failed(if message.is_empty() {
                    "Request failed".to_string()
                } else {
                    message
                })
            }
        };

        &self.state
    }
}

/// 从非 2xx 网关响应提取用户可见的错误消息
///
/// 优先取响应体中的 `error` / `message` 字段，否则回退到通用文案。
fn failure_message(reply: &BackendReply) -> String {
    if let Ok(body) = serde_json::from_slice::<serde_json::Value>(&reply.body) {
        for key in ["error", "message"] {
            if let Some(text) = body.get(key).and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }

    format!("Query failed with status {}", reply.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::trace::create_trace_id_generator;
    use serde_json::json;

    fn reply(status: u16, body: serde_json::Value) -> BackendReply {
        BackendReply {
            status,
            body: body.to_string().into_bytes(),
        }
    }

    fn controller_with(mock: MockSearchBackend) -> SearchConsoleController {
        SearchConsoleController::new(Box::new(mock), create_trace_id_generator())
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let controller = controller_with(MockSearchBackend::new());
        assert_eq!(*controller.state(), ConsoleState::Idle);
        assert!(!controller.is_loading());
        assert_eq!(controller.submit_label(), "Search");
        assert!(controller.view_results().is_empty());
    }

    #[tokio::test]
    async fn test_successful_submission_holds_parsed_response() {
        let mut mock = MockSearchBackend::new();
        mock.expect_search().times(1).returning(|_, _| {
            Ok(reply(
                200,
                json!({
                    "traceId": "t-1",
                    "results": [
                        {"id": "a", "score": 0.2},
                        {"id": "b", "score": 0.9}
                    ]
                }),
            ))
        });

        let mut controller = controller_with(mock);
        controller.query = "wireless headphones".into();
        controller.top_k = 1;

        controller.submit().await;

        let result = controller.current_result().unwrap();
        assert_eq!(result.trace_id.as_deref(), Some("t-1"));
        assert!(controller.error().is_none());

        let view = controller.view_results();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, "b");
    }

    #[tokio::test]
    async fn test_top_k_is_clamped_before_send() {
        let mut mock = MockSearchBackend::new();
        mock.expect_search()
            .withf(|request, _| request.top_k == 1)
            .times(1)
            .returning(|_, _| Ok(reply(200, json!({"results": []}))));

        let mut controller = controller_with(mock);
        controller.top_k = 0;

        controller.submit().await;
        assert!(matches!(controller.state(), ConsoleState::Success(_)));
    }

    #[tokio::test]
    async fn test_non_ok_status_prefers_error_from_body() {
        let mut mock = MockSearchBackend::new();
        mock.expect_search()
            .times(1)
            .returning(|_, _| Ok(reply(502, json!({"error": "Upstream query-service unreachable"}))));

        let mut controller = controller_with(mock);
        controller.submit().await;

        assert_eq!(
            controller.error(),
            Some("Upstream query-service unreachable")
        );
        assert!(controller.current_result().is_none());
    }

    #[tokio::test]
    async fn test_non_ok_status_without_body_uses_generic_message() {
        let mut mock = MockSearchBackend::new();
        mock.expect_search().times(1).returning(|_, _| {
            Ok(BackendReply {
                status: 500,
                body: Vec::new(),
            })
        });

        let mut controller = controller_with(mock);
        controller.submit().await;

        assert_eq!(controller.error(), Some("Query failed with status 500"));
    }

    #[tokio::test]
    async fn test_transport_error_surfaces_message() {
        let mut mock = MockSearchBackend::new();
        mock.expect_search()
            .times(1)
            .returning(|_, _| Err(AppError::Upstream("connection refused".into())));

        let mut controller = controller_with(mock);
        controller.submit().await;

        let message = controller.error().unwrap();
        assert!(!message.is_empty());
        assert!(controller.view_results().is_empty());
    }

    #[tokio::test]
    async fn test_failure_clears_previous_result() {
        let mut mock = MockSearchBackend::new();
        let mut sequence = mockall::Sequence::new();
        mock.expect_search()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Ok(reply(200, json!({"results": [{"id": "a", "score": 1.0}]}))));
        mock.expect_search()
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_, _| Err(AppError::Upstream("connection reset".into())));

        let mut controller = controller_with(mock);

        controller.submit().await;
        assert!(controller.current_result().is_some());

        controller.submit().await;
        assert!(controller.current_result().is_none());
        assert!(controller.error().is_some());
    }

    #[tokio::test]
    async fn test_mode_change_reorders_without_resubmitting() {
        let mut mock = MockSearchBackend::new();
        mock.expect_search().times(1).returning(|_, _| {
            Ok(reply(
                200,
                json!({
                    "results": [
                        {"id": "a", "score": 0.9, "lexicalScore": 0.1},
                        {"id": "b", "score": 0.1, "lexicalScore": 0.9}
                    ]
                }),
            ))
        });

        let mut controller = controller_with(mock);
        controller.submit().await;

        assert_eq!(controller.view_results()[0].id, "a");

        controller.mode = SearchMode::Lexical;
        assert_eq!(controller.view_results()[0].id, "b");
    }
}
