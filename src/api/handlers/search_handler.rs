use axum::{
    Json,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, warn};

use crate::{
    api::app_state::AppState,
    error::AppError,
    services::upstream::UpstreamReply,
};

/// 追踪 ID 请求头
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// 搜索网关处理程序
///
/// 入站请求体逐字节转发到上游 `/search`；上游交换完成后原样转发
/// 状态码、Content-Type 与响应体，传输失败映射为 502。
pub async fn proxy_search(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = std::time::Instant::now();

    let trace_id = headers
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| state.trace.generate());

    debug!(
        trace_id = %trace_id,
        bytes = body.len(),
        "Forwarding search request to upstream"
    );

    let outcome = state.upstream.search(&trace_id, body.to_vec()).await;
    state
        .metrics
        .record_proxy_request(start.elapsed().as_millis() as u64);

    match outcome {
        Ok(reply) => {
            debug!(trace_id = %trace_id, status = reply.status, "Relaying upstream response");
            relay(reply)
        }
        Err(err) => {
            state.metrics.record_upstream_failure();
            let detail = match err {
                AppError::Upstream(detail) | AppError::Timeout(detail) => detail,
                other => other.to_string(),
            };
            warn!(trace_id = %trace_id, detail = %detail, "Upstream search call failed");

            (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "error": "Upstream query-service unreachable",
                    "detail": detail,
                })),
            )
                .into_response()
        }
    }
}

/// 原样转发上游状态码、Content-Type 与响应体
fn relay(reply: UpstreamReply) -> Response {
    let content_type = reply
        .content_type
        .as_deref()
        .and_then(|value| HeaderValue::from_str(value).ok())
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    let mut response = Response::new(Body::from(reply.body));
    *response.status_mut() = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, content_type);
    response
}

/// 非 POST 方法的固定 405 响应，Allow 头声明接受的方法
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        Json(json!({ "error": "Method not allowed" })),
    )
}
