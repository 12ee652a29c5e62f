//! Search Routes
//!
//! 定义搜索网关的 API 路由。

use crate::api::handlers::search_handler::{method_not_allowed, proxy_search};
use axum::{Router, routing::post};

use crate::api::app_state::AppState;

/// 创建搜索路由器
pub fn create_search_router() -> Router<AppState> {
    Router::new().route(
        "/search",
        post(proxy_search).fallback(method_not_allowed),
    )
}
