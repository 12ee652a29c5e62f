//! 上游检索服务客户端
//!
//! 将搜索请求体原样转发到上游 `/search`，并带回未经解析的响应。

use async_trait::async_trait;
use std::time::Duration;

use crate::config::config::UpstreamConfig;
use crate::error::{AppError, Result};

/// 一次上游交换的原样结果
///
/// 状态码、Content-Type 与响应体均不做解析，由网关逐字节转发。
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// 转发一次搜索请求
    ///
    /// 仅当传输层本身失败（连接拒绝、DNS、超时、读体失败）时返回错误；
    /// 上游的非 2xx 状态码属于成功交换。
    async fn search(&self, trace_id: &str, body: Vec<u8>) -> Result<UpstreamReply>;
}

/// 基于 reqwest 的上游客户端
pub struct HttpUpstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn search(&self, trace_id: &str, body: Vec<u8>) -> Result<UpstreamReply> {
        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("Content-Type", "application/json")
            .header("X-Trace-Id", trace_id)
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?
            .to_vec();

        Ok(UpstreamReply {
            status,
            content_type,
            body,
        })
    }
}

pub fn create_upstream_client(config: &UpstreamConfig) -> Result<Box<dyn UpstreamClient>> {
    Ok(Box::new(HttpUpstreamClient::new(config)?))
}
