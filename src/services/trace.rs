//! 追踪 ID 生成
//!
//! 为没有携带 X-Trace-Id 的请求生成跨服务关联用的追踪标识。

use uuid::Uuid;

/// 请求级追踪 ID 生成器
pub trait TraceIdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// 基于 UUID v4 的生成器
pub struct UuidTraceIdGenerator {
    prefix: String,
}

impl UuidTraceIdGenerator {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }
}

impl TraceIdGenerator for UuidTraceIdGenerator {
    fn generate(&self) -> String {
        format!("{}-{}", self.prefix, Uuid::new_v4())
    }
}

pub fn create_trace_id_generator() -> Box<dyn TraceIdGenerator> {
    Box::new(UuidTraceIdGenerator::new("frontend"))
}
