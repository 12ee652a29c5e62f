//! Heron - 混合检索搜索控制台
//!
//! 为混合检索系统提供搜索控制台：服务端网关将搜索请求转发给上游检索服务，
//! 客户端视图模型按评分维度对已排序的结果进行重排与截断。

pub mod api;
pub mod config;
pub mod error;
pub mod observability;
pub mod services;
