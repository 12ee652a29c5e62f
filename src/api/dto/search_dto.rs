//! 搜索 DTO
//!
//! 定义搜索相关的请求和响应数据结构。

use serde::{Deserialize, Serialize};

/// 评分模式
///
/// 未识别的值一律归入 `Hybrid`，保持控制台默认排序行为。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SearchMode {
    /// 按词法分数排序
    Lexical,
    /// 按语义分数排序
    Semantic,
    /// 按综合分数排序（默认）
    #[default]
    Hybrid,
}

impl From<String> for SearchMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "lexical" => SearchMode::Lexical,
            "semantic" => SearchMode::Semantic,
            _ => SearchMode::Hybrid,
        }
    }
}

/// 结果来源过滤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceFilter {
    /// 不过滤
    #[default]
    None,
    /// 仅 Solr 命中
    Solr,
    /// 仅向量命中
    Vector,
}

/// 搜索请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    /// 搜索查询
    pub query: String,
    /// 返回结果数量，控制器保证 >= 1
    pub top_k: u32,
    /// 评分模式
    pub mode: SearchMode,
    /// 结果来源过滤
    pub filter: SourceFilter,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            top_k: 1,
            mode: SearchMode::default(),
            filter: SourceFilter::default(),
        }
    }
}

/// 搜索结果项
///
/// 缺失的分数字段一律按 0 处理。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ResultItem {
    /// 文档 ID
    pub id: String,
    /// 标题
    pub title: Option<String>,
    /// 综合分数
    pub score: f64,
    /// 词法分数
    pub lexical_score: f64,
    /// 语义分数
    pub semantic_score: f64,
}

/// 搜索响应
///
/// `results` 与 `ranked_results` 通常只有一个被填充；两者都缺失时
/// 视为空结果列表。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResponse {
    /// 追踪 ID
    pub trace_id: Option<String>,
    /// 上游状态
    pub status: Option<String>,
    /// 上游消息
    pub message: Option<String>,
    /// 结果列表
    pub results: Option<Vec<ResultItem>>,
    /// 已排序结果列表
    pub ranked_results: Option<Vec<ResultItem>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_wire_format() {
        let request = SearchRequest {
            query: "wireless headphones".into(),
            top_k: 20,
            mode: SearchMode::Hybrid,
            filter: SourceFilter::None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["query"], "wireless headphones");
        assert_eq!(json["topK"], 20);
        assert_eq!(json["mode"], "hybrid");
        assert_eq!(json["filter"], "none");
    }

    #[test]
    fn test_unknown_mode_defaults_to_hybrid() {
        let mode: SearchMode = serde_json::from_str(r#""recency""#).unwrap();
        assert_eq!(mode, SearchMode::Hybrid);
    }

    #[test]
    fn test_result_item_missing_scores_default_to_zero() {
        let item: ResultItem = serde_json::from_str(r#"{"id":"doc-1"}"#).unwrap();
        assert_eq!(item.id, "doc-1");
        assert_eq!(item.title, None);
        assert_eq!(item.score, 0.0);
        assert_eq!(item.lexical_score, 0.0);
        assert_eq!(item.semantic_score, 0.0);
    }

    #[test]
    fn test_search_response_tolerates_partial_payload() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"traceId":"t-1","rankedResults":[{"id":"a","score":0.5}]}"#)
                .unwrap();

        assert_eq!(response.trace_id.as_deref(), Some("t-1"));
        assert!(response.results.is_none());
        assert_eq!(response.ranked_results.unwrap().len(), 1);
    }
}
