//! 结果视图模型
//!
//! 纯函数：按所选评分维度对上游返回的已排序结果重排并截断，供界面渲染。

use std::cmp::Ordering;

use crate::api::dto::search_dto::{ResultItem, SearchMode, SearchResponse};

/// 模式对应的排序键
fn sort_key(item: &ResultItem, mode: SearchMode) -> f64 {
    match mode {
        SearchMode::Lexical => item.lexical_score,
        SearchMode::Semantic => item.semantic_score,
        SearchMode::Hybrid => item.score,
    }
}

/// 从响应推导展示列表
///
/// 来源选择：`results` 非空时优先，否则回退到 `ranked_results`，
/// 两者都缺失时为空列表。按所选键稳定降序排序，同分保持来源顺序；
/// 截断到 `min(top_k, len)`，`top_k < 1` 防御性地按 1 处理。
/// 不修改输入，排序前先拷贝。
pub fn view_results(response: &SearchResponse, mode: SearchMode, top_k: u32) -> Vec<ResultItem> {
    let source: &[ResultItem] = match (&response.results, &response.ranked_results) {
        (Some(results), _) if !results.is_empty() => results,
        (_, Some(ranked)) => ranked,
        _ => &[],
    };

    let mut items = source.to_vec();
    items.sort_by(|a, b| {
        sort_key(b, mode)
            .partial_cmp(&sort_key(a, mode))
            .unwrap_or(Ordering::Equal)
    });
    items.truncate(top_k.max(1) as usize);
    items
}
