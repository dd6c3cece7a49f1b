use serde::{Deserialize, Serialize};

/// 分页响应
///
/// 后端返回 `currentPages`（从 0 开始）和当前页的数据；
/// 部分接口还会返回 `totalPages`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub current_pages: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    #[serde(default, alias = "questions", alias = "content")]
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// 是否还有下一页
    ///
    /// 有 `totalPages` 时以它为准，否则按"本页是否装满"判断。
    pub fn has_next_page(&self, page_size: usize) -> bool {
        match self.total_pages {
            Some(total) => self.current_pages + 1 < total,
            None => page_size > 0 && self.items.len() >= page_size,
        }
    }
}
