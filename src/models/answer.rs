use serde::Serialize;

/// 回答内容 + 关键词
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answer {
    pub answer: String,
    pub keywords: Vec<String>,
}

/// 公开题目作答请求体；没有关键词时不发送 `keywords` 字段
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyAnswer {
    pub id: i64,
    pub answer: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerBody {
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeywordsBody {
    pub keywords: Vec<String>,
}

/// 收藏单个题目
#[derive(Debug, Clone, Serialize)]
pub struct ScrapBody {
    pub id: i64,
}

/// 批量取消收藏
#[derive(Debug, Clone, Serialize)]
pub struct ScrapIdsBody {
    pub ids: Vec<i64>,
}
