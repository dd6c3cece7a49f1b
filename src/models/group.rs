use serde::{Deserialize, Serialize};

use super::Category;

/// 用户自建的题目分组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub category_id: Category,
    #[serde(default)]
    pub question_cnt: u32,
}

/// 分组中的题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupQuestion {
    pub id: i64,
    pub question: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// 分组详情
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDetail {
    pub id: i64,
    pub name: String,
    pub category_id: Category,
    #[serde(default)]
    pub questions: Vec<GroupQuestion>,
}

/// 创建/修改分组的请求体
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertGroup {
    pub name: String,
    pub category_id: Category,
}
