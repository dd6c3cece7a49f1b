use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Category;

/// 公开（그린룸）题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: i64,
    #[serde(default)]
    pub category_name: String,
    pub question: String,
    /// 参与回答的人数
    #[serde(default)]
    pub participants: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<NaiveDateTime>,
}

/// 人气公开题目，额外带作者信息和参与者头像
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularPublicQuestion {
    pub id: i64,
    #[serde(default)]
    pub category_name: String,
    pub question: String,
    #[serde(default)]
    pub participants: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writer_name: Option<String>,
    #[serde(default)]
    pub profile_images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<NaiveDateTime>,
}

/// 我创建的公开题目（`create-questions` 分页列表中的一项）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyPublicQuestion {
    pub id: i64,
    #[serde(default)]
    pub category_name: String,
    pub question: String,
    #[serde(default)]
    pub participants: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<NaiveDateTime>,
}

/// 我的（私有）题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateQuestion {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Category>,
    #[serde(default)]
    pub category_name: String,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_category_name: Option<String>,
}

/// 私有题目详情：题目头信息 + 回答 + 关键词
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateAnswer {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_category_name: Option<String>,
    #[serde(default)]
    pub category_name: String,
    pub question: String,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl PrivateAnswer {
    /// 空白回答视为未作答
    pub fn written_answer(&self) -> Option<&str> {
        self.answer
            .as_deref()
            .filter(|answer| !answer.trim().is_empty())
    }
}

/// 关键词练习的参考题目（分页搜索结果）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceQuestion {
    pub id: i64,
    pub question: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub question_type: String,
}

/// 创建/修改私有题目的请求体
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPrivateQuestion {
    pub category_id: Category,
    pub question: String,
}

/// 创建公开题目的请求体
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPublicQuestion {
    pub category_id: Category,
    pub question: String,
    pub expired_at: NaiveDateTime,
}
