use phf::phf_map;
use serde::{Deserialize, Serialize};

use crate::error::BusinessError;

/// 职务分类（固定 12 项，ID 1..=12）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Category {
    /// 공통
    Common = 1,
    /// 인턴
    Intern = 2,
    /// 대외활동
    ExternalActivity = 3,
    /// 디자인
    Design = 4,
    /// 경영기획
    ManagementPlanning = 5,
    /// 회계
    Accounting = 6,
    /// 생산/품질관리
    ProductionQuality = 7,
    /// 인사
    HumanResources = 8,
    /// 마케팅
    Marketing = 9,
    /// 영업
    Sales = 10,
    /// IT/개발
    ItDevelopment = 11,
    /// 연구개발(R&D)
    ResearchDevelopment = 12,
}

static CATEGORY_BY_NAME: phf::Map<&'static str, Category> = phf_map! {
    "공통" => Category::Common,
    "인턴" => Category::Intern,
    "대외활동" => Category::ExternalActivity,
    "디자인" => Category::Design,
    "경영기획" => Category::ManagementPlanning,
    "회계" => Category::Accounting,
    "생산/품질관리" => Category::ProductionQuality,
    "인사" => Category::HumanResources,
    "마케팅" => Category::Marketing,
    "영업" => Category::Sales,
    "IT/개발" => Category::ItDevelopment,
    "연구개발(R&D)" => Category::ResearchDevelopment,
};

impl Category {
    const ALL: [Category; 12] = [
        Category::Common,
        Category::Intern,
        Category::ExternalActivity,
        Category::Design,
        Category::ManagementPlanning,
        Category::Accounting,
        Category::ProductionQuality,
        Category::HumanResources,
        Category::Marketing,
        Category::Sales,
        Category::ItDevelopment,
        Category::ResearchDevelopment,
    ];

    /// 获取分类 ID
    pub fn id(self) -> i64 {
        self as i64
    }

    /// 获取展示名称
    pub fn name(self) -> &'static str {
        match self {
            Category::Common => "공통",
            Category::Intern => "인턴",
            Category::ExternalActivity => "대외활동",
            Category::Design => "디자인",
            Category::ManagementPlanning => "경영기획",
            Category::Accounting => "회계",
            Category::ProductionQuality => "생산/품질관리",
            Category::HumanResources => "인사",
            Category::Marketing => "마케팅",
            Category::Sales => "영업",
            Category::ItDevelopment => "IT/개발",
            Category::ResearchDevelopment => "연구개발(R&D)",
        }
    }

    /// 从 ID 解析分类
    pub fn from_id(id: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.id() == id)
    }

    /// 从展示名称解析分类（精确匹配）
    pub fn from_name(name: &str) -> Option<Self> {
        CATEGORY_BY_NAME.get(name.trim()).copied()
    }

    /// 所有分类，按 ID 排序
    pub fn all() -> &'static [Category] {
        &Self::ALL
    }

    /// 把多个分类拼成查询参数，例如 "1,3,11"
    pub fn join_ids(categories: &[Category]) -> String {
        categories
            .iter()
            .map(|c| c.id().to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl TryFrom<i64> for Category {
    type Error = BusinessError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        Category::from_id(id).ok_or(BusinessError::InvalidCategoryId(id))
    }
}

impl From<Category> for i64 {
    fn from(category: Category) -> Self {
        category.id()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
