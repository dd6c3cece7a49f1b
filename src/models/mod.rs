pub mod answer;
pub mod category;
pub mod group;
pub mod page;
pub mod question;

pub use answer::{Answer, AnswerBody, ApplyAnswer, KeywordsBody, ScrapBody, ScrapIdsBody};
pub use category::Category;
pub use group::{Group, GroupDetail, GroupQuestion, UpsertGroup};
pub use page::Page;
pub use question::{
    MyPublicQuestion, PopularPublicQuestion, PrivateAnswer, PrivateQuestion, PublicQuestion,
    ReferenceQuestion, UploadPrivateQuestion, UploadPublicQuestion,
};
