//! 页面 view model 层
//!
//! 每个页面一个 view model，通过 `ViewModel::transform` 把界面事件转换成界面状态。

pub mod create_question;
pub mod filtering;
pub mod group_edit;
pub mod main_greenroom;
pub mod mode;
pub mod paging;
pub mod private_answer;
pub mod public_answer;
pub mod register_keyword;
pub mod scrap;
pub mod transform;

pub use create_question::{
    CreateQuestionInput, CreateQuestionOutput, CreateQuestionViewModel, QuestionTarget,
};
pub use filtering::{FilterMode, FilteringInput, FilteringOutput, FilteringViewModel, SectionHeader};
pub use group_edit::{GroupEditInput, GroupEditMode, GroupEditOutput, GroupEditViewModel};
pub use main_greenroom::{MainGreenRoomInput, MainGreenRoomOutput, MainGreenRoomViewModel};
pub use mode::{AnswerEvent, AnswerMode};
pub use paging::{
    MyPublicQuestionsSource, PageSource, PagedListInput, PagedListOutput, PagedListViewModel,
    PagingController, ReferenceQuestionsSource, ScrollPosition,
};
pub use private_answer::{PrivateAnswerInput, PrivateAnswerOutput, PrivateAnswerViewModel};
pub use public_answer::{PublicAnswerInput, PublicAnswerOutput, PublicAnswerViewModel};
pub use register_keyword::{
    KeywordTarget, RegisterKeywordInput, RegisterKeywordOutput, RegisterKeywordViewModel,
};
pub use scrap::{QuestionCellDelegate, ScrapInput, ScrapOutput, ScrapViewModel};
pub use transform::{
    signal, DisposeBag, FlatMapPolicy, Signal, SignalEmitter, ViewModel,
};
