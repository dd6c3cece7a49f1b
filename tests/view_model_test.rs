mod support;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::{Duration, Local};
use reqwest::StatusCode;
use tokio::sync::watch;

use greenroom_client::error::{REQUEST_IN_PROGRESS_MESSAGE, UNKNOWN_ERROR_MESSAGE};
use greenroom_client::models::{
    Answer, Category, GroupDetail, GroupQuestion, MyPublicQuestion, Page, PopularPublicQuestion,
    PublicQuestion,
};
use greenroom_client::viewmodel::create_question::{CREATE_SUCCESS_MESSAGE, QUESTION_PLACEHOLDER};
use greenroom_client::viewmodel::filtering::FILTERING_SUBTITLE;
use greenroom_client::viewmodel::group_edit::{GROUP_CREATED_MESSAGE, GROUP_UPDATED_MESSAGE};
use greenroom_client::viewmodel::*;

use support::*;

fn create_input(
    question: &str,
    category: Option<Category>,
) -> (SignalEmitter<()>, CreateQuestionInput) {
    let (_question_tx, question) = watch::channel(question.to_string());
    let (_category_tx, category) = watch::channel(category);
    let (submit, submit_rx) = signal();
    (
        submit,
        CreateQuestionInput {
            question,
            category,
            submit: submit_rx,
            expiry_minutes: None,
        },
    )
}

// ========== 题目创建 ==========

#[tokio::test]
async fn private_question_upload_reports_success() {
    let service = Arc::new(FakePrivateQuestions::default());
    let (submit, input) = create_input("테스트", Category::from_id(3));
    let mut output =
        CreateQuestionViewModel::new(QuestionTarget::Private(service.clone())).transform(input);

    assert!(*output.is_valid.borrow());
    submit.emit(());

    assert_eq!(next_signal(&mut output.success_message).await, CREATE_SUCCESS_MESSAGE);
    assert_eq!(
        service.uploads.lock().unwrap().as_slice(),
        &[(Category::ExternalActivity, "테스트".to_string())]
    );
}

#[tokio::test]
async fn too_long_question_shows_length_message() {
    let service = Arc::new(FakePrivateQuestions::failing(StatusCode::BAD_REQUEST));
    let (submit, input) = create_input(&"가".repeat(51), Some(Category::Common));
    let mut output =
        CreateQuestionViewModel::new(QuestionTarget::Private(service.clone())).transform(input);

    submit.emit(());

    assert_eq!(
        next_signal(&mut output.fail_message).await,
        "질문의 길이는 50자 이하여야 합니다."
    );
    assert!(service.uploads.lock().unwrap().is_empty());
    assert!(output.success_message.try_next().is_none());
}

#[tokio::test]
async fn empty_or_placeholder_question_never_calls_backend() {
    for text in ["", "   ", QUESTION_PLACEHOLDER] {
        let service = Arc::new(FakePrivateQuestions::default());
        let (submit, input) = create_input(text, Some(Category::Common));
        let mut output =
            CreateQuestionViewModel::new(QuestionTarget::Private(service.clone())).transform(input);

        assert!(!*output.is_valid.borrow());
        submit.emit(());
        settle().await;

        assert_eq!(service.upload_calls.load(Ordering::SeqCst), 0);
        assert!(output.success_message.try_next().is_none());
        assert!(output.fail_message.try_next().is_none());
    }
}

#[tokio::test]
async fn validity_follows_category_selection() {
    let (_question_tx, question) = watch::channel("테스트".to_string());
    let (category_tx, category) = watch::channel(None);
    let (_submit, submit) = signal();
    let mut output = CreateQuestionViewModel::new(QuestionTarget::Private(Arc::new(
        FakePrivateQuestions::default(),
    )))
    .transform(CreateQuestionInput {
        question,
        category,
        submit,
        expiry_minutes: None,
    });

    assert!(!*output.is_valid.borrow());
    category_tx.send_replace(Some(Category::Design));
    assert!(wait_until(&mut output.is_valid, |valid| *valid).await);
}

#[tokio::test]
async fn double_submit_issues_one_upload() {
    let gate = Gate::closed();
    let service = Arc::new(FakePrivateQuestions::gated(gate.clone()));
    let (submit, input) = create_input("테스트", Some(Category::Common));
    let mut output =
        CreateQuestionViewModel::new(QuestionTarget::Private(service.clone())).transform(input);

    submit.emit(());
    settle().await;
    submit.emit(());
    settle().await;
    assert_eq!(service.upload_calls.load(Ordering::SeqCst), 1);

    gate.open();
    assert_eq!(next_signal(&mut output.success_message).await, CREATE_SUCCESS_MESSAGE);
    settle().await;
    assert_eq!(service.upload_calls.load(Ordering::SeqCst), 1);
    assert!(output.success_message.try_next().is_none());
}

#[tokio::test]
async fn public_question_expires_after_one_day_by_default() {
    let service = Arc::new(FakePublicQuestions::default());
    let (submit, input) = create_input("협업 경험을 말해주세요", Some(Category::Intern));
    let mut output =
        CreateQuestionViewModel::new(QuestionTarget::Public(service.clone())).transform(input);

    let before = Local::now().naive_local();
    submit.emit(());
    next_signal(&mut output.success_message).await;

    let expiries = service.expiries.lock().unwrap().clone();
    assert_eq!(expiries.len(), 1);
    let window = expiries[0] - before;
    assert!(window >= Duration::minutes(60 * 24));
    assert!(window < Duration::minutes(60 * 24 + 1));
}

// ========== 分页 ==========

fn my_questions_page(
    current: u32,
    total: u32,
    ids: std::ops::RangeInclusive<i64>,
) -> Page<MyPublicQuestion> {
    Page {
        current_pages: current,
        total_pages: Some(total),
        items: ids.map(my_public_question).collect(),
    }
}

fn paged_list(
    service: Arc<FakePublicQuestions>,
) -> (
    SignalEmitter<()>,
    SignalEmitter<ScrollPosition>,
    PagedListOutput<MyPublicQuestion>,
) {
    let (refresh, refresh_rx) = signal();
    let (scroll, scroll_rx) = signal();
    let source = Arc::new(MyPublicQuestionsSource::new(service));
    let output = PagedListViewModel::new(source, 120.0, 20).transform(PagedListInput {
        refresh: refresh_rx,
        scroll: scroll_rx,
    });
    (refresh, scroll, output)
}

fn near_bottom() -> ScrollPosition {
    ScrollPosition::new(2000.0, 1850.0, 100.0)
}

#[tokio::test]
async fn scrolling_appends_next_page_in_order() {
    let service = Arc::new(FakePublicQuestions {
        pages: vec![my_questions_page(0, 2, 1..=20), my_questions_page(1, 2, 21..=25)],
        ..Default::default()
    });
    let (refresh, scroll, mut output) = paged_list(service.clone());

    refresh.emit(());
    wait_until(&mut output.items, |items| items.len() == 20).await;

    scroll.emit(near_bottom());
    let items = wait_until(&mut output.items, |items| items.len() == 25).await;
    let ids: Vec<i64> = items.iter().map(|q| q.id).collect();
    assert_eq!(ids, (1..=25).collect::<Vec<_>>());

    wait_until(&mut output.has_next_page, |has_next| !has_next).await;
    scroll.emit(near_bottom());
    settle().await;
    assert_eq!(*service.requested_pages.lock().unwrap(), vec![0, 1]);
}

#[tokio::test]
async fn no_fetch_when_last_page_reached() {
    let service = Arc::new(FakePublicQuestions {
        pages: vec![my_questions_page(0, 1, 1..=20)],
        ..Default::default()
    });
    let (refresh, scroll, mut output) = paged_list(service.clone());

    refresh.emit(());
    wait_until(&mut output.items, |items| items.len() == 20).await;
    wait_until(&mut output.is_fetching, |fetching| !fetching).await;

    for offset in [0.0, 1850.0, 1900.0] {
        scroll.emit(ScrollPosition::new(2000.0, offset, 100.0));
    }
    settle().await;
    assert_eq!(*service.requested_pages.lock().unwrap(), vec![0]);
}

#[tokio::test]
async fn scroll_during_fetch_is_ignored() {
    let gate = Gate::closed();
    let service = Arc::new(FakePublicQuestions {
        pages: vec![my_questions_page(0, 3, 1..=20), my_questions_page(1, 3, 21..=40)],
        gate: gate.clone(),
        ..Default::default()
    });
    let (refresh, scroll, mut output) = paged_list(service.clone());

    refresh.emit(());
    wait_until(&mut output.is_fetching, |fetching| *fetching).await;
    scroll.emit(near_bottom());
    scroll.emit(near_bottom());
    settle().await;
    assert_eq!(*service.requested_pages.lock().unwrap(), vec![0]);

    gate.open();
    wait_until(&mut output.items, |items| items.len() == 20).await;
    assert!(!*output.is_fetching.borrow());
}

#[tokio::test]
async fn failed_page_releases_guard_and_reports() {
    let service = Arc::new(FakePublicQuestions::default());
    *service.fail_status.lock().unwrap() = Some(StatusCode::INTERNAL_SERVER_ERROR);
    let (refresh, _scroll, mut output) = paged_list(service);

    refresh.emit(());
    assert_eq!(next_signal(&mut output.fail_message).await, UNKNOWN_ERROR_MESSAGE);
    wait_until(&mut output.is_fetching, |fetching| !fetching).await;
    assert!(output.items.borrow().is_empty());
}

// ========== 收藏 ==========

struct ScrapScreen {
    load: SignalEmitter<()>,
    toggle_edit: SignalEmitter<()>,
    delete_selected: SignalEmitter<()>,
    toggle_scrap: SignalEmitter<i64>,
    output: ScrapOutput,
}

fn scrap_screen(service: Arc<FakeScraps>) -> ScrapScreen {
    let (load, load_rx) = signal();
    let (toggle_edit, toggle_edit_rx) = signal();
    let (delete_selected, delete_selected_rx) = signal();
    let (toggle_scrap, toggle_scrap_rx) = signal();
    let output = ScrapViewModel::new(service).transform(ScrapInput {
        load: load_rx,
        toggle_edit: toggle_edit_rx,
        delete_selected: delete_selected_rx,
        toggle_scrap: toggle_scrap_rx,
    });
    ScrapScreen {
        load,
        toggle_edit,
        delete_selected,
        toggle_scrap,
        output,
    }
}

fn scrap_catalog() -> Vec<PublicQuestion> {
    vec![
        public_question(1, "갈등을 해결한 경험"),
        public_question(2, "실패했던 경험"),
        public_question(3, "지원 동기"),
    ]
}

#[tokio::test]
async fn toggling_scrap_twice_restores_membership() {
    let service = Arc::new(FakeScraps::new(scrap_catalog(), vec![1]));
    let mut screen = scrap_screen(service.clone());

    screen.load.emit(());
    wait_until(&mut screen.output.scrapped, |set| set.contains(&1)).await;

    screen.toggle_scrap.emit(2);
    wait_until(&mut screen.output.scrapped, |set| set.contains(&2)).await;
    assert_eq!(service.ids(), vec![1, 2]);

    screen.toggle_scrap.emit(2);
    wait_until(&mut screen.output.scrapped, |set| !set.contains(&2)).await;
    assert_eq!(service.ids(), vec![1]);
}

#[tokio::test]
async fn selected_scraps_are_deleted_together() {
    let service = Arc::new(FakeScraps::new(scrap_catalog(), vec![1, 2, 3]));
    let mut screen = scrap_screen(service.clone());

    screen.load.emit(());
    wait_until(&mut screen.output.questions, |list| list.len() == 3).await;

    screen.toggle_edit.emit(());
    wait_until(&mut screen.output.is_editing, |editing| *editing).await;
    screen.output.cell_delegate.on_select(1);
    screen.output.cell_delegate.on_select(3);
    wait_until(&mut screen.output.selection, |s| s.len() == 2).await;

    screen.delete_selected.emit(());
    let left = wait_until(&mut screen.output.questions, |list| list.len() == 1).await;
    assert_eq!(left[0].id, 2);
    assert_eq!(service.ids(), vec![2]);
    assert_eq!(service.remove_calls.load(Ordering::SeqCst), 1);
    assert!(screen.output.selection.borrow().is_empty());
}

#[tokio::test]
async fn select_outside_edit_mode_opens_question() {
    let service = Arc::new(FakeScraps::new(scrap_catalog(), vec![1]));
    let mut screen = scrap_screen(service);

    screen.output.cell_delegate.on_select(1);
    assert_eq!(next_signal(&mut screen.output.opened).await, 1);
    assert!(screen.output.selection.borrow().is_empty());
}

#[tokio::test]
async fn failed_scrap_removal_keeps_list() {
    let service = Arc::new(FakeScraps::new(scrap_catalog(), vec![1, 2]));
    let mut screen = scrap_screen(service.clone());

    screen.load.emit(());
    wait_until(&mut screen.output.questions, |list| list.len() == 2).await;

    *service.fail_status.lock().unwrap() = Some(StatusCode::INTERNAL_SERVER_ERROR);
    screen.output.cell_delegate.on_delete(1);

    assert_eq!(next_signal(&mut screen.output.fail_message).await, UNKNOWN_ERROR_MESSAGE);
    assert_eq!(screen.output.questions.borrow().len(), 2);
    assert!(screen.output.scrapped.borrow().contains(&1));
}

#[tokio::test]
async fn toggle_before_load_follows_server_state() {
    let service = Arc::new(FakeScraps::new(scrap_catalog(), vec![1]));
    let mut screen = scrap_screen(service.clone());

    // 列表还没加载，本地看不到 1 已经被收藏
    screen.toggle_scrap.emit(1);
    settle().await;
    assert_eq!(service.ids(), Vec::<i64>::new());
    assert_eq!(service.remove_calls.load(Ordering::SeqCst), 1);

    screen.toggle_scrap.emit(1);
    wait_until(&mut screen.output.scrapped, |set| set.contains(&1)).await;
    assert_eq!(service.ids(), vec![1]);
}

// ========== 我的题目回答 ==========

struct AnswerScreen {
    load: SignalEmitter<()>,
    start: SignalEmitter<()>,
    edit: SignalEmitter<()>,
    text: watch::Sender<String>,
    done: SignalEmitter<()>,
    delete: SignalEmitter<bool>,
    output: PrivateAnswerOutput,
}

fn answer_screen(service: Arc<FakePrivateQuestions>, id: i64) -> AnswerScreen {
    let (load, load_rx) = signal();
    let (start, start_rx) = signal();
    let (edit, edit_rx) = signal();
    let (text, text_rx) = watch::channel(String::new());
    let (done, done_rx) = signal();
    let (delete, delete_rx) = signal();
    let output = PrivateAnswerViewModel::new(id, service).transform(PrivateAnswerInput {
        load: load_rx,
        start_answering: start_rx,
        edit: edit_rx,
        text: text_rx,
        done: done_rx,
        delete: delete_rx,
    });
    AnswerScreen {
        load,
        start,
        edit,
        text,
        done,
        delete,
        output,
    }
}

#[tokio::test]
async fn unwritten_answer_is_written_through_editing() {
    let service = Arc::new(FakePrivateQuestions::with_answer(private_answer(7, None)));
    let mut screen = answer_screen(service.clone(), 7);

    screen.load.emit(());
    wait_until(&mut screen.output.answer, |answer| answer.is_some()).await;
    assert_eq!(*screen.output.mode.borrow(), AnswerMode::Unwritten);

    screen.start.emit(());
    wait_until(&mut screen.output.mode, AnswerMode::is_editing).await;

    screen.text.send_replace("팀 프로젝트에서 일정 조율을 맡았습니다".to_string());
    screen.done.emit(());
    let mode = wait_until(&mut screen.output.mode, |m| m.written_text().is_some()).await;
    assert_eq!(mode.written_text(), Some("팀 프로젝트에서 일정 조율을 맡았습니다"));
    next_signal(&mut screen.output.success_message).await;
    assert_eq!(service.answer_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn written_answer_loads_as_written_and_can_be_edited() {
    let service = Arc::new(FakePrivateQuestions::with_answer(private_answer(7, Some("기존 답변"))));
    let mut screen = answer_screen(service, 7);

    screen.load.emit(());
    let mode = wait_until(&mut screen.output.mode, |m| m.written_text().is_some()).await;
    assert_eq!(mode, AnswerMode::Written("기존 답변".to_string()));

    screen.edit.emit(());
    wait_until(&mut screen.output.mode, AnswerMode::is_editing).await;
}

#[tokio::test]
async fn failed_submit_stays_editing_and_fails_once() {
    let service = Arc::new(FakePrivateQuestions::with_answer(private_answer(7, None)));
    let mut screen = answer_screen(service.clone(), 7);

    screen.load.emit(());
    wait_until(&mut screen.output.answer, |answer| answer.is_some()).await;
    screen.start.emit(());
    wait_until(&mut screen.output.mode, AnswerMode::is_editing).await;

    *service.fail_status.lock().unwrap() = Some(StatusCode::INTERNAL_SERVER_ERROR);
    screen.text.send_replace("답변".to_string());
    screen.done.emit(());

    assert_eq!(next_signal(&mut screen.output.fail_message).await, UNKNOWN_ERROR_MESSAGE);
    settle().await;
    assert_eq!(*screen.output.mode.borrow(), AnswerMode::Editing);
    assert!(screen.output.fail_message.try_next().is_none());
    assert!(screen.output.success_message.try_next().is_none());
}

#[tokio::test]
async fn confirmed_delete_dismisses_screen() {
    let service = Arc::new(FakePrivateQuestions::with_answer(private_answer(7, Some("답변"))));
    let mut screen = answer_screen(service.clone(), 7);

    screen.delete.emit(false);
    settle().await;
    assert_eq!(service.remove_calls.load(Ordering::SeqCst), 0);

    screen.delete.emit(true);
    next_signal(&mut screen.output.dismissed).await;
    assert_eq!(*screen.output.mode.borrow(), AnswerMode::Removed);
}

#[tokio::test]
async fn forbidden_delete_keeps_mode() {
    let service = Arc::new(FakePrivateQuestions::with_answer(private_answer(7, Some("답변"))));
    let mut screen = answer_screen(service.clone(), 7);

    screen.load.emit(());
    wait_until(&mut screen.output.mode, |m| m.written_text().is_some()).await;

    *service.fail_status.lock().unwrap() = Some(StatusCode::FORBIDDEN);
    screen.delete.emit(true);

    assert_eq!(
        next_signal(&mut screen.output.fail_message).await,
        "해당 질문을 삭제할 수 없습니다"
    );
    assert_eq!(*screen.output.mode.borrow(), AnswerMode::Written("답변".to_string()));
    assert!(screen.output.dismissed.try_next().is_none());
}

#[tokio::test]
async fn delete_during_submit_reports_busy() {
    let gate = Gate::closed();
    let service = Arc::new(FakePrivateQuestions {
        answer: std::sync::Mutex::new(Some(private_answer(7, None))),
        gate: gate.clone(),
        ..Default::default()
    });
    let mut screen = answer_screen(service.clone(), 7);

    screen.start.emit(());
    wait_until(&mut screen.output.mode, AnswerMode::is_editing).await;
    screen.text.send_replace("답변".to_string());
    screen.done.emit(());
    settle().await;

    screen.delete.emit(true);
    assert_eq!(
        next_signal(&mut screen.output.fail_message).await,
        REQUEST_IN_PROGRESS_MESSAGE
    );
    assert_eq!(service.remove_calls.load(Ordering::SeqCst), 0);

    gate.open();
    next_signal(&mut screen.output.success_message).await;

    screen.delete.emit(true);
    next_signal(&mut screen.output.dismissed).await;
    assert_eq!(service.remove_calls.load(Ordering::SeqCst), 1);
}

// ========== 公开题目回答 ==========

#[tokio::test]
async fn non_owner_cannot_edit_public_answer() {
    let service = Arc::new(FakePublicAnswers::default());
    let (_start, start_rx) = signal();
    let (edit, edit_rx) = signal();
    let (_text, text_rx) = watch::channel(String::new());
    let (_keywords, keywords_rx) = watch::channel(Vec::new());
    let (_done, done_rx) = signal();
    let initial = Answer {
        answer: "기존 답변".to_string(),
        keywords: vec!["성실".to_string()],
    };
    let output = PublicAnswerViewModel::new(3, false, Some(initial), service).transform(
        PublicAnswerInput {
            start_answering: start_rx,
            edit: edit_rx,
            text: text_rx,
            keywords: keywords_rx,
            done: done_rx,
        },
    );

    edit.emit(());
    settle().await;
    assert_eq!(*output.mode.borrow(), AnswerMode::Written("기존 답변".to_string()));
    assert_eq!(*output.keywords.borrow(), vec!["성실".to_string()]);
}

#[tokio::test]
async fn public_answer_is_applied_with_keywords() {
    let service = Arc::new(FakePublicAnswers::default());
    let (start, start_rx) = signal();
    let (_edit, edit_rx) = signal();
    let (text, text_rx) = watch::channel(String::new());
    let (keywords, keywords_rx) = watch::channel(Vec::new());
    let (done, done_rx) = signal();
    let mut output = PublicAnswerViewModel::new(3, false, None, service.clone()).transform(
        PublicAnswerInput {
            start_answering: start_rx,
            edit: edit_rx,
            text: text_rx,
            keywords: keywords_rx,
            done: done_rx,
        },
    );

    start.emit(());
    wait_until(&mut output.mode, AnswerMode::is_editing).await;
    text.send_replace("끝까지 책임졌습니다".to_string());
    keywords.send_replace(vec!["책임감".to_string()]);
    done.emit(());

    next_signal(&mut output.success_message).await;
    assert_eq!(
        *service.applied.lock().unwrap(),
        vec![(3, "끝까지 책임졌습니다".to_string(), vec!["책임감".to_string()])]
    );
    assert_eq!(
        *output.mode.borrow(),
        AnswerMode::Written("끝까지 책임졌습니다".to_string())
    );
}

// ========== 关键词 ==========

#[tokio::test]
async fn private_keywords_are_loaded_edited_and_saved() {
    let service = Arc::new(FakePrivateQuestions::with_answer(private_answer(7, Some("답변"))));
    let (load, load_rx) = signal();
    let (keyword, keyword_rx) = watch::channel(String::new());
    let (add, add_rx) = signal();
    let (remove, remove_rx) = signal();
    let (save, save_rx) = signal();
    let mut output = RegisterKeywordViewModel::new(KeywordTarget::Private {
        id: 7,
        service: service.clone(),
    })
    .transform(RegisterKeywordInput {
        load: load_rx,
        keyword: keyword_rx,
        add: add_rx,
        remove: remove_rx,
        save: save_rx,
    });

    load.emit(());
    wait_until(&mut output.keywords, |k| k.len() == 1).await;

    keyword.send_replace("  리더십 ".to_string());
    add.emit(());
    wait_until(&mut output.keywords, |k| k.len() == 2).await;

    remove.emit(0);
    let keywords = wait_until(&mut output.keywords, |k| k.len() == 1).await;
    assert_eq!(keywords, vec!["리더십".to_string()]);

    save.emit(());
    assert_eq!(next_signal(&mut output.saved).await, vec!["리더십".to_string()]);
    assert_eq!(*service.keywords.lock().unwrap(), vec!["리더십".to_string()]);
}

// ========== 列表页面 ==========

#[tokio::test]
async fn filtering_shows_header_and_questions() {
    let service = Arc::new(FakePublicQuestions {
        recent: vec![public_question(1, "디자인 포트폴리오 설명")],
        ..Default::default()
    });
    let (mode, mode_rx) = signal();
    let mut output =
        FilteringViewModel::new(service.clone()).transform(FilteringInput { mode: mode_rx });

    mode.emit(FilterMode::Filter(Category::Design));
    let header = wait_until(&mut output.header, |h| h.is_some()).await.unwrap();
    assert_eq!(header.title, "디자인");
    assert_eq!(header.subtitle, FILTERING_SUBTITLE);

    let questions = wait_until(&mut output.questions, |q| !q.is_empty()).await;
    assert_eq!(questions[0].id, 1);
    assert_eq!(*service.filtered.lock().unwrap(), vec![Category::Design]);
}

#[tokio::test]
async fn failed_search_keeps_previous_header_and_questions() {
    let service = Arc::new(FakePublicQuestions {
        recent: vec![public_question(1, "디자인 포트폴리오 설명")],
        ..Default::default()
    });
    let (mode, mode_rx) = signal();
    let mut output =
        FilteringViewModel::new(service.clone()).transform(FilteringInput { mode: mode_rx });

    mode.emit(FilterMode::Filter(Category::Design));
    wait_until(&mut output.questions, |q| !q.is_empty()).await;

    service.fail_with(StatusCode::INTERNAL_SERVER_ERROR);
    mode.emit(FilterMode::Search("협업".to_string()));
    assert_eq!(next_signal(&mut output.fail_message).await, UNKNOWN_ERROR_MESSAGE);

    let header = output.header.borrow().clone().unwrap();
    assert_eq!(header.title, "디자인");
    let questions = output.questions.borrow().clone();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].question, "디자인 포트폴리오 설명");
}

#[tokio::test]
async fn main_screen_loads_recent_and_popular() {
    let service = Arc::new(FakePublicQuestions {
        recent: vec![public_question(1, "최근 질문")],
        popular: vec![PopularPublicQuestion {
            id: 9,
            category_name: "인사".to_string(),
            question: "인기 질문".to_string(),
            participants: 42,
            writer_name: Some("그린".to_string()),
            profile_images: Vec::new(),
            expired_at: None,
        }],
        ..Default::default()
    });
    let (refresh, refresh_rx) = signal();
    let mut output =
        MainGreenRoomViewModel::new(service).transform(MainGreenRoomInput { refresh: refresh_rx });

    refresh.emit(());
    let recent = wait_until(&mut output.recent, |list| !list.is_empty()).await;
    let popular = wait_until(&mut output.popular, |list| !list.is_empty()).await;
    assert_eq!(recent[0].id, 1);
    assert_eq!(popular[0].participants, 42);
}

// ========== 分组 ==========

struct GroupScreen {
    load: SignalEmitter<()>,
    name: watch::Sender<String>,
    category: watch::Sender<Option<Category>>,
    save: SignalEmitter<()>,
    output: GroupEditOutput,
}

fn group_screen(mode: GroupEditMode, service: Arc<FakeGroups>) -> GroupScreen {
    let (load, load_rx) = signal();
    let (name, name_rx) = watch::channel(String::new());
    let (category, category_rx) = watch::channel(None);
    let (save, save_rx) = signal();
    let output = GroupEditViewModel::new(mode, service).transform(GroupEditInput {
        load: load_rx,
        name: name_rx,
        category: category_rx,
        save: save_rx,
    });
    GroupScreen {
        load,
        name,
        category,
        save,
        output,
    }
}

#[tokio::test]
async fn new_group_is_created() {
    let service = Arc::new(FakeGroups::default());
    let mut screen = group_screen(GroupEditMode::Create, service.clone());

    screen.name.send_replace(" 포트폴리오 ".to_string());
    screen.category.send_replace(Some(Category::Design));
    wait_until(&mut screen.output.is_valid, |valid| *valid).await;

    screen.save.emit(());
    assert_eq!(
        next_signal(&mut screen.output.success_message).await,
        GROUP_CREATED_MESSAGE
    );
    assert_eq!(
        *service.saves.lock().unwrap(),
        vec![(None, "포트폴리오".to_string(), Category::Design)]
    );
}

#[tokio::test]
async fn existing_group_is_loaded_and_updated() {
    let service = Arc::new(FakeGroups {
        detail: Some(GroupDetail {
            id: 5,
            name: "면접 준비".to_string(),
            category_id: Category::ItDevelopment,
            questions: vec![GroupQuestion {
                id: 3,
                question: "협업 경험".to_string(),
                category_name: String::new(),
                keywords: Vec::new(),
            }],
        }),
        ..Default::default()
    });
    let mut screen = group_screen(GroupEditMode::Edit(5), service.clone());

    screen.load.emit(());
    let detail = wait_until(&mut screen.output.group, |g| g.is_some()).await.unwrap();
    assert_eq!(detail.name, "면접 준비");
    assert_eq!(detail.questions.len(), 1);

    screen.name.send_replace("기술 면접".to_string());
    screen.category.send_replace(Some(detail.category_id));
    screen.save.emit(());
    assert_eq!(
        next_signal(&mut screen.output.success_message).await,
        GROUP_UPDATED_MESSAGE
    );
    assert_eq!(
        *service.saves.lock().unwrap(),
        vec![(Some(5), "기술 면접".to_string(), Category::ItDevelopment)]
    );
}

#[tokio::test]
async fn failed_group_save_fails_once() {
    let gate = Gate::closed();
    let service = Arc::new(FakeGroups {
        gate: gate.clone(),
        ..Default::default()
    });
    *service.fail_status.lock().unwrap() = Some(StatusCode::BAD_REQUEST);
    let mut screen = group_screen(GroupEditMode::Create, service.clone());

    screen.name.send_replace("포트폴리오".to_string());
    screen.category.send_replace(Some(Category::Design));
    screen.save.emit(());
    screen.save.emit(());
    settle().await;
    gate.open();

    assert_eq!(
        next_signal(&mut screen.output.fail_message).await,
        "그룹 이름을 확인해주세요."
    );
    settle().await;
    assert!(screen.output.fail_message.try_next().is_none());
    assert!(screen.output.success_message.try_next().is_none());
    assert_eq!(service.save_calls.load(Ordering::SeqCst), 1);
    assert!(service.saves.lock().unwrap().is_empty());
}
