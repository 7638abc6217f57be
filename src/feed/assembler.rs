/// 피드 조립기
/// 조회 -> 필터 -> 정렬 -> 표시 흐름을 관리하고 화면 하나 동안의 피드 상태를 소유한다.
/// 1. 첫 로딩 (교체)
/// 2. 더 보기 (추가)
/// 3. 정렬 변경 (재정렬 후 교체, 조회 없음)
/// 4. 검색 / 검색 해제
// region:    --- Imports
use super::cursor::PaginationCursor;
use super::filter::retain_eligible;
use super::sort::{sort_in_place, SortKey};
use crate::api::ListingSource;
use crate::listing::Listing;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

// endregion: --- Imports

// region:    --- Feed State
/// 피드 모드
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum FeedMode {
    /// 페이지 단위 피드
    Feed,
    /// 검색 결과
    Search { query: String },
}

#[derive(Debug)]
struct FeedState {
    mode: FeedMode,
    cursor: PaginationCursor,
    displayed: Vec<Listing>,
    sort_key: SortKey,
    /// 모드가 바뀔 때마다 증가. 이전 세대의 응답은 버린다
    generation: u64,
    last_error: Option<String>,
}

impl FeedState {
    fn new() -> Self {
        Self {
            mode: FeedMode::Feed,
            cursor: PaginationCursor::new(),
            displayed: Vec::new(),
            sort_key: SortKey::None,
            generation: 0,
            last_error: None,
        }
    }

    /// 새 모드 진입. 커서와 표시 목록 초기화
    fn enter(&mut self, mode: FeedMode) -> u64 {
        self.mode = mode;
        self.cursor = PaginationCursor::new();
        self.displayed.clear();
        self.last_error = None;
        self.generation += 1;
        self.generation
    }
}

/// 화면에 전달할 현재 피드 상태
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot {
    #[serde(flatten)]
    pub mode: FeedMode,
    pub sort_key: SortKey,
    pub page: u32,
    pub loading: bool,
    pub exhausted: bool,
    pub last_error: Option<String>,
    pub listings: Vec<Listing>,
}
// endregion: --- Feed State

// region:    --- Feed Update
/// 표시 목록을 어떻게 반영할지
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Replace,
    Append,
}

/// 사용자 동작 하나의 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum FeedUpdate {
    /// 표시 목록 전체 교체
    Replace(Vec<Listing>),
    /// 표시 목록 뒤에 추가
    Append(Vec<Listing>),
    /// 표시할 상품이 없음
    Empty,
    /// 더 불러올 페이지가 없음
    Exhausted,
    /// 이미 로딩 중이라 요청을 버림
    Busy,
    /// 더 새로운 동작 때문에 결과를 버림
    Superseded,
    /// 현재 모드에서 의미 없는 동작
    Ignored,
    /// 다시 시도할 수 있는 실패
    Failed { message: String },
}

/// 페이지 하나를 처리한 뒤 다음 동작
enum Step {
    Done(FeedUpdate),
    Next(u32),
}
// endregion: --- Feed Update

// region:    --- Feed Controller
/// 피드 컨트롤러
pub struct FeedController<S> {
    source: S,
    state: Mutex<FeedState>,
}

impl<S: ListingSource> FeedController<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(FeedState::new()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 1. 첫 로딩. 화면을 새로 연 것과 같으므로 피드 상태를 새로 만든다
    pub async fn initial_load(&self) -> FeedUpdate {
        info!("{:<12} --> 피드 첫 로딩", "Feed");
        {
            let mut state = self.state();
            state.sort_key = SortKey::None;
            state.enter(FeedMode::Feed);
        }
        self.advance(Placement::Replace).await
    }

    /// 2. 더 보기
    pub async fn load_more(&self) -> FeedUpdate {
        info!("{:<12} --> 피드 더 보기", "Feed");
        self.advance(Placement::Append).await
    }

    /// 다음 페이지 조회.
    /// 필터 후 비어 있는 페이지는 건너뛰고 다음 페이지를 바로 요청한다.
    /// 원본이 빈 페이지를 돌려줘야 끝
    async fn advance(&self, placement: Placement) -> FeedUpdate {
        let (mut page, generation) = {
            let mut state = self.state();
            if state.mode != FeedMode::Feed {
                return FeedUpdate::Ignored;
            }
            if state.cursor.is_exhausted() {
                return FeedUpdate::Exhausted;
            }
            match state.cursor.begin() {
                Some(page) => (page, state.generation),
                None => {
                    debug!("{:<12} --> 이미 로딩 중, 요청 무시", "Feed");
                    return FeedUpdate::Busy;
                }
            }
        };

        loop {
            let result = self.source.fetch_page(page).await;

            let step = {
                let mut state = self.state();
                if state.generation != generation {
                    debug!("{:<12} --> 이전 세대 응답 폐기 page: {}", "Feed", page);
                    return FeedUpdate::Superseded;
                }

                match result {
                    Err(e) => {
                        warn!("{:<12} --> 페이지 조회 실패 page: {}: {}", "Feed", page, e);
                        state.cursor.finish();
                        let message = e.to_string();
                        state.last_error = Some(message.clone());
                        Step::Done(FeedUpdate::Failed { message })
                    }
                    Ok(fetched) if fetched.raw_count == 0 => {
                        info!("{:<12} --> 마지막 페이지 도달 page: {}", "Feed", page);
                        state.cursor.record(0);
                        state.cursor.finish();
                        state.last_error = None;
                        match placement {
                            Placement::Replace => {
                                state.displayed.clear();
                                Step::Done(FeedUpdate::Empty)
                            }
                            Placement::Append => Step::Done(FeedUpdate::Exhausted),
                        }
                    }
                    Ok(fetched) => {
                        state.cursor.record(fetched.raw_count);
                        let mut batch = retain_eligible(fetched.listings, Utc::now());
                        if batch.is_empty() {
                            debug!("{:<12} --> 표시할 상품 없는 페이지 건너뜀 page: {}", "Feed", page);
                            Step::Next(state.cursor.page())
                        } else {
                            sort_in_place(&mut batch, state.sort_key);
                            state.cursor.finish();
                            state.last_error = None;
                            info!("{:<12} --> 페이지 {} 상품 {}건 표시", "Feed", page, batch.len());
                            match placement {
                                Placement::Replace => {
                                    state.displayed = batch.clone();
                                    Step::Done(FeedUpdate::Replace(batch))
                                }
                                Placement::Append => {
                                    state.displayed.extend(batch.iter().cloned());
                                    Step::Done(FeedUpdate::Append(batch))
                                }
                            }
                        }
                    }
                }
            };

            match step {
                Step::Done(update) => return update,
                Step::Next(next) => {
                    page = next;
                    tokio::task::yield_now().await;
                }
            }
        }
    }

    /// 3. 정렬 변경. 이미 표시 중인 목록만 다시 정렬한다
    pub fn set_sort(&self, key: SortKey) -> FeedUpdate {
        let mut state = self.state();
        info!("{:<12} --> 정렬 변경: {} -> {}", "Feed", state.sort_key, key);
        state.sort_key = key;
        sort_in_place(&mut state.displayed, key);
        FeedUpdate::Replace(state.displayed.clone())
    }

    /// 4. 검색. 빈 검색어는 검색 해제
    pub async fn search(&self, query: &str) -> FeedUpdate {
        let query = query.trim();
        if query.is_empty() {
            return self.clear_search().await;
        }

        let generation = self.state().enter(FeedMode::Search {
            query: query.to_string(),
        });
        info!("{:<12} --> 검색 시작 q: {}", "Feed", query);

        let result = self.source.search(query).await;

        let mut state = self.state();
        if state.generation != generation {
            debug!("{:<12} --> 이전 검색 결과 폐기 q: {}", "Feed", query);
            return FeedUpdate::Superseded;
        }

        match result {
            Err(e) => {
                warn!("{:<12} --> 검색 실패 q: {}: {}", "Feed", query, e);
                let message = e.to_string();
                state.last_error = Some(message.clone());
                FeedUpdate::Failed { message }
            }
            Ok(mut found) => {
                sort_in_place(&mut found, state.sort_key);
                info!("{:<12} --> 검색 결과 {}건", "Feed", found.len());
                state.displayed = found.clone();
                if found.is_empty() {
                    FeedUpdate::Empty
                } else {
                    FeedUpdate::Replace(found)
                }
            }
        }
    }

    /// 검색 해제. 1페이지부터 피드를 다시 불러온다
    pub async fn clear_search(&self) -> FeedUpdate {
        {
            let mut state = self.state();
            if state.mode == FeedMode::Feed {
                return FeedUpdate::Ignored;
            }
            state.enter(FeedMode::Feed);
        }
        info!("{:<12} --> 검색 해제, 피드 초기화", "Feed");
        self.advance(Placement::Replace).await
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        let state = self.state();
        FeedSnapshot {
            mode: state.mode.clone(),
            sort_key: state.sort_key,
            page: state.cursor.page(),
            loading: state.cursor.is_loading(),
            exhausted: state.cursor.is_exhausted(),
            last_error: state.last_error.clone(),
            listings: state.displayed.clone(),
        }
    }

    pub fn displayed(&self) -> Vec<Listing> {
        self.state().displayed.clone()
    }

    /// 카운트다운용 (id, 종료 시각)
    pub fn end_times(&self) -> Vec<(String, Option<DateTime<Utc>>)> {
        self.state()
            .displayed
            .iter()
            .map(|l| (l.id.clone(), l.ends_at))
            .collect()
    }
}
// endregion: --- Feed Controller
