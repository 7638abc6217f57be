// region:    --- Imports
use crate::api::ListingSource;
use crate::countdown::CountdownRow;
use crate::error::FeedError;
use crate::feed::preview::{load_home_preview, preview_count};
use crate::feed::{FeedController, FeedSnapshot, FeedUpdate, SortKey};
use crate::listing::{Listing, ListingDetail};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

// endregion: --- Imports

// region:    --- App State
/// 라우터 공유 상태
pub struct AppState<S> {
    pub controller: Arc<FeedController<S>>,
    pub countdowns: watch::Receiver<Vec<CountdownRow>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            countdowns: self.countdowns.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct HomeParams {
    pub width: Option<u32>,
}
// endregion: --- App State

/// 라우터 구성
pub fn routes<S: ListingSource + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/feed", get(handle_get_feed::<S>))
        .route("/feed/load", post(handle_load::<S>))
        .route("/feed/more", post(handle_load_more::<S>))
        .route("/feed/sort/:key", put(handle_sort::<S>))
        .route("/feed/search", get(handle_search::<S>))
        .route("/feed/countdowns", get(handle_get_countdowns::<S>))
        .route("/listings/:id", get(handle_get_listing::<S>))
        .route("/home", get(handle_get_home::<S>))
        .with_state(state)
}

// region:    --- Feed Handlers

/// 현재 피드 상태 조회
pub async fn handle_get_feed<S: ListingSource>(
    State(state): State<AppState<S>>,
) -> Json<FeedSnapshot> {
    info!("{:<12} --> 피드 상태 조회", "Handler");
    Json(state.controller.snapshot())
}

/// 첫 로딩
pub async fn handle_load<S: ListingSource>(State(state): State<AppState<S>>) -> Json<FeedUpdate> {
    info!("{:<12} --> 피드 로딩 요청", "Handler");
    Json(state.controller.initial_load().await)
}

/// 더 보기
pub async fn handle_load_more<S: ListingSource>(
    State(state): State<AppState<S>>,
) -> Json<FeedUpdate> {
    info!("{:<12} --> 더 보기 요청", "Handler");
    Json(state.controller.load_more().await)
}

/// 정렬 변경
pub async fn handle_sort<S: ListingSource>(
    State(state): State<AppState<S>>,
    Path(key): Path<String>,
) -> Result<Json<FeedUpdate>, FeedError> {
    info!("{:<12} --> 정렬 변경 요청 key: {}", "Handler", key);
    let key: SortKey = key.parse()?;
    Ok(Json(state.controller.set_sort(key)))
}

/// 검색 (빈 검색어는 검색 해제)
pub async fn handle_search<S: ListingSource>(
    State(state): State<AppState<S>>,
    Query(params): Query<SearchParams>,
) -> Json<FeedUpdate> {
    info!("{:<12} --> 검색 요청 q: {}", "Handler", params.q);
    Json(state.controller.search(&params.q).await)
}

/// 카운트다운 조회
pub async fn handle_get_countdowns<S: ListingSource>(
    State(state): State<AppState<S>>,
) -> Json<Vec<CountdownRow>> {
    Json(state.countdowns.borrow().clone())
}

// endregion: --- Feed Handlers

// region:    --- Page Handlers

/// 상품 상세 조회
pub async fn handle_get_listing<S: ListingSource>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<ListingDetail>, FeedError> {
    info!("{:<12} --> 상품 상세 조회 id: {}", "Handler", id);
    let listing = state.controller.source().fetch_listing(&id).await?;
    Ok(Json(ListingDetail::from_listing(&listing, Utc::now())))
}

/// 홈 미리보기 조회
pub async fn handle_get_home<S: ListingSource>(
    State(state): State<AppState<S>>,
    Query(params): Query<HomeParams>,
) -> Result<Json<Vec<Listing>>, FeedError> {
    let count = params.width.map(preview_count).unwrap_or(4);
    info!("{:<12} --> 홈 미리보기 조회 count: {}", "Handler", count);
    let preview = load_home_preview(state.controller.source(), count).await?;
    Ok(Json(preview))
}

// endregion: --- Page Handlers

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockListingSource;
    use chrono::Duration;

    fn state_with(source: MockListingSource) -> AppState<MockListingSource> {
        let (_tx, rx) = watch::channel(Vec::new());
        AppState {
            controller: Arc::new(FeedController::new(source)),
            countdowns: rx,
        }
    }

    #[tokio::test]
    async fn unknown_sort_key_is_rejected() {
        let state = state_with(MockListingSource::new());
        let result = handle_sort(State(state), Path("cheapest".to_string())).await;
        assert!(matches!(result, Err(FeedError::InvalidSortKey(_))));
    }

    #[tokio::test]
    async fn missing_listing_maps_to_not_found() {
        let mut source = MockListingSource::new();
        source
            .expect_fetch_listing()
            .returning(|id| Err(FeedError::NotFound(id.to_string())));

        let result = handle_get_listing(State(state_with(source)), Path("nope".to_string())).await;
        assert!(matches!(result, Err(FeedError::NotFound(ref id)) if id == "nope"));
    }

    #[tokio::test]
    async fn home_uses_width_breakpoints() {
        let mut source = MockListingSource::new();
        source.expect_fetch_page().returning(|_| {
            Ok((0..6)
                .map(|i| Listing {
                    id: i.to_string(),
                    title: String::new(),
                    description: None,
                    media: Vec::new(),
                    ends_at: Some(Utc::now() + Duration::hours(1)),
                    created: Some(Utc::now() - Duration::hours(i)),
                    seller: None,
                    bids: Vec::new(),
                })
                .collect::<Vec<_>>()
                .into())
        });

        let Json(preview) = handle_get_home(
            State(state_with(source)),
            Query(HomeParams { width: Some(1200) }),
        )
        .await
        .unwrap();
        let ids: Vec<_> = preview.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2"]);
    }
}
