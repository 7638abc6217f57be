use async_trait::async_trait;
use auction_feed::api::{ListingPage, ListingSource};
use auction_feed::error::FeedError;
use auction_feed::feed::{FeedController, FeedMode, FeedUpdate, SortKey};
use auction_feed::listing::{Bid, Listing, Profile};
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

// region:    --- Scripted Source
/// 미리 정해둔 페이지와 검색 결과를 돌려주는 테스트용 원격 저장소
#[derive(Default)]
struct ScriptedSource {
    pages: HashMap<u32, Vec<Listing>>,
    searches: HashMap<String, Vec<Listing>>,
    requested_pages: Mutex<Vec<u32>>,
    /// 이 페이지 요청은 알림이 올 때까지 대기
    gated_page: Option<(u32, Arc<Notify>)>,
    /// 이 검색 요청은 알림이 올 때까지 대기
    gated_query: Option<(String, Arc<Notify>)>,
}

impl ScriptedSource {
    fn with_pages(pages: Vec<Vec<Listing>>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .enumerate()
                .map(|(i, page)| (i as u32 + 1, page))
                .collect(),
            ..Default::default()
        }
    }

    fn search_result(mut self, query: &str, found: Vec<Listing>) -> Self {
        self.searches.insert(query.to_string(), found);
        self
    }

    fn requested(&self) -> Vec<u32> {
        self.requested_pages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ListingSource for ScriptedSource {
    async fn fetch_page(&self, page: u32) -> Result<ListingPage, FeedError> {
        self.requested_pages.lock().unwrap().push(page);
        if let Some((gated, notify)) = &self.gated_page {
            if *gated == page {
                notify.notified().await;
            }
        }
        // 응답이 오기 전에 다른 작업이 끼어들 수 있게 양보
        tokio::task::yield_now().await;
        Ok(self.pages.get(&page).cloned().unwrap_or_default().into())
    }

    async fn search(&self, query: &str) -> Result<Vec<Listing>, FeedError> {
        if let Some((gated, notify)) = &self.gated_query {
            if gated == query {
                notify.notified().await;
            }
        }
        Ok(self.searches.get(query).cloned().unwrap_or_default())
    }

    async fn fetch_listing(&self, id: &str) -> Result<Listing, FeedError> {
        self.pages
            .values()
            .flatten()
            .find(|l| l.id == id)
            .cloned()
            .ok_or_else(|| FeedError::NotFound(id.to_string()))
    }
}
// endregion: --- Scripted Source

// region:    --- Fixtures
/// 지금부터 ends_in 뒤에 종료되는 상품
fn listing(id: &str, ends_in: Duration, bids: &[u64]) -> Listing {
    Listing {
        id: id.to_string(),
        title: format!("{} 테스트 상품", id),
        description: None,
        media: Vec::new(),
        ends_at: Some(Utc::now() + ends_in),
        created: Some(Utc::now()),
        seller: Some(Profile {
            name: "seller".to_string(),
            avatar: None,
        }),
        bids: bids
            .iter()
            .map(|amount| Bid {
                id: None,
                amount: *amount,
                bidder: Profile::default(),
                created: None,
            })
            .collect(),
    }
}

fn active(id: &str) -> Listing {
    listing(id, Duration::hours(1), &[])
}

fn long_expired(id: &str) -> Listing {
    listing(id, -Duration::days(10), &[])
}

fn ids(listings: &[Listing]) -> Vec<&str> {
    listings.iter().map(|l| l.id.as_str()).collect()
}
// endregion: --- Fixtures

/// 필터 후 빈 페이지는 건너뛰고, 원본이 빈 페이지를 줄 때만 끝
#[tokio::test]
async fn test_skips_filtered_out_pages() {
    let source = ScriptedSource::with_pages(vec![
        vec![long_expired("x1"), long_expired("x2")],
        vec![long_expired("y1"), active("y2"), long_expired("y3")],
        vec![],
    ]);
    let controller = FeedController::new(source);

    let update = controller.initial_load().await;
    match update {
        FeedUpdate::Replace(listings) => assert_eq!(ids(&listings), vec!["y2"]),
        other => panic!("예상과 다른 결과: {:?}", other),
    }
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.listings.len(), 1);
    assert!(!snapshot.exhausted);
    assert!(!snapshot.loading);
    assert_eq!(controller.source().requested(), vec![1, 2]);

    let update = controller.load_more().await;
    assert_eq!(update, FeedUpdate::Exhausted);
    let snapshot = controller.snapshot();
    assert!(snapshot.exhausted);
    assert_eq!(snapshot.listings.len(), 1);
    assert_eq!(controller.source().requested(), vec![1, 2, 3]);

    // 끝난 뒤에는 요청하지 않는다
    assert_eq!(controller.load_more().await, FeedUpdate::Exhausted);
    assert_eq!(controller.source().requested(), vec![1, 2, 3]);
}

/// 동시에 두 번 더 보기를 눌러도 요청은 한 번
#[tokio::test]
async fn test_concurrent_advance_makes_one_request() {
    let source = ScriptedSource::with_pages(vec![vec![active("a")], vec![active("b")]]);
    let controller = FeedController::new(source);

    let (first, second) = tokio::join!(controller.load_more(), controller.load_more());

    assert_eq!(second, FeedUpdate::Busy);
    assert!(matches!(first, FeedUpdate::Append(ref l) if l.len() == 1));
    assert_eq!(controller.source().requested(), vec![1]);
}

/// 검색 후 검색어를 지우면 1페이지부터 다시 불러온다
#[tokio::test]
async fn test_clearing_search_restarts_from_first_page() {
    let source = ScriptedSource::with_pages(vec![
        vec![active("p1")],
        vec![active("p2")],
        vec![active("p3")],
    ])
    .search_result("lamp", vec![active("lamp-1"), active("lamp-2")]);
    let controller = FeedController::new(source);

    controller.initial_load().await;
    controller.load_more().await;
    assert_eq!(controller.snapshot().page, 3);

    let update = controller.search("lamp").await;
    assert!(matches!(update, FeedUpdate::Replace(ref l) if l.len() == 2));
    assert_eq!(
        controller.snapshot().mode,
        FeedMode::Search {
            query: "lamp".to_string()
        }
    );

    let update = controller.search("").await;
    match update {
        FeedUpdate::Replace(listings) => assert_eq!(ids(&listings), vec!["p1"]),
        other => panic!("예상과 다른 결과: {:?}", other),
    }
    assert_eq!(controller.source().requested(), vec![1, 2, 1]);

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.mode, FeedMode::Feed);
    assert_eq!(snapshot.page, 2);
    assert!(!snapshot.exhausted);
}

/// 늦게 도착한 이전 검색 결과는 버린다
#[tokio::test]
async fn test_superseded_search_is_discarded() {
    let gate = Arc::new(Notify::new());
    let mut source = ScriptedSource::default()
        .search_result("old", vec![active("old-1")])
        .search_result("new", vec![active("new-1")]);
    source.gated_query = Some(("old".to_string(), Arc::clone(&gate)));
    let controller = FeedController::new(source);

    let (old, new) = tokio::join!(controller.search("old"), async {
        let update = controller.search("new").await;
        gate.notify_one();
        update
    });

    assert_eq!(old, FeedUpdate::Superseded);
    assert!(matches!(new, FeedUpdate::Replace(ref l) if ids(l) == vec!["new-1"]));
    assert_eq!(ids(&controller.displayed()), vec!["new-1"]);
}

/// 로딩 중에 검색으로 바뀌면 늦게 온 페이지는 검색 결과를 덮어쓰지 않는다
#[tokio::test]
async fn test_search_supersedes_inflight_page() {
    let gate = Arc::new(Notify::new());
    let mut source = ScriptedSource::with_pages(vec![vec![active("page-1")]])
        .search_result("lamp", vec![active("lamp-1")]);
    source.gated_page = Some((1, Arc::clone(&gate)));
    let controller = FeedController::new(source);

    let (page, search) = tokio::join!(controller.initial_load(), async {
        let update = controller.search("lamp").await;
        gate.notify_one();
        update
    });

    assert_eq!(page, FeedUpdate::Superseded);
    assert!(matches!(search, FeedUpdate::Replace(_)));
    assert_eq!(ids(&controller.displayed()), vec!["lamp-1"]);
    assert!(!controller.snapshot().loading);
}

/// 정렬 변경은 조회 없이 표시 중인 목록만 다시 정렬
#[tokio::test]
async fn test_sort_change_resorts_displayed_set() {
    let source = ScriptedSource::with_pages(vec![
        vec![
            listing("a", Duration::hours(1), &[50, 80]),
            listing("b", Duration::hours(3), &[]),
            listing("c", -Duration::hours(1), &[10]),
        ],
        vec![listing("d", Duration::hours(2), &[500])],
    ]);
    let controller = FeedController::new(source);

    controller.initial_load().await;
    assert_eq!(ids(&controller.displayed()), vec!["a", "b", "c"]);

    let update = controller.set_sort(SortKey::EndingSoon);
    match update {
        FeedUpdate::Replace(listings) => assert_eq!(ids(&listings), vec!["c", "a", "b"]),
        other => panic!("예상과 다른 결과: {:?}", other),
    }

    controller.set_sort(SortKey::HighestBid);
    assert_eq!(ids(&controller.displayed()), vec!["a", "c", "b"]);
    assert_eq!(controller.source().requested(), vec![1]);

    // 새 페이지는 정렬한 뒤 뒤에 붙는다
    let update = controller.load_more().await;
    assert!(matches!(update, FeedUpdate::Append(ref l) if ids(l) == vec!["d"]));
    assert_eq!(ids(&controller.displayed()), vec!["a", "c", "b", "d"]);
}

/// 검색 결과가 없으면 Empty
#[tokio::test]
async fn test_empty_search_result() {
    let controller = FeedController::new(ScriptedSource::default());
    assert_eq!(controller.search("nothing").await, FeedUpdate::Empty);
    assert!(controller.displayed().is_empty());
}

/// 첫 페이지부터 비어 있으면 Empty 후 끝
#[tokio::test]
async fn test_empty_first_page() {
    let controller = FeedController::new(ScriptedSource::with_pages(vec![vec![]]));
    assert_eq!(controller.initial_load().await, FeedUpdate::Empty);
    assert!(controller.snapshot().exhausted);
}

/// 다시 첫 로딩하면 1페이지부터 새로 시작
#[tokio::test]
async fn test_reload_starts_fresh_feed_state() {
    let source = ScriptedSource::with_pages(vec![
        vec![active("p1")],
        vec![active("p2")],
        vec![active("p3")],
    ]);
    let controller = FeedController::new(source);

    controller.initial_load().await;
    controller.load_more().await;
    controller.set_sort(SortKey::Newest);

    let update = controller.initial_load().await;
    match update {
        FeedUpdate::Replace(listings) => assert_eq!(ids(&listings), vec!["p1"]),
        other => panic!("예상과 다른 결과: {:?}", other),
    }
    assert_eq!(controller.source().requested(), vec![1, 2, 1]);

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.page, 2);
    assert_eq!(snapshot.sort_key, SortKey::None);
    assert_eq!(ids(&snapshot.listings), vec!["p1"]);
}

/// 검색 중에 첫 로딩하면 피드 모드 1페이지로 돌아간다
#[tokio::test]
async fn test_reload_after_search_returns_to_feed() {
    let source = ScriptedSource::with_pages(vec![vec![active("p1")], vec![active("p2")]])
        .search_result("lamp", vec![active("lamp-1")]);
    let controller = FeedController::new(source);

    controller.initial_load().await;
    controller.search("lamp").await;

    let update = controller.initial_load().await;
    assert!(matches!(update, FeedUpdate::Replace(ref l) if ids(l) == vec!["p1"]));
    assert_eq!(controller.source().requested(), vec![1, 1]);
    assert_eq!(controller.snapshot().mode, FeedMode::Feed);
    assert_eq!(ids(&controller.displayed()), vec!["p1"]);
}
