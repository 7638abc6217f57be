use super::filter::retain_eligible;
use super::sort::{sort_in_place, SortKey};
use crate::api::ListingSource;
use crate::error::FeedError;
use crate::listing::Listing;
use chrono::{DateTime, Utc};

/// 화면 너비에 맞는 홈 미리보기 개수 (그리드 열 기준)
pub fn preview_count(viewport_width: u32) -> usize {
    match viewport_width {
        1024..=1535 => 3,
        _ => 4,
    }
}

/// 표시 가능한 상품 중 최신 등록순 count 개
pub fn home_preview(listings: Vec<Listing>, now: DateTime<Utc>, count: usize) -> Vec<Listing> {
    let mut eligible = retain_eligible(listings, now);
    sort_in_place(&mut eligible, SortKey::Newest);
    eligible.truncate(count);
    eligible
}

/// 첫 페이지로 홈 미리보기 구성
pub async fn load_home_preview<S: ListingSource>(
    source: &S,
    count: usize,
) -> Result<Vec<Listing>, FeedError> {
    let first = source.fetch_page(1).await?;
    Ok(home_preview(first.listings, Utc::now(), count))
}
