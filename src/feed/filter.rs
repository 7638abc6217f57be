use crate::listing::Listing;
use chrono::{DateTime, Duration, Utc};

/// 종료 후에도 피드에 남겨두는 기간
pub fn grace_window() -> Duration {
    Duration::days(3)
}

/// 피드에 표시할 상품인지 판단
/// 진행 중이거나 종료된 지 3일 이내면 표시. 종료 시각을 알 수 없으면 제외
pub fn is_eligible(listing: &Listing, now: DateTime<Utc>) -> bool {
    match listing.ends_at {
        Some(ends_at) => ends_at > now || now - ends_at <= grace_window(),
        None => false,
    }
}

/// 표시 가능한 상품만 순서를 유지한 채 남긴다
pub fn retain_eligible(listings: Vec<Listing>, now: DateTime<Utc>) -> Vec<Listing> {
    listings
        .into_iter()
        .filter(|l| is_eligible(l, now))
        .collect()
}
