// region:    --- Imports
use crate::error::FeedError;
use crate::listing::Listing;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

// endregion: --- Imports

// region:    --- Sort Key
/// 피드 정렬 기준
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// 마감 임박순
    EndingSoon,
    /// 최신 등록순
    Newest,
    /// 최고 입찰가 낮은순
    LowestBid,
    /// 최고 입찰가 높은순
    HighestBid,
    /// 입찰 많은순
    MostBids,
    /// 원래 순서
    #[default]
    None,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::EndingSoon,
        SortKey::Newest,
        SortKey::LowestBid,
        SortKey::HighestBid,
        SortKey::MostBids,
        SortKey::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::EndingSoon => "endingSoon",
            SortKey::Newest => "newest",
            SortKey::LowestBid => "lowestBid",
            SortKey::HighestBid => "highestBid",
            SortKey::MostBids => "mostBids",
            SortKey::None => "none",
        }
    }

    fn compare(&self, a: &Listing, b: &Listing) -> Ordering {
        match self {
            SortKey::EndingSoon => known_first(a.ends_at, b.ends_at, |x, y| x.cmp(&y)),
            SortKey::Newest => known_first(a.created, b.created, |x, y| y.cmp(&x)),
            SortKey::LowestBid => a.highest_bid().cmp(&b.highest_bid()),
            SortKey::HighestBid => b.highest_bid().cmp(&a.highest_bid()),
            SortKey::MostBids => b.bid_count().cmp(&a.bid_count()),
            SortKey::None => Ordering::Equal,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .or_else(|| s.is_empty().then_some(SortKey::None))
            .ok_or_else(|| FeedError::InvalidSortKey(s.to_string()))
    }
}
// endregion: --- Sort Key

/// 시각을 알 수 없는 상품은 뒤로
fn known_first<F>(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>, cmp: F) -> Ordering
where
    F: Fn(DateTime<Utc>, DateTime<Utc>) -> Ordering,
{
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// 정렬된 새 목록 반환. 안정 정렬이라 같은 값은 원래 순서를 유지한다
pub fn sort_listings(listings: &[Listing], key: SortKey) -> Vec<Listing> {
    let mut sorted = listings.to_vec();
    sort_in_place(&mut sorted, key);
    sorted
}

/// 목록 자체를 정렬 (상품 내용은 바꾸지 않는다)
pub fn sort_in_place(listings: &mut [Listing], key: SortKey) {
    if key != SortKey::None {
        listings.sort_by(|a, b| key.compare(a, b));
    }
}
