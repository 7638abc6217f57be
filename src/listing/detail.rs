/// 상품 상세 페이지 화면 모델
/// 갤러리, 최고 입찰자, 입찰 이력을 화면에 바로 쓸 수 있는 형태로 만든다
// region:    --- Imports
use super::model::{Listing, PLACEHOLDER_AVATAR, PLACEHOLDER_IMAGE};
use crate::countdown::Countdown;
use chrono::{DateTime, Utc};
use serde::Serialize;

// endregion: --- Imports

pub const NO_BIDS_MESSAGE: &str = "No one has made a bid on this listing yet";

// 입찰자 이름 최대 길이
const BIDDER_NAME_MAX: usize = 10;

// region:    --- View Model
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GalleryImage {
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HighestBid {
    pub amount: u64,
    pub avatar_url: String,
    pub avatar_alt: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BidRow {
    pub amount: u64,
    pub bidder: String,
    pub avatar_url: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingDetail {
    pub id: String,
    pub page_title: String,
    pub title: String,
    pub description: String,
    pub seller_name: String,
    pub seller_avatar: String,
    pub main_image: GalleryImage,
    pub gallery: Vec<GalleryImage>,
    pub ends_at: Option<DateTime<Utc>>,
    pub time_remaining: String,
    pub highest_bid: HighestBid,
    pub bids: Vec<BidRow>,
    pub no_bids_message: Option<String>,
}
// endregion: --- View Model

impl ListingDetail {
    /// 상품 정보로 상세 화면 모델 생성
    pub fn from_listing(listing: &Listing, now: DateTime<Utc>) -> Self {
        let (main_url, main_alt) = listing.thumbnail();
        let gallery = listing
            .media
            .iter()
            .enumerate()
            .map(|(i, m)| GalleryImage {
                url: m.url.clone(),
                alt: m
                    .alt
                    .clone()
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| format!("Image {}", i + 1)),
            })
            .collect();

        let highest_bid = match listing.highest_bid_record() {
            Some(bid) => HighestBid {
                amount: bid.amount,
                avatar_url: bid.bidder.avatar_url().to_string(),
                avatar_alt: bid
                    .bidder
                    .avatar
                    .as_ref()
                    .and_then(|a| a.alt.clone())
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| "Highest bidder avatar".to_string()),
            },
            None => HighestBid {
                amount: 0,
                avatar_url: PLACEHOLDER_AVATAR.to_string(),
                avatar_alt: "No bids yet".to_string(),
            },
        };

        let bids = listing
            .bids
            .iter()
            .map(|bid| {
                let (date, time) = bid
                    .created
                    .map(format_bid_date)
                    .unwrap_or_default();
                BidRow {
                    amount: bid.amount,
                    bidder: shorten_name(&bid.bidder.name, BIDDER_NAME_MAX),
                    avatar_url: bid.bidder.avatar_url().to_string(),
                    date,
                    time,
                }
            })
            .collect::<Vec<_>>();

        let time_remaining = listing
            .ends_at
            .map(|end| Countdown::until(end, now))
            .unwrap_or(Countdown::Ended)
            .to_string();

        Self {
            id: listing.id.clone(),
            page_title: format!("BidVerse | Listings | {}", listing.title),
            title: listing.title.clone(),
            description: listing.description.clone().unwrap_or_default(),
            seller_name: listing.seller_name().to_string(),
            seller_avatar: listing
                .seller
                .as_ref()
                .map(|s| s.avatar_url())
                .unwrap_or(PLACEHOLDER_AVATAR)
                .to_string(),
            main_image: GalleryImage {
                url: main_url.to_string(),
                alt: main_alt.to_string(),
            },
            gallery,
            ends_at: listing.ends_at,
            time_remaining,
            highest_bid,
            no_bids_message: bids.is_empty().then(|| NO_BIDS_MESSAGE.to_string()),
            bids,
        }
    }

    pub fn has_placeholder_image(&self) -> bool {
        self.main_image.url == PLACEHOLDER_IMAGE
    }
}

/// 입찰 시각을 (dd/mm/yyyy, hh:mm:ss) 로
pub fn format_bid_date(at: DateTime<Utc>) -> (String, String) {
    (
        at.format("%d/%m/%Y").to_string(),
        at.format("%H:%M:%S").to_string(),
    )
}

/// 이름이 길면 잘라서 말줄임표를 붙인다
pub fn shorten_name(name: &str, max_len: usize) -> String {
    if name.chars().count() > max_len {
        let short: String = name.chars().take(max_len).collect();
        format!("{short}…")
    } else {
        name.to_string()
    }
}
