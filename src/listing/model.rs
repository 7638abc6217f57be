use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

pub const PLACEHOLDER_IMAGE: &str = "../images/no-image.png";
pub const PLACEHOLDER_AVATAR: &str = "../images/placeholder-avatar.png";

// 이미지 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    #[serde(default, deserialize_with = "null_default")]
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
}

// 판매자 / 입찰자 프로필 참조
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub avatar: Option<Media>,
}

impl Profile {
    /// 아바타 주소 (없으면 기본 이미지)
    pub fn avatar_url(&self) -> &str {
        self.avatar
            .as_ref()
            .map(|a| a.url.as_str())
            .filter(|url| !url.is_empty())
            .unwrap_or(PLACEHOLDER_AVATAR)
    }
}

// 입찰 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub amount: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub bidder: Profile,
    #[serde(default, deserialize_with = "lenient_instant")]
    pub created: Option<DateTime<Utc>>,
}

// 상품 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub media: Vec<Media>,
    /// 파싱할 수 없는 종료 시각은 None (필터에서 제외된다)
    #[serde(default, deserialize_with = "lenient_instant")]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_instant")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub seller: Option<Profile>,
    #[serde(default, deserialize_with = "null_default")]
    pub bids: Vec<Bid>,
}

impl Listing {
    /// 최고 입찰가 (입찰이 없으면 0)
    pub fn highest_bid(&self) -> u64 {
        self.bids.iter().map(|b| b.amount).max().unwrap_or(0)
    }

    /// 최고 입찰 기록. 금액이 같으면 먼저 나온 입찰
    pub fn highest_bid_record(&self) -> Option<&Bid> {
        self.bids
            .iter()
            .fold(None, |best: Option<&Bid>, bid| match best {
                Some(b) if b.amount >= bid.amount => Some(b),
                _ => Some(bid),
            })
    }

    pub fn bid_count(&self) -> usize {
        self.bids.len()
    }

    /// 대표 이미지 주소와 대체 텍스트
    pub fn thumbnail(&self) -> (&str, &str) {
        match self.media.first() {
            Some(m) if !m.url.is_empty() => (
                m.url.as_str(),
                m.alt.as_deref().filter(|a| !a.is_empty()).unwrap_or(&self.title),
            ),
            _ => (PLACEHOLDER_IMAGE, self.title.as_str()),
        }
    }

    pub fn seller_name(&self) -> &str {
        self.seller
            .as_ref()
            .map(|s| s.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("Unknown")
    }
}

/// 원본 레코드를 하나씩 읽는다. 읽을 수 없는 레코드는 건너뛴다
pub fn decode_listings(records: Vec<serde_json::Value>) -> Vec<Listing> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Listing>(record) {
            Ok(listing) => Some(listing),
            Err(e) => {
                warn!("{:<12} --> 읽을 수 없는 상품 레코드 건너뜀: {}", "Listing", e);
                None
            }
        })
        .collect()
}

/// null 을 기본값으로 읽는다
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 빠졌거나 형식이 잘못된 시각을 None 으로 읽는다
fn lenient_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}
