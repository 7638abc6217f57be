// region:    --- Imports
use super::queries;
use crate::config::Config;
use crate::error::FeedError;
use crate::listing::{decode_listings, Listing};
use async_trait::async_trait;
use reqwest::{Client, IntoUrl, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Listing Source Trait
/// 원격 페이지 하나.
/// raw_count 는 읽지 못해 건너뛴 레코드까지 센 원본 레코드 수
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPage {
    pub listings: Vec<Listing>,
    pub raw_count: usize,
}

impl From<Vec<Listing>> for ListingPage {
    fn from(listings: Vec<Listing>) -> Self {
        Self {
            raw_count: listings.len(),
            listings,
        }
    }
}

/// 원격 상품 조회 트레이트
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// 페이지 조회 (1부터 시작). 빈 목록이면 더 이상 페이지가 없다
    async fn fetch_page(&self, page: u32) -> Result<ListingPage, FeedError>;

    /// 검색어로 조회
    async fn search(&self, query: &str) -> Result<Vec<Listing>, FeedError>;

    /// 상품 단건 조회
    async fn fetch_listing(&self, id: &str) -> Result<Listing, FeedError>;
}
// endregion: --- Listing Source Trait

// region:    --- Noroff Client
/// API 응답 래퍼 ({ data, meta })
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// 경매 API 클라이언트
pub struct NoroffClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    page_limit: u32,
}

impl NoroffClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.clone(),
            api_key: config.api_key.clone(),
            page_limit: config.page_limit,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.get_url(format!("{}{}", self.base_url, path))
    }

    fn get_url<U: IntoUrl>(&self, url: U) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .query(&queries::EMBED_SELLER_AND_BIDS);
        match &self.api_key {
            Some(key) => request.header(queries::API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, FeedError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("{:<12} --> API 오류: {} - {}", "Api", status, message);
            return Err(FeedError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = response.json().await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl ListingSource for NoroffClient {
    async fn fetch_page(&self, page: u32) -> Result<ListingPage, FeedError> {
        info!("{:<12} --> 상품 목록 조회 page: {}", "Api", page);
        let request = self.get(queries::LISTINGS).query(&[
            ("page", page.to_string()),
            ("limit", self.page_limit.to_string()),
        ]);
        let records: Vec<serde_json::Value> = self.send(request).await?;
        Ok(ListingPage {
            raw_count: records.len(),
            listings: decode_listings(records),
        })
    }

    async fn search(&self, query: &str) -> Result<Vec<Listing>, FeedError> {
        info!("{:<12} --> 상품 검색 q: {}", "Api", query);
        let request = self.get(queries::SEARCH_LISTINGS).query(&[("q", query)]);
        let records: Vec<serde_json::Value> = self.send(request).await?;
        Ok(decode_listings(records))
    }

    async fn fetch_listing(&self, id: &str) -> Result<Listing, FeedError> {
        info!("{:<12} --> 상품 조회 id: {}", "Api", id);
        let Some(url) = queries::listing_url(&self.base_url, id) else {
            warn!("{:<12} --> 잘못된 상품 id: {}", "Api", id);
            return Err(FeedError::NotFound(id.to_string()));
        };
        let request = self.get_url(url);
        match self.send(request).await {
            Err(FeedError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(FeedError::NotFound(id.to_string()))
            }
            other => other,
        }
    }
}
// endregion: --- Noroff Client
