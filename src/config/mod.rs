// region:    --- Imports
use std::{env, fmt::Display, str::FromStr};
use tracing::{info, warn};

// endregion: --- Imports

pub const DEFAULT_API_BASE_URL: &str = "https://v2.api.noroff.dev";

// region:    --- Config
/// 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct Config {
    /// 경매 API 주소
    pub api_base_url: String,
    /// X-Noroff-API-Key 헤더 값 (선택)
    pub api_key: Option<String>,
    /// 한 페이지에 요청할 상품 수
    pub page_limit: u32,
    pub bind_addr: String,
    /// 카운트다운 갱신 주기(ms)
    pub countdown_interval_ms: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            page_limit: 24,
            bind_addr: "0.0.0.0:3000".to_string(),
            countdown_interval_ms: 1000,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// 환경 변수에서 설정 로드 (.env 파일이 있으면 먼저 읽는다)
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 주어진 조회 함수로 설정 구성
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            api_base_url: lookup("AUCTION_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            api_key: lookup("AUCTION_API_KEY").filter(|key| !key.trim().is_empty()),
            page_limit: try_load(&lookup, "AUCTION_PAGE_LIMIT", defaults.page_limit),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            countdown_interval_ms: try_load(
                &lookup,
                "COUNTDOWN_INTERVAL_MS",
                defaults.countdown_interval_ms,
            ),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("{:<12} --> {key} 값이 잘못되었습니다({e}), 기본값 사용: {default}", "Config");
            default
        }),
        None => {
            info!("{:<12} --> {key} 미설정, 기본값 사용: {default}", "Config");
            default
        }
    }
}
// endregion: --- Config
