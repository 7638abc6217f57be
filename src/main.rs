// region:    --- Imports
use auction_feed::api::NoroffClient;
use auction_feed::config::Config;
use auction_feed::countdown::CountdownTicker;
use auction_feed::feed::{FeedController, FeedUpdate};
use auction_feed::handlers::{self, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .without_time()
        .with_target(false)
        .init();
    info!("{:<12} --> 경매 API: {}", "Main", config.api_base_url);

    // 피드 컨트롤러 생성
    let controller = Arc::new(FeedController::new(NoroffClient::new(&config)));

    // 첫 페이지 로딩 (실패해도 서버는 띄운다)
    match controller.initial_load().await {
        FeedUpdate::Failed { message } => {
            warn!("{:<12} --> 첫 로딩 실패, 다시 시도 필요: {}", "Main", message)
        }
        _ => info!(
            "{:<12} --> 첫 로딩 완료: {}건",
            "Main",
            controller.displayed().len()
        ),
    }

    // 카운트다운 타이머 시작
    let ticker = CountdownTicker::new(
        Arc::clone(&controller),
        Duration::from_millis(config.countdown_interval_ms.max(1)),
    );
    let countdowns = ticker.start();

    // 브라우저 화면을 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 라우터 설정
    let routes_all = handlers::routes(AppState {
        controller,
        countdowns,
    })
    .layer(cors);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(
        "{:<12} --> Feed Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
