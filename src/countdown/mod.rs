/// 경매 종료 카운트다운
/// 화면에 표시된 상품들의 남은 시간을 주기적으로 다시 계산한다.
/// 피드 로딩과는 독립적으로 동작하며 표시 중인 목록을 읽기만 한다.
// region:    --- Imports
use crate::api::ListingSource;
use crate::feed::FeedController;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::debug;

// endregion: --- Imports

// region:    --- Countdown
/// 남은 시간
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Running {
        days: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
    },
    Ended,
}

impl Countdown {
    pub fn until(ends_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if ends_at <= now {
            return Countdown::Ended;
        }
        // 1초 미만 남은 경우는 0초로 표시
        let remaining = (ends_at - now).num_seconds();
        Countdown::Running {
            days: remaining / 86_400,
            hours: (remaining / 3_600) % 24,
            minutes: (remaining / 60) % 60,
            seconds: remaining % 60,
        }
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, Countdown::Ended)
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::Running {
                days,
                hours,
                minutes,
                seconds,
            } => write!(f, "{days}d:{hours}h:{minutes}m:{seconds}s"),
            Countdown::Ended => write!(f, "Ended"),
        }
    }
}
// endregion: --- Countdown

// region:    --- Countdown Ticker
/// 상품 하나의 카운트다운 표시
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CountdownRow {
    pub id: String,
    pub text: String,
    pub ended: bool,
}

/// 표시 중인 상품 목록의 카운트다운 계산
pub fn countdown_rows(
    ends: impl IntoIterator<Item = (String, Option<DateTime<Utc>>)>,
    now: DateTime<Utc>,
) -> Vec<CountdownRow> {
    ends.into_iter()
        .map(|(id, ends_at)| {
            let countdown = ends_at
                .map(|end| Countdown::until(end, now))
                .unwrap_or(Countdown::Ended);
            CountdownRow {
                id,
                text: countdown.to_string(),
                ended: countdown.is_ended(),
            }
        })
        .collect()
}

/// 카운트다운 갱신 타이머
pub struct CountdownTicker<S> {
    controller: Arc<FeedController<S>>,
    period: Duration,
}

impl<S> CountdownTicker<S>
where
    S: ListingSource + 'static,
{
    pub fn new(controller: Arc<FeedController<S>>, period: Duration) -> Self {
        Self { controller, period }
    }

    /// 타이머 시작. 최신 카운트다운은 반환된 채널로 받는다
    pub fn start(&self) -> watch::Receiver<Vec<CountdownRow>> {
        let (tx, rx) = watch::channel(Vec::new());
        let controller = Arc::clone(&self.controller);
        let period = self.period;
        tokio::spawn(async move {
            let mut interval = interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let rows = countdown_rows(controller.end_times(), Utc::now());
                debug!("{:<12} --> 카운트다운 갱신: {}건", "Countdown", rows.len());
                // 받는 쪽이 모두 사라지면 종료
                if tx.send(rows).is_err() {
                    break;
                }
            }
        });
        rx
    }
}
// endregion: --- Countdown Ticker
