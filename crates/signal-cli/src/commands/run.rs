//! 모니터 사이클 명령어.
//!
//! 한 사이클 = 캔들 로드 → 최근 구간 백테스트 → 마지막 캔들 감지 → 알림.
//! `--repeat`이면 주기적으로 반복하며 Ctrl-C로 종료합니다.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, Instrument};

use signal_core::{signal_span, AppConfig};
use signal_notification::{AlertDispatcher, LogSink, MemorySink, NotificationSink};

use crate::commands::backtest::{backtest_window, build_engine};
use crate::commands::detect::detect_recent;
use crate::commands::load::load_candles;

/// 모니터 CLI 설정
#[derive(Debug, Clone)]
pub struct RunCliConfig {
    /// 캔들 CSV 경로 (매 사이클마다 다시 읽음)
    pub data_path: PathBuf,
    /// 주기 반복 여부
    pub repeat: bool,
    /// 반복 주기 (초). 없으면 앱 설정 값
    pub interval_secs: Option<u64>,
    /// 알림을 전송하지 않고 출력만 함
    pub dry_run: bool,
}

/// 한 사이클의 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// 백테스트에 사용된 캔들 수
    pub data_points: usize,
    /// 마지막 캔들에서 감지된 신호 수
    pub detections: usize,
    /// 전송된 알림 수
    pub alerts_sent: usize,
}

/// 한 사이클을 실행합니다.
///
/// 백테스트가 먼저 돌고, 그 리포트로 이번 감지의 알림을 만듭니다.
pub async fn run_cycle(
    app: &AppConfig,
    data_path: &Path,
    dispatcher: &AlertDispatcher,
) -> Result<CycleStats> {
    let seq = load_candles(data_path)
        .with_context(|| format!("Failed to load candles from {}", data_path.display()))?;
    let span = signal_span!("cycle", seq.symbol().unwrap_or("-"));

    let (report, detections) = span.in_scope(|| -> Result<_> {
        let engine = build_engine(app, None)?;
        let report = backtest_window(&engine, &seq, app.backtest.history_window_days);
        let detections = detect_recent(engine.detector(), &seq, app.monitor.recent_candles);
        Ok((report, detections))
    })?;

    let alerts_sent = dispatcher
        .dispatch(&detections, Some(&report))
        .instrument(span)
        .await
        .context("Failed to dispatch alerts")?;

    Ok(CycleStats {
        data_points: report.data_points,
        detections: detections.len(),
        alerts_sent,
    })
}

/// 모니터 명령어를 실행합니다.
pub async fn run_monitor(app: &AppConfig, cli: &RunCliConfig) -> Result<()> {
    let memory = Arc::new(MemorySink::new());
    let sink: Arc<dyn NotificationSink> = if cli.dry_run {
        memory.clone()
    } else {
        Arc::new(LogSink::new(app.notification.enabled))
    };
    let dispatcher = AlertDispatcher::from_config(sink, &app.notification);

    if !cli.repeat {
        let stats = run_cycle(app, &cli.data_path, &dispatcher).await?;
        log_cycle(&stats);
        print_dry_run(&memory).await;
        return Ok(());
    }

    let interval_secs = cli.interval_secs.unwrap_or(app.monitor.interval_secs).max(1);
    info!(interval_secs, "Monitor started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received, stopping monitor");
                break;
            }
            _ = interval.tick() => {
                match run_cycle(app, &cli.data_path, &dispatcher).await {
                    Ok(stats) => log_cycle(&stats),
                    // 한 사이클 실패로 모니터를 멈추지 않음
                    Err(e) => error!("Cycle failed: {:#}", e),
                }
                print_dry_run(&memory).await;
            }
        }
    }

    Ok(())
}

fn log_cycle(stats: &CycleStats) {
    info!(
        data_points = stats.data_points,
        detections = stats.detections,
        alerts_sent = stats.alerts_sent,
        "Cycle complete"
    );
}

async fn print_dry_run(memory: &MemorySink) {
    for alert in memory.drain().await {
        println!("\n[{}]\n{}", alert.destination, alert.text);
    }
}
