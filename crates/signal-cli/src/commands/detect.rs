//! 실시간 감지 명령어.
//!
//! 캔들 CSV의 마지막 캔들에서 패턴을 평가하고, 최근 승률과 함께
//! 알림 텍스트를 출력합니다. 알림은 전송하지 않습니다.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use signal_analytics::PatternDetector;
use signal_core::{
    validate_recent_candles, AppConfig, BacktestReport, CandleSequence, SignalOccurrence,
};
use signal_notification::{AlertConfig, AlertFormatter};

use crate::commands::backtest::{backtest_window, build_engine};
use crate::commands::load::load_candles;

/// 감지 CLI 설정
#[derive(Debug, Clone)]
pub struct DetectCliConfig {
    /// 캔들 CSV 경로
    pub data_path: PathBuf,
    /// 감지에 사용할 최근 캔들 수. 없으면 앱 설정 값
    pub recent: Option<usize>,
    /// JSON 출력 여부
    pub json: bool,
}

/// 감지 결과 (JSON 출력용).
#[derive(Debug, Serialize)]
pub struct DetectOutput {
    pub detections: Vec<SignalOccurrence>,
    pub report: BacktestReport,
}

/// `--recent` 인자를 앱 설정과 합쳐 검증합니다.
pub fn resolve_recent(app: &AppConfig, recent: Option<usize>) -> Result<usize> {
    let recent = recent.unwrap_or(app.monitor.recent_candles);
    validate_recent_candles(recent).context("Invalid --recent")?;
    Ok(recent)
}

/// 최근 캔들에서 패턴을 감지합니다.
pub fn detect_recent(
    detector: &PatternDetector,
    seq: &CandleSequence,
    recent: usize,
) -> Vec<SignalOccurrence> {
    detector.detect_all(&seq.tail(recent))
}

/// 감지 명령어를 실행합니다.
pub fn run_detect(app: &AppConfig, cli: &DetectCliConfig) -> Result<DetectOutput> {
    let recent = resolve_recent(app, cli.recent)?;
    let seq = load_candles(&cli.data_path)
        .with_context(|| format!("Failed to load candles from {}", cli.data_path.display()))?;

    let engine = build_engine(app, None)?;
    let report = backtest_window(&engine, &seq, app.backtest.history_window_days);

    let detections = detect_recent(engine.detector(), &seq, recent);

    let output = DetectOutput { detections, report };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if output.detections.is_empty() {
        println!("No signal on the latest candle");
    } else {
        let formatter = AlertFormatter::new(AlertConfig::from(&app.notification));
        for occurrence in &output.detections {
            println!("\n{}", formatter.format(occurrence, Some(&output.report)));
        }
    }

    Ok(output)
}
