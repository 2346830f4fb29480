//! 백테스트 명령어.
//!
//! 캔들 CSV의 최근 구간으로 패턴 승률을 계산합니다.
//!
//! # 사용 예시
//!
//! ```bash
//! # 최근 30일 (설정 기본값) 승률
//! signal backtest -d data/ADAUSDT_1h.csv
//!
//! # 최근 7일, 끝부분 절단 없이, JSON 출력
//! signal backtest -d data/ADAUSDT_1h.csv --days 7 --policy available --json
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use signal_analytics::{history_window, BacktestConfig, BacktestEngine};
use signal_core::{
    validate_history_window_days, AppConfig, BacktestReport, CandleSequence, HorizonPolicy,
};

use crate::commands::load::load_candles;

/// 백테스트 CLI 설정
#[derive(Debug, Clone)]
pub struct BacktestCliConfig {
    /// 캔들 CSV 경로
    pub data_path: PathBuf,
    /// 과거 구간 (일). 없으면 앱 설정 값
    pub days: Option<i64>,
    /// 절단 정책. 없으면 앱 설정 값
    pub policy: Option<HorizonPolicy>,
    /// JSON 출력 여부
    pub json: bool,
}

/// 앱 설정과 CLI 인자로 백테스트 엔진을 만듭니다.
pub fn build_engine(app: &AppConfig, policy: Option<HorizonPolicy>) -> Result<BacktestEngine> {
    let mut config = BacktestConfig::from_settings(&app.detector, &app.backtest);
    if let Some(policy) = policy {
        config = config.with_horizon_policy(policy);
    }
    BacktestEngine::new(config).context("Invalid backtest configuration")
}

/// `--days` 인자를 앱 설정과 합쳐 검증합니다.
pub fn resolve_days(app: &AppConfig, days: Option<i64>) -> Result<i64> {
    let days = days.unwrap_or(app.backtest.history_window_days);
    validate_history_window_days(days).context("Invalid --days")?;
    Ok(days)
}

/// 시퀀스의 최근 `days`일로 백테스트합니다.
pub fn backtest_window(engine: &BacktestEngine, seq: &CandleSequence, days: i64) -> BacktestReport {
    let window = history_window(seq, days);
    info!(
        days,
        total = seq.len(),
        window = window.len(),
        "Running backtest on history window"
    );
    engine.run(&window)
}

/// 백테스트 명령어를 실행합니다.
pub fn run_backtest(app: &AppConfig, cli: &BacktestCliConfig) -> Result<BacktestReport> {
    let days = resolve_days(app, cli.days)?;
    let seq = load_candles(&cli.data_path)
        .with_context(|| format!("Failed to load candles from {}", cli.data_path.display()))?;
    let engine = build_engine(app, cli.policy)?;

    let report = backtest_window(&engine, &seq, days);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("\n{}", report.summary());
    }

    Ok(report)
}
