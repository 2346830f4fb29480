//! 캔들 패턴 신호 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 최근 30일 승률 백테스트
//! signal backtest -d data/ADAUSDT_1h.csv
//!
//! # 마지막 캔들 패턴 감지 (알림 텍스트 출력)
//! signal detect -d data/ADAUSDT_1h.csv
//!
//! # 한 시간마다 백테스트 → 감지 → 알림 (Ctrl-C로 종료)
//! signal run -d data/ADAUSDT_1h.csv --repeat
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use signal_cli::commands::backtest::{run_backtest, BacktestCliConfig};
use signal_cli::commands::detect::{run_detect, DetectCliConfig};
use signal_cli::commands::load::is_rejected_input;
use signal_cli::commands::run::{run_monitor, RunCliConfig};
use signal_core::{init_logging, AppConfig, HorizonPolicy, LogConfig};

#[derive(Parser)]
#[command(name = "signal")]
#[command(about = "Candle pattern signal bot - Outside Bar / Fourth Signal win rates", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 과거 구간 승률 백테스트
    Backtest {
        /// 캔들 CSV 파일
        #[arg(short, long)]
        data: PathBuf,

        /// 과거 구간 (일, 기본: 설정 값)
        #[arg(long)]
        days: Option<i64>,

        /// 끝부분 절단 정책 (require-all, available)
        #[arg(long)]
        policy: Option<HorizonPolicy>,

        /// JSON으로 출력
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// 마지막 캔들 패턴 감지
    Detect {
        /// 캔들 CSV 파일
        #[arg(short, long)]
        data: PathBuf,

        /// 감지에 사용할 최근 캔들 수 (기본: 설정 값)
        #[arg(long)]
        recent: Option<usize>,

        /// JSON으로 출력
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// 백테스트 → 감지 → 알림 사이클 실행
    Run {
        /// 캔들 CSV 파일 (매 사이클마다 다시 읽음)
        #[arg(short, long)]
        data: PathBuf,

        /// 주기적으로 반복 (Ctrl-C로 종료)
        #[arg(long, default_value = "false")]
        repeat: bool,

        /// 반복 주기 (초, 기본: 설정 값)
        #[arg(long)]
        interval: Option<u64>,

        /// 알림을 전송하지 않고 출력만
        #[arg(long, default_value = "false")]
        dry_run: bool,
    },
}

/// 설정 파일(없으면 기본값)과 `SIGNAL__*` 환경 변수로 설정을 로드합니다.
fn load_config(path: &Path) -> Result<AppConfig> {
    let config = AppConfig::load(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    init_logging(LogConfig::from(&config.logging))
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    let result = match cli.command {
        Commands::Backtest {
            data,
            days,
            policy,
            json,
        } => run_backtest(
            &config,
            &BacktestCliConfig {
                data_path: data,
                days,
                policy,
                json,
            },
        )
        .map(|report| {
            info!(
                outside_bar = report.outside_bar.total_signals,
                fourth_signal = report.fourth_signal.total_signals,
                "Backtest finished"
            );
        }),

        Commands::Detect { data, recent, json } => run_detect(
            &config,
            &DetectCliConfig {
                data_path: data,
                recent,
                json,
            },
        )
        .map(|output| {
            info!(detections = output.detections.len(), "Detection finished");
        }),

        Commands::Run {
            data,
            repeat,
            interval,
            dry_run,
        } => {
            run_monitor(
                &config,
                &RunCliConfig {
                    data_path: data,
                    repeat,
                    interval_secs: interval,
                    dry_run,
                },
            )
            .await
        }
    };

    if let Err(e) = &result {
        if is_rejected_input(e) {
            error!("Candle data rejected, fix the input file: {:#}", e);
        } else {
            error!("Command failed: {:#}", e);
        }
    }
    result
}
