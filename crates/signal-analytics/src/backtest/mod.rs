//! 백테스팅 모듈
//!
//! 과거 캔들로 패턴 신호의 보유 기간별 승률을 계산합니다.
//!
//! # 주요 구성요소
//!
//! - [`BacktestConfig`]: 백테스트 설정 (감지기 임계값, 절단 정책)
//! - [`BacktestEngine`]: 백테스트 실행 엔진
//! - [`profit_pct`]: 방향별 수익률 계산

pub mod engine;

pub use engine::{history_window, profit_pct, BacktestConfig, BacktestEngine, Exclusion};

use signal_core::{BacktestReport, CandleSequence};

/// 기본 설정으로 백테스트를 실행합니다.
pub fn backtest(seq: &CandleSequence) -> BacktestReport {
    BacktestEngine::default().run(seq)
}
