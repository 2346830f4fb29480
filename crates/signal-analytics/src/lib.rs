//! 패턴 감지 및 승률 백테스팅 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 캔들 패턴 감지 (아웃사이드 바, 4번째 신호 / 워시아웃)
//! - 보유 기간별 승률 백테스팅
//!
//! # Re-exports
//!
//! - [`patterns`]: 패턴 판정과 [`PatternDetector`]
//! - [`backtest`]: [`BacktestEngine`]과 수익률 계산

pub mod backtest;
pub mod patterns;

pub use backtest::{backtest, history_window, profit_pct, BacktestConfig, BacktestEngine, Exclusion};
pub use patterns::PatternDetector;
