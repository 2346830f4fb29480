//! 캔들 패턴 감지 모듈
//!
//! - [`outside_bar`]: 아웃사이드 바 (2캔들, 색 반전)
//! - [`fourth_signal`]: 4번째 신호 분산 / 워시아웃 (3캔들 + RSI7)
//! - [`PatternDetector`]: 두 계열을 실시간/과거 인덱스에서 평가

pub mod detector;
pub mod fourth_signal;
pub mod outside_bar;

pub use detector::PatternDetector;
