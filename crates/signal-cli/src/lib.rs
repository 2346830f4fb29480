//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 캔들 CSV 로더
//! - 백테스트 / 감지 명령어
//! - 주기 모니터 (백테스트 → 감지 → 알림)

pub mod commands;
