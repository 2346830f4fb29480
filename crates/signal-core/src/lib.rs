//! # Signal Core
//!
//! 캔들 패턴 신호 시스템의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! - 캔들 및 캔들 시퀀스
//! - 패턴 종류/계열, 보유 기간, 주문 방향
//! - 패턴 발생 기록과 승률 리포트
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
