//! # Signal Notification
//!
//! 패턴 신호 알림 서비스.
//!
//! - 알림 텍스트 포맷 (패턴, 주문 방향, 가격, 최근 승률)
//! - 전송기 trait과 기본 구현 (로그, 메모리)
//! - 감지 결과를 전송기로 넘기는 디스패처

pub mod alert;
pub mod dispatcher;
pub mod sinks;
pub mod types;

pub use alert::*;
pub use dispatcher::*;
pub use sinks::*;
pub use types::*;
