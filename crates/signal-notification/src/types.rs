//! 알림 에러 및 전송 trait 정의.

use async_trait::async_trait;

/// 알림 작업용 Result 타입.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// 알림 에러.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("알림 전송 실패: {0}")]
    SendFailed(String),

    #[error("비활성화된 전송기: {0}")]
    Disabled(String),
}

/// 알림 전송 대상 trait.
///
/// `destination`은 채널/채팅 식별자처럼 전송기마다 해석이 다른 문자열입니다.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// 완성된 알림 텍스트를 전송합니다.
    async fn send(&self, destination: &str, text: &str) -> NotificationResult<()>;

    /// 전송기가 활성화되어 있는지 확인합니다.
    fn is_enabled(&self) -> bool;

    /// 전송기 이름을 반환합니다.
    fn name(&self) -> &str;
}
