//! 기본 알림 전송기.
//!
//! - [`LogSink`]: 알림을 tracing 로그로 남김
//! - [`MemorySink`]: 알림을 메모리에 모음 (테스트, dry run)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::types::{NotificationError, NotificationResult, NotificationSink};

/// 알림을 `info!` 로그로 출력하는 전송기.
#[derive(Debug, Clone)]
pub struct LogSink {
    enabled: bool,
}

impl LogSink {
    /// 새 로그 전송기를 생성합니다.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl NotificationSink for LogSink {
    async fn send(&self, destination: &str, text: &str) -> NotificationResult<()> {
        if !self.enabled {
            debug!("Log sink is disabled, skipping");
            return Err(NotificationError::Disabled(self.name().to_string()));
        }

        info!(destination, "Signal alert\n{}", text);
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// 전송된 알림 한 건.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentAlert {
    /// 전송 대상
    pub destination: String,
    /// 알림 텍스트
    pub text: String,
}

/// 알림을 메모리에 모으는 전송기.
#[derive(Debug, Default)]
pub struct MemorySink {
    sent: Mutex<Vec<SentAlert>>,
    disabled: bool,
}

impl MemorySink {
    /// 새 메모리 전송기를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 비활성화된 전송기 (전송 시 에러).
    pub fn disabled() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            disabled: true,
        }
    }

    /// 지금까지 전송된 알림 목록.
    pub async fn sent(&self) -> Vec<SentAlert> {
        self.sent.lock().await.clone()
    }

    /// 전송된 알림 수.
    pub async fn len(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// 전송된 알림이 없는지 확인합니다.
    pub async fn is_empty(&self) -> bool {
        self.sent.lock().await.is_empty()
    }

    /// 모은 알림을 비우고 반환합니다.
    pub async fn drain(&self) -> Vec<SentAlert> {
        std::mem::take(&mut *self.sent.lock().await)
    }
}

#[async_trait]
impl NotificationSink for MemorySink {
    async fn send(&self, destination: &str, text: &str) -> NotificationResult<()> {
        if self.disabled {
            return Err(NotificationError::Disabled(self.name().to_string()));
        }

        self.sent.lock().await.push(SentAlert {
            destination: destination.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        !self.disabled
    }

    fn name(&self) -> &str {
        "memory"
    }
}
