//! 알림 디스패처.
//!
//! 감지 결과를 최근 백테스트 리포트와 함께 포맷해 전송기에 넘깁니다.

use std::sync::Arc;

use signal_core::{BacktestReport, NotificationConfig, SignalOccurrence};
use tracing::{debug, error, info};

use crate::alert::{AlertConfig, AlertFormatter};
use crate::types::{NotificationResult, NotificationSink};

/// 감지 결과를 알림으로 전송하는 디스패처.
pub struct AlertDispatcher {
    sink: Arc<dyn NotificationSink>,
    formatter: AlertFormatter,
    destination: String,
}

impl AlertDispatcher {
    /// 새 디스패처를 생성합니다.
    pub fn new(
        sink: Arc<dyn NotificationSink>,
        formatter: AlertFormatter,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            sink,
            formatter,
            destination: destination.into(),
        }
    }

    /// 앱 알림 설정으로 디스패처를 생성합니다.
    pub fn from_config(sink: Arc<dyn NotificationSink>, config: &NotificationConfig) -> Self {
        Self::new(
            sink,
            AlertFormatter::new(AlertConfig::from(config)),
            config.destination.clone(),
        )
    }

    /// 전송 대상.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// 각 감지 결과를 알림으로 전송하고 전송에 성공한 수를 반환합니다.
    ///
    /// 전송기가 비활성화되어 있으면 아무것도 보내지 않습니다. 일부 전송이
    /// 실패해도 나머지는 계속 보내며, 하나도 보내지 못했을 때만 마지막
    /// 에러를 반환합니다.
    pub async fn dispatch(
        &self,
        detections: &[SignalOccurrence],
        report: Option<&BacktestReport>,
    ) -> NotificationResult<usize> {
        if !self.sink.is_enabled() {
            debug!(sink = self.sink.name(), "Sink is disabled, skipping alerts");
            return Ok(0);
        }

        let mut sent = 0;
        let mut last_error = None;

        for occurrence in detections {
            let text = self.formatter.format(occurrence, report);
            match self.sink.send(&self.destination, &text).await {
                Ok(()) => {
                    info!(
                        sink = self.sink.name(),
                        symbol = occurrence.symbol(),
                        kind = %occurrence.kind,
                        "Signal alert sent"
                    );
                    sent += 1;
                }
                Err(e) => {
                    error!("Failed to send alert via {}: {}", self.sink.name(), e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if sent == 0 => Err(e),
            _ => Ok(sent),
        }
    }
}
