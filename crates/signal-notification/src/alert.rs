//! 신호 알림 포맷.
//!
//! 감지된 패턴 하나와 (있다면) 최근 백테스트 리포트로 사람이 읽는
//! 알림 텍스트를 만듭니다. 순수 함수이며 I/O가 없습니다.
//!
//! ```text
//! Token: ADAUSDT
//! Bullish Outside Bar Signal Detected!
//! Order: BUY
//! Open Price: $0.41
//! Close Price: $0.43
//! Entry Price: next candle open
//! Time: 2024-01-01 00:00:00 UTC
//! Historical Win Rates of Last 30 days:
//! - 1 Session: 66.67%
//! - 2 Sessions: 50.00%
//! - 4 Sessions: 50.00%
//! - 6 Sessions: 33.33%
//! ```

use serde::{Deserialize, Serialize};
use signal_core::{BacktestReport, DecimalExt, Horizon, NotificationConfig, SignalOccurrence};

/// 진입 캔들이 아직 없을 때 표시하는 진입가 문구.
const PENDING_ENTRY: &str = "next candle open";

/// 알림 텍스트 설정.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertConfig {
    /// 승률 섹션 머리말에 붙는 기간 이름
    pub history_label: String,
    /// 알림 끝에 붙는 문구 (비어 있으면 생략)
    pub footer: String,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            history_label: "Last 30 days".to_string(),
            footer: String::new(),
        }
    }
}

impl From<&NotificationConfig> for AlertConfig {
    fn from(config: &NotificationConfig) -> Self {
        Self {
            history_label: config.history_label.clone(),
            footer: config.footer.clone(),
        }
    }
}

/// 신호 알림 포맷터.
#[derive(Debug, Clone, Default)]
pub struct AlertFormatter {
    config: AlertConfig,
}

impl AlertFormatter {
    /// 새 포맷터를 생성합니다.
    pub fn new(config: AlertConfig) -> Self {
        Self { config }
    }

    /// 포맷터 설정.
    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    /// 알림 텍스트를 만듭니다.
    ///
    /// 리포트가 있으면 발생과 같은 계열의 승률 네 줄을 붙입니다.
    /// 신호가 0건인 리포트도 0.00%로 표시합니다.
    pub fn format(&self, occurrence: &SignalOccurrence, report: Option<&BacktestReport>) -> String {
        let entry = occurrence
            .entry_price
            .map(|p| format!("${}", p))
            .unwrap_or_else(|| PENDING_ENTRY.to_string());

        let mut lines = vec![
            format!("Token: {}", occurrence.symbol()),
            format!("{} Signal Detected!", occurrence.kind),
            format!("Order: {}", occurrence.side()),
            format!("Open Price: ${}", occurrence.candle.open),
            format!("Close Price: ${}", occurrence.candle.close),
            format!("Entry Price: {}", entry),
            format!(
                "Time: {}",
                occurrence.timestamp().format("%Y-%m-%d %H:%M:%S UTC")
            ),
        ];

        if let Some(report) = report {
            let rates = report.family(occurrence.family());
            lines.push(format!(
                "Historical Win Rates of {}:",
                self.config.history_label
            ));
            for horizon in Horizon::ALL {
                let sessions = horizon.candles();
                lines.push(format!(
                    "- {} Session{}: {}",
                    sessions,
                    if sessions == 1 { "" } else { "s" },
                    rates.win_rate(horizon).to_percentage_string()
                ));
            }
        }

        if !self.config.footer.is_empty() {
            lines.push(self.config.footer.clone());
        }

        lines.join("\n")
    }
}

/// 기본 설정으로 알림 텍스트를 만듭니다.
pub fn format_alert(occurrence: &SignalOccurrence, report: Option<&BacktestReport>) -> String {
    AlertFormatter::default().format(occurrence, report)
}
