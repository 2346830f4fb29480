//! 설정 관리.
//!
//! TOML 파일과 `SIGNAL__` 접두사 환경 변수에서 애플리케이션 설정을 읽습니다.
//! 모든 항목에는 기본값이 있어 파일이 비어 있어도 동작합니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{SignalError, SignalResult};

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 패턴 감지 임계값
    #[serde(default)]
    pub detector: DetectorConfig,
    /// 백테스트 설정
    #[serde(default)]
    pub backtest: BacktestSettings,
    /// 실시간 감시 설정
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// 알림 설정
    #[serde(default)]
    pub notification: NotificationConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 4번째 신호 / 워시아웃 판정용 RSI 임계값.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DetectorConfig {
    /// 과매수 임계값 (3캔들 모두 이 값 초과 시 분산 신호)
    #[serde(default = "default_overbought")]
    pub overbought: Decimal,
    /// 과매도 임계값 (3캔들 모두 이 값 미만 시 워시아웃)
    #[serde(default = "default_oversold")]
    pub oversold: Decimal,
}

fn default_overbought() -> Decimal {
    Decimal::from(70)
}
fn default_oversold() -> Decimal {
    Decimal::from(30)
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            overbought: default_overbought(),
            oversold: default_oversold(),
        }
    }
}

impl DetectorConfig {
    /// 임계값을 지정해 생성합니다.
    pub fn new(overbought: Decimal, oversold: Decimal) -> Self {
        Self {
            overbought,
            oversold,
        }
    }

    /// 설정 검증: `0 <= oversold < overbought <= 100`.
    pub fn validate(&self) -> SignalResult<()> {
        if self.oversold < Decimal::ZERO || self.overbought > Decimal::ONE_HUNDRED {
            return Err(SignalError::Config(format!(
                "RSI 임계값은 0~100 범위여야 합니다 (oversold={}, overbought={})",
                self.oversold, self.overbought
            )));
        }
        if self.oversold >= self.overbought {
            return Err(SignalError::Config(format!(
                "과매도 임계값({})은 과매수 임계값({})보다 작아야 합니다",
                self.oversold, self.overbought
            )));
        }
        Ok(())
    }
}

/// 시퀀스 끝부분에서 보유 기간을 다 채우지 못한 발생의 처리 방식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizonPolicy {
    /// 가장 긴 보유 기간(6캔들)까지 계산할 수 없으면 발생 전체를 버립니다.
    #[default]
    RequireAll,
    /// 계산 가능한 보유 기간만 기록합니다. 보유 기간마다 분모가 다릅니다.
    Available,
}

impl std::str::FromStr for HorizonPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "require_all" => Ok(Self::RequireAll),
            "available" => Ok(Self::Available),
            _ => Err(format!("Unknown horizon policy: {}", s)),
        }
    }
}

/// 백테스트 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BacktestSettings {
    /// 백테스트에 사용할 과거 구간 (일)
    #[serde(default = "default_history_window_days")]
    pub history_window_days: i64,
    /// 끝부분 절단 정책
    #[serde(default)]
    pub horizon_policy: HorizonPolicy,
}

fn default_history_window_days() -> i64 {
    30
}

/// 백테스트 과거 구간의 최대 일수.
pub const MAX_HISTORY_WINDOW_DAYS: i64 = 3650;

/// 백테스트 과거 구간(일) 검증: `1..=MAX_HISTORY_WINDOW_DAYS`.
pub fn validate_history_window_days(days: i64) -> SignalResult<()> {
    if days <= 0 || days > MAX_HISTORY_WINDOW_DAYS {
        return Err(SignalError::Config(format!(
            "history_window_days는 1~{} 범위여야 합니다 ({})",
            MAX_HISTORY_WINDOW_DAYS, days
        )));
    }
    Ok(())
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            history_window_days: default_history_window_days(),
            horizon_policy: HorizonPolicy::default(),
        }
    }
}

/// 실시간 감시 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    /// 패턴 감지에 넘길 최근 캔들 수
    #[serde(default = "default_recent_candles")]
    pub recent_candles: usize,
    /// 반복 실행 간격 (초)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_recent_candles() -> usize {
    10
}
fn default_interval_secs() -> u64 {
    3600
}

/// 감지용 최근 캔들 수 검증 (3캔들 패턴을 담을 수 있어야 함).
pub fn validate_recent_candles(recent: usize) -> SignalResult<()> {
    if recent < 3 {
        return Err(SignalError::Config(format!(
            "recent_candles는 3 이상이어야 합니다 ({})",
            recent
        )));
    }
    Ok(())
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            recent_candles: default_recent_candles(),
            interval_secs: default_interval_secs(),
        }
    }
}

/// 알림 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
    /// 알림 활성화 여부
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 알림 대상 식별자 (채널 ID 등)
    #[serde(default = "default_destination")]
    pub destination: String,
    /// 승률 섹션 제목에 붙는 기간 표기
    #[serde(default = "default_history_label")]
    pub history_label: String,
    /// 알림 마지막 줄 (비어 있으면 생략)
    #[serde(default)]
    pub footer: String,
}

fn default_true() -> bool {
    true
}
fn default_destination() -> String {
    "signals".to_string()
}
fn default_history_label() -> String {
    "Last 30 days".to_string()
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            destination: default_destination(),
            history_label: default_history_label(),
            footer: String::new(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값에 환경 변수만 적용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("SIGNAL")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 설정 전체를 검증합니다.
    pub fn validate(&self) -> SignalResult<()> {
        self.detector.validate()?;
        validate_history_window_days(self.backtest.history_window_days)?;
        validate_recent_candles(self.monitor.recent_candles)?;
        if self.monitor.interval_secs == 0 {
            return Err(SignalError::Config(
                "interval_secs는 0보다 커야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.detector.overbought, dec!(70));
        assert_eq!(config.detector.oversold, dec!(30));
        assert_eq!(config.backtest.history_window_days, 30);
        assert_eq!(config.backtest.horizon_policy, HorizonPolicy::RequireAll);
        assert_eq!(config.monitor.recent_candles, 10);
        assert_eq!(config.monitor.interval_secs, 3600);
    }

    #[test]
    fn test_detector_validation() {
        assert!(DetectorConfig::new(dec!(70), dec!(30)).validate().is_ok());
        assert!(DetectorConfig::new(dec!(30), dec!(30)).validate().is_err());
        assert!(DetectorConfig::new(dec!(101), dec!(30)).validate().is_err());
        assert!(DetectorConfig::new(dec!(70), dec!(-1)).validate().is_err());
    }

    #[test]
    fn test_window_and_recent_bounds() {
        assert!(validate_history_window_days(1).is_ok());
        assert!(validate_history_window_days(MAX_HISTORY_WINDOW_DAYS).is_ok());
        assert!(validate_history_window_days(0).is_err());
        assert!(validate_history_window_days(-7).is_err());
        assert!(validate_history_window_days(200_000_000).is_err());

        assert!(validate_recent_candles(3).is_ok());
        assert!(validate_recent_candles(2).is_err());

        let mut config = AppConfig::default();
        config.backtest.history_window_days = MAX_HISTORY_WINDOW_DAYS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_horizon_policy_from_str() {
        assert_eq!("require_all".parse::<HorizonPolicy>().unwrap(), HorizonPolicy::RequireAll);
        assert_eq!("require-all".parse::<HorizonPolicy>().unwrap(), HorizonPolicy::RequireAll);
        assert_eq!("Available".parse::<HorizonPolicy>().unwrap(), HorizonPolicy::Available);
        assert!("partial".parse::<HorizonPolicy>().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml = r#"
            [detector]
            overbought = 80

            [backtest]
            horizon_policy = "available"
        "#;
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.detector.overbought, dec!(80));
        assert_eq!(config.detector.oversold, dec!(30));
        assert_eq!(config.backtest.horizon_policy, HorizonPolicy::Available);
        assert_eq!(config.backtest.history_window_days, 30);
        assert_eq!(config.notification.destination, "signals");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load("config/does-not-exist.toml").unwrap();
        assert_eq!(config.monitor.recent_candles, 10);
        assert_eq!(config.notification.history_label, "Last 30 days");
    }
}
