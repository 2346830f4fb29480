//! 승률 백테스트 엔진
//!
//! 과거 캔들 시퀀스의 모든 인덱스에서 실시간 감지와 같은 패턴 조건을
//! 재생하고, 신호마다 1/2/4/6 캔들 보유 후의 수익률을 계산해
//! 계열별·보유 기간별 승률로 집계합니다.
//!
//! # 수익률
//!
//! - BUY: `(청산 종가 - 진입가) / 진입가 * 100`
//! - SELL: `(진입가 - 청산 종가) / 진입가 * 100`
//!
//! 보유 기간 `h`의 청산 종가는 신호 인덱스 + `h` 캔들의 종가입니다.
//! 수익률 > 0 이면 승리입니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use signal_analytics::backtest::{BacktestConfig, BacktestEngine};
//! use signal_core::HorizonPolicy;
//!
//! let config = BacktestConfig::default().with_horizon_policy(HorizonPolicy::Available);
//! let engine = BacktestEngine::new(config)?;
//!
//! let report = engine.run(&candles);
//! println!("{}", report.summary());
//! ```

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};

use signal_core::{
    BacktestReport, BacktestSettings, CandleSequence, DetectorConfig, Horizon, HorizonPolicy,
    PatternFamily, Percentage, Price, Side, SignalOccurrence, SignalResult, WinRateReport,
};

use crate::patterns::PatternDetector;

/// 백테스트 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// 패턴 임계값 (실시간 감지와 동일해야 함)
    #[serde(default)]
    pub detector: DetectorConfig,

    /// 끝부분 절단 정책
    #[serde(default)]
    pub horizon_policy: HorizonPolicy,
}

impl BacktestConfig {
    /// 앱 설정의 감지기/백테스트 섹션으로 생성합니다.
    pub fn from_settings(detector: &DetectorConfig, settings: &BacktestSettings) -> Self {
        Self {
            detector: detector.clone(),
            horizon_policy: settings.horizon_policy,
        }
    }

    /// 감지기 임계값 설정
    pub fn with_detector(mut self, detector: DetectorConfig) -> Self {
        self.detector = detector;
        self
    }

    /// 절단 정책 설정
    pub fn with_horizon_policy(mut self, policy: HorizonPolicy) -> Self {
        self.horizon_policy = policy;
        self
    }

    /// 설정 검증
    pub fn validate(&self) -> SignalResult<()> {
        self.detector.validate()
    }
}

/// 데이터 품질 문제로 집계에서 제외된 이유.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// 진입가가 0 이하
    NonPositiveEntry,
    /// 발생이 읽는 구간의 시작 시간이 엄격하게 증가하지 않음
    NonMonotonicTime,
    /// 수익률 계산이 Decimal 범위를 벗어남
    ArithmeticOverflow,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::NonPositiveEntry => write!(f, "non-positive entry price"),
            Exclusion::NonMonotonicTime => write!(f, "non-increasing open_time"),
            Exclusion::ArithmeticOverflow => write!(f, "profit calculation overflowed"),
        }
    }
}

/// 한 발생의 평가 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Evaluation {
    /// 집계 대상
    Counted(SignalOccurrence),
    /// 보유 기간을 채울 캔들이 부족해 버림 (제외 집계에 포함하지 않음)
    Truncated,
    /// 데이터 품질 문제로 제외
    Excluded(Exclusion),
}

/// 승률 백테스트 엔진.
///
/// 상태를 갖지 않으며, 매 실행이 독립적인 리포트를 반환합니다.
#[derive(Debug, Clone, Default)]
pub struct BacktestEngine {
    config: BacktestConfig,
    detector: PatternDetector,
}

impl BacktestEngine {
    /// 설정을 검증하고 엔진을 생성합니다.
    pub fn new(config: BacktestConfig) -> SignalResult<Self> {
        config.validate()?;
        let detector = PatternDetector::new(config.detector.clone())?;
        Ok(Self { config, detector })
    }

    /// 엔진 설정.
    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// 엔진이 사용하는 패턴 감지기.
    pub fn detector(&self) -> &PatternDetector {
        &self.detector
    }

    /// 시퀀스 전체를 스캔해 두 계열의 승률 리포트를 만듭니다.
    pub fn run(&self, seq: &CandleSequence) -> BacktestReport {
        let mut report = BacktestReport::empty();
        report.data_points = seq.len();
        report.start_time = seq.first().map(|c| c.open_time);
        report.end_time = seq.last().map(|c| c.open_time);

        for family in PatternFamily::ALL {
            let family_report = self.run_family(seq, family);
            match family {
                PatternFamily::OutsideBar => report.outside_bar = family_report,
                PatternFamily::FourthSignal => report.fourth_signal = family_report,
            }
        }

        info!(
            symbol = seq.symbol().unwrap_or("-"),
            data_points = report.data_points,
            outside_bar_signals = report.outside_bar.total_signals,
            fourth_signal_signals = report.fourth_signal.total_signals,
            excluded = report.outside_bar.excluded + report.fourth_signal.excluded,
            policy = ?self.config.horizon_policy,
            "Backtest complete"
        );

        report
    }

    /// 한 계열의 모든 발생을 평가하고 집계합니다.
    fn run_family(&self, seq: &CandleSequence, family: PatternFamily) -> WinRateReport {
        let mut counted = Vec::new();
        let mut excluded = 0;
        let mut truncated = 0;

        let first = family.min_candles() - 1;
        for index in first..seq.len() {
            let Some(occ) = self.detector.detect_at(seq, family, index) else {
                continue;
            };

            match self.evaluate(seq, occ) {
                Evaluation::Counted(occ) => {
                    debug!(
                        kind = %occ.kind,
                        index = occ.index,
                        time = %occ.timestamp(),
                        entry = ?occ.entry_price,
                        profits = ?occ.profits,
                        "Occurrence counted"
                    );
                    counted.push(occ);
                }
                Evaluation::Truncated => truncated += 1,
                Evaluation::Excluded(reason) => {
                    warn!(
                        family = %family,
                        index,
                        %reason,
                        "Occurrence excluded from win rates"
                    );
                    excluded += 1;
                }
            }
        }

        if truncated > 0 {
            debug!(family = %family, truncated, "Occurrences dropped at end of sequence");
        }

        WinRateReport::from_occurrences(family, counted, excluded)
    }

    /// 발생 하나의 보유 기간별 수익률을 계산합니다.
    fn evaluate(&self, seq: &CandleSequence, occ: SignalOccurrence) -> Evaluation {
        let index = occ.index;

        if self.config.horizon_policy == HorizonPolicy::RequireAll
            && index + Horizon::MAX.candles() >= seq.len()
        {
            return Evaluation::Truncated;
        }

        let Some(entry) = occ.entry_price else {
            return Evaluation::Truncated;
        };

        let reachable: Vec<Horizon> = Horizon::ALL
            .into_iter()
            .filter(|h| index + h.candles() < seq.len())
            .collect();
        let Some(last_exit) = reachable.iter().map(|h| index + h.candles()).max() else {
            return Evaluation::Truncated;
        };

        let span_start = index + 1 - occ.family().min_candles();
        if !seq.is_strictly_ordered_between(span_start, last_exit) {
            return Evaluation::Excluded(Exclusion::NonMonotonicTime);
        }
        if entry <= Decimal::ZERO {
            return Evaluation::Excluded(Exclusion::NonPositiveEntry);
        }

        let side = occ.side();
        let mut profits = BTreeMap::new();
        for horizon in reachable {
            let Some(exit) = seq.get(index + horizon.candles()) else {
                continue;
            };
            match profit_pct(side, entry, exit.close) {
                Some(profit) => {
                    profits.insert(horizon, profit);
                }
                None => return Evaluation::Excluded(Exclusion::ArithmeticOverflow),
            }
        }

        Evaluation::Counted(occ.with_profits(profits))
    }
}

/// 진입가 대비 수익률(%)을 계산합니다.
///
/// 진입가가 0 이하이거나 계산이 Decimal 범위를 벗어나면 `None`입니다.
pub fn profit_pct(side: Side, entry: Price, exit: Price) -> Option<Percentage> {
    if entry <= Decimal::ZERO {
        return None;
    }
    let diff = match side {
        Side::Buy => exit.checked_sub(entry)?,
        Side::Sell => entry.checked_sub(exit)?,
    };
    diff.checked_div(entry)?.checked_mul(Decimal::ONE_HUNDRED)
}

/// 마지막 캔들 기준 최근 `days`일 구간만 남긴 시퀀스를 반환합니다.
///
/// 시작 시각이 날짜 범위를 벗어나면 시퀀스 전체를 반환합니다.
pub fn history_window(seq: &CandleSequence, days: i64) -> CandleSequence {
    let cutoff = seq.last().and_then(|last| {
        Duration::try_days(days).and_then(|span| last.open_time.checked_sub_signed(span))
    });
    match cutoff {
        Some(cutoff) => seq.since(cutoff),
        None => seq.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use rust_decimal_macros::dec;
    use signal_core::Candle;

    fn flat(hour: i64, close: Decimal) -> Candle {
        let open_time = DateTime::from_timestamp(1_704_067_200 + hour * 3600, 0).unwrap();
        Candle::new(
            "ADAUSDT",
            open_time,
            close,
            close + dec!(0.1),
            close - dec!(0.1),
            close,
            dec!(1000),
            dec!(50),
        )
    }

    #[test]
    fn test_profit_pct_by_side() {
        assert_eq!(profit_pct(Side::Buy, dec!(100), dec!(101)), Some(dec!(1)));
        assert_eq!(profit_pct(Side::Buy, dec!(100), dec!(98)), Some(dec!(-2)));
        assert_eq!(profit_pct(Side::Sell, dec!(100), dec!(98)), Some(dec!(2)));
        assert_eq!(profit_pct(Side::Sell, dec!(100), dec!(100)), Some(dec!(0)));
        assert_eq!(profit_pct(Side::Buy, dec!(0), dec!(1)), None);
        assert_eq!(profit_pct(Side::Sell, dec!(-1), dec!(1)), None);
    }

    #[test]
    fn test_profit_pct_overflow_is_none() {
        let huge = Decimal::MAX - Decimal::ONE;
        assert_eq!(profit_pct(Side::Sell, huge, -huge), None);
        assert_eq!(profit_pct(Side::Buy, huge, -huge), None);
        assert_eq!(profit_pct(Side::Buy, huge, huge), Some(Decimal::ZERO));
    }

    #[test]
    fn test_run_without_signals_reports_zero() {
        let seq = CandleSequence::new((0..20).map(|h| flat(h, dec!(10))).collect()).unwrap();
        let report = BacktestEngine::default().run(&seq);

        assert_eq!(report.data_points, 20);
        assert_eq!(report.start_time, seq.first().map(|c| c.open_time));
        for family in PatternFamily::ALL {
            let r = report.family(family);
            assert_eq!(r.total_signals, 0);
            assert_eq!(r.excluded, 0);
            for h in Horizon::ALL {
                assert_eq!(r.win_rate(h), Decimal::ZERO);
            }
        }
    }

    #[test]
    fn test_run_on_empty_sequence() {
        let report = BacktestEngine::default().run(&CandleSequence::default());
        assert_eq!(report, BacktestReport::empty());
    }

    #[test]
    fn test_new_validates_detector() {
        let config = BacktestConfig::default().with_detector(DetectorConfig::new(dec!(20), dec!(40)));
        assert!(BacktestEngine::new(config).is_err());
    }

    #[test]
    fn test_history_window_keeps_recent_days() {
        // 72시간 → 최근 1일(마지막 캔들 시작 기준 24시간 초과분) = 24개
        let seq = CandleSequence::new((0..72).map(|h| flat(h, dec!(10))).collect()).unwrap();
        let window = history_window(&seq, 1);
        assert_eq!(window.len(), 24);
        assert_eq!(window.last(), seq.last());

        assert!(history_window(&CandleSequence::default(), 30).is_empty());
    }

    #[test]
    fn test_history_window_out_of_range_keeps_everything() {
        let seq = CandleSequence::new((0..10).map(|h| flat(h, dec!(10))).collect()).unwrap();
        assert_eq!(history_window(&seq, 200_000_000).len(), 10);
        assert_eq!(history_window(&seq, i64::MAX).len(), 10);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: BacktestConfig =
            serde_json::from_str(r#"{"horizon_policy":"available"}"#).unwrap();
        assert_eq!(config.horizon_policy, HorizonPolicy::Available);
        assert_eq!(config.detector.overbought, dec!(70));
    }
}
