//! 승률 리포트.
//!
//! 백테스트 한 번의 결과를 담는 값 타입입니다. 매 실행마다 새로 계산되어
//! 이전 리포트를 통째로 대체하며, 누적 상태를 갖지 않습니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::occurrence::SignalOccurrence;
use super::pattern::{Horizon, PatternFamily};
use crate::types::DecimalExt;

/// 한 보유 기간의 승/패 집계.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonStats {
    /// 수익률 > 0 인 발생 수
    pub wins: usize,
    /// 이 보유 기간의 수익률이 계산된 발생 수
    pub total: usize,
}

impl HorizonStats {
    /// 승률 (0 ~ 1). 표본이 없으면 0.
    pub fn win_rate(&self) -> Decimal {
        if self.total == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.wins) / Decimal::from(self.total)
    }

    /// 손실(수익률 <= 0) 발생 수.
    pub fn losses(&self) -> usize {
        self.total - self.wins
    }
}

/// 패턴 계열별 승률 리포트.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinRateReport {
    /// 패턴 계열
    pub family: PatternFamily,
    /// 보유 기간별 집계 (키: 1, 2, 4, 6)
    pub horizons: BTreeMap<Horizon, HorizonStats>,
    /// 집계에 포함된 발생 수
    pub total_signals: usize,
    /// 데이터 품질 문제로 제외된 발생 수
    pub excluded: usize,
    /// 집계에 포함된 발생 목록
    #[serde(default)]
    pub occurrences: Vec<SignalOccurrence>,
}

impl WinRateReport {
    /// 빈 리포트를 생성합니다. 모든 보유 기간이 0/0으로 채워집니다.
    pub fn empty(family: PatternFamily) -> Self {
        Self {
            family,
            horizons: Horizon::ALL
                .into_iter()
                .map(|h| (h, HorizonStats::default()))
                .collect(),
            total_signals: 0,
            excluded: 0,
            occurrences: Vec::new(),
        }
    }

    /// 발생 목록으로부터 리포트를 계산합니다.
    ///
    /// 다른 계열의 발생은 무시합니다. 각 보유 기간은 그 기간의 수익률이
    /// 있는 발생만으로 독립적인 분모를 가집니다.
    pub fn from_occurrences(
        family: PatternFamily,
        occurrences: Vec<SignalOccurrence>,
        excluded: usize,
    ) -> Self {
        let mut report = Self::empty(family);
        report.excluded = excluded;

        for occ in occurrences.into_iter().filter(|o| o.family() == family) {
            for (horizon, profit) in &occ.profits {
                let stats = report.horizons.entry(*horizon).or_default();
                stats.total += 1;
                if profit.is_strictly_positive() {
                    stats.wins += 1;
                }
            }
            report.total_signals += 1;
            report.occurrences.push(occ);
        }

        report
    }

    /// 보유 기간의 승률 (0 ~ 1). 표본이 없으면 0.
    ///
    /// 호출자는 신뢰하기 전에 `total_signals`를 확인해야 합니다.
    pub fn win_rate(&self, horizon: Horizon) -> Decimal {
        self.stats(horizon).win_rate()
    }

    /// 보유 기간의 집계.
    pub fn stats(&self, horizon: Horizon) -> HorizonStats {
        self.horizons.get(&horizon).copied().unwrap_or_default()
    }

    /// 집계에 포함된 발생이 있는지 확인합니다.
    pub fn has_signals(&self) -> bool {
        self.total_signals > 0
    }
}

/// 한 번의 백테스트 실행 결과 (두 패턴 계열).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacktestReport {
    /// 아웃사이드 바 승률
    pub outside_bar: WinRateReport,
    /// 4번째 신호 / 워시아웃 승률
    pub fourth_signal: WinRateReport,
    /// 스캔한 캔들 수
    pub data_points: usize,
    /// 첫 캔들 시작 시간
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// 마지막 캔들 시작 시간
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl BacktestReport {
    /// 데이터가 없는 빈 리포트.
    pub fn empty() -> Self {
        Self {
            outside_bar: WinRateReport::empty(PatternFamily::OutsideBar),
            fourth_signal: WinRateReport::empty(PatternFamily::FourthSignal),
            data_points: 0,
            start_time: None,
            end_time: None,
        }
    }

    /// 계열에 해당하는 리포트.
    pub fn family(&self, family: PatternFamily) -> &WinRateReport {
        match family {
            PatternFamily::OutsideBar => &self.outside_bar,
            PatternFamily::FourthSignal => &self.fourth_signal,
        }
    }

    /// 요약 문자열 반환
    pub fn summary(&self) -> String {
        let period = match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => format!(
                "{} → {}",
                start.format("%Y-%m-%d %H:%M"),
                end.format("%Y-%m-%d %H:%M")
            ),
            _ => "-".to_string(),
        };

        let mut out = format!(
            "백테스트 승률 요약\n\
             ═══════════════════════════════════════\n\
             기간: {}\n\
             데이터 포인트: {}\n",
            period, self.data_points
        );

        for family in PatternFamily::ALL {
            let report = self.family(family);
            out.push_str("───────────────────────────────────────\n");
            out.push_str(&format!(
                "{} Win Rates ({} signals, {} excluded):\n",
                family, report.total_signals, report.excluded
            ));
            for horizon in Horizon::ALL {
                let candles = horizon.candles();
                out.push_str(&format!(
                    "- {} Candle{}: {}\n",
                    candles,
                    if candles == 1 { "" } else { "s" },
                    report.win_rate(horizon).to_percentage_string()
                ));
            }
        }
        out.push_str("═══════════════════════════════════════");
        out
    }
}
