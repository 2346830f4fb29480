//! 패턴 발생(신호) 엔티티.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::candle::Candle;
use super::pattern::{Horizon, PatternFamily, PatternKind};
use super::side::Side;
use crate::types::{Percentage, Price};

/// 시퀀스의 특정 인덱스에서 패턴이 발생한 기록.
///
/// 실시간 감지에서는 `profits`가 비어 있고, 백테스트가 만든 발생에는
/// 계산 가능한 보유 기간별 수익률(%)이 채워집니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalOccurrence {
    /// 패턴 종류
    pub kind: PatternKind,
    /// 신호 캔들의 시퀀스 인덱스
    pub index: usize,
    /// 신호 캔들 (아웃사이드 바 자신, 또는 3연속 중 마지막 캔들)
    pub candle: Candle,
    /// 진입 기준가
    ///
    /// 아웃사이드 바는 다음 캔들이 아직 없으면 `None`입니다.
    pub entry_price: Option<Price>,
    /// 보유 기간별 수익률 (%)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub profits: BTreeMap<Horizon, Percentage>,
}

impl SignalOccurrence {
    /// 새 발생 기록을 생성합니다.
    pub fn new(kind: PatternKind, index: usize, candle: Candle, entry_price: Option<Price>) -> Self {
        Self {
            kind,
            index,
            candle,
            entry_price,
            profits: BTreeMap::new(),
        }
    }

    /// 수익률을 설정합니다.
    pub fn with_profits(mut self, profits: BTreeMap<Horizon, Percentage>) -> Self {
        self.profits = profits;
        self
    }

    /// 패턴 계열.
    pub fn family(&self) -> PatternFamily {
        self.kind.family()
    }

    /// 주문 방향.
    pub fn side(&self) -> Side {
        self.kind.side()
    }

    /// 심볼.
    pub fn symbol(&self) -> &str {
        &self.candle.symbol
    }

    /// 신호 캔들의 시작 시간.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.candle.open_time
    }

    /// 보유 기간의 수익률.
    pub fn profit(&self, horizon: Horizon) -> Option<Percentage> {
        self.profits.get(&horizon).copied()
    }
}
