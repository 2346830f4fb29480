//! 캔들 데이터 타입.
//!
//! - `Candle` - RSI(7)가 미리 계산된 OHLCV 캔들
//! - `CandleSequence` - 한 심볼의 시간순 캔들 목록 (인덱스 접근, 경계 검사)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{SignalError, SignalResult};
use crate::types::{Price, Quantity};

/// RSI 값의 상한.
const RSI_MAX: Decimal = Decimal::ONE_HUNDRED;

/// OHLCV 캔들스틱 + RSI(7).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// 거래 심볼 (예: ADAUSDT)
    pub symbol: String,
    /// 캔들 시작 시간
    pub open_time: DateTime<Utc>,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량
    pub volume: Quantity,
    /// 7기간 RSI (0 ~ 100, 상위에서 계산됨)
    pub rsi7: Decimal,
}

impl Candle {
    /// 새 캔들을 생성합니다.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: impl Into<String>,
        open_time: DateTime<Utc>,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Quantity,
        rsi7: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            open_time,
            open,
            high,
            low,
            close,
            volume,
            rsi7,
        }
    }

    /// 캔들 구조 계약을 검증합니다.
    ///
    /// 0 이하의 가격은 여기서 거부하지 않습니다. 그런 캔들은 백테스트에서
    /// 데이터 품질 문제로 분리되어 제외됩니다.
    pub fn validate(&self) -> SignalResult<()> {
        if self.symbol.trim().is_empty() {
            return Err(SignalError::InvalidCandle(format!(
                "심볼이 비어 있습니다 (open_time={})",
                self.open_time
            )));
        }
        if self.high < self.low {
            return Err(SignalError::InvalidCandle(format!(
                "{} {}: 고가({})가 저가({})보다 낮습니다",
                self.symbol, self.open_time, self.high, self.low
            )));
        }
        if self.volume < Decimal::ZERO {
            return Err(SignalError::InvalidCandle(format!(
                "{} {}: 거래량이 음수입니다 ({})",
                self.symbol, self.open_time, self.volume
            )));
        }
        if self.rsi7 < Decimal::ZERO || self.rsi7 > RSI_MAX {
            return Err(SignalError::InvalidCandle(format!(
                "{} {}: RSI7이 0~100 범위를 벗어났습니다 ({})",
                self.symbol, self.open_time, self.rsi7
            )));
        }
        Ok(())
    }

    /// 양봉(종가 > 시가)인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// 음봉(종가 < 시가)인지 확인합니다.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// 이 캔들의 고가/저가 범위가 `other`의 범위를 엄격하게 감싸는지 확인합니다.
    pub fn engulfs_range_of(&self, other: &Candle) -> bool {
        self.high > other.high && self.low < other.low
    }
}

/// 한 심볼의 시간순 캔들 시퀀스.
///
/// 생성 후에는 변경되지 않으며, 모든 접근은 경계 검사를 거칩니다.
/// 시간 간격(누락 캔들)은 검사하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandleSequence {
    candles: Vec<Candle>,
}

impl CandleSequence {
    /// 캔들 목록으로 시퀀스를 생성합니다.
    ///
    /// 각 캔들의 구조를 검증하고, 모든 캔들이 같은 심볼인지 확인합니다.
    /// 시간 순서 위반은 여기서 거부하지 않고 백테스트가 해당 구간을 제외합니다.
    pub fn new(candles: Vec<Candle>) -> SignalResult<Self> {
        for candle in &candles {
            candle.validate()?;
        }

        if let Some(first) = candles.first() {
            if let Some(other) = candles.iter().find(|c| c.symbol != first.symbol) {
                return Err(SignalError::InvalidSequence(format!(
                    "한 시퀀스에 여러 심볼이 섞여 있습니다: {}, {}",
                    first.symbol, other.symbol
                )));
            }
        }

        Ok(Self { candles })
    }

    /// 시퀀스의 심볼을 반환합니다 (비어 있으면 `None`).
    pub fn symbol(&self) -> Option<&str> {
        self.candles.first().map(|c| c.symbol.as_str())
    }

    /// 캔들 개수.
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// 인덱스의 캔들을 반환합니다.
    pub fn get(&self, index: usize) -> Option<&Candle> {
        self.candles.get(index)
    }

    /// 첫 캔들.
    pub fn first(&self) -> Option<&Candle> {
        self.candles.first()
    }

    /// 마지막(최신) 캔들.
    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// 전체 캔들 슬라이스.
    pub fn as_slice(&self) -> &[Candle] {
        &self.candles
    }

    /// 캔들 반복자.
    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }

    /// 최근 `n`개의 캔들로 새 시퀀스를 만듭니다.
    pub fn tail(&self, n: usize) -> Self {
        let start = self.candles.len().saturating_sub(n);
        Self {
            candles: self.candles[start..].to_vec(),
        }
    }

    /// `cutoff` 이후(초과)에 시작한 캔들만으로 새 시퀀스를 만듭니다.
    pub fn since(&self, cutoff: DateTime<Utc>) -> Self {
        Self {
            candles: self
                .candles
                .iter()
                .filter(|c| c.open_time > cutoff)
                .cloned()
                .collect(),
        }
    }

    /// `[start, end]` 구간의 시작 시간이 엄격하게 증가하는지 확인합니다.
    ///
    /// 구간이 시퀀스를 벗어나면 `false`입니다.
    pub fn is_strictly_ordered_between(&self, start: usize, end: usize) -> bool {
        if start > end || end >= self.candles.len() {
            return false;
        }
        self.candles[start..=end]
            .windows(2)
            .all(|w| w[0].open_time < w[1].open_time)
    }

    /// 전체 시퀀스가 엄격하게 시간순인지 확인합니다.
    pub fn is_strictly_ordered(&self) -> bool {
        self.candles
            .windows(2)
            .all(|w| w[0].open_time < w[1].open_time)
    }
}

impl<'a> IntoIterator for &'a CandleSequence {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}
