//! 패턴 감지기.
//!
//! 시퀀스의 마지막 캔들(실시간) 또는 임의 인덱스(백테스트)에서
//! 두 패턴 계열의 조건을 평가합니다. 백테스트와 실시간 감지는 같은
//! [`PatternDetector::detect_at`]을 거치므로 판정 조건이 항상 동일합니다.

use signal_core::{
    CandleSequence, DetectorConfig, PatternFamily, PatternKind, SignalOccurrence, SignalResult,
};
use tracing::debug;

use super::{fourth_signal, outside_bar};

/// 캔들 패턴 감지기.
#[derive(Debug, Clone, Default)]
pub struct PatternDetector {
    config: DetectorConfig,
}

impl PatternDetector {
    /// 설정을 검증하고 감지기를 생성합니다.
    pub fn new(config: DetectorConfig) -> SignalResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// 감지기 설정.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// 시퀀스의 마지막 캔들에서 한 계열을 평가합니다.
    ///
    /// 캔들이 부족하면 `None`입니다.
    pub fn detect(&self, seq: &CandleSequence, family: PatternFamily) -> Option<SignalOccurrence> {
        let last = seq.len().checked_sub(1)?;
        self.detect_at(seq, family, last)
    }

    /// 마지막 캔들의 아웃사이드 바.
    pub fn detect_outside_bar(&self, seq: &CandleSequence) -> Option<SignalOccurrence> {
        self.detect(seq, PatternFamily::OutsideBar)
    }

    /// 마지막 캔들의 4번째 신호 / 워시아웃.
    pub fn detect_fourth_signal(&self, seq: &CandleSequence) -> Option<SignalOccurrence> {
        self.detect(seq, PatternFamily::FourthSignal)
    }

    /// 마지막 캔들에서 모든 계열을 평가합니다 (계열당 최대 1개).
    pub fn detect_all(&self, seq: &CandleSequence) -> Vec<SignalOccurrence> {
        let detections: Vec<_> = PatternFamily::ALL
            .into_iter()
            .filter_map(|family| self.detect(seq, family))
            .collect();

        if let Some(symbol) = seq.symbol() {
            debug!(
                symbol,
                candles = seq.len(),
                detections = detections.len(),
                "Live pattern scan complete"
            );
        }

        detections
    }

    /// `index`의 캔들을 신호 캔들로 보고 한 계열을 평가합니다.
    ///
    /// 진입가는 아웃사이드 바면 다음 캔들의 시가(아직 없으면 `None`),
    /// 4번째 신호면 신호 캔들 자신의 시가입니다.
    pub fn detect_at(
        &self,
        seq: &CandleSequence,
        family: PatternFamily,
        index: usize,
    ) -> Option<SignalOccurrence> {
        let kind = self.classify_at(seq, family, index)?;
        let candle = seq.get(index)?.clone();
        let entry_price = seq.get(index + family.entry_offset()).map(|c| c.open);

        Some(SignalOccurrence::new(kind, index, candle, entry_price))
    }

    /// `index`에서 계열의 패턴 종류만 판정합니다.
    pub fn classify_at(
        &self,
        seq: &CandleSequence,
        family: PatternFamily,
        index: usize,
    ) -> Option<PatternKind> {
        // 범위를 벗어나거나 앞쪽 캔들이 부족하면 신호 없음
        if index >= seq.len() || index + 1 < family.min_candles() {
            return None;
        }

        match family {
            PatternFamily::OutsideBar => {
                outside_bar::classify(seq.get(index - 1)?, seq.get(index)?)
            }
            PatternFamily::FourthSignal => {
                let window = [seq.get(index - 2)?, seq.get(index - 1)?, seq.get(index)?];
                fourth_signal::classify(window, &self.config)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use signal_core::{Candle, Side};

    fn candle(
        hour: i64,
        open: Decimal,
        close: Decimal,
        high: Decimal,
        low: Decimal,
        rsi7: Decimal,
    ) -> Candle {
        let open_time = DateTime::from_timestamp(1_704_067_200 + hour * 3600, 0).unwrap();
        Candle::new("ADAUSDT", open_time, open, high, low, close, dec!(1000), rsi7)
    }

    fn seq(candles: Vec<Candle>) -> CandleSequence {
        CandleSequence::new(candles).unwrap()
    }

    // 시나리오 A: 음봉 뒤 범위를 감싸는 양봉
    fn bullish_outside_bar() -> Vec<Candle> {
        vec![
            candle(0, dec!(10), dec!(9), dec!(11), dec!(8), dec!(50)),
            candle(1, dec!(9.5), dec!(12), dec!(13), dec!(7), dec!(50)),
        ]
    }

    #[test]
    fn test_live_bullish_outside_bar_without_entry_candle() {
        let detector = PatternDetector::default();
        let occ = detector.detect_outside_bar(&seq(bullish_outside_bar())).unwrap();

        assert_eq!(occ.kind, PatternKind::OutsideBarBullish);
        assert_eq!(occ.side(), Side::Buy);
        assert_eq!(occ.index, 1);
        assert_eq!(occ.entry_price, None);
    }

    #[test]
    fn test_historical_outside_bar_uses_next_open() {
        let mut candles = bullish_outside_bar();
        candles.push(candle(2, dec!(12.2), dec!(12.5), dec!(13), dec!(12), dec!(50)));
        let detector = PatternDetector::default();

        let occ = detector
            .detect_at(&seq(candles), PatternFamily::OutsideBar, 1)
            .unwrap();
        assert_eq!(occ.entry_price, Some(dec!(12.2)));
    }

    #[test]
    fn test_fourth_distribution_entry_is_own_open() {
        // 시나리오 B
        let candles = vec![
            candle(0, dec!(10), dec!(11), dec!(11.5), dec!(9.5), dec!(75)),
            candle(1, dec!(11), dec!(12), dec!(12.5), dec!(10.5), dec!(80)),
            candle(2, dec!(12), dec!(13), dec!(13.5), dec!(11.5), dec!(85)),
        ];
        let detector = PatternDetector::default();

        let occ = detector.detect_fourth_signal(&seq(candles)).unwrap();
        assert_eq!(occ.kind, PatternKind::FourthDistribution);
        assert_eq!(occ.side(), Side::Sell);
        assert_eq!(occ.entry_price, Some(dec!(12)));
    }

    #[test]
    fn test_insufficient_data_returns_none() {
        let detector = PatternDetector::default();
        let empty = CandleSequence::default();
        assert!(detector.detect_all(&empty).is_empty());

        let one = seq(vec![candle(0, dec!(10), dec!(9), dec!(11), dec!(8), dec!(20))]);
        assert!(detector.detect_outside_bar(&one).is_none());
        assert!(detector.detect_fourth_signal(&one).is_none());

        let two = seq(bullish_outside_bar());
        assert!(detector.detect_fourth_signal(&two).is_none());
        assert!(detector.detect_at(&two, PatternFamily::OutsideBar, 0).is_none());
        assert!(detector.detect_at(&two, PatternFamily::OutsideBar, 5).is_none());
    }

    #[test]
    fn test_detect_all_evaluates_each_family() {
        // 3연속 음봉 + 과매도: 색 반전이 없으므로 워시아웃만
        let candles = vec![
            candle(0, dec!(13), dec!(12), dec!(13.5), dec!(11.5), dec!(25)),
            candle(1, dec!(12), dec!(11), dec!(12.5), dec!(10.5), dec!(20)),
            candle(2, dec!(11), dec!(10), dec!(11.5), dec!(9.5), dec!(15)),
        ];
        let detector = PatternDetector::default();
        let found = detector.detect_all(&seq(candles));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, PatternKind::WashOut);

        // 양봉 2개 뒤 과매수 음봉이 감싸면 약세 아웃사이드 바만
        let candles = vec![
            candle(0, dec!(10), dec!(11), dec!(11.5), dec!(9.5), dec!(75)),
            candle(1, dec!(11), dec!(12), dec!(12.5), dec!(10.5), dec!(80)),
            candle(2, dec!(12.6), dec!(10), dec!(13), dec!(10), dec!(72)),
        ];
        let found = detector.detect_all(&seq(candles));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, PatternKind::OutsideBarBearish);
    }

    #[test]
    fn test_new_rejects_inverted_thresholds() {
        assert!(PatternDetector::new(DetectorConfig::new(dec!(30), dec!(70))).is_err());
        assert!(PatternDetector::new(DetectorConfig::new(dec!(80), dec!(20))).is_ok());
    }
}
