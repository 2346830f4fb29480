//! 4번째 신호(분산) / 워시아웃 판정.
//!
//! 최근 3개 캔들이 모두 양봉이고 RSI(7)가 모두 과매수 임계값을 넘으면
//! 분산 신호(SELL), 모두 음봉이고 RSI(7)가 모두 과매도 임계값 미만이면
//! 워시아웃(BUY)입니다. 두 조건은 동시에 성립할 수 없습니다.

use signal_core::{Candle, DetectorConfig, PatternKind};

/// 시간순(오래된 것 → 최신) 3개 캔들로 분류합니다.
pub fn classify(window: [&Candle; 3], config: &DetectorConfig) -> Option<PatternKind> {
    let all_green = window.iter().all(|c| c.is_bullish());
    let all_overbought = window.iter().all(|c| c.rsi7 > config.overbought);
    if all_green && all_overbought {
        return Some(PatternKind::FourthDistribution);
    }

    let all_red = window.iter().all(|c| c.is_bearish());
    let all_oversold = window.iter().all(|c| c.rsi7 < config.oversold);
    if all_red && all_oversold {
        return Some(PatternKind::WashOut);
    }

    None
}
