//! 아웃사이드 바 판정.
//!
//! 현재 캔들의 고가/저가 범위가 직전 캔들의 범위를 엄격하게 감싸고,
//! 두 캔들의 색이 반전될 때만 신호가 됩니다.
//!
//! | 직전 | 현재 | 결과 |
//! |------|------|------|
//! | 음봉 | 양봉 | 강세 (BUY) |
//! | 양봉 | 음봉 | 약세 (SELL) |
//! | 그 외 | | 신호 없음 |

use signal_core::{Candle, PatternKind};

/// 직전 캔들과 현재 캔들로 아웃사이드 바를 분류합니다.
pub fn classify(prev: &Candle, curr: &Candle) -> Option<PatternKind> {
    if !curr.engulfs_range_of(prev) {
        return None;
    }

    if curr.is_bullish() && prev.is_bearish() {
        Some(PatternKind::OutsideBarBullish)
    } else if curr.is_bearish() && prev.is_bullish() {
        Some(PatternKind::OutsideBarBearish)
    } else {
        None
    }
}
