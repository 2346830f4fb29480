//! 패턴 종류, 패턴 계열, 보유 기간(horizon) 정의.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::side::Side;

/// 감지 가능한 패턴 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// 강세 아웃사이드 바 (음봉 → 감싸는 양봉)
    OutsideBarBullish,
    /// 약세 아웃사이드 바 (양봉 → 감싸는 음봉)
    OutsideBarBearish,
    /// 과매수 양봉 3연속 (분산 신호)
    FourthDistribution,
    /// 과매도 음봉 3연속 (워시아웃)
    WashOut,
}

impl PatternKind {
    /// 모든 패턴 종류.
    pub const ALL: [PatternKind; 4] = [
        PatternKind::OutsideBarBullish,
        PatternKind::OutsideBarBearish,
        PatternKind::FourthDistribution,
        PatternKind::WashOut,
    ];

    /// 이 패턴이 속한 계열.
    pub fn family(&self) -> PatternFamily {
        match self {
            PatternKind::OutsideBarBullish | PatternKind::OutsideBarBearish => {
                PatternFamily::OutsideBar
            }
            PatternKind::FourthDistribution | PatternKind::WashOut => PatternFamily::FourthSignal,
        }
    }

    /// 패턴이 제안하는 주문 방향.
    pub fn side(&self) -> Side {
        match self {
            PatternKind::OutsideBarBullish | PatternKind::WashOut => Side::Buy,
            PatternKind::OutsideBarBearish | PatternKind::FourthDistribution => Side::Sell,
        }
    }

    /// 알림에 표시되는 이름.
    pub fn label(&self) -> &'static str {
        match self {
            PatternKind::OutsideBarBullish => "Bullish Outside Bar",
            PatternKind::OutsideBarBearish => "Bearish Outside Bar",
            PatternKind::FourthDistribution => "Fourth Distribution",
            PatternKind::WashOut => "Wash-out",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 패턴 계열. 승률 리포트는 계열 단위로 집계됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternFamily {
    /// 아웃사이드 바 (2캔들)
    OutsideBar,
    /// 4번째 신호 / 워시아웃 (3캔들)
    FourthSignal,
}

impl PatternFamily {
    /// 모든 계열.
    pub const ALL: [PatternFamily; 2] = [PatternFamily::OutsideBar, PatternFamily::FourthSignal];

    /// 패턴 판정에 필요한 최소 캔들 수.
    pub fn min_candles(&self) -> usize {
        match self {
            PatternFamily::OutsideBar => 2,
            PatternFamily::FourthSignal => 3,
        }
    }

    /// 진입 기준 캔들이 신호 캔들로부터 몇 칸 뒤인지.
    ///
    /// 아웃사이드 바는 다음 캔들 시가에 진입하고, 4번째 신호는 신호 캔들
    /// 자신의 시가에 진입합니다.
    pub fn entry_offset(&self) -> usize {
        match self {
            PatternFamily::OutsideBar => 1,
            PatternFamily::FourthSignal => 0,
        }
    }

    /// 표시 이름.
    pub fn label(&self) -> &'static str {
        match self {
            PatternFamily::OutsideBar => "Outside Bar",
            PatternFamily::FourthSignal => "Fourth Signal",
        }
    }
}

impl fmt::Display for PatternFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 수익을 측정하는 보유 기간 (캔들 수).
///
/// 직렬화 시 캔들 수 정수(1, 2, 4, 6)로 표현됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Horizon {
    /// 1캔들
    H1,
    /// 2캔들
    H2,
    /// 4캔들
    H4,
    /// 6캔들
    H6,
}

impl Horizon {
    /// 모든 보유 기간 (오름차순).
    pub const ALL: [Horizon; 4] = [Horizon::H1, Horizon::H2, Horizon::H4, Horizon::H6];

    /// 가장 긴 보유 기간.
    pub const MAX: Horizon = Horizon::H6;

    /// 캔들 수.
    pub fn candles(&self) -> usize {
        match self {
            Horizon::H1 => 1,
            Horizon::H2 => 2,
            Horizon::H4 => 4,
            Horizon::H6 => 6,
        }
    }

    /// 캔들 수로부터 보유 기간을 찾습니다.
    pub fn from_candles(candles: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.candles() == candles)
    }
}

impl From<Horizon> for u8 {
    fn from(h: Horizon) -> Self {
        h.candles() as u8
    }
}

impl TryFrom<u8> for Horizon {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Horizon::from_candles(value as usize)
            .ok_or_else(|| format!("Unsupported horizon: {} (expected 1, 2, 4 or 6)", value))
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.candles())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_side_mapping() {
        assert_eq!(PatternKind::OutsideBarBullish.side(), Side::Buy);
        assert_eq!(PatternKind::OutsideBarBearish.side(), Side::Sell);
        assert_eq!(PatternKind::FourthDistribution.side(), Side::Sell);
        assert_eq!(PatternKind::WashOut.side(), Side::Buy);
    }

    #[test]
    fn test_kind_family_mapping() {
        assert_eq!(PatternKind::OutsideBarBullish.family(), PatternFamily::OutsideBar);
        assert_eq!(PatternKind::OutsideBarBearish.family(), PatternFamily::OutsideBar);
        assert_eq!(PatternKind::FourthDistribution.family(), PatternFamily::FourthSignal);
        assert_eq!(PatternKind::WashOut.family(), PatternFamily::FourthSignal);
    }

    #[test]
    fn test_entry_offset_asymmetry() {
        assert_eq!(PatternFamily::OutsideBar.entry_offset(), 1);
        assert_eq!(PatternFamily::FourthSignal.entry_offset(), 0);
    }

    #[test]
    fn test_horizon_serde_as_integer() {
        let json = serde_json::to_string(&Horizon::ALL).unwrap();
        assert_eq!(json, "[1,2,4,6]");

        let h: Horizon = serde_json::from_str("4").unwrap();
        assert_eq!(h, Horizon::H4);
        assert!(serde_json::from_str::<Horizon>("3").is_err());
    }

    #[test]
    fn test_each_family_has_one_buy_and_one_sell() {
        for family in PatternFamily::ALL {
            let sides: Vec<Side> = PatternKind::ALL
                .into_iter()
                .filter(|k| k.family() == family)
                .map(|k| k.side())
                .collect();
            assert_eq!(sides.len(), 2);
            assert!(sides.contains(&Side::Buy) && sides.contains(&Side::Sell));
        }
    }
}
