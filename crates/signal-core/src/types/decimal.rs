//! 정밀한 가격 계산을 위한 Decimal 유틸리티.

use rust_decimal::Decimal;

/// 금융 정밀도를 위한 가격 타입.
pub type Price = Decimal;

/// 거래량 타입.
pub type Quantity = Decimal;

/// 퍼센트 값 타입 (1.5 = 1.5%).
pub type Percentage = Decimal;

/// Decimal 연산을 위한 확장 트레이트.
pub trait DecimalExt {
    /// 0보다 큰지 확인합니다 (0은 양수가 아님).
    fn is_strictly_positive(&self) -> bool;

    /// 비율(0.0525)을 소수점 2자리 퍼센트 문자열("5.25%")로 변환합니다.
    fn to_percentage_string(&self) -> String;

    /// 지정된 소수점 자릿수로 반올림합니다 (0.5는 0에서 먼 쪽으로).
    fn round_half_up(&self, dp: u32) -> Decimal;
}

impl DecimalExt for Decimal {
    fn is_strictly_positive(&self) -> bool {
        *self > Decimal::ZERO
    }

    fn to_percentage_string(&self) -> String {
        let pct = (*self * Decimal::ONE_HUNDRED).round_half_up(2);
        format!("{:.2}%", pct)
    }

    fn round_half_up(&self, dp: u32) -> Decimal {
        self.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
    }
}
