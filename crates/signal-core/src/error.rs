//! 신호 시스템의 에러 타입.
//!
//! 패턴 감지와 백테스트 자체는 데이터가 부족하거나 품질이 낮아도 에러를
//! 반환하지 않습니다 (신호 없음 / 발생 제외로 처리). 여기 정의된 에러는
//! 상위 계약 위반(잘못된 캔들, 잘못된 시퀀스)과 설정 문제에만 사용됩니다.

use thiserror::Error;

/// 핵심 신호 에러.
#[derive(Debug, Error)]
pub enum SignalError {
    /// 캔들 구조 위반 (high < low, RSI 범위 초과 등)
    #[error("잘못된 캔들: {0}")]
    InvalidCandle(String),

    /// 시퀀스 구성 위반 (심볼 혼합 등)
    #[error("잘못된 시퀀스: {0}")]
    InvalidSequence(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 데이터 에러
    #[error("데이터 에러: {0}")]
    Data(String),
}

/// 신호 작업을 위한 Result 타입.
pub type SignalResult<T> = Result<T, SignalError>;

impl SignalError {
    /// 상위 데이터 계약 위반인지 확인합니다.
    ///
    /// 계약 위반은 조용히 무시하지 않고 호출자에게 그대로 전달해야 합니다.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            SignalError::InvalidCandle(_) | SignalError::InvalidSequence(_)
        )
    }
}

impl From<config::ConfigError> for SignalError {
    fn from(err: config::ConfigError) -> Self {
        SignalError::Config(err.to_string())
    }
}
