//! 캔들 CSV 로더.
//!
//! 형식: `symbol,open_time,open,high,low,close,volume,rsi7`
//!
//! - `open_time`은 unix 초
//! - 첫 줄이 `symbol`로 시작하면 헤더로 보고 건너뜀
//! - 빈 줄은 무시, 그 외 잘못된 행은 줄 번호와 함께 에러

use chrono::DateTime;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use signal_core::{Candle, CandleSequence, SignalError, SignalResult};

/// 한 행의 필드 수.
const FIELD_COUNT: usize = 8;

/// CSV 파일에서 캔들 시퀀스를 읽습니다.
pub fn load_candles(path: impl AsRef<Path>) -> SignalResult<CandleSequence> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        SignalError::Data(format!("Failed to read CSV file {}: {}", path.display(), e))
    })?;

    let candles = parse_candles(&content)?;
    debug!(path = %path.display(), candles = candles.len(), "Candles loaded");

    CandleSequence::new(candles)
}

/// 에러 체인 안에 입력 데이터의 계약 위반(잘못된 캔들, 심볼 혼합)이 있는지 확인합니다.
pub fn is_rejected_input(err: &anyhow::Error) -> bool {
    err.downcast_ref::<SignalError>()
        .is_some_and(SignalError::is_contract_violation)
}

/// CSV 텍스트를 캔들 목록으로 파싱합니다.
pub fn parse_candles(content: &str) -> SignalResult<Vec<Candle>> {
    let mut candles = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        // 헤더 건너뛰기
        if candles.is_empty() && line.to_lowercase().starts_with("symbol") {
            continue;
        }

        candles.push(parse_row(line_no + 1, line)?);
    }

    Ok(candles)
}

fn parse_row(line_no: usize, line: &str) -> SignalResult<Candle> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() != FIELD_COUNT {
        return Err(SignalError::Data(format!(
            "line {}: expected {} fields, found {}",
            line_no,
            FIELD_COUNT,
            parts.len()
        )));
    }

    let open_time = parts[1]
        .parse::<i64>()
        .ok()
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .ok_or_else(|| {
            SignalError::Data(format!("line {}: invalid open_time '{}'", line_no, parts[1]))
        })?;

    let decimal = |idx: usize, name: &str| -> SignalResult<Decimal> {
        Decimal::from_str(parts[idx]).map_err(|e| {
            SignalError::Data(format!("line {}: invalid {} '{}': {}", line_no, name, parts[idx], e))
        })
    };

    let candle = Candle::new(
        parts[0],
        open_time,
        decimal(2, "open")?,
        decimal(3, "high")?,
        decimal(4, "low")?,
        decimal(5, "close")?,
        decimal(6, "volume")?,
        decimal(7, "rsi7")?,
    );

    candle.validate().map_err(|e| match e {
        SignalError::InvalidCandle(msg) => {
            SignalError::InvalidCandle(format!("line {}: {}", line_no, msg))
        }
        other => other,
    })?;

    Ok(candle)
}
