//! CSV → 백테스트 → 감지 통합 테스트

use std::io::Write;
use std::path::PathBuf;

use rust_decimal_macros::dec;
use signal_cli::commands::backtest::{backtest_window, build_engine};
use signal_cli::commands::detect::detect_recent;
use signal_cli::commands::load::load_candles;
use signal_core::{AppConfig, Horizon, HorizonPolicy, PatternKind, SignalError};

fn write_csv(name: &str, body: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "signal-cli-it-{}-{}.csv",
        name,
        std::process::id()
    ));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    path
}

fn row(symbol: &str, hour: i64, ohlc: (&str, &str, &str, &str), rsi: u32) -> String {
    let (open, high, low, close) = ohlc;
    format!(
        "{},{},{},{},{},{},1000,{}\n",
        symbol,
        1_704_067_200 + hour * 3600,
        open,
        high,
        low,
        close,
        rsi
    )
}

const BASE: (&str, &str, &str, &str) = ("100", "101", "99.5", "100.5");
const RED: (&str, &str, &str, &str) = ("100.5", "101", "99.5", "100");

#[test]
fn test_wash_out_history_and_live_detection() {
    let mut body = String::from("symbol,open_time,open,high,low,close,volume,rsi7\n");
    // 과거 워시아웃 (인덱스 6) 이후 반등
    for h in 0..20 {
        let (ohlc, rsi) = match h {
            4..=6 => (RED, 20),
            _ => (BASE, 50),
        };
        body.push_str(&row("ADAUSDT", h, ohlc, rsi));
    }
    // 마지막 세 캔들이 다시 워시아웃
    for h in 20..23 {
        body.push_str(&row("ADAUSDT", h, RED, 25));
    }
    let path = write_csv("washout", &body);

    let seq = load_candles(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(seq.len(), 23);

    let app = AppConfig::default();
    let engine = build_engine(&app, Some(HorizonPolicy::RequireAll)).unwrap();
    let report = backtest_window(&engine, &seq, app.backtest.history_window_days);

    assert_eq!(report.fourth_signal.total_signals, 1);
    assert_eq!(report.fourth_signal.occurrences[0].entry_price, Some(dec!(100.5)));
    assert_eq!(report.fourth_signal.stats(Horizon::H1).total, 1);

    let detections = detect_recent(engine.detector(), &seq, app.monitor.recent_candles);
    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].kind, PatternKind::WashOut);
    assert_eq!(detections[0].entry_price, Some(dec!(100.5)));
}

#[test]
fn test_mixed_symbols_are_rejected() {
    let mut body = row("ADAUSDT", 0, BASE, 50);
    body.push_str(&row("BTCUSDT", 1, BASE, 50));
    let path = write_csv("mixed", &body);

    let result = load_candles(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(SignalError::InvalidSequence(_))));
}
