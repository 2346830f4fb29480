//! 승률 리포트와 캔들 시퀀스 속성 테스트

use chrono::DateTime;
use proptest::prelude::*;
use rust_decimal::Decimal;
use signal_core::{
    Candle, CandleSequence, Horizon, PatternFamily, PatternKind, SignalOccurrence, WinRateReport,
};

fn candle(hour: i64) -> Candle {
    let open_time = DateTime::from_timestamp(1_704_067_200 + hour * 3600, 0).unwrap();
    Candle::new(
        "ADAUSDT",
        open_time,
        Decimal::from(10),
        Decimal::from(12),
        Decimal::from(9),
        Decimal::from(11),
        Decimal::from(100),
        Decimal::from(50),
    )
}

fn occurrence(index: usize, profits: &[i64]) -> SignalOccurrence {
    let profits = Horizon::ALL
        .into_iter()
        .zip(profits.iter().map(|p| Decimal::from(*p)))
        .collect();
    SignalOccurrence::new(
        PatternKind::OutsideBarBullish,
        index,
        candle(index as i64),
        Some(Decimal::from(10)),
    )
    .with_profits(profits)
}

proptest! {
    #[test]
    fn win_rate_is_a_fraction(
        profit_rows in prop::collection::vec(prop::collection::vec(-50i64..50, 0..=4), 0..40),
        excluded in 0usize..5,
    ) {
        let occurrences: Vec<_> = profit_rows
            .iter()
            .enumerate()
            .map(|(i, row)| occurrence(i, row))
            .collect();
        let count = occurrences.len();

        let report = WinRateReport::from_occurrences(PatternFamily::OutsideBar, occurrences, excluded);

        prop_assert_eq!(report.total_signals, count);
        prop_assert_eq!(report.excluded, excluded);
        for h in Horizon::ALL {
            let rate = report.win_rate(h);
            prop_assert!(rate >= Decimal::ZERO && rate <= Decimal::ONE);
            prop_assert!(report.stats(h).total <= report.total_signals);
            if report.stats(h).total == 0 {
                prop_assert_eq!(rate, Decimal::ZERO);
            }
        }
    }

    #[test]
    fn tail_never_exceeds_sequence(len in 0usize..50, n in 0usize..80) {
        let seq = CandleSequence::new((0..len as i64).map(candle).collect()).unwrap();
        let tail = seq.tail(n);

        prop_assert_eq!(tail.len(), n.min(len));
        prop_assert_eq!(tail.last(), seq.last().filter(|_| n > 0));
        prop_assert!(tail.is_strictly_ordered());
    }
}
