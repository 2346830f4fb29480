//! 신호 감지와 백테스트를 위한 도메인 모델.

mod candle;
mod occurrence;
mod pattern;
mod report;
mod side;

pub use candle::*;
pub use occurrence::*;
pub use pattern::*;
pub use report::*;
pub use side::*;
