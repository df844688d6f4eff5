// 模組定義
pub mod convert;
pub mod error;
pub mod local;
pub mod truncate;

// 重新導出常用組件
pub use error::{TimeError, TimeResult};
pub use truncate::{Truncator, MILLIS_PER_DAY};
