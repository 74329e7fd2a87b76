//! Outbound ポート: アプリが外界（端末入力・表示・割り込み）を使うための trait

pub mod console;
pub mod interrupt_checker;
pub mod line_reader;

pub use console::Console;
pub use interrupt_checker::InterruptChecker;
pub use line_reader::LineReader;
