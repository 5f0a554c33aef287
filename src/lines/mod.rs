pub mod board;
pub mod ladder;
pub mod moneyline;

pub use board::{build_board, Board, BoardParams, LineRow, StrikeQuote};
pub use moneyline::Moneyline;
