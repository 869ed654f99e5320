pub mod board;
pub mod console;
