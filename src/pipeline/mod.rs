pub mod distance;
pub mod parse;
pub mod process;
