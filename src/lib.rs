pub mod error;
pub mod filter;
pub mod output;
pub mod process;
pub mod record;
pub mod score;
pub mod source;
