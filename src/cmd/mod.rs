pub mod generate;
pub mod progress;
