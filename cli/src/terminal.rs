pub mod logging;
pub mod print;
