pub mod block;
pub mod hostname;
pub mod range;
