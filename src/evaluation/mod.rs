pub mod evaluator;
pub use evaluator::*;

pub mod ranking;
pub use ranking::*;

pub mod result;
pub use result::*;
