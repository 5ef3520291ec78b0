pub mod math;
mod paginator;

pub use paginator::*;
