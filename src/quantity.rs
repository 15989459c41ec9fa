#[macro_use]
pub mod macros;

pub mod currency;
pub mod distance;
pub mod ratios;
mod zero;

pub use self::zero::Zero;
