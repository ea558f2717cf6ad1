pub mod messages;
pub mod quarto;

pub use crate::quarto::*;
