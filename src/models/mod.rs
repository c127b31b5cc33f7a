pub mod tryon;

pub use tryon::*;
