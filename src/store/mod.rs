pub mod goals;
pub mod trades;

pub use goals::*;
pub use trades::*;
