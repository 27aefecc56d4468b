pub mod archive;
pub mod csv;

use serde::{Deserialize, Serialize};

pub use self::archive::*;
pub use self::csv::*;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub imported: usize,
    pub errors: Vec<String>,
}
