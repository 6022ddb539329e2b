pub mod enums;
pub mod record;
pub mod verdict;

pub use enums::*;
pub use record::*;
pub use verdict::*;
