pub mod coefficient_files;
pub mod memory;
pub mod postgres;

pub use coefficient_files::*;
pub use memory::*;
pub use postgres::*;
