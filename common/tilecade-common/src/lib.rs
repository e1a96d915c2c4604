pub mod num;
pub mod wordram;

pub use wordram::WordRam;
