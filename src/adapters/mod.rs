pub mod jsonfile;
pub mod memory;
pub mod postgres;
