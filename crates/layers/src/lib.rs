pub mod config;
pub mod symbology;

pub use config::*;
pub use symbology::*;
