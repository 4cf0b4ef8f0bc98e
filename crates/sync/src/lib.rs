pub mod context;
pub mod converter;
pub mod converters;
pub mod dispatch;
pub mod ground_reference;
pub mod run;

pub use context::*;
pub use converter::*;
pub use dispatch::*;
pub use ground_reference::GROUND_REFERENCE_EPSILON;
pub use run::*;
