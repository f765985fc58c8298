pub mod analysis;
pub mod detection;
pub mod lichess;
pub mod parse;
pub mod request;
pub mod runtime;

// Keep the public surface small and intentional.
pub use analysis::*;
pub use detection::*;
pub use lichess::*;
pub use parse::*;
pub use request::*;
pub use runtime::*;
