pub mod analysis;
pub mod config_store;
pub mod detection;
mod http;
pub mod lichess;
pub mod pipeline;
pub mod router;

// Keep the public surface small and intentional.
pub use analysis::*;
pub use config_store::*;
pub use detection::*;
pub use lichess::*;
pub use pipeline::*;
pub use router::*;
