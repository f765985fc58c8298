pub mod config;
pub mod fen;
pub mod present;
pub mod presets;
pub mod types;

// Keep the public surface small and intentional.
pub use config::*;
pub use fen::*;
pub use present::*;
pub use presets::*;
pub use types::*;
