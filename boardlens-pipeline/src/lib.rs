pub mod controller;
pub mod session;
pub mod traits;

// Keep the public surface small and intentional.
pub use controller::*;
pub use session::*;
pub use traits::*;
