pub mod config;
pub mod site_match;
pub mod text;
pub mod types;

// Keep the public surface small and intentional.
pub use config::*;
pub use site_match::*;
pub use text::*;
pub use types::*;
