//! World placement and plane tracking for an AR sketch placement demo.
//!
//! The crate is free of platform APIs: a driver feeds it frame snapshots, plane
//! callbacks and gestures, and applies the [`SceneEvent`]s it emits.

pub mod anchor;
pub mod constants;
pub mod error;
pub mod events;
pub mod fallback;
pub mod frame;
pub mod object;
pub mod placement;
pub mod plane;
pub mod resolver;
pub mod session;
pub mod settings;
pub mod snap;

pub use anchor::*;
pub use constants::*;
pub use error::*;
pub use events::*;
pub use fallback::*;
pub use frame::*;
pub use hit_test::*;
pub use object::*;
pub use placement::*;
pub use plane::*;
pub use resolver::*;
pub use session::*;
pub use settings::*;
pub use snap::*;
