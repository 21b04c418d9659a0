pub mod choreography;
pub mod config;
pub mod constants;
pub mod geometry;
pub mod interaction;
pub mod orbit;
pub mod picking;
pub mod registry;
pub mod sinks;
pub mod state;
pub mod tween;

pub use choreography::*;
pub use config::*;
pub use constants::*;
pub use interaction::*;
pub use picking::{RayHit, Viewport};
pub use registry::*;
pub use sinks::*;
pub use state::*;
pub use tween::{Easing, TweenValue};
