#[macro_use]
extern crate log;

pub mod dispatch;
pub mod error;
pub mod geom;
pub mod manager;
pub mod recognizer;
pub mod swipe;
pub mod timer;

pub use dispatch::GestureKind;
pub use error::Error;
pub use manager::{Manager, TouchEvent};
pub use recognizer::{Config, Recognizer, Region};
pub use swipe::Swipe;
