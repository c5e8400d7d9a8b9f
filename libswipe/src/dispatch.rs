use std::fmt::{self, Debug};
use std::str::FromStr;

use crate::error::{BoxError, Error};
use crate::geom::Direction;
use crate::swipe::Swipe;

/// The gestures that a `Recognizer` can report.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GestureKind {
    Tap,
    Hold,
    Release,
    Move,
    Left,
    Right,
    Up,
    Down,
}

impl GestureKind {
    pub const ALL: [GestureKind; 8] = [
        GestureKind::Tap,
        GestureKind::Hold,
        GestureKind::Release,
        GestureKind::Move,
        GestureKind::Left,
        GestureKind::Right,
        GestureKind::Up,
        GestureKind::Down,
    ];

    pub fn name(&self) -> &'static str {
        use self::GestureKind::*;

        match *self {
            Tap => "tap",
            Hold => "hold",
            Release => "release",
            Move => "move",
            Left => "left",
            Right => "right",
            Up => "up",
            Down => "down",
        }
    }
}

impl From<Direction> for GestureKind {
    fn from(d: Direction) -> GestureKind {
        match d {
            Direction::Up => GestureKind::Up,
            Direction::Down => GestureKind::Down,
            Direction::Left => GestureKind::Left,
            Direction::Right => GestureKind::Right,
        }
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The error returned when parsing an unknown gesture name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownGesture(pub String);

impl fmt::Display for UnknownGesture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown gesture {:?}", self.0)
    }
}

impl std::error::Error for UnknownGesture {}

impl FromStr for GestureKind {
    type Err = UnknownGesture;

    fn from_str(s: &str) -> Result<GestureKind, UnknownGesture> {
        GestureKind::ALL
            .iter()
            .find(|k| k.name() == s)
            .cloned()
            .ok_or_else(|| UnknownGesture(s.to_owned()))
    }
}

pub type Handler = Box<dyn FnMut(&Swipe) -> Result<(), BoxError>>;

/// Keeps track of who wants to hear about which gestures.
///
/// Handlers are called in the order that they were registered in. Registering the same kind
/// twice is fine; both handlers will be called.
pub struct Dispatcher {
    handlers: Vec<(GestureKind, Handler)>,
}

impl Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kinds = self.handlers.iter().map(|&(k, _)| k).collect::<Vec<_>>();
        write!(f, "Dispatcher<{:?}>", kinds)
    }
}

impl Dispatcher {
    pub fn new() -> Dispatcher {
        Dispatcher { handlers: vec![] }
    }

    pub fn register<F>(&mut self, kind: GestureKind, handler: F)
    where
        F: FnMut(&Swipe) -> Result<(), BoxError> + 'static,
    {
        self.handlers.push((kind, Box::new(handler)));
    }

    /// Registers a handler for a gesture given by name.
    ///
    /// If `name` isn't the name of a gesture, the handler is dropped with a warning and this
    /// returns `false`.
    pub fn register_named<F>(&mut self, name: &str, handler: F) -> bool
    where
        F: FnMut(&Swipe) -> Result<(), BoxError> + 'static,
    {
        match name.parse() {
            Ok(kind) => {
                self.register(kind, handler);
                true
            }
            Err(e) => {
                warn!("{}, ignoring handler", e);
                false
            }
        }
    }

    /// Calls every handler registered for `kind`.
    ///
    /// If a handler fails, the handlers after it are skipped and the error is returned.
    pub fn notify(&mut self, kind: GestureKind, swipe: &Swipe) -> Result<(), Error> {
        debug!("{} gesture", kind);
        for (k, handler) in self.handlers.iter_mut() {
            if *k == kind {
                handler(swipe).map_err(|source| Error::Handler { kind, source })?;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for Dispatcher {
    fn default() -> Dispatcher {
        Dispatcher::new()
    }
}
