use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::dispatch::{Dispatcher, GestureKind};
use crate::error::{BoxError, Error};
use crate::geom::{classify_angle, classify_direction, vec2, Point, Rect};
use crate::swipe::Swipe;
use crate::timer::{HoldTimer, TimerToken};

/// The area of the screen that we are recognizing gestures in.
///
/// The bounds are only looked at when a contact starts, so a region is free to move or
/// resize between contacts.
pub trait Region {
    fn bounds(&self) -> Rect;
}

impl Region for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

impl Region for Rc<Cell<Rect>> {
    fn bounds(&self) -> Rect {
        self.get()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// How close (in pixels) a contact has to start to the boundary to count as being on an
    /// edge. This is also how far a contact can move and still count as a tap.
    pub threshold: i32,
    /// How long a contact has to stay down without moving before it counts as a hold.
    pub hold_delay: Duration,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            threshold: 5,
            hold_delay: Duration::from_millis(600),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Phase {
    Idle,
    Active,
}

/// Turns the lifecycle of a single contact into gestures.
///
/// The recognizer is driven by three calls: `contact_start`, `contact_move` and
/// `contact_end`. Besides those, whoever owns the recognizer is responsible for telling it
/// when the hold timer expires, either by calling `hold_timeout` with the token that
/// `contact_start` returned, or by calling `advance` with the current time.
///
/// Gestures are only reported once the contact ends, with the exception of `hold`, which is
/// reported when the timer goes off.
#[derive(Debug)]
pub struct Recognizer<R> {
    config: Config,
    region: R,
    phase: Phase,
    swipe: Option<Swipe>,
    timer: HoldTimer,
    dispatcher: Dispatcher,
}

impl<R: Region> Recognizer<R> {
    pub fn new(config: Config, region: R) -> Recognizer<R> {
        Recognizer {
            config,
            region,
            phase: Phase::Idle,
            swipe: None,
            timer: HoldTimer::new(),
            dispatcher: Dispatcher::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn region(&self) -> &R {
        &self.region
    }

    /// The current contact, or the last one if no contact is in progress.
    pub fn swipe(&self) -> Option<&Swipe> {
        self.swipe.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn register<F>(&mut self, kind: GestureKind, handler: F)
    where
        F: FnMut(&Swipe) -> Result<(), BoxError> + 'static,
    {
        self.dispatcher.register(kind, handler);
    }

    /// See `Dispatcher::register_named`.
    pub fn register_named<F>(&mut self, name: &str, handler: F) -> bool
    where
        F: FnMut(&Swipe) -> Result<(), BoxError> + 'static,
    {
        self.dispatcher.register_named(name, handler)
    }

    /// Starts tracking a new contact, throwing away whatever we knew about the previous one.
    ///
    /// Returns the token of the hold timer. It should be passed to `hold_timeout` once
    /// `hold_delay` has elapsed.
    pub fn contact_start(&mut self, pos: Point, time: Duration) -> TimerToken {
        if self.phase == Phase::Active {
            debug!("contact started while another was in progress, replacing it");
        }

        let bounds = self.region.bounds();
        let swipe = Swipe::new(pos, time, &bounds, self.config.threshold);
        debug!("contact started at {:?} ({} edge)", pos, swipe.edge);

        self.swipe = Some(swipe);
        self.phase = Phase::Active;
        self.timer.arm(time, self.config.hold_delay)
    }

    /// Records that the contact moved to `pos`. Any movement at all rules out a hold.
    pub fn contact_move(&mut self, pos: Point, _time: Duration) -> Result<(), Error> {
        let swipe = match (self.phase, self.swipe.as_mut()) {
            (Phase::Active, Some(s)) => s,
            _ => return Err(Error::NoContact),
        };

        self.timer.cancel();
        swipe.end = Some(pos);
        trace!("contact moved to {:?}", pos);
        Ok(())
    }

    /// Finishes the contact and reports whatever gestures it made.
    pub fn contact_end(&mut self, time: Duration) -> Result<(), Error> {
        let swipe = match (self.phase, self.swipe.as_mut()) {
            (Phase::Active, Some(s)) => s,
            _ => return Err(Error::NoContact),
        };
        self.phase = Phase::Idle;

        let duration = swipe.elapsed(time);
        swipe.duration = Some(duration);
        debug!("contact ended after {:?}", duration);

        if duration < self.config.hold_delay {
            self.timer.clear();
        } else {
            // The timeout might not have been delivered yet, but it's too late for a hold now.
            self.timer.cancel();
            self.dispatcher.notify(GestureKind::Release, swipe)?;
        }

        let end = match swipe.end {
            Some(end) => end,
            None => {
                if self.timer.is_idle() {
                    self.dispatcher.notify(GestureKind::Tap, swipe)?;
                }
                return Ok(());
            }
        };

        let delta = vec2(
            end.x.saturating_sub(swipe.start.x),
            end.y.saturating_sub(swipe.start.y),
        );
        swipe.delta = Some(delta);

        let t = self.config.threshold;
        let small = delta.x.saturating_abs() <= t && delta.y.saturating_abs() <= t;
        let axis_aligned = delta.x == 0 || delta.y == 0;
        let stationary = delta.x == 0 && delta.y == 0;

        // Small movements are taps, unless they run along an axis. A contact that came back to
        // where it started has no direction at all.
        if (stationary || (small && !axis_aligned)) && self.timer.is_idle() {
            return self.dispatcher.notify(GestureKind::Tap, swipe);
        } else if stationary {
            debug!("contact ended where it started, ignoring");
            return Ok(());
        }

        let angle = classify_angle(delta);
        let direction = classify_direction(angle);
        swipe.measure(delta, duration);
        swipe.angle = Some(angle);
        swipe.direction = Some(direction);
        debug!(
            "swipe {} at {} over {}px",
            direction,
            angle,
            swipe.distance.unwrap_or_default()
        );

        self.dispatcher.notify(direction.into(), swipe)?;
        self.dispatcher.notify(GestureKind::Move, swipe)
    }

    /// Abandons the current contact without reporting anything.
    pub fn contact_cancel(&mut self) {
        if self.phase == Phase::Active {
            debug!("contact cancelled");
        }
        self.phase = Phase::Idle;
        self.timer.clear();
    }

    /// Tells the recognizer that the hold timer with the given token went off.
    ///
    /// This does nothing if the timer was cancelled, cleared or re-armed in the meantime.
    pub fn hold_timeout(&mut self, token: TimerToken) -> Result<(), Error> {
        if self.phase != Phase::Active || !self.timer.fire(token) {
            return Ok(());
        }
        match self.swipe {
            Some(ref swipe) => self.dispatcher.notify(GestureKind::Hold, swipe),
            None => Ok(()),
        }
    }

    /// When the hold timer is due to go off, if it is armed.
    pub fn next_deadline(&self) -> Option<(TimerToken, Duration)> {
        self.timer.deadline()
    }

    /// Fires the hold timer if its deadline is at or before `now`.
    pub fn advance(&mut self, now: Duration) -> Result<(), Error> {
        match self.timer.deadline() {
            Some((token, deadline)) if deadline <= now => self.hold_timeout(token),
            _ => Ok(()),
        }
    }
}
