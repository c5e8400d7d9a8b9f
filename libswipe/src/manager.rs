use std::time::Duration;

use crate::error::Error;
use crate::geom::Point;
use crate::recognizer::{Recognizer, Region};

/// We don't pay any attention to more than this many fingers.
pub const MAX_SLOTS: usize = 10;

/// A raw touch sample, as delivered by the platform.
///
/// Every finger on the screen gets its own slot. Positions are optional because not every
/// source guarantees them, but a `Down` or `Motion` for the contact we're tracking has to
/// have one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TouchEvent {
    Down { slot: u32, pos: Option<Point>, time: Duration },
    Motion { slot: u32, pos: Option<Point>, time: Duration },
    Up { slot: u32, time: Duration },
    /// All the touches were taken away from us, for example by a compositor grab.
    Cancel { time: Duration },
}

impl TouchEvent {
    pub fn time(&self) -> Duration {
        match *self {
            TouchEvent::Down { time, .. }
            | TouchEvent::Motion { time, .. }
            | TouchEvent::Up { time, .. }
            | TouchEvent::Cancel { time } => time,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PointerType {
    Mouse,
    Pen,
    Touch,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SyntheticKind {
    /// The click that gets generated after a tap.
    Click,
    /// The context menu that gets opened by a long press.
    ContextMenu,
}

/// An event that the platform makes up on its own, based on the touch input it has seen.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SyntheticEvent {
    pub kind: SyntheticKind,
    pub pointer: PointerType,
}

/// What the platform should do with a synthetic event.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Suppression {
    /// Skip the platform's default action for the event.
    pub prevent_default: bool,
    /// Don't let anyone else see the event.
    pub stop_propagation: bool,
}

/// Connects a `Recognizer` to a stream of raw touch samples.
///
/// Only the first finger of a touch sequence is followed: a contact starts when a finger goes
/// down on an empty screen, and ends when that finger goes up. Other fingers are tracked, so
/// that we know when the screen is empty again, but they are otherwise ignored.
#[derive(Debug)]
pub struct Manager<R> {
    recognizer: Recognizer<R>,
    down: [bool; MAX_SLOTS],
    num_down: u8,
    primary: Option<u32>,
}

impl<R: Region> Manager<R> {
    pub fn new(recognizer: Recognizer<R>) -> Manager<R> {
        Manager {
            recognizer,
            down: [false; MAX_SLOTS],
            num_down: 0,
            primary: None,
        }
    }

    pub fn recognizer(&self) -> &Recognizer<R> {
        &self.recognizer
    }

    pub fn recognizer_mut(&mut self) -> &mut Recognizer<R> {
        &mut self.recognizer
    }

    /// Feeds a touch sample to the recognizer.
    ///
    /// Any hold timer that expired before the sample was taken goes off first. The sample is
    /// applied even if a hold handler fails, and the first error is returned.
    pub fn update(&mut self, ev: &TouchEvent) -> Result<(), Error> {
        let advanced = self.recognizer.advance(ev.time());
        let applied = self.apply(ev);
        advanced.and(applied)
    }

    fn apply(&mut self, ev: &TouchEvent) -> Result<(), Error> {
        match *ev {
            TouchEvent::Down { slot, pos, time } => {
                let i = slot as usize;
                if i >= MAX_SLOTS {
                    warn!("not enough slots for {:?}", ev);
                    return Ok(());
                }
                if self.down[i] {
                    warn!("down event, but the finger was already down?");
                    return Ok(());
                }

                let first = self.num_down == 0;
                if first {
                    let pos = pos.ok_or(Error::MissingCoordinates { slot })?;
                    self.primary = Some(slot);
                    self.recognizer.contact_start(pos, time);
                }
                self.down[i] = true;
                self.num_down += 1;
            }
            TouchEvent::Motion { slot, pos, time } => {
                if self.primary == Some(slot) {
                    let pos = pos.ok_or(Error::MissingCoordinates { slot })?;
                    self.recognizer.contact_move(pos, time)?;
                }
            }
            TouchEvent::Up { slot, time } => {
                let i = slot as usize;
                if i >= MAX_SLOTS || !self.down[i] {
                    warn!("up event, but the finger was already up?");
                    return Ok(());
                }

                self.down[i] = false;
                self.num_down -= 1;
                if self.primary == Some(slot) {
                    self.primary = None;
                    self.recognizer.contact_end(time)?;
                }
            }
            TouchEvent::Cancel { .. } => {
                self.down = [false; MAX_SLOTS];
                self.num_down = 0;
                self.primary = None;
                self.recognizer.contact_cancel();
            }
        }
        Ok(())
    }

    /// Decides what to do with a click or context menu that the platform made up.
    ///
    /// When they come from touch input, they would interfere with the gestures, so we swallow
    /// them. Mouse and pen input is left alone.
    pub fn filter_synthetic(&self, ev: &SyntheticEvent) -> Suppression {
        if ev.pointer != PointerType::Touch {
            return Suppression::default();
        }

        debug!("suppressing synthetic {:?}", ev.kind);
        match ev.kind {
            SyntheticKind::Click => Suppression {
                prevent_default: true,
                stop_propagation: false,
            },
            SyntheticKind::ContextMenu => Suppression {
                prevent_default: true,
                stop_propagation: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::GestureKind;
    use crate::geom::{point2, Rect};
    use crate::recognizer::Config;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<GestureKind>>>;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn manager() -> (Manager<Rect>, Log) {
        let mut rec = Recognizer::new(
            Config::default(),
            Rect::new(point2(0, 0), point2(1000, 1000)),
        );
        let log: Log = Rc::new(RefCell::new(vec![]));
        for &kind in &GestureKind::ALL {
            let log = log.clone();
            rec.register(kind, move |_| {
                log.borrow_mut().push(kind);
                Ok(())
            });
        }
        (Manager::new(rec), log)
    }

    fn down(slot: u32, x: i32, y: i32, t: u64) -> TouchEvent {
        TouchEvent::Down {
            slot,
            pos: Some(point2(x, y)),
            time: ms(t),
        }
    }

    fn motion(slot: u32, x: i32, y: i32, t: u64) -> TouchEvent {
        TouchEvent::Motion {
            slot,
            pos: Some(point2(x, y)),
            time: ms(t),
        }
    }

    fn up(slot: u32, t: u64) -> TouchEvent {
        TouchEvent::Up { slot, time: ms(t) }
    }

    fn run(man: &mut Manager<Rect>, events: &[TouchEvent]) {
        for ev in events {
            man.update(ev).unwrap();
        }
    }

    #[test]
    fn swipe_left() {
        let (mut man, log) = manager();
        run(
            &mut man,
            &[
                down(0, 500, 500, 0),
                motion(0, 450, 505, 20),
                motion(0, 300, 510, 40),
                up(0, 60),
            ],
        );
        assert_eq!(*log.borrow(), vec![GestureKind::Left, GestureKind::Move]);
        assert_eq!(man.recognizer().swipe().unwrap().end, Some(point2(300, 510)));
    }

    #[test]
    fn hold_fires_before_late_sample() {
        let (mut man, log) = manager();
        run(&mut man, &[down(0, 500, 500, 0), up(0, 800)]);
        assert_eq!(*log.borrow(), vec![GestureKind::Hold, GestureKind::Release]);
    }

    #[test]
    fn failing_hold_does_not_lose_the_lift() {
        let (mut man, log) = manager();
        man.recognizer_mut().register(GestureKind::Hold, |_| Err("hold failed".into()));

        man.update(&down(0, 500, 500, 0)).unwrap();
        match man.update(&up(0, 800)) {
            Err(Error::Handler { kind: GestureKind::Hold, .. }) => {}
            other => panic!("unexpected result {:?}", other),
        }
        assert!(!man.recognizer().is_active());
        assert_eq!(*log.borrow(), vec![GestureKind::Hold, GestureKind::Release]);

        run(&mut man, &[down(0, 500, 500, 5000), up(0, 5050)]);
        assert_eq!(
            *log.borrow(),
            vec![GestureKind::Hold, GestureKind::Release, GestureKind::Tap]
        );
    }

    #[test]
    fn only_first_finger_counts() {
        let (mut man, log) = manager();
        run(
            &mut man,
            &[
                down(0, 500, 500, 0),
                down(1, 100, 100, 10),
                motion(1, 900, 100, 20),
                up(0, 30),
                // The screen isn't empty yet, so this doesn't start a new contact.
                down(0, 500, 500, 40),
                motion(0, 500, 900, 50),
                up(0, 60),
                up(1, 70),
            ],
        );
        assert_eq!(*log.borrow(), vec![GestureKind::Tap]);

        run(&mut man, &[down(3, 500, 500, 100), up(3, 150)]);
        assert_eq!(*log.borrow(), vec![GestureKind::Tap, GestureKind::Tap]);
    }

    #[test]
    fn missing_coordinates() {
        let (mut man, log) = manager();
        let bad_down = TouchEvent::Down {
            slot: 0,
            pos: None,
            time: ms(0),
        };
        match man.update(&bad_down) {
            Err(Error::MissingCoordinates { slot: 0 }) => {}
            other => panic!("unexpected result {:?}", other),
        }

        man.update(&down(0, 500, 500, 10)).unwrap();
        let bad_motion = TouchEvent::Motion {
            slot: 0,
            pos: None,
            time: ms(20),
        };
        assert!(matches!(
            man.update(&bad_motion),
            Err(Error::MissingCoordinates { slot: 0 })
        ));
        man.update(&up(0, 30)).unwrap();
        assert_eq!(*log.borrow(), vec![GestureKind::Tap]);
    }

    #[test]
    fn bogus_slots_are_ignored() {
        let (mut man, log) = manager();
        run(
            &mut man,
            &[up(2, 0), down(40, 1, 1, 5), down(0, 500, 500, 10), down(0, 1, 1, 15), up(0, 20)],
        );
        assert_eq!(*log.borrow(), vec![GestureKind::Tap]);
    }

    #[test]
    fn cancel() {
        let (mut man, log) = manager();
        run(
            &mut man,
            &[
                down(0, 500, 500, 0),
                down(1, 600, 600, 5),
                TouchEvent::Cancel { time: ms(10) },
                // Nothing is down after a cancel, so neither of these does anything.
                up(0, 20),
                up(1, 25),
            ],
        );
        man.recognizer_mut().advance(ms(2000)).unwrap();
        assert!(log.borrow().is_empty());

        run(&mut man, &[down(1, 500, 500, 3000), up(1, 3010)]);
        assert_eq!(*log.borrow(), vec![GestureKind::Tap]);
    }

    #[test]
    fn synthetic_events() {
        let (man, _) = manager();
        let touch_click = SyntheticEvent {
            kind: SyntheticKind::Click,
            pointer: PointerType::Touch,
        };
        assert_eq!(
            man.filter_synthetic(&touch_click),
            Suppression {
                prevent_default: true,
                stop_propagation: false,
            }
        );

        let touch_menu = SyntheticEvent {
            kind: SyntheticKind::ContextMenu,
            pointer: PointerType::Touch,
        };
        assert_eq!(
            man.filter_synthetic(&touch_menu),
            Suppression {
                prevent_default: true,
                stop_propagation: true,
            }
        );

        for &pointer in &[PointerType::Mouse, PointerType::Pen] {
            for &kind in &[SyntheticKind::Click, SyntheticKind::ContextMenu] {
                let ev = SyntheticEvent { kind, pointer };
                assert_eq!(man.filter_synthetic(&ev), Suppression::default());
            }
        }
    }
}
