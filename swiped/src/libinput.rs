use chan_signal::Signal;
use input::event::touch::{self, TouchEventPosition, TouchEventSlot, TouchEventTrait};
use input::event::Event;
use input::Libinput;
use libc::{c_char, c_int, c_void};
use libswipe::geom::{point2, Rect};
use libswipe::timer::TimerToken;
use libswipe::{Manager, Region, TouchEvent};
use std::time::Duration;

unsafe extern "C"
fn open_restricted(path: *const c_char, flags: c_int, _: *mut c_void) -> c_int {
    libc::open(path, flags)
}

unsafe extern "C"
fn close_restricted(fd: c_int, _: *mut c_void) {
    libc::close(fd);
}

static INTERFACE: input::LibinputInterface = input::LibinputInterface {
    open_restricted: Some(open_restricted),
    close_restricted: Some(close_restricted),
};

pub struct Input {
    pub libinput: Libinput,
    pub poll: chan::Receiver<()>,
}

fn init_libinput() -> Result<Libinput, String> {
    unsafe {
        let udev = libudev_sys::udev_new();
        if udev.is_null() {
            return Err("couldn't create a udev context".to_owned());
        }

        // Pass in some nonsense userdata, because otherwise libinput segfaults on exit.
        let mut libinput = Libinput::new_from_udev::<()>(INTERFACE, Some(()), udev as *mut c_void);
        if let Err(_) = libinput.udev_assign_seat("seat0") {
            libudev_sys::udev_unref(udev);
            return Err("couldn't assign seat0 to libinput".to_owned());
        }

        libudev_sys::udev_unref(udev);
        Ok(libinput)
    }
}

pub fn input() -> Result<Input, String> {
    let libinput = init_libinput()?;
    let mut pollfd = libc::pollfd {
        fd: unsafe { libinput.fd() },
        events: libc::POLLIN,
        revents: 0,
    };

    let (send, recv) = chan::sync(0);
    ::std::thread::spawn(move || {
        while unsafe { libc::poll(&mut pollfd as *mut libc::pollfd, 1, -1) } >= 0 {
            send.send(());
        }
    });

    Ok(Input {
        libinput: libinput,
        poll: recv,
    })
}

/// The current time on the clock that libinput timestamps its events with.
fn monotonic_now() -> Duration {
    let mut ts = libc::timespec { tv_sec: 0, tv_nsec: 0 };
    unsafe {
        libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts);
    }
    Duration::new(ts.tv_sec as u64, ts.tv_nsec as u32)
}

/// Translates a libinput touch event into screen coordinates inside `bounds`.
///
/// Frame events are dropped, since we handle every sample as soon as it arrives.
fn convert(ev: &touch::TouchEvent, bounds: &Rect) -> Option<TouchEvent> {
    let width = bounds.width().max(1) as u32;
    let height = bounds.height().max(1) as u32;
    let pos = |x: f64, y: f64| Some(point2(bounds.min.x + x as i32, bounds.min.y + y as i32));

    match ev {
        &touch::TouchEvent::Down(ref ev) => Some(TouchEvent::Down {
            slot: ev.slot().unwrap_or(0),
            pos: pos(ev.x_transformed(width), ev.y_transformed(height)),
            time: Duration::from_micros(ev.time_usec()),
        }),
        &touch::TouchEvent::Motion(ref ev) => Some(TouchEvent::Motion {
            slot: ev.slot().unwrap_or(0),
            pos: pos(ev.x_transformed(width), ev.y_transformed(height)),
            time: Duration::from_micros(ev.time_usec()),
        }),
        &touch::TouchEvent::Up(ref ev) => Some(TouchEvent::Up {
            slot: ev.slot().unwrap_or(0),
            time: Duration::from_micros(ev.time_usec()),
        }),
        &touch::TouchEvent::Cancel(ref ev) => Some(TouchEvent::Cancel {
            time: Duration::from_micros(ev.time_usec()),
        }),
        &touch::TouchEvent::Frame(_) => None,
    }
}

/// The channel that wakes us up when the hold timer is due.
///
/// `chan::after` starts a thread per call, so a channel is only made once per armed timer.
struct HoldTimeout<T> {
    token: Option<TimerToken>,
    recv: T,
}

impl<T: Clone> HoldTimeout<T> {
    fn new(never: T) -> HoldTimeout<T> {
        HoldTimeout { token: None, recv: never }
    }

    /// Returns the channel for `deadline`, making a new one with `after` if the timer changed.
    fn update<F>(&mut self, deadline: Option<(TimerToken, Duration)>, never: &T, after: F) -> T
    where
        F: FnOnce(Duration) -> T,
    {
        let token = deadline.map(|(token, _)| token);
        if token != self.token {
            self.token = token;
            self.recv = match deadline {
                Some((_, deadline)) => after(deadline),
                None => never.clone(),
            };
        }
        self.recv.clone()
    }
}

/// Feeds touch events from libinput into `man` until we get SIGINT or SIGTERM.
///
/// Besides waiting for input, we also wait for the recognizer's hold timer to expire.
pub fn run<R: Region>(man: &mut Manager<R>, bounds: Rect) -> Result<(), String> {
    let signal = chan_signal::notify(&[Signal::INT, Signal::TERM]);
    let mut input = input()?;
    let (_never_send, never) = chan::sync::<()>(0);

    input.libinput.dispatch().map_err(|e| format!("libinput dispatch failed: {}", e))?;
    while let Some(event) = input.libinput.next() {
        debug!("got initial event: {:?}", event);
    }

    let poll = input.poll.clone();
    let mut hold = HoldTimeout::new(never.clone());
    loop {
        let timeout = hold.update(man.recognizer().next_deadline(), &never, |deadline| {
            chan::after(deadline.checked_sub(monotonic_now()).unwrap_or_default())
        });

        chan_select! {
            poll.recv() => {
                input.libinput.dispatch().map_err(|e| format!("libinput dispatch failed: {}", e))?;
                while let Some(event) = input.libinput.next() {
                    if let Event::Touch(ev) = event {
                        if let Some(ev) = convert(&ev, &bounds) {
                            if let Err(e) = man.update(&ev) {
                                error!("{}", e);
                            }
                        }
                    }
                }
            },
            timeout.recv() => {
                if let Err(e) = man.recognizer_mut().advance(monotonic_now()) {
                    error!("{}", e);
                }
            },
            signal.recv() -> _ => {
                break;
            },
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use libswipe::timer::HoldTimer;
    use std::cell::Cell;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn timeout_made_once_per_timer() {
        let made = Cell::new(0);
        let after = |d: Duration| {
            made.set(made.get() + 1);
            Some(d)
        };
        let mut timer = HoldTimer::default();
        let mut hold = HoldTimeout::new(None);

        assert_eq!(hold.update(timer.deadline(), &None, &after), None);
        let first = timer.arm(ms(0), ms(600));
        for _ in 0..5 {
            assert_eq!(hold.update(timer.deadline(), &None, &after), Some(ms(600)));
        }
        assert_eq!(made.get(), 1);

        assert!(timer.fire(first));
        assert_eq!(hold.update(timer.deadline(), &None, &after), None);
        timer.arm(ms(1000), ms(600));
        assert_eq!(hold.update(timer.deadline(), &None, &after), Some(ms(1600)));
        assert_eq!(made.get(), 2);
    }
}
