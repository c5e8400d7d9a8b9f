#[cfg(feature = "libinput")]
#[macro_use] extern crate chan;
#[macro_use] extern crate log;
#[macro_use] extern crate serde_derive;

use app_dirs::AppInfo;
use libswipe::geom::Rect;
use libswipe::{GestureKind, Manager, Recognizer, Region, TouchEvent};
use std::env;
use std::fs;
use std::process;
use std::time::Duration;

mod config;
#[cfg(feature = "libinput")]
mod libinput;
mod trace;

const APP_INFO: AppInfo = AppInfo { name: "swiped", author: "libswipe" };

fn manager(config: &config::Config) -> Manager<Rect> {
    let mut rec = Recognizer::new(config.recognizer, config.region);
    for &kind in &GestureKind::ALL {
        rec.register(kind, move |swipe| {
            println!("got gesture {}: {:?}", kind, swipe);
            Ok(())
        });
    }

    for binding in &config.bindings {
        let gesture = binding.gesture.clone();
        let action = binding.action.clone();
        rec.register_named(&binding.gesture, move |swipe| {
            action.run(&gesture, swipe)?;
            Ok(())
        });
    }
    Manager::new(rec)
}

/// Feeds recorded samples to `man`.
///
/// A trace has no clock of its own, so once it runs out we let any pending hold go off.
fn play<R: Region>(man: &mut Manager<R>, events: &[TouchEvent]) {
    for ev in events {
        if let Err(e) = man.update(ev) {
            error!("{}", e);
        }
    }
    if let Err(e) = man.recognizer_mut().advance(Duration::MAX) {
        error!("{}", e);
    }
}

fn replay(man: &mut Manager<Rect>, path: &str) -> Result<(), String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("unable to read trace {:?}: {}", path, e))?;
    play(man, &trace::parse_trace(&contents)?);
    Ok(())
}

#[cfg(feature = "libinput")]
fn live(man: &mut Manager<Rect>, config: &config::Config) -> Result<(), String> {
    libinput::run(man, config.region)
}

#[cfg(not(feature = "libinput"))]
fn live(_: &mut Manager<Rect>, _: &config::Config) -> Result<(), String> {
    Err("no trace file given, and swiped was built without libinput support".to_owned())
}

fn main() {
    env_logger::init();

    let config = match config::open_config() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };
    let mut man = manager(&config);

    let res = match env::args().nth(1) {
        Some(path) => replay(&mut man, &path),
        None => live(&mut man, &config),
    };
    if let Err(e) = res {
        error!("{}", e);
        process::exit(1);
    }
}
