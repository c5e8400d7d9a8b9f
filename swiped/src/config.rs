use app_dirs::{app_root, AppDataType};
use libswipe::geom::{point2, Rect};
use libswipe::{Config as RecognizerConfig, Swipe};
use std::fs;
use std::io;
use std::process;
use std::time::Duration;

use crate::APP_INFO;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
struct ConfigParsed {
    threshold: i32,
    hold_time_ms: u64,
    region: RegionParsed,
    bindings: Vec<BindingParsed>,
}

impl Default for ConfigParsed {
    fn default() -> ConfigParsed {
        let defaults = RecognizerConfig::default();
        ConfigParsed {
            threshold: defaults.threshold,
            hold_time_ms: defaults.hold_delay.as_millis() as u64,
            region: RegionParsed::default(),
            bindings: vec![],
        }
    }
}

impl ConfigParsed {
    fn to_config(self) -> Result<Config, String> {
        if self.threshold < 0 {
            return Err(format!("threshold must not be negative, got {}", self.threshold));
        }

        Ok(Config {
            recognizer: RecognizerConfig {
                threshold: self.threshold,
                hold_delay: Duration::from_millis(self.hold_time_ms),
            },
            region: self.region.to_rect()?,
            bindings: self.bindings.into_iter().map(BindingParsed::to_binding).collect(),
        })
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
struct RegionParsed {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl Default for RegionParsed {
    fn default() -> RegionParsed {
        RegionParsed {
            left: 0,
            top: 0,
            right: 1920,
            bottom: 1080,
        }
    }
}

impl RegionParsed {
    fn to_rect(self) -> Result<Rect, String> {
        let rect = Rect::new(point2(self.left, self.top), point2(self.right, self.bottom));
        if rect.is_empty() {
            Err(format!("region {:?} is empty", self))
        } else {
            Ok(rect)
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct BindingParsed {
    gesture: String,
    command: String,
    #[serde(default)]
    args: Vec<String>,
}

impl BindingParsed {
    fn to_binding(self) -> Binding {
        Binding {
            gesture: self.gesture,
            action: Action::Command {
                command: self.command,
                args: self.args,
            },
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub recognizer: RecognizerConfig,
    pub region: Rect,
    pub bindings: Vec<Binding>,
}

/// Something to do whenever a gesture happens.
///
/// The gesture is kept as a name, and only checked when the binding is registered.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Binding {
    pub gesture: String,
    pub action: Action,
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Action {
    Command {
        command: String,
        args: Vec<String>,
    }
}

impl Action {
    /// Starts the command, telling it about the gesture through its environment.
    pub fn run(&self, gesture: &str, swipe: &Swipe) -> io::Result<()> {
        match self {
            &Action::Command { ref command, ref args } => {
                let mut cmd = process::Command::new(command);
                cmd.args(args)
                    .env("SWIPE_GESTURE", gesture)
                    .env("SWIPE_EDGE", swipe.edge.name());
                if let Some(direction) = swipe.direction {
                    cmd.env("SWIPE_DIRECTION", direction.name());
                }
                if let Some(distance) = swipe.distance {
                    cmd.env("SWIPE_DISTANCE", distance.to_string());
                }

                debug!("running {:?} for {}", command, gesture);
                cmd.spawn().map(|_| ())
            }
        }
    }
}

pub fn parse_config(contents: &str) -> Result<Config, String> {
    let c: ConfigParsed =
        toml::from_str(contents).map_err(|e| format!("unable to parse config file: {}", e))?;
    c.to_config()
}

/// Reads `config.toml` from the user's config directory.
///
/// If there is no such file, we just use the defaults.
pub fn open_config() -> Result<Config, String> {
    let mut file_name = app_root(AppDataType::UserConfig, &APP_INFO)
        .map_err(|e| format!("couldn't open config directory: {}", e))?;
    file_name.push("config.toml");

    match fs::read_to_string(&file_name) {
        Ok(contents) => parse_config(&contents),
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => {
            info!("no config file at {:?}, using the defaults", file_name);
            ConfigParsed::default().to_config()
        }
        Err(e) => Err(format!("unable to read config file {:?}: {}", file_name, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let c = parse_config("").unwrap();
        assert_eq!(c.recognizer, RecognizerConfig::default());
        assert_eq!(c.region, Rect::new(point2(0, 0), point2(1920, 1080)));
        assert!(c.bindings.is_empty());
    }

    #[test]
    fn full_config() {
        let c = parse_config(
            r#"
            threshold = 12
            hold_time_ms = 450

            [region]
            left = 10
            top = 20
            right = 810
            bottom = 620

            [[bindings]]
            gesture = "left"
            command = "xdotool"
            args = ["key", "ctrl+Page_Up"]

            [[bindings]]
            gesture = "tap"
            command = "true"
            "#,
        )
        .unwrap();

        assert_eq!(c.recognizer.threshold, 12);
        assert_eq!(c.recognizer.hold_delay, Duration::from_millis(450));
        assert_eq!(c.region, Rect::new(point2(10, 20), point2(810, 620)));
        assert_eq!(
            c.bindings,
            vec![
                Binding {
                    gesture: "left".to_owned(),
                    action: Action::Command {
                        command: "xdotool".to_owned(),
                        args: vec!["key".to_owned(), "ctrl+Page_Up".to_owned()],
                    },
                },
                Binding {
                    gesture: "tap".to_owned(),
                    action: Action::Command {
                        command: "true".to_owned(),
                        args: vec![],
                    },
                },
            ]
        );
    }

    #[test]
    fn bad_configs() {
        assert!(parse_config("threshold = -1").is_err());
        assert!(parse_config("threshold = \"five\"").is_err());
        assert!(parse_config("[region]\nleft = 100\ntop = 0\nright = 50\nbottom = 100").is_err());
        assert!(parse_config("[[bindings]]\ngesture = \"tap\"").is_err());
    }
}
