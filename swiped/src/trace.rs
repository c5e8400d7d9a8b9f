use libswipe::geom::{point2, Point};
use libswipe::TouchEvent;
use std::str::FromStr;
use std::time::Duration;

fn parse_num<T: FromStr>(s: Option<&str>, what: &str) -> Result<T, String> {
    let s = s.ok_or_else(|| format!("missing {}", what))?;
    s.parse().map_err(|_| format!("invalid {} {:?}", what, s))
}

fn parse_pos<'a, I: Iterator<Item = &'a str>>(parts: &mut I) -> Result<Point, String> {
    let x = parse_num(parts.next(), "x coordinate")?;
    let y = parse_num(parts.next(), "y coordinate")?;
    Ok(point2(x, y))
}

/// Parses a single line of a trace, ignoring blanks and comments.
fn parse_event(line: &str) -> Result<Option<TouchEvent>, String> {
    let line = line.split('#').next().unwrap_or("");
    let mut parts = line.split_whitespace();
    let kind = match parts.next() {
        Some(k) => k,
        None => return Ok(None),
    };

    let time = Duration::from_millis(parse_num(parts.next(), "timestamp")?);
    let ev = match kind {
        "down" => TouchEvent::Down {
            slot: parse_num(parts.next(), "slot")?,
            pos: Some(parse_pos(&mut parts)?),
            time,
        },
        "motion" => TouchEvent::Motion {
            slot: parse_num(parts.next(), "slot")?,
            pos: Some(parse_pos(&mut parts)?),
            time,
        },
        "up" => TouchEvent::Up {
            slot: parse_num(parts.next(), "slot")?,
            time,
        },
        "cancel" => TouchEvent::Cancel { time },
        _ => return Err(format!("unknown event {:?}", kind)),
    };

    if let Some(extra) = parts.next() {
        return Err(format!("unexpected {:?} after {} event", extra, kind));
    }
    Ok(Some(ev))
}

/// Parses a recorded touch trace.
///
/// There is one sample per line, in one of these forms (times are in milliseconds):
///
/// ```text
/// down <time> <slot> <x> <y>
/// motion <time> <slot> <x> <y>
/// up <time> <slot>
/// cancel <time>
/// ```
pub fn parse_trace(contents: &str) -> Result<Vec<TouchEvent>, String> {
    let mut ret = vec![];
    for (i, line) in contents.lines().enumerate() {
        match parse_event(line) {
            Ok(Some(ev)) => ret.push(ev),
            Ok(None) => {}
            Err(e) => return Err(format!("line {}: {}", i + 1, e)),
        }
    }
    Ok(ret)
}
