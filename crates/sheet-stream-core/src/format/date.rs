//! Date/time format codes applied to serial day numbers.

use chrono::{Datelike, Days, NaiveDate};

/// Serial of 9999-12-31 in the 1900 system, the last renderable day.
const MAX_SERIAL: i64 = 2_958_465;

/// Which epoch serial day numbers count from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DateSystem {
    /// Serial 1 is 1900-01-01, and the fictional 1900-02-29 is serial 60.
    #[default]
    Excel1900,
    /// Serial 0 is 1904-01-01.
    Excel1904,
}

impl DateSystem {
    /// Pick the system from a `date1904` flag.
    pub fn from_1904_flag(date_1904: bool) -> Self {
        if date_1904 {
            DateSystem::Excel1904
        } else {
            DateSystem::Excel1900
        }
    }

    /// Calendar date of a whole serial day, as `(year, month, day)`.
    fn ymd(self, serial: i64) -> Option<(i32, u32, u32)> {
        let serial_1900 = match self {
            DateSystem::Excel1900 => serial,
            DateSystem::Excel1904 => serial.checked_add(1462)?,
        };
        if !(0..=MAX_SERIAL).contains(&serial_1900) {
            return None;
        }
        match self {
            DateSystem::Excel1900 => {
                if serial == 0 {
                    return Some((1900, 1, 0));
                }
                if serial == 60 {
                    return Some((1900, 2, 29));
                }
                let base = NaiveDate::from_ymd_opt(1899, 12, 31)?;
                let adjusted = if serial > 60 { serial - 1 } else { serial };
                let date = base.checked_add_days(Days::new(u64::try_from(adjusted).ok()?))?;
                Some((date.year(), date.month(), date.day()))
            }
            DateSystem::Excel1904 => {
                let base = NaiveDate::from_ymd_opt(1904, 1, 1)?;
                let date = base.checked_add_days(Days::new(u64::try_from(serial).ok()?))?;
                Some((date.year(), date.month(), date.day()))
            }
        }
    }

    /// Day of week with 0 = Sunday.
    fn weekday(self, serial: i64) -> usize {
        let serial_1900 = match self {
            DateSystem::Excel1900 => serial,
            DateSystem::Excel1904 => serial + 1462,
        };
        (serial_1900 + 6).rem_euclid(7) as usize
    }
}

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Year(usize),
    Month(usize),
    Minute(usize),
    Day(usize),
    Hour(usize),
    Second(usize),
    SubSecond(usize),
    AmPm { short: bool },
    Literal(String),
}

fn push_literal(tokens: &mut Vec<Token>, s: &str) {
    if let Some(Token::Literal(prev)) = tokens.last_mut() {
        prev.push_str(s);
    } else {
        tokens.push(Token::Literal(s.to_string()));
    }
}

fn tokenize(code: &str) -> Vec<Token> {
    let chars: Vec<char> = code.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' => {
                let end = chars[i + 1..]
                    .iter()
                    .position(|&ch| ch == '"')
                    .map_or(chars.len(), |p| i + 1 + p);
                let lit: String = chars[i + 1..end].iter().collect();
                push_literal(&mut tokens, &lit);
                i = end + 1;
            }
            '[' => {
                let end = chars[i + 1..]
                    .iter()
                    .position(|&ch| ch == ']')
                    .map_or(chars.len(), |p| i + 1 + p);
                let inner: String = chars[i + 1..end].iter().collect();
                // Elapsed-time brackets fall back to clock values
                let lower = inner.to_ascii_lowercase();
                let elapsed = lower
                    .chars()
                    .next()
                    .filter(|first| lower.chars().all(|ch| ch == *first));
                match elapsed {
                    Some('h') => tokens.push(Token::Hour(lower.len())),
                    Some('m') => tokens.push(Token::Minute(lower.len())),
                    Some('s') => tokens.push(Token::Second(lower.len())),
                    _ => {}
                }
                i = end + 1;
            }
            '\\' => {
                if let Some(&next) = chars.get(i + 1) {
                    push_literal(&mut tokens, &next.to_string());
                }
                i += 2;
            }
            '_' => {
                push_literal(&mut tokens, " ");
                i += 2;
            }
            '*' => i += 2,
            '.' if matches!(chars.get(i + 1), Some('0')) => {
                let n = chars[i + 1..].iter().take_while(|&&ch| ch == '0').count();
                tokens.push(Token::SubSecond(n));
                i += 1 + n;
            }
            _ => {
                let lower = c.to_ascii_lowercase();
                let rest: String = chars[i..].iter().collect::<String>().to_ascii_lowercase();
                if rest.starts_with("am/pm") {
                    tokens.push(Token::AmPm { short: false });
                    i += 5;
                } else if rest.starts_with("a/p") {
                    tokens.push(Token::AmPm { short: true });
                    i += 3;
                } else if matches!(lower, 'y' | 'm' | 'd' | 'h' | 's') {
                    let n = chars[i..]
                        .iter()
                        .take_while(|ch| ch.to_ascii_lowercase() == lower)
                        .count();
                    tokens.push(match lower {
                        'y' => Token::Year(n),
                        'm' => Token::Month(n),
                        'd' => Token::Day(n),
                        'h' => Token::Hour(n),
                        _ => Token::Second(n),
                    });
                    i += n;
                } else {
                    push_literal(&mut tokens, &c.to_string());
                    i += 1;
                }
            }
        }
    }

    resolve_minutes(&mut tokens);
    tokens
}

/// An `m` run means minutes when it follows an hour or precedes a second.
fn resolve_minutes(tokens: &mut [Token]) {
    let is_field = |t: &Token| !matches!(t, Token::Literal(_) | Token::AmPm { .. });
    for i in 0..tokens.len() {
        let Token::Month(n) = tokens[i] else {
            continue;
        };
        if n > 2 {
            continue;
        }
        let prev = tokens[..i].iter().rev().find(|t| is_field(t));
        let next = tokens[i + 1..].iter().find(|t| is_field(t));
        if matches!(prev, Some(Token::Hour(_))) || matches!(next, Some(Token::Second(_))) {
            tokens[i] = Token::Minute(n);
        }
    }
}

/// Whether a format section contains date or time fields.
pub(super) fn has_date_tokens(code: &str) -> bool {
    tokenize(code)
        .iter()
        .any(|t| !matches!(t, Token::Literal(_) | Token::SubSecond(_)))
}

fn pad(value: u32, width: usize) -> String {
    if width >= 2 {
        format!("{:02}", value)
    } else {
        value.to_string()
    }
}

/// Render a serial value with a date/time format section.
///
/// Returns `None` for serials outside the representable calendar.
pub(super) fn render(value: f64, code: &str, dates: DateSystem) -> Option<String> {
    if !value.is_finite() || value < 0.0 || value >= (MAX_SERIAL + 1) as f64 {
        return None;
    }
    let tokens = tokenize(code);
    let sub_digits = tokens
        .iter()
        .find_map(|t| match t {
            Token::SubSecond(n) => Some(*n),
            _ => None,
        })
        .unwrap_or(0)
        .min(3);

    let mut serial = value.floor() as i64;
    let unit = 10u64.pow(sub_digits as u32);
    let mut ticks = ((value - value.floor()) * 86_400.0 * unit as f64).round() as u64;
    if ticks >= 86_400 * unit {
        serial += 1;
        ticks -= 86_400 * unit;
    }
    let fraction = ticks % unit;
    let secs = ticks / unit;
    let (hour, minute, second) = (secs / 3600, (secs % 3600) / 60, secs % 60);

    let (year, month, day) = dates.ymd(serial)?;
    let twelve_hour = tokens.iter().any(|t| matches!(t, Token::AmPm { .. }));
    let is_pm = hour >= 12;

    let mut out = String::new();
    for token in &tokens {
        match token {
            Token::Year(n) if *n <= 2 => out.push_str(&format!("{:02}", year.rem_euclid(100))),
            Token::Year(_) => out.push_str(&format!("{:04}", year)),
            Token::Month(n) => match n {
                1 | 2 => out.push_str(&pad(month, *n)),
                3 => out.push_str(&MONTHS[month as usize - 1][..3]),
                4 => out.push_str(MONTHS[month as usize - 1]),
                _ => out.push_str(&MONTHS[month as usize - 1][..1]),
            },
            Token::Day(n) => match n {
                1 | 2 => out.push_str(&pad(day, *n)),
                3 => out.push_str(&WEEKDAYS[dates.weekday(serial)][..3]),
                _ => out.push_str(WEEKDAYS[dates.weekday(serial)]),
            },
            Token::Hour(n) => {
                let h = if twelve_hour {
                    match hour % 12 {
                        0 => 12,
                        h => h,
                    }
                } else {
                    hour
                };
                out.push_str(&pad(h as u32, *n));
            }
            Token::Minute(n) => out.push_str(&pad(minute as u32, *n)),
            Token::Second(n) => out.push_str(&pad(second as u32, *n)),
            Token::SubSecond(n) => {
                let digits = format!("{:0width$}", fraction, width = sub_digits);
                out.push('.');
                out.push_str(&digits[..(*n).min(digits.len())]);
            }
            Token::AmPm { short } => out.push_str(match (is_pm, short) {
                (false, false) => "AM",
                (true, false) => "PM",
                (false, true) => "A",
                (true, true) => "P",
            }),
            Token::Literal(s) => out.push_str(s),
        }
    }
    Some(out)
}
