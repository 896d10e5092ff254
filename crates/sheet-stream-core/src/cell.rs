//! Coercion of rendered cell text into typed field values.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// A cell's text could not be converted into the field's declared type.
///
/// Mapping treats this as recoverable: the field keeps its default value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot read {text:?} as {target}")]
pub struct CoerceError {
    /// The text that failed to convert
    pub text: String,
    /// Name of the target type
    pub target: &'static str,
}

impl CoerceError {
    pub fn new(text: &str, target: &'static str) -> Self {
        Self {
            text: text.to_string(),
            target,
        }
    }
}

/// Types that can be read from a cell's display text.
pub trait FromCell: Sized {
    fn from_cell(text: &str) -> Result<Self, CoerceError>;
}

impl FromCell for String {
    fn from_cell(text: &str) -> Result<Self, CoerceError> {
        Ok(text.to_string())
    }
}

impl FromCell for bool {
    fn from_cell(text: &str) -> Result<Self, CoerceError> {
        let t = text.trim();
        if t == "1" || t.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if t == "0" || t.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(CoerceError::new(text, "bool"))
        }
    }
}

impl FromCell for char {
    fn from_cell(text: &str) -> Result<Self, CoerceError> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(CoerceError::new(text, "char")),
        }
    }
}

/// Strip the grouping separators a number format may have rendered.
fn numeric_text(text: &str) -> String {
    text.trim().chars().filter(|c| *c != ',').collect()
}

macro_rules! impl_from_cell_int {
    ($($t:ty),*) => {
        $(
            impl FromCell for $t {
                fn from_cell(text: &str) -> Result<Self, CoerceError> {
                    let t = numeric_text(text);
                    if let Ok(v) = t.parse::<$t>() {
                        return Ok(v);
                    }
                    // General-formatted numbers may carry a zero fraction ("42.0")
                    match t.parse::<f64>() {
                        Ok(f) if f.fract() == 0.0 && f >= <$t>::MIN as f64 && f <= <$t>::MAX as f64 => {
                            Ok(f as $t)
                        }
                        _ => Err(CoerceError::new(text, stringify!($t))),
                    }
                }
            }
        )*
    };
}

impl_from_cell_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_from_cell_float {
    ($($t:ty),*) => {
        $(
            impl FromCell for $t {
                fn from_cell(text: &str) -> Result<Self, CoerceError> {
                    let t = numeric_text(text);
                    let (digits, scale) = match t.strip_suffix('%') {
                        Some(d) => (d.trim(), 100.0),
                        None => (t.as_str(), 1.0),
                    };
                    digits
                        .parse::<$t>()
                        .map(|v| v / scale)
                        .map_err(|_| CoerceError::new(text, stringify!($t)))
                }
            }
        )*
    };
}

impl_from_cell_float!(f32, f64);

impl<T: FromCell> FromCell for Option<T> {
    fn from_cell(text: &str) -> Result<Self, CoerceError> {
        if text.trim().is_empty() {
            Ok(None)
        } else {
            T::from_cell(text).map(Some)
        }
    }
}

const DATE_PATTERNS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m/%d/%y", "%m-%d-%y", "%m-%d-%Y", "%d-%b-%y",
    "%d-%b-%Y",
];

const DATETIME_PATTERNS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

impl FromCell for NaiveDate {
    fn from_cell(text: &str) -> Result<Self, CoerceError> {
        let t = text.trim();
        DATE_PATTERNS
            .iter()
            .find_map(|p| NaiveDate::parse_from_str(t, p).ok())
            .or_else(|| NaiveDateTime::from_cell(t).ok().map(|dt| dt.date()))
            .ok_or_else(|| CoerceError::new(text, "NaiveDate"))
    }
}

impl FromCell for NaiveDateTime {
    fn from_cell(text: &str) -> Result<Self, CoerceError> {
        let t = text.trim();
        DATETIME_PATTERNS
            .iter()
            .find_map(|p| NaiveDateTime::parse_from_str(t, p).ok())
            .or_else(|| {
                DATE_PATTERNS
                    .iter()
                    .find_map(|p| NaiveDate::parse_from_str(t, p).ok())
                    .map(|d| d.and_time(NaiveTime::MIN))
            })
            .ok_or_else(|| CoerceError::new(text, "NaiveDateTime"))
    }
}
