//! Numeric format codes (`0.00`, `#,##0`, `0%`, `0.00E+00`, ...).

/// Excel rounds half away from zero.
fn round_half_away(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// The General format: integers without a fraction, otherwise up to 15
/// significant digits.
pub(super) fn general(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let abs = value.abs();
    if abs >= 1e15 || abs < 1e-9 {
        let s = format!("{:.10E}", value);
        let (mantissa, exp) = s.split_once('E').unwrap_or((s.as_str(), "0"));
        let exp: i32 = exp.parse().unwrap_or(0);
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{}E{}{:02}", trim_fraction(mantissa), sign, exp.abs());
    }
    if value.fract() == 0.0 {
        return format!("{:.0}", value);
    }
    let magnitude = abs.log10().floor() as i32;
    let decimals = (14 - magnitude).clamp(0, 24) as usize;
    trim_fraction(&format!("{:.*}", decimals, value)).to_string()
}

/// A parsed numeric format section.
#[derive(Debug, Default, PartialEq)]
struct Pattern {
    prefix: String,
    suffix: String,
    int_zeros: usize,
    decimals: usize,
    grouping: bool,
    percent: u32,
    exponent_digits: Option<usize>,
    has_digits: bool,
}

impl Pattern {
    fn parse(section: &str) -> Self {
        let chars: Vec<char> = section.chars().collect();
        let mut p = Pattern::default();
        let mut in_fraction = false;
        let mut i = 0;

        let push = |p: &mut Pattern, s: &str| {
            if p.has_digits {
                p.suffix.push_str(s);
            } else {
                p.prefix.push_str(s);
            }
        };

        while i < chars.len() {
            let c = chars[i];
            match c {
                '"' => {
                    let end = chars[i + 1..]
                        .iter()
                        .position(|&ch| ch == '"')
                        .map_or(chars.len(), |pos| i + 1 + pos);
                    let lit: String = chars[i + 1..end].iter().collect();
                    push(&mut p, &lit);
                    i = end + 1;
                    continue;
                }
                '[' => {
                    i = chars[i + 1..]
                        .iter()
                        .position(|&ch| ch == ']')
                        .map_or(chars.len(), |pos| i + 2 + pos);
                    continue;
                }
                '\\' => {
                    if let Some(next) = chars.get(i + 1) {
                        push(&mut p, &next.to_string());
                    }
                    i += 2;
                    continue;
                }
                '_' => {
                    push(&mut p, " ");
                    i += 2;
                    continue;
                }
                '*' => {
                    i += 2;
                    continue;
                }
                '0' | '#' | '?' => {
                    match p.exponent_digits.as_mut() {
                        Some(n) => *n += 1,
                        None if in_fraction => p.decimals += 1,
                        None if c == '0' => p.int_zeros += 1,
                        None => {}
                    }
                    p.has_digits = true;
                }
                '.' if p.exponent_digits.is_none() => {
                    in_fraction = true;
                    p.has_digits = true;
                }
                ',' if p.has_digits && !in_fraction => p.grouping = true,
                'E' | 'e' if matches!(chars.get(i + 1), Some('+') | Some('-')) => {
                    p.exponent_digits = Some(0);
                    i += 2;
                    continue;
                }
                '%' => {
                    p.percent += 1;
                    push(&mut p, "%");
                }
                _ => push(&mut p, &c.to_string()),
            }
            i += 1;
        }
        p
    }

    fn format(&self, value: f64) -> String {
        if !self.has_digits {
            return format!("{}{}", self.prefix, self.suffix);
        }
        let scaled = value * 100f64.powi(self.percent as i32);
        let body = match self.exponent_digits {
            Some(width) => self.scientific(scaled.abs(), width),
            None => self.fixed(scaled.abs()),
        };
        let negative = scaled < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0');
        format!(
            "{}{}{}{}",
            if negative { "-" } else { "" },
            self.prefix,
            body,
            self.suffix
        )
    }

    fn fixed(&self, abs: f64) -> String {
        let rounded = round_half_away(abs, self.decimals);
        let text = format!("{:.*}", self.decimals, rounded);
        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i.to_string(), Some(f.to_string())),
            None => (text.clone(), None),
        };

        let mut int_part = if int_part == "0" && self.int_zeros == 0 {
            String::new()
        } else {
            int_part
        };
        while int_part.len() < self.int_zeros {
            int_part.insert(0, '0');
        }
        if self.grouping {
            int_part = group_thousands(&int_part);
        }

        match frac_part {
            Some(f) => format!("{}.{}", int_part, f),
            None => int_part,
        }
    }

    fn scientific(&self, abs: f64, width: usize) -> String {
        let (mut mantissa, mut exp) = if abs == 0.0 {
            (0.0, 0)
        } else {
            let exp = abs.log10().floor() as i32;
            (abs / 10f64.powi(exp), exp)
        };
        mantissa = round_half_away(mantissa, self.decimals);
        if mantissa >= 10.0 {
            mantissa /= 10.0;
            exp += 1;
        }
        let sign = if exp < 0 { '-' } else { '+' };
        format!(
            "{:.*}E{}{:0width$}",
            self.decimals,
            mantissa,
            sign,
            exp.abs(),
            width = width.max(1)
        )
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Render a value with a (possibly multi-section) numeric format code.
pub(super) fn render(value: f64, sections: &[&str]) -> String {
    let (section, value) = match sections {
        [_, negative, ..] if value < 0.0 => (*negative, value.abs()),
        [_, _, zero, ..] if value == 0.0 => (*zero, value),
        [first, ..] => (*first, value),
        [] => return general(value),
    };
    if section.eq_ignore_ascii_case("general") {
        return general(value);
    }
    if section.contains('/') && !section.contains('"') {
        // Fractions are not rendered
        return general(value);
    }
    Pattern::parse(section).format(value)
}
