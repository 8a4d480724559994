//! Value formatting
//!
//! Mirrors the widget's `percent:<d>` cell format so raw filter values can be
//! compared with rendered cell text: `value * 100`, rounded half away from
//! zero on its shortest decimal form to exactly `d` fraction digits, en-US
//! digit grouping with a space as separator, then `%`.
//! Values that do not parse as a finite number pass through unchanged.

use serde::{Deserialize, Serialize};

/// Fraction digits of the widget's default percentage format
pub const DEFAULT_PERCENT_DECIMALS: usize = 2;

/// Rendering rule of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueFormat {
    /// Fraction rendered as a percentage
    Percent {
        /// Digits after the decimal point
        decimals: usize,
    },
    /// Rendered text equals the raw value
    Raw,
}

impl Default for ValueFormat {
    fn default() -> Self {
        Self::Percent {
            decimals: DEFAULT_PERCENT_DECIMALS,
        }
    }
}

/// Converts raw filter values into the text the widget renders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueFormatter {
    format: ValueFormat,
}

impl ValueFormatter {
    /// Formatter for a column format
    #[must_use]
    pub const fn new(format: ValueFormat) -> Self {
        Self { format }
    }

    /// Percentage formatter with `decimals` fraction digits
    #[must_use]
    pub const fn percent(decimals: usize) -> Self {
        Self::new(ValueFormat::Percent { decimals })
    }

    /// Format a raw value
    #[must_use]
    pub fn format(&self, raw: &str) -> String {
        match self.format {
            ValueFormat::Raw => raw.to_string(),
            ValueFormat::Percent { decimals } => match parse_number(raw) {
                Some(value) => render_percent(value, decimals),
                None => raw.to_string(),
            },
        }
    }

    /// Format every raw value, keeping order
    #[must_use]
    pub fn format_all<S: AsRef<str>>(&self, raws: &[S]) -> Vec<String> {
        raws.iter().map(|r| self.format(r.as_ref())).collect()
    }
}

/// Format with the default `percent:2` rule
#[must_use]
pub fn format_percent(raw: &str) -> String {
    ValueFormatter::default().format(raw)
}

/// Recover the fraction behind rendered percentage text
///
/// Inverse of [`format_percent`] up to rounding: `"1 234.50%"` gives `12.345`.
#[must_use]
pub fn parse_percent(text: &str) -> Option<f64> {
    let digits: String = text
        .trim()
        .strip_suffix('%')?
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    parse_number(&digits).map(|v| v / 100.0)
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn render_percent(value: f64, decimals: usize) -> String {
    // shortest round-trip digits, never exponent notation
    let shortest = (value * 100.0).to_string();
    let (sign, unsigned) = shortest
        .strip_prefix('-')
        .map_or(("", shortest.as_str()), |rest| ("-", rest));
    let (int_part, frac_part) = round_half_away(unsigned, decimals);

    let mut out = String::with_capacity(shortest.len() + int_part.len() / 3 + decimals + 2);
    out.push_str(sign);
    out.push_str(&group_thousands(&int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(&frac_part);
    }
    out.push('%');
    out
}

/// Round unsigned decimal text to `decimals` fraction digits, ties away from zero
fn round_half_away(digits: &str, decimals: usize) -> (String, String) {
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(decimals))
        .collect();

    if frac_part.as_bytes().get(decimals).is_some_and(|&d| d >= b'5') {
        let mut carry = true;
        for d in kept.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, b'1');
        }
    }

    let split = kept.len() - decimals;
    let frac = kept.split_off(split);
    (
        String::from_utf8_lossy(&kept).into_owned(),
        String::from_utf8_lossy(&frac).into_owned(),
    )
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}
