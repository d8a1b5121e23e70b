//! Display formatting for prices, volumes and percent changes (USD).

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::PriceLookup;

/// Shown in place of a price when no provider produced one.
pub const UNAVAILABLE: &str = "Data unavailable";

const SCALES: [(i64, &str); 3] = [
    (1_000_000_000, "B"),
    (1_000_000, "M"),
    (1_000, "K"),
];

fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// `1.2B`, `3.4M`, `5.6K`, or `None` below a thousand.
fn abbreviate(value: Decimal) -> Option<String> {
    let magnitude = value.abs();
    SCALES.iter().find_map(|&(scale, suffix)| {
        let scale = Decimal::from(scale);
        (magnitude >= scale).then(|| format!("{:.1}{}", round(magnitude / scale, 1), suffix))
    })
}

/// Inserts `,` every three digits of the integer part.
fn group_thousands(digits: &str) -> String {
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}.{}", grouped, frac),
        None => grouped,
    }
}

fn sign(value: Decimal) -> &'static str {
    if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    }
}

/// Formats a dollar amount.
///
/// ```
/// use rust_decimal::Decimal;
/// use wisefolio_market_data::display::format_currency;
///
/// assert_eq!(format_currency(Decimal::new(18492, 2), false), "$184.92");
/// assert_eq!(format_currency(Decimal::new(1_234_567_890, 0), true), "$1.2B");
/// ```
pub fn format_currency(value: Decimal, abbreviated: bool) -> String {
    if abbreviated {
        if let Some(short) = abbreviate(value) {
            return format!("{}${}", sign(value), short);
        }
    }
    let amount = format!("{:.2}", round(value.abs(), 2));
    format!("{}${}", sign(value), group_thousands(&amount))
}

/// Formats a count such as volume or shares outstanding.
pub fn format_number(value: Decimal) -> String {
    if let Some(short) = abbreviate(value) {
        return format!("{}{}", sign(value), short);
    }
    let plain = round(value.abs(), 3).normalize().to_string();
    format!("{}{}", sign(value), group_thousands(&plain))
}

/// Formats a fraction as a percentage: `0.15` becomes `15.00%`.
pub fn format_percent(fraction: Decimal) -> String {
    let percent = round(fraction * Decimal::ONE_HUNDRED, 2);
    format!("{}{:.2}%", sign(percent), percent.abs())
}

/// Formats a percent change that is already in percent units: `0.69` becomes
/// `+0.69%`.
pub fn format_percent_change(value: Decimal) -> String {
    let rounded = round(value, 2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        "+"
    };
    format!("{}{:.2}%", sign, rounded.abs())
}

/// Price row text: `$184.92 +0.69%`, or [`UNAVAILABLE`].
pub fn render_price(lookup: &PriceLookup) -> String {
    match lookup.snapshot() {
        Some(snapshot) => format!(
            "{} {}",
            format_currency(snapshot.price, false),
            format_percent_change(snapshot.percent_change)
        ),
        None => UNAVAILABLE.to_string(),
    }
}
