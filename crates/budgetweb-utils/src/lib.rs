//! Utility functions and helpers

use rust_decimal::{Decimal, RoundingStrategy};

/// Format a number with thousands separators
pub fn format_number<T: ToString>(n: T) -> String {
    let s = n.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut result = String::new();
    let mut count = 0;
    for c in int_part.chars().rev() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    let mut grouped: String = result.chars().rev().collect();
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    format!("{}{}", sign, grouped)
}

/// Format a monetary amount: fixed decimal places, grouped digits,
/// currency symbol in front
pub fn format_money(amount: Decimal, symbol: &str, decimal_places: u32) -> String {
    let rounded = amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    format!("{}{}", symbol, format_number(format!("{:.*}", decimal_places as usize, rounded)))
}

/// Sanitize HTML content for HTMX responses
pub fn sanitize_html(content: &str) -> String {
    content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
