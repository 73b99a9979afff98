// furrow_market/src/format.rs

//! Display helpers for prices and inventory values.

/// Renders `value` with comma thousands separators and at most two fraction
/// digits, trailing zeros trimmed: `5000000.0` -> `"5,000,000"`,
/// `1234.5` -> `"1,234.5"`, `-1234.567` -> `"-1,234.57"`.
pub fn format_number(value: f64) -> String {
  if !value.is_finite() {
    return value.to_string();
  }

  let fixed = format!("{:.2}", value.abs());
  let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
  let frac_part = frac_part.trim_end_matches('0');

  let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
  for (idx, digit) in int_part.chars().enumerate() {
    if idx > 0 && (int_part.len() - idx) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(digit);
  }

  let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
  let sign = if value.is_sign_negative() && !is_zero { "-" } else { "" };

  if frac_part.is_empty() {
    format!("{}{}", sign, grouped)
  } else {
    format!("{}{}.{}", sign, grouped, frac_part)
  }
}

pub fn total_value(quantity: f64, price_per_unit: f64) -> f64 {
  quantity * price_per_unit
}
