/// Formats a price with thousands separators and cents, e.g. `$1,234,567.89`.
///
/// The sign goes after the currency symbol (`$-1,234.50`).
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return format!("${}", price);
    }

    let fixed = format!("{:.2}", price.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if price.is_sign_negative() { "-" } else { "" };
    format!("${}{}.{}", sign, grouped, cents)
}

pub fn prediction_display(price: f64) -> String {
    format!("Predicted Price: {}", format_price(price))
}
