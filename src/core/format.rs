/// Whole-dollar US currency, e.g. `$1,234,567` or `-$500`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}")
}

/// Rate as a percentage with one decimal, e.g. `0.238` -> `23.8%`.
pub fn format_percentage(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}
