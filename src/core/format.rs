//! Display formatting for Korean currency amounts.
//!
//! Three distinct unit-scaling rules exist on purpose: the lump-sum slider
//! operates in 만원 (ten-thousand won) steps while every other amount is in
//! plain won, and the two must not be conflated.

/// Rounds to the nearest whole amount and groups digits by three.
pub fn format_number(n: f64) -> String {
    let rounded = n.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        grouped.push('-');
    }
    let lead = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && i % 3 == lead {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Scales a won amount to 억원 (one decimal, trailing `.0` stripped), 만원, or
/// plain 원, whichever fits.
pub fn format_to_eok(n: f64) -> String {
    let eok = n / 100_000_000.0;
    if eok >= 1.0 {
        // Ties round up, like toFixed; `{:.1}` would round them to even and
        // turn 1.25억 into "1.2억원".
        let tenths = (eok * 10.0).round() as i64;
        let quotient = if tenths % 10 == 0 {
            (tenths / 10).to_string()
        } else {
            format!("{}.{}", tenths / 10, tenths % 10)
        };
        return format!("{quotient}억원");
    }

    let man = n / 10_000.0;
    if man >= 1.0 {
        return format!("{}만원", format_number(man.round()));
    }

    format!("{}원", format_number(n))
}

/// Formats the lump-sum slider value, which is already in 만원 units. Unlike
/// [`format_to_eok`] the 억원 quotient keeps its natural decimal expansion.
pub fn format_initial_display(value_in_man: u64) -> String {
    if value_in_man == 0 {
        return "0원".to_string();
    }
    if value_in_man >= 10_000 {
        return format!("{}억원", value_in_man as f64 / 10_000.0);
    }
    format!("{}만원", format_number(value_in_man as f64))
}
