const CRORE: f64 = 10_000_000.0;
const LAKH: f64 = 100_000.0;

/// Rupee amount the way budgets are shown: crores and lakhs with two
/// decimals, smaller amounts with Indian digit grouping.
pub fn format_indian_currency(amount: Option<f64>) -> String {
    let value = match amount {
        Some(v) if v.is_finite() => v,
        _ => return "₹0".to_string(),
    };

    if value >= CRORE {
        return format!("₹{:.2} Cr", value / CRORE);
    }
    if value >= LAKH {
        return format!("₹{:.2} L", value / LAKH);
    }

    format!("₹{}", group_indian(value))
}

/// 1234567 -> "12,34,567": last three digits, then pairs
fn group_indian(value: f64) -> String {
    let negative = value < 0.0;
    let rounded = (value.abs() * 100.0).round() / 100.0;
    let whole = rounded.trunc() as u64;
    let fraction = ((rounded - rounded.trunc()) * 100.0).round() as u64;

    let digits = whole.to_string();
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (h, t) = rest.split_at(rest.len() - 2);
            groups.push(t);
            rest = h;
        }
        groups.push(rest);
        groups.reverse();
        format!("{},{}", groups.join(","), tail)
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if fraction > 0 {
        let fraction = format!("{:02}", fraction);
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out
}
