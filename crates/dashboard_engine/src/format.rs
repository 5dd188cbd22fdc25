//! Display conventions: Indian-rupee amounts with en-IN digit grouping
//! (`1,50,000`), and markup escaping for user or service supplied text.

pub const CURRENCY_SYMBOL: &str = "₹";

/// `15000.0` -> `"₹15,000"`, `1234.5` -> `"₹1,234.5"`, `-250.0` -> `"-₹250"`.
pub fn format_currency(value: f64) -> String {
    let amount = format_amount(value);
    match amount.strip_prefix('-') {
        Some(magnitude) => format!("-{CURRENCY_SYMBOL}{magnitude}"),
        None => format!("{CURRENCY_SYMBOL}{amount}"),
    }
}

/// Grouped amount with at most two decimals; trailing zero decimals are dropped.
pub fn format_amount(value: f64) -> String {
    let (negative, whole, cents) = split_cents(value);
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_en_in(whole));
    if cents != 0 {
        if cents % 10 == 0 {
            out.push_str(&format!(".{}", cents / 10));
        } else {
            out.push_str(&format!(".{cents:02}"));
        }
    }
    out
}

/// Grouped amount with exactly two decimals.
pub fn format_fixed2(value: f64) -> String {
    let (negative, whole, cents) = split_cents(value);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{}.{cents:02}", group_en_in(whole))
}

fn split_cents(value: f64) -> (bool, u64, u64) {
    let total_cents = (value.abs() * 100.0).round() as u64;
    let negative = value < 0.0 && total_cents != 0;
    (negative, total_cents / 100, total_cents % 100)
}

/// Last three digits form one group, everything before it is grouped in pairs.
fn group_en_in(whole: u64) -> String {
    let digits = whole.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Escapes markup-significant characters before text reaches a rendering layer.
pub fn escape_markup(s: &str) -> String {
    html_escape::encode_quoted_attribute(s).into_owned()
}
