/// Formats a number with at most 4 decimals, trimming trailing zeros.
pub fn format_number(v: f64) -> String {
    if !v.is_finite() {
        return "—".to_owned();
    }
    let s = format!("{v:.4}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_owned() } else { s.to_owned() }
}

/// Cuts a string to at most `cap` characters. No ellipsis is added.
pub fn truncate_chars(s: &str, cap: usize) -> String {
    s.chars().take(cap).collect()
}
