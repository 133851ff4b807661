// src/core/sanitize.rs

/// Month labels come out of the DOM with stray newlines and padding;
/// collapse them to one compact token ("2026年 8月" → "2026年8月").
pub fn compact_label(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Screenshot file stem from a facility label. Keeps letters and digits
/// (Japanese included), folds whitespace runs to '_', drops the rest.
pub fn sanitize_label(name: &str, fallback_idx: usize) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_us = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() { out.push(ch); last_us = false; }
        else if ch.is_whitespace() { if !last_us { out.push('_'); last_us = true; } }
        else if ch == '-' || ch == '_' { if !(last_us && ch == '_') { out.push(ch); } last_us = ch == '_'; }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() { format!("target_{}", fallback_idx) } else { out }
}
