use crate::config::LabelRules;

/// Derives the short, upper-cased display label for a product name.
///
/// Leading filler phrases (e.g. "Curso de ") are removed case-insensitively,
/// repeatedly, so "Taller de Curso de X" becomes "X". The result is cut to
/// `max_len` characters with the ellipsis appended when anything was cut.
pub fn display_label(full_name: &str, rules: &LabelRules) -> String {
    let mut rest = full_name.trim_start();

    'strip: loop {
        for prefix in &rules.filler_prefixes {
            if prefix.trim().is_empty() {
                continue;
            }
            if let Some(stripped) = strip_prefix_ignore_case(rest, prefix) {
                rest = stripped.trim_start();
                continue 'strip;
            }
        }
        break;
    }

    let upper = rest.trim_end().to_uppercase();
    if upper.is_empty() {
        return rules.empty_label.clone();
    }

    if upper.chars().count() > rules.max_len {
        let mut label: String = upper.chars().take(rules.max_len).collect();
        let kept = label.trim_end().len();
        label.truncate(kept);
        label.push_str(&rules.ellipsis);
        label
    } else {
        upper
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut prefix_chars = prefix.chars();
    let mut consumed = 0;

    for (idx, ch) in text.char_indices() {
        match prefix_chars.next() {
            Some(p) if ch.to_lowercase().eq(p.to_lowercase()) => consumed = idx + ch.len_utf8(),
            Some(_) => return None,
            None => return Some(&text[idx..]),
        }
    }

    if prefix_chars.next().is_none() {
        Some(&text[consumed..])
    } else {
        None
    }
}
