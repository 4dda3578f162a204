//! 情報ウィンドウのHTML

use crate::types::LocationEntry;

/// HTMLエスケープ
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn capitalize(day: &str) -> String {
    let mut chars = day.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// 団体名・住所・営業時間・説明を並べたHTML
pub fn info_window_html(entry: &LocationEntry) -> String {
    let rule = r#"<hr style="border: 0; border-top: 2px solid #000000;">"#;

    let hours = entry
        .hours
        .by_day()
        .iter()
        .map(|(day, value)| {
            let value = if value.is_empty() { "-" } else { *value };
            format!("{}: {}", capitalize(day), escape_html(value))
        })
        .collect::<Vec<_>>()
        .join("<br>");

    let mut html = String::new();
    html.push_str(r#"<div style="font-family: Arial, sans-serif; max-width: 250px;">"#);
    html.push_str(&format!(r#"<h3 style="margin: 0 0 10px;">{}</h3>"#, escape_html(&entry.name)));
    html.push_str(rule);
    html.push_str(r#"<h6 style="margin: 0 0 10px;">Address:</h6>"#);
    html.push_str(&format!(r#"<p style="margin: 5px 0;">{}</p>"#, escape_html(&entry.address)));
    html.push_str(rule);
    html.push_str(r#"<h6 style="margin: 0 0 10px;">Hours:</h6>"#);
    html.push_str(&format!(r#"<p style="margin: 5px 0;">{}</p>"#, hours));
    if !entry.description.trim().is_empty() {
        html.push_str(rule);
        html.push_str(r#"<h6 style="margin: 0 0 10px;">Description:</h6>"#);
        html.push_str(&format!(r#"<p style="margin: 5px 0;">{}</p>"#, escape_html(&entry.description)));
    }
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Hours;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<b>"A&B"</b>"#), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
        assert_eq!(escape_html("it's"), "it&#39;s");
    }

    #[test]
    fn test_info_window_escapes_backend_text() {
        let entry = LocationEntry {
            name: "<script>alert(1)</script>".to_string(),
            address: "1 Main St".to_string(),
            hours: Hours { monday: "0900-1700".to_string(), ..Default::default() },
            ..Default::default()
        };
        let html = info_window_html(&entry);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Monday: 0900-1700"));
        assert!(html.contains("Sunday: -"));
        assert!(!html.contains("Description:"));
    }
}
