//! ターミナル表示

use give_and_get_common::types::Verification;
use give_and_get_common::validation::humanize;
use give_and_get_common::{AboutContent, LocationEntry, LocationSet, SubmitReceipt};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::fmt::Write;
use std::time::Duration;

/// 詳細に表示する必要物資の件数
pub const TOP_NEEDS: usize = 3;

/// 通信中のスピナー
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn location_line(entry: &LocationEntry) -> String {
    let mut line = format!("[{}] {} ({})", entry.id, entry.name, entry.type_label());
    if !entry.address.is_empty() {
        let _ = write!(line, " - {}", entry.address);
    }
    if entry.score > 0.0 {
        let _ = write!(line, "  score {:.0}", entry.score);
    }
    line
}

pub fn location_list(results: &LocationSet) -> String {
    if results.is_empty() {
        return "No matching organizations found.".to_string();
    }
    results
        .iter()
        .map(location_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// 詳細表示（営業時間・連絡先・上位の必要物資）
pub fn location_detail(entry: &LocationEntry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", entry.name, entry.type_label());
    if !entry.address.is_empty() {
        let _ = writeln!(out, "📍 {}", entry.address);
    }
    if !entry.description.is_empty() {
        let _ = writeln!(out, "{}", entry.description);
    }

    let _ = writeln!(out, "\nHours:");
    for (day, hours) in entry.hours.by_day() {
        let hours = if hours.is_empty() { "-" } else { hours };
        let _ = writeln!(out, "  {:<10} {}", humanize(day), hours);
    }

    if let Some(contact) = &entry.contact {
        let lines: Vec<(&str, &str)> = [("Phone", &contact.phone), ("Email", &contact.email), ("Website", &contact.website)]
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(label, value)| (label, value.as_str()))
            .collect();
        if !lines.is_empty() {
            let _ = writeln!(out, "\nContact:");
            for (label, value) in lines {
                let _ = writeln!(out, "  {:<10} {}", label, value);
            }
        }
    }

    let _ = writeln!(out, "\nTop needs:");
    let needs = entry.top_needs(TOP_NEEDS);
    if needs.is_empty() {
        let _ = writeln!(out, "  (none listed)");
    }
    for need in needs {
        let category = if need.category.is_empty() { "general" } else { need.category.as_str() };
        let _ = writeln!(
            out,
            "  - {} ({}): {} still needed [{}]",
            need.item,
            category,
            need.remaining(),
            need.urgency.as_str()
        );
    }
    out
}

pub fn about(content: &AboutContent) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}\n{}", content.mission.title, content.mission.description);
    if !content.mission.vision.is_empty() {
        let _ = writeln!(out, "{}", content.mission.vision);
    }
    if let Some(story) = &content.story {
        let _ = writeln!(out, "\n{}\n{}", story.title, story.content);
    }

    let _ = writeln!(out, "\n{}", content.impact.title);
    for (label, number) in content.headline_numbers() {
        let _ = writeln!(out, "  {:>6}  {}", number, label);
    }

    if !content.values.is_empty() {
        let _ = writeln!(out, "\nValues");
        for value in &content.values {
            let _ = writeln!(out, "  • {}: {}", value.title, value.description);
        }
    }
    if let Some(contact) = &content.contact {
        let _ = writeln!(out, "\n{}\n{} {}", contact.title, contact.description, contact.email);
    }
    out
}

/// 登録完了の表示（送信内容の抜粋とサーバーの応答）
pub fn receipt(echo: &Value, receipt: &SubmitReceipt) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", receipt.message);
    if let Some(id) = &receipt.id {
        let _ = writeln!(out, "  id: {}", id);
    }
    if let Value::Object(fields) = echo {
        for (field, value) in fields {
            let shown = match value {
                Value::String(s) => s.clone(),
                Value::Null => "-".to_string(),
                other => other.to_string(),
            };
            let _ = writeln!(out, "  {}: {}", humanize(field), shown);
        }
    }
    if let Some(verification) = &receipt.verification {
        out.push_str(&self::verification(verification));
    }
    out
}

pub fn verification(verification: &Verification) -> String {
    format!(
        "  verification: {} (trust {:.0}, {})\n",
        verification.status, verification.trust_score, verification.trust_level
    )
}
