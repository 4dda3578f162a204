//! About ページの内容
//!
//! `/api/about` が失敗したときは `AboutContent::fallback()` を表示する。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mission {
    pub title: String,
    pub description: String,
    pub vision: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Story {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Highlight {
    pub number: i64,
    pub label: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Impact {
    pub title: String,
    pub metrics: BTreeMap<String, i64>,
    pub highlights: Vec<Highlight>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreValue {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSection {
    pub title: String,
    pub description: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutContent {
    pub mission: Mission,
    pub story: Option<Story>,
    pub impact: Impact,
    pub values: Vec<CoreValue>,
    pub contact: Option<ContactSection>,
}

impl AboutContent {
    /// 通信できないときの固定文言
    pub fn fallback() -> Self {
        Self {
            mission: Mission {
                title: "Our Mission".to_string(),
                description: "Give and Get connects people in need with shelters and charities, \
                              while efficiently matching donors with organizations that need their contributions."
                    .to_string(),
                vision: "A community where no one goes without shelter or basic necessities.".to_string(),
            },
            story: Some(Story {
                title: "Our Story".to_string(),
                content: "Generous donors want to help, and shelters and charities need resources. \
                          Give and Get matches them by urgency, location, capacity and specific needs."
                    .to_string(),
            }),
            impact: Impact {
                title: "Our Impact".to_string(),
                metrics: [("organizations_partnered", 0), ("beds_available", 0), ("items_needed", 0)]
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
                highlights: Vec::new(),
            },
            values: [
                ("Transparency", "Every match comes with a detailed explanation of why it was made."),
                ("Efficiency", "Smart algorithms ensure resources go where they're needed most."),
                ("Accessibility", "Easy-to-use platform that works for everyone."),
                ("Verification", "All organizations are verified to ensure donations reach legitimate causes."),
            ]
            .into_iter()
            .map(|(title, description)| CoreValue {
                title: title.to_string(),
                description: description.to_string(),
            })
            .collect(),
            contact: Some(ContactSection {
                title: "Get In Touch".to_string(),
                description: "Want to partner with us or learn more about our mission?".to_string(),
                email: "contact@giveandget.org".to_string(),
            }),
        }
    }

    /// 表示用の指標（ハイライトがなければ metrics から組み立てる）
    pub fn headline_numbers(&self) -> Vec<(String, i64)> {
        if !self.impact.highlights.is_empty() {
            return self
                .impact
                .highlights
                .iter()
                .map(|h| (h.label.clone(), h.number))
                .collect();
        }
        self.impact
            .metrics
            .iter()
            .map(|(key, value)| (crate::validation::humanize(key), *value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_partial_backend_response() {
        let about: AboutContent = serde_json::from_value(json!({
            "mission": {"title": "Our Mission", "description": "x"},
            "impact": {"title": "Our Impact", "metrics": {"shelters": 3}},
            "how_it_works": {"steps": []},
            "values": [{"title": "Transparency", "description": "y", "icon": "?"}]
        }))
        .unwrap();
        assert_eq!(about.impact.metrics["shelters"], 3);
        assert!(about.story.is_none());
        assert_eq!(about.values.len(), 1);
        assert_eq!(about.headline_numbers(), vec![("Shelters".to_string(), 3)]);
    }

    #[test]
    fn test_fallback_has_copy() {
        let about = AboutContent::fallback();
        assert_eq!(about.mission.title, "Our Mission");
        assert_eq!(about.values.len(), 4);
        assert!(about.contact.is_some());
    }

    #[test]
    fn test_highlights_take_priority() {
        let mut about = AboutContent::fallback();
        about.impact.highlights.push(Highlight { number: 12, label: "Beds Available".into(), description: String::new() });
        assert_eq!(about.headline_numbers(), vec![("Beds Available".to_string(), 12)]);
    }
}
