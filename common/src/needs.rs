//! 団体の必要物資リスト

use crate::error::{Error, Result};
use crate::form::coerce_number;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 緊急度
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
}

impl Urgency {
    pub const ALL: [Urgency; 3] = [Urgency::Low, Urgency::Medium, Urgency::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
        }
    }
}

impl From<String> for Urgency {
    /// 未知の値は medium 扱い
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "low" => Urgency::Low,
            "high" => Urgency::High,
            _ => Urgency::Medium,
        }
    }
}

/// 編集中の1行（数量は入力文字列のまま保持）
#[derive(Debug, Clone, PartialEq)]
pub struct Need {
    pub item: String,
    pub category: String,
    pub needed: String,
    pub have: String,
    pub urgency: Urgency,
}

impl Default for Need {
    fn default() -> Self {
        Self {
            item: String::new(),
            category: String::new(),
            needed: "0".to_string(),
            have: "0".to_string(),
            urgency: Urgency::Medium,
        }
    }
}

/// 更新対象の列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeedField {
    Item,
    Category,
    Needed,
    Have,
    Urgency,
}

impl NeedField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "item" => Some(NeedField::Item),
            "category" => Some(NeedField::Category),
            "needed" => Some(NeedField::Needed),
            "have" => Some(NeedField::Have),
            "urgency" => Some(NeedField::Urgency),
            _ => None,
        }
    }
}

/// 送信時の1件分
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeedDetail {
    pub category: String,
    pub needed: i64,
    pub have: i64,
    pub urgency: Urgency,
}

/// 必要物資リスト
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeedsList {
    rows: Vec<Need>,
}

impl NeedsList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 空行を追加し、そのインデックスを返す
    pub fn add(&mut self) -> usize {
        self.rows.push(Need::default());
        self.rows.len() - 1
    }

    pub fn update(&mut self, index: usize, field: NeedField, value: &str) -> Result<()> {
        let len = self.rows.len();
        let row = self.rows.get_mut(index).ok_or_else(|| Error::InvalidValue {
            field: format!("needs[{}]", index),
            reason: format!("only {} rows exist", len),
        })?;

        match field {
            NeedField::Item => row.item = value.to_string(),
            NeedField::Category => row.category = value.to_string(),
            NeedField::Needed => row.needed = value.to_string(),
            NeedField::Have => row.have = value.to_string(),
            NeedField::Urgency => row.urgency = Urgency::from(value.to_string()),
        }
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<Need> {
        if index < self.rows.len() {
            Some(self.rows.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn get(&self, index: usize) -> Option<&Need> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Need> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 品名 → 詳細 のマップに変換
    ///
    /// 品名が空の行は除外、数量は変換できなければ0
    pub fn to_payload(&self) -> BTreeMap<String, NeedDetail> {
        self.rows
            .iter()
            .filter(|row| !row.item.trim().is_empty())
            .map(|row| {
                (
                    row.item.trim().to_string(),
                    NeedDetail {
                        category: row.category.trim().to_string(),
                        needed: coerce_number(&row.needed).unwrap_or(0),
                        have: coerce_number(&row.have).unwrap_or(0),
                        urgency: row.urgency,
                    },
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_creates_medium_row() {
        let mut needs = NeedsList::new();
        let index = needs.add();
        assert_eq!(index, 0);
        let row = needs.get(0).unwrap();
        assert_eq!(row.urgency, Urgency::Medium);
        assert_eq!(row.needed, "0");
    }

    #[test]
    fn test_update_out_of_range() {
        let mut needs = NeedsList::new();
        assert!(needs.update(3, NeedField::Item, "Blankets").is_err());
    }

    #[test]
    fn test_payload_skips_blank_items_and_coerces() {
        let mut needs = NeedsList::new();
        let first = needs.add();
        needs.update(first, NeedField::Item, " Blankets ").unwrap();
        needs.update(first, NeedField::Category, "bedding").unwrap();
        needs.update(first, NeedField::Needed, "40").unwrap();
        needs.update(first, NeedField::Have, "lots").unwrap();
        needs.update(first, NeedField::Urgency, "HIGH").unwrap();
        needs.add();

        let payload = needs.to_payload();
        assert_eq!(payload.len(), 1);
        let blankets = &payload["Blankets"];
        assert_eq!(blankets.needed, 40);
        assert_eq!(blankets.have, 0);
        assert_eq!(blankets.urgency, Urgency::High);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["Blankets"]["urgency"], "high");
        assert_eq!(json["Blankets"]["category"], "bedding");
    }

    #[test]
    fn test_remove_shifts_rows() {
        let mut needs = NeedsList::new();
        needs.add();
        let second = needs.add();
        needs.update(second, NeedField::Item, "Soap").unwrap();
        assert!(needs.remove(0).is_some());
        assert_eq!(needs.get(0).unwrap().item, "Soap");
        assert!(needs.remove(5).is_none());
    }

    #[test]
    fn test_urgency_lenient_deserialize() {
        let urgency: Urgency = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(urgency, Urgency::Medium);
        let urgency: Urgency = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(urgency, Urgency::Low);
    }

    #[test]
    fn test_need_field_parse() {
        assert_eq!(NeedField::parse("have"), Some(NeedField::Have));
        assert_eq!(NeedField::parse("qty"), None);
    }
}
