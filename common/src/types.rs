//! バックエンドとやり取りする型定義
//!
//! - LocationEntry: マッチ結果の1団体（受信専用、ローカルでは変更しない）
//! - LocationSet: 順位順に並べた結果集合
//! - 各種レスポンス（登録・検証・ヘルスチェック）

use crate::needs::Urgency;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 緯度経度
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    /// 保存データには `lon` 表記もある
    #[serde(alias = "lon")]
    pub lng: f64,
}

impl Coordinate {
    /// 位置情報が取れないときの既定値
    pub const FALLBACK: Coordinate = Coordinate { lat: 40.8148, lng: -77.8653 };

    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// 団体種別
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgType {
    pub shelter: bool,
    pub charity: bool,
}

impl OrgType {
    /// 表示ラベル（シェルター優先）
    pub fn label(&self) -> &'static str {
        if self.shelter {
            "Shelter"
        } else if self.charity {
            "Charity"
        } else {
            "Organization"
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub phone: String,
    pub email: String,
    pub website: String,
}

pub const WEEKDAYS: [&str; 7] = ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"];

/// 曜日別の営業時間
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hours {
    pub monday: String,
    pub tuesday: String,
    pub wednesday: String,
    pub thursday: String,
    pub friday: String,
    pub saturday: String,
    pub sunday: String,
}

impl Hours {
    /// (曜日, 時間) を月曜から順に返す
    pub fn by_day(&self) -> [(&'static str, &str); 7] {
        [
            (WEEKDAYS[0], self.monday.as_str()),
            (WEEKDAYS[1], self.tuesday.as_str()),
            (WEEKDAYS[2], self.wednesday.as_str()),
            (WEEKDAYS[3], self.thursday.as_str()),
            (WEEKDAYS[4], self.friday.as_str()),
            (WEEKDAYS[5], self.saturday.as_str()),
            (WEEKDAYS[6], self.sunday.as_str()),
        ]
    }
}

/// 団体の必要物資（受信側）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedRecord {
    pub item: String,
    pub category: String,
    pub needed: i64,
    pub have: i64,
    pub urgency: Urgency,
}

impl NeedRecord {
    /// 不足数（負にはならない）
    pub fn remaining(&self) -> i64 {
        (self.needed - self.have).max(0)
    }
}

/// マッチ結果の1団体
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationEntry {
    /// 順位キー（ranked_organizations のキー）
    #[serde(skip_deserializing)]
    pub id: String,

    #[serde(rename = "_id", deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,

    /// 座標がない・読めない団体は地図に出さない
    #[serde(deserialize_with = "lenient_coordinate")]
    pub location: Option<Coordinate>,

    #[serde(deserialize_with = "null_as_default")]
    pub hours: Hours,
    pub contact: Option<ContactInfo>,

    #[serde(deserialize_with = "needs_list_or_map")]
    pub needs: Vec<NeedRecord>,

    #[serde(deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(rename = "type")]
    pub org_type: OrgType,
}

impl LocationEntry {
    /// 上位n件の必要物資
    pub fn top_needs(&self, n: usize) -> &[NeedRecord] {
        &self.needs[..self.needs.len().min(n)]
    }

    pub fn type_label(&self) -> &'static str {
        self.org_type.label()
    }
}

/// `_id` は文字列・数値・null のいずれでも受け付ける
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// null は既定値として読む
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 形の合わない座標は None（団体ごと捨てない）
fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<Coordinate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value::<Coordinate>(value).ok()))
}

/// needs は配列でも「品名 → 詳細」のマップでも受け付ける
fn needs_list_or_map<'de, D>(deserializer: D) -> Result<Vec<NeedRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Shape {
        List(Vec<NeedRecord>),
        Map(BTreeMap<String, NeedRecord>),
        Empty(Option<()>),
    }

    Ok(match Shape::deserialize(deserializer)? {
        Shape::List(needs) => needs,
        Shape::Map(map) => map
            .into_iter()
            .map(|(item, mut record)| {
                if record.item.is_empty() {
                    record.item = item;
                }
                record
            })
            .collect(),
        Shape::Empty(_) => Vec::new(),
    })
}

/// 順位順の結果集合
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationSet {
    entries: Vec<LocationEntry>,
}

impl LocationSet {
    /// `ranked_organizations` から生成（キーの数値順、数値でないキーは末尾）
    pub fn from_ranked(ranked: BTreeMap<String, LocationEntry>) -> Self {
        let mut entries: Vec<LocationEntry> = ranked
            .into_iter()
            .map(|(rank, mut entry)| {
                entry.id = rank;
                entry
            })
            .collect();
        entries.sort_by(|a, b| rank_order(&a.id).cmp(&rank_order(&b.id)).then_with(|| a.id.cmp(&b.id)));
        Self { entries }
    }

    pub fn from_entries(entries: Vec<LocationEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, id: &str) -> Option<&LocationEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.id.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn rank_order(id: &str) -> u64 {
    id.parse::<u64>().unwrap_or(u64::MAX)
}

/// マッチAPIのレスポンス
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MatchReply {
    pub success: bool,
    pub matches_found: usize,
    pub ranked_organizations: BTreeMap<String, LocationEntry>,
}

/// 団体検証の詳細
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Verification {
    pub status: String,
    pub trust_score: f64,
    pub trust_level: String,
    pub checks: Value,
}

/// `/api/org/validate`・`/api/donor/validate` のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VerificationReply {
    pub success: bool,
    pub message: String,
    #[serde(deserialize_with = "lenient_id")]
    pub organization_id: Option<String>,
    pub verification: Option<Verification>,
}

/// `/api/user/create` のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CreateUserReply {
    pub status: String,
    pub message: String,
    #[serde(deserialize_with = "lenient_id")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HealthReply {
    pub status: String,
    pub api_version: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_accepts_needs_map() {
        let entry: LocationEntry = serde_json::from_value(json!({
            "_id": 42,
            "name": "Safe Haven",
            "address": "1 Main St",
            "location": {"lat": 40.79, "lng": -77.86},
            "needs": {
                "Blankets": {"category": "bedding", "needed": 40, "have": 10, "urgency": "high"}
            },
            "score": 87,
            "type": {"shelter": true, "charity": false}
        }))
        .unwrap();

        assert_eq!(entry.organization_id.as_deref(), Some("42"));
        assert_eq!(entry.needs.len(), 1);
        assert_eq!(entry.needs[0].item, "Blankets");
        assert_eq!(entry.needs[0].remaining(), 30);
        assert_eq!(entry.type_label(), "Shelter");
        assert_eq!(entry.score, 87.0);
    }

    #[test]
    fn test_entry_accepts_needs_list_and_missing_fields() {
        let entry: LocationEntry = serde_json::from_value(json!({
            "name": "Food Bank",
            "needs": [
                {"item": "Rice", "needed": 5, "have": 9},
                {"item": "Beans"},
                {"item": "Soap"},
                {"item": "Coats"}
            ]
        }))
        .unwrap();

        assert!(entry.location.is_none());
        assert!(entry.contact.is_none());
        assert_eq!(entry.needs[0].remaining(), 0);
        assert_eq!(entry.top_needs(3).len(), 3);
        assert_eq!(entry.type_label(), "Organization");
    }

    #[test]
    fn test_entry_needs_null() {
        let entry: LocationEntry = serde_json::from_value(json!({"name": "X", "needs": null})).unwrap();
        assert!(entry.needs.is_empty());
    }

    #[test]
    fn test_set_orders_by_numeric_rank() {
        let mut ranked = BTreeMap::new();
        for rank in ["10", "2", "1"] {
            ranked.insert(rank.to_string(), LocationEntry { name: format!("org {}", rank), ..Default::default() });
        }
        let set = LocationSet::from_ranked(ranked);
        assert_eq!(set.ids(), vec!["1", "2", "10"]);
        assert_eq!(set.get("10").unwrap().name, "org 10");
        assert!(!set.contains("3"));
    }

    #[test]
    fn test_match_reply_decode() {
        let reply: MatchReply = serde_json::from_value(json!({
            "success": true,
            "matches_found": 1,
            "ranked_organizations": {"1": {"name": "Shelter A", "location": {"lat": 1.0, "lng": 2.0}}}
        }))
        .unwrap();
        let set = LocationSet::from_ranked(reply.ranked_organizations);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("1").unwrap().location, Some(Coordinate::new(1.0, 2.0)));
    }

    /// 1件だけ形が違っても結果全体は読める
    #[test]
    fn test_match_reply_tolerates_mixed_entries() {
        let reply: MatchReply = serde_json::from_str(
            r#"{"success": true, "matches_found": 3, "ranked_organizations": {
                "1": {"name": "Shelter A", "location": {"lat": 40.8, "lng": -77.8}},
                "2": {"name": "Shelter B", "location": {"lat": 40.7, "lon": -77.9}, "description": null},
                "3": {"name": null, "address": null, "hours": null, "score": null, "location": {"lat": "n/a"}}
            }}"#,
        )
        .unwrap();
        let set = LocationSet::from_ranked(reply.ranked_organizations);
        assert_eq!(set.len(), 3);
        assert_eq!(set.get("2").unwrap().location, Some(Coordinate::new(40.7, -77.9)));
        assert_eq!(set.get("2").unwrap().description, "");
        let third = set.get("3").unwrap();
        assert!(third.location.is_none());
        assert_eq!(third.name, "");
        assert_eq!(third.hours, Hours::default());
        assert_eq!(third.score, 0.0);
    }

    #[test]
    fn test_coordinate_validity() {
        assert!(Coordinate::FALLBACK.is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_hours_by_day_order() {
        let hours = Hours { monday: "closed".into(), sunday: "0900-1700".into(), ..Default::default() };
        let days = hours.by_day();
        assert_eq!(days[0], ("monday", "closed"));
        assert_eq!(days[6], ("sunday", "0900-1700"));
    }

    #[test]
    fn test_verification_reply_decode() {
        let reply: VerificationReply = serde_json::from_value(json!({
            "success": false,
            "message": "Organization failed automated verification.",
            "verification": {"status": "rejected", "trust_score": 20, "trust_level": "low", "checks": {}}
        }))
        .unwrap();
        assert!(!reply.success);
        assert_eq!(reply.verification.unwrap().trust_score, 20.0);
    }
}
