//! フォーム状態
//!
//! フィールド定義（FieldSpec）のテーブルで「フィールド名 → 所属グループ」を解決する。
//! 同名フィールドが複数グループに存在する場合は `group.name` の修飾名が必須。

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// フィールドの所属グループ（ペイロード上のネスト先）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldGroup {
    Root,
    Type,
    Contact,
    Hours,
    Amenities,
}

impl FieldGroup {
    /// ペイロード上のキー（Rootはトップレベル）
    pub fn key(&self) -> Option<&'static str> {
        match self {
            FieldGroup::Root => None,
            FieldGroup::Type => Some("type"),
            FieldGroup::Contact => Some("contact"),
            FieldGroup::Hours => Some("hours"),
            // バックエンドのスキーマ表記に合わせる
            FieldGroup::Amenities => Some("ammenities"),
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "type" => Some(FieldGroup::Type),
            "contact" => Some(FieldGroup::Contact),
            "hours" => Some(FieldGroup::Hours),
            "ammenities" | "amenities" => Some(FieldGroup::Amenities),
            _ => None,
        }
    }
}

/// フィールドの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Bool,
    Number,
    /// カンマ区切り文字列 → 配列
    List,
}

/// テンプレートの既定値
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    Text(&'static str),
    Bool(bool),
    Number(i64),
    List(&'static str),
}

/// フィールド定義
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub group: FieldGroup,
    pub default: FieldDefault,
    /// 空のときは null を送る
    pub optional: bool,
}

impl FieldSpec {
    pub const fn text(name: &'static str, group: FieldGroup, default: &'static str) -> Self {
        Self { name, group, default: FieldDefault::Text(default), optional: false }
    }

    pub const fn flag(name: &'static str, group: FieldGroup, default: bool) -> Self {
        Self { name, group, default: FieldDefault::Bool(default), optional: false }
    }

    pub const fn number(name: &'static str, group: FieldGroup, default: i64) -> Self {
        Self { name, group, default: FieldDefault::Number(default), optional: false }
    }

    pub const fn list(name: &'static str, group: FieldGroup, default: &'static str) -> Self {
        Self { name, group, default: FieldDefault::List(default), optional: false }
    }

    pub const fn optional(self) -> Self {
        Self { optional: true, ..self }
    }

    pub fn kind(&self) -> FieldKind {
        match self.default {
            FieldDefault::Text(_) => FieldKind::Text,
            FieldDefault::Bool(_) => FieldKind::Bool,
            FieldDefault::Number(_) => FieldKind::Number,
            FieldDefault::List(_) => FieldKind::List,
        }
    }

    pub fn key(&self) -> FieldKey {
        FieldKey { group: self.group, name: self.name }
    }

    /// マウント時の初期値（任意項目は空）
    fn initial_value(&self) -> FieldValue {
        if self.optional {
            return FieldValue::Text(String::new());
        }
        match self.default {
            FieldDefault::Text(s) | FieldDefault::List(s) => FieldValue::Text(s.to_string()),
            FieldDefault::Bool(b) => FieldValue::Bool(b),
            FieldDefault::Number(n) => FieldValue::Number(n),
        }
    }

    fn default_json(&self) -> Value {
        if self.optional {
            return Value::Null;
        }
        match self.default {
            FieldDefault::Text(s) => Value::String(s.to_string()),
            FieldDefault::Bool(b) => Value::Bool(b),
            FieldDefault::Number(n) => Value::from(n),
            FieldDefault::List(s) => Value::Array(split_list(s)),
        }
    }
}

/// グループ付きのフィールド識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    pub group: FieldGroup,
    pub name: &'static str,
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.group.key() {
            Some(group) => write!(f, "{}.{}", group, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// 入力値
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Number(i64),
}

impl FieldValue {
    /// 表示用文字列
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => n.to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value)
    }
}

/// 数値文字列を整数に変換（失敗時はNone）
///
/// "12" → 12, "12.7" → 12, "abc" → None
pub fn coerce_number(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
}

fn split_list(raw: &str) -> Vec<Value> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Value::String(s.to_string()))
        .collect()
}

/// フォーム状態
#[derive(Debug, Clone)]
pub struct FormState {
    template: &'static [FieldSpec],
    values: BTreeMap<FieldKey, FieldValue>,
}

impl FormState {
    /// テンプレートから生成
    pub fn new(template: &'static [FieldSpec]) -> Self {
        let values = template
            .iter()
            .map(|spec| (spec.key(), spec.initial_value()))
            .collect();
        Self { template, values }
    }

    pub fn template(&self) -> &'static [FieldSpec] {
        self.template
    }

    /// フィールド名を解決
    ///
    /// `group.name` の修飾名、またはテンプレート内で一意な素の名前を受け付ける
    pub fn resolve(&self, name: &str) -> Result<FieldKey> {
        if let Some((group, field)) = name.split_once('.') {
            let group = FieldGroup::from_key(group)
                .ok_or_else(|| Error::UnknownField(name.to_string()))?;
            return self
                .template
                .iter()
                .find(|spec| spec.group == group && spec.name == field)
                .map(FieldSpec::key)
                .ok_or_else(|| Error::UnknownField(name.to_string()));
        }

        let matches: Vec<&FieldSpec> = self.template.iter().filter(|spec| spec.name == name).collect();
        match matches.as_slice() {
            [] => Err(Error::UnknownField(name.to_string())),
            [spec] => Ok(spec.key()),
            many => Err(Error::AmbiguousField {
                name: name.to_string(),
                candidates: many
                    .iter()
                    .map(|spec| spec.key().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    pub fn spec(&self, key: &FieldKey) -> Option<&'static FieldSpec> {
        self.template.iter().find(|spec| spec.key() == *key)
    }

    /// 値を設定（フィールド種別に合わせて変換）
    pub fn set(&mut self, key: FieldKey, value: FieldValue) -> Result<()> {
        let spec = self
            .spec(&key)
            .ok_or_else(|| Error::UnknownField(key.to_string()))?;

        let value = match (spec.kind(), value) {
            (FieldKind::Bool, FieldValue::Bool(b)) => FieldValue::Bool(b),
            (FieldKind::Bool, FieldValue::Text(s)) => match s.trim() {
                "true" | "on" | "yes" => FieldValue::Bool(true),
                "false" | "off" | "no" | "" => FieldValue::Bool(false),
                other => {
                    return Err(Error::InvalidValue {
                        field: key.to_string(),
                        reason: format!("expected a checkbox value, got `{}`", other),
                    })
                }
            },
            (FieldKind::Bool, FieldValue::Number(_)) => {
                return Err(Error::InvalidValue {
                    field: key.to_string(),
                    reason: "expected a checkbox value".to_string(),
                })
            }
            // 数値欄は編集中の文字列をそのまま保持し、送信時に変換する
            (FieldKind::Number, value) => match value {
                FieldValue::Bool(_) => {
                    return Err(Error::InvalidValue {
                        field: key.to_string(),
                        reason: "expected a number".to_string(),
                    })
                }
                other => other,
            },
            (FieldKind::Text | FieldKind::List, FieldValue::Bool(_)) => {
                return Err(Error::InvalidValue {
                    field: key.to_string(),
                    reason: "expected text".to_string(),
                })
            }
            (FieldKind::Text | FieldKind::List, value) => FieldValue::Text(value.as_text()),
        };

        self.values.insert(key, value);
        Ok(())
    }

    /// 入力イベント（名前で指定）
    pub fn set_input(&mut self, name: &str, value: FieldValue) -> Result<FieldKey> {
        let key = self.resolve(name)?;
        self.set(key, value)?;
        Ok(key)
    }

    pub fn get(&self, key: &FieldKey) -> Option<&FieldValue> {
        self.values.get(key)
    }

    /// 名前で文字列値を取得（未定義は空文字）
    pub fn text(&self, name: &str) -> String {
        self.resolve(name)
            .ok()
            .and_then(|key| self.values.get(&key))
            .map(FieldValue::as_text)
            .unwrap_or_default()
    }

    /// 名前で真偽値を取得
    pub fn flag(&self, name: &str) -> bool {
        matches!(
            self.resolve(name).ok().and_then(|key| self.values.get(&key)),
            Some(FieldValue::Bool(true))
        )
    }

    /// 名前で数値を取得（変換不可なら既定値）
    pub fn number(&self, name: &str) -> Option<i64> {
        let key = self.resolve(name).ok()?;
        let spec = self.spec(&key)?;
        self.resolved_value(spec).as_i64()
    }

    pub fn is_blank(&self, key: &FieldKey) -> bool {
        self.values.get(key).map(FieldValue::is_blank).unwrap_or(true)
    }

    /// テンプレートに戻す
    pub fn reset(&mut self) {
        *self = Self::new(self.template);
    }

    /// 送信用の値（空は既定値に置換、数値・リストは変換）
    pub fn resolved_value(&self, spec: &FieldSpec) -> Value {
        let Some(value) = self.values.get(&spec.key()) else {
            return spec.default_json();
        };

        match (spec.kind(), value) {
            (_, value) if value.is_blank() => spec.default_json(),
            (FieldKind::Bool, FieldValue::Bool(b)) => Value::Bool(*b),
            (FieldKind::Number, FieldValue::Number(n)) => Value::from(*n),
            (FieldKind::Number, FieldValue::Text(s)) => {
                coerce_number(s).map(Value::from).unwrap_or_else(|| spec.default_json())
            }
            (FieldKind::List, FieldValue::Text(s)) => {
                let items = split_list(s);
                if items.is_empty() {
                    spec.default_json()
                } else {
                    Value::Array(items)
                }
            }
            (FieldKind::Text, value) => Value::String(value.as_text()),
            _ => spec.default_json(),
        }
    }

    /// グループ別にネストしたペイロードを生成
    ///
    /// テンプレートの全フィールドが必ず含まれる
    pub fn to_payload(&self) -> Map<String, Value> {
        let mut root = Map::new();
        for spec in self.template {
            let value = self.resolved_value(spec);
            match spec.group.key() {
                None => {
                    root.insert(spec.name.to_string(), value);
                }
                Some(group) => {
                    let entry = root
                        .entry(group.to_string())
                        .or_insert_with(|| Value::Object(Map::new()));
                    if let Value::Object(map) = entry {
                        map.insert(spec.name.to_string(), value);
                    }
                }
            }
        }
        root
    }
}
