//! 寄付者が提供する品目リスト

use serde::Serialize;

/// 品目カテゴリ
pub const DONATION_CATEGORIES: [&str; 5] = ["Clothing", "Household", "Food", "Toiletries", "Other"];

/// 追加フォームの入力値
#[derive(Debug, Clone, PartialEq)]
pub struct DonationDraft {
    pub category: String,
    pub item_name: String,
    pub quantity: String,
    pub description: String,
}

impl Default for DonationDraft {
    fn default() -> Self {
        Self {
            category: DONATION_CATEGORIES[0].to_string(),
            item_name: String::new(),
            quantity: "1".to_string(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DonationItem {
    pub id: u64,
    pub item_name: String,
    pub quantity: u32,
    pub category: String,
    pub description: String,
}

/// `/api/match-supplies` の donor_items.items[]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonorItem {
    pub category: String,
    pub item: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonorItems {
    pub items: Vec<DonorItem>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonationList {
    items: Vec<DonationItem>,
    next_id: u64,
}

impl DonationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加して採番したIDを返す
    ///
    /// 品名が空なら "Unnamed item"、数量は1未満・変換不可なら1
    pub fn add(&mut self, draft: DonationDraft) -> u64 {
        self.next_id += 1;
        let id = self.next_id;

        let item_name = match draft.item_name.trim() {
            "" => "Unnamed item".to_string(),
            name => name.to_string(),
        };
        let quantity = draft
            .quantity
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|q| *q >= 1)
            .unwrap_or(1);
        let category = match draft.category.trim() {
            "" => "Other".to_string(),
            category => category.to_string(),
        };

        log::debug!("donation added: {} x{} ({})", item_name, quantity, category);
        self.items.push(DonationItem {
            id,
            item_name,
            quantity,
            category,
            description: draft.description.trim().to_string(),
        });
        id
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    pub fn items(&self) -> &[DonationItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// リクエスト用（空ならNone → null送信）
    pub fn to_request(&self) -> Option<DonorItems> {
        if self.items.is_empty() {
            return None;
        }
        Some(DonorItems {
            items: self
                .items
                .iter()
                .map(|item| DonorItem {
                    category: item.category.to_lowercase(),
                    item: item.item_name.clone(),
                    quantity: item.quantity,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, quantity: &str) -> DonationDraft {
        DonationDraft {
            item_name: name.to_string(),
            quantity: quantity.to_string(),
            ..DonationDraft::default()
        }
    }

    #[test]
    fn test_add_normalizes_input() {
        let mut list = DonationList::new();
        list.add(draft("  ", "0"));
        list.add(draft("Jacket", "abc"));
        list.add(draft("Socks", "6"));

        let items = list.items();
        assert_eq!(items[0].item_name, "Unnamed item");
        assert_eq!(items[0].quantity, 1);
        assert_eq!(items[1].quantity, 1);
        assert_eq!(items[2].quantity, 6);
        assert_eq!(items[2].category, "Clothing");
    }

    #[test]
    fn test_ids_are_unique_after_remove() {
        let mut list = DonationList::new();
        let first = list.add(draft("A", "1"));
        assert!(list.remove(first));
        assert!(!list.remove(first));
        let second = list.add(draft("B", "1"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_empty_list_sends_null() {
        let list = DonationList::new();
        assert!(list.to_request().is_none());
        let json = serde_json::to_value(list.to_request()).unwrap();
        assert!(json.is_null());
    }

    #[test]
    fn test_request_shape() {
        let mut list = DonationList::new();
        list.add(DonationDraft {
            category: "Food".to_string(),
            item_name: "Canned beans".to_string(),
            quantity: "12".to_string(),
            description: "unopened".to_string(),
        });
        let json = serde_json::to_value(list.to_request()).unwrap();
        assert_eq!(json["items"][0]["category"], "food");
        assert_eq!(json["items"][0]["item"], "Canned beans");
        assert_eq!(json["items"][0]["quantity"], 12);
    }
}
