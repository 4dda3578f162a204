//! マッチ検索セッション
//!
//! 結果集合・選択状態・検索半径を持つ。検索ごとにチケットを発行し、
//! 最新のチケット以外の結果は捨てる。

use crate::api::{PeopleMatchRequest, SupplyMatchRequest};
use crate::donations::DonationList;
use crate::error::ApiError;
use crate::forms::{Form, SurveyForm};
use crate::types::{Coordinate, LocationEntry, LocationSet};

/// 寄付者画面の検索半径（マイル）
pub const DONOR_RADIUS_OPTIONS: [u32; 5] = [1, 5, 10, 20, 50];
pub const DEFAULT_DONOR_RADIUS: u32 = 1;
pub const DEFAULT_PEOPLE_RADIUS: u32 = 25;

/// 選択中の団体と経路表示先
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected: Option<String>,
    pub route_target: Option<String>,
}

impl SelectionState {
    /// マーカー・一覧から選択（経路先も同じIDにする）
    pub fn select(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.route_target = Some(id.clone());
        self.selected = Some(id);
    }

    /// 戻る（両方クリア）
    pub fn clear(&mut self) {
        self.selected = None;
        self.route_target = None;
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none() && self.route_target.is_none()
    }
}

/// 検索チケット
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct QueryTicket(u64);

/// 検索結果の反映結果
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// 反映した（件数）
    Applied(usize),
    /// 新しい検索が発行済みのため破棄
    Stale,
    /// 失敗（前回の結果は保持）
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct MatchSession {
    origin: Coordinate,
    radius: u32,
    results: LocationSet,
    selection: SelectionState,
    issued: u64,
    in_flight: Option<QueryTicket>,
    error: Option<String>,
}

impl MatchSession {
    pub fn new(radius: u32) -> Self {
        Self {
            origin: Coordinate::FALLBACK,
            radius,
            results: LocationSet::default(),
            selection: SelectionState::default(),
            issued: 0,
            in_flight: None,
            error: None,
        }
    }

    pub fn for_donor() -> Self {
        Self::new(DEFAULT_DONOR_RADIUS)
    }

    pub fn for_people() -> Self {
        Self::new(DEFAULT_PEOPLE_RADIUS)
    }

    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    /// 位置情報で出発地を更新（不正な座標は無視）
    pub fn set_origin(&mut self, origin: Coordinate) -> bool {
        if !origin.is_valid() {
            log::warn!("ignoring invalid origin ({}, {})", origin.lat, origin.lng);
            return false;
        }
        self.origin = origin;
        true
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: u32) {
        self.radius = radius.max(1);
    }

    pub fn results(&self) -> &LocationSet {
        &self.results
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// 結果に存在するIDのみ選択できる
    pub fn select(&mut self, id: &str) -> bool {
        if !self.results.contains(id) {
            log::debug!("select ignored: unknown location {}", id);
            return false;
        }
        self.selection.select(id);
        true
    }

    /// 詳細表示から一覧に戻る（情報ウィンドウを閉じた場合も同じ）
    pub fn back(&mut self) {
        self.selection.clear();
    }

    pub fn selected_entry(&self) -> Option<&LocationEntry> {
        self.selection.selected.as_deref().and_then(|id| self.results.get(id))
    }

    /// 検索開始
    pub fn begin_query(&mut self) -> QueryTicket {
        self.issued += 1;
        let ticket = QueryTicket(self.issued);
        self.in_flight = Some(ticket);
        ticket
    }

    /// 検索結果を反映
    pub fn finish_query(&mut self, ticket: QueryTicket, result: Result<LocationSet, ApiError>) -> QueryOutcome {
        if self.in_flight != Some(ticket) {
            log::debug!("dropping stale query result {:?}", ticket);
            return QueryOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(results) => {
                let count = results.len();
                self.results = results;
                self.error = None;
                let still_present = self
                    .selection
                    .selected
                    .as_deref()
                    .map(|id| self.results.contains(id))
                    .unwrap_or(true);
                if !still_present {
                    self.selection.clear();
                }
                QueryOutcome::Applied(count)
            }
            Err(e) => {
                let message = e.user_message();
                log::warn!("match query failed: {}", e);
                self.error = Some(message.clone());
                QueryOutcome::Failed(message)
            }
        }
    }

    pub fn supply_request(&self, donations: &DonationList) -> SupplyMatchRequest {
        SupplyMatchRequest {
            location: self.origin,
            radius: self.radius,
            donor_items: donations.to_request(),
        }
    }

    /// 検索半径はセッション側の値を使う
    pub fn people_request(&self, survey: &SurveyForm) -> PeopleMatchRequest {
        let mut filters = survey.clone();
        filters.set_radius(self.radius);
        PeopleMatchRequest {
            location: self.origin,
            radius: self.radius,
            person_filters: Some(filters.payload()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::donations::DonationDraft;

    fn set(ids: &[&str]) -> LocationSet {
        LocationSet::from_entries(
            ids.iter()
                .map(|id| LocationEntry { id: id.to_string(), name: format!("org {}", id), ..Default::default() })
                .collect(),
        )
    }

    fn loaded(ids: &[&str]) -> MatchSession {
        let mut session = MatchSession::for_donor();
        let ticket = session.begin_query();
        session.finish_query(ticket, Ok(set(ids)));
        session
    }

    #[test]
    fn test_select_sets_both_and_back_clears() {
        let mut session = loaded(&["1", "2"]);
        assert!(session.select("2"));
        assert_eq!(session.selection().selected.as_deref(), Some("2"));
        assert_eq!(session.selection().route_target.as_deref(), Some("2"));
        assert_eq!(session.selected_entry().unwrap().name, "org 2");

        session.back();
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_select_unknown_id_is_ignored() {
        let mut session = loaded(&["1"]);
        assert!(!session.select("9"));
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut session = MatchSession::for_donor();
        let first = session.begin_query();
        let second = session.begin_query();
        assert_eq!(session.finish_query(second, Ok(set(&["1", "2"]))), QueryOutcome::Applied(2));
        assert_eq!(session.finish_query(first, Ok(set(&["7"]))), QueryOutcome::Stale);
        assert_eq!(session.results().ids(), vec!["1", "2"]);
        assert!(!session.is_loading());
    }

    #[test]
    fn test_failure_keeps_previous_results() {
        let mut session = loaded(&["1", "2"]);
        let ticket = session.begin_query();
        let outcome = session.finish_query(ticket, Err(ApiError::Network("timeout".into())));
        assert!(matches!(outcome, QueryOutcome::Failed(_)));
        assert_eq!(session.results().len(), 2);
        assert!(session.error().unwrap().contains("try again"));
    }

    #[test]
    fn test_vanished_selection_is_cleared() {
        let mut session = loaded(&["1", "2"]);
        session.select("2");
        let ticket = session.begin_query();
        session.finish_query(ticket, Ok(set(&["1"])));
        assert!(session.selection().is_empty());

        session.select("1");
        let ticket = session.begin_query();
        session.finish_query(ticket, Ok(set(&["1", "3"])));
        assert_eq!(session.selection().selected.as_deref(), Some("1"));
    }

    #[test]
    fn test_requests_use_session_origin_and_radius() {
        let mut session = MatchSession::for_people();
        session.set_origin(Coordinate::new(40.0, -77.0));
        session.set_radius(10);
        assert!(!session.set_origin(Coordinate::new(200.0, 0.0)));

        let people = session.people_request(&SurveyForm::new());
        assert_eq!(people.radius, 10);
        assert_eq!(people.person_filters.unwrap()["max_travel_distance_miles"], 10);

        let mut donations = DonationList::new();
        donations.add(DonationDraft { item_name: "Coat".into(), ..Default::default() });
        let supplies = session.supply_request(&donations);
        assert_eq!(supplies.location, Coordinate::new(40.0, -77.0));
        assert_eq!(supplies.donor_items.unwrap().items.len(), 1);
    }

    #[test]
    fn test_default_radii() {
        assert_eq!(MatchSession::for_donor().radius(), 1);
        assert_eq!(MatchSession::for_people().radius(), 25);
        assert!(DONOR_RADIUS_OPTIONS.contains(&DEFAULT_DONOR_RADIUS));
    }
}
