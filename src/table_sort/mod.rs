//! Column sorting for the dashboard tables.
//!
//! All sorts here are stable: rows with equal keys keep the order the
//! backend returned them in. Rows with no value for the column always go
//! last, whichever direction is requested.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::Deserialize;

use crate::models::{Hub, Store, StoreStatus, User};

/// `asc` or `desc`, in any letter case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(format!("unknown sort order `{}`, expected `asc` or `desc`", s))
        }
    }
}

impl TryFrom<String> for SortDirection {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl SortDirection {
    #[inline]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// A cell value as seen by the sorter
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    /// Explicit rank, lower first
    Rank(u8),
    Number(f64),
    /// Lowercased once by [`SortValue::text`], so comparison is case-insensitive
    Text(String),
    Missing,
}

impl SortValue {
    pub fn text(value: Option<&str>) -> Self {
        match value {
            Some(s) if !s.trim().is_empty() => SortValue::Text(s.to_lowercase()),
            _ => SortValue::Missing,
        }
    }

    fn variant_order(&self) -> u8 {
        match self {
            SortValue::Rank(_) => 0,
            SortValue::Number(_) => 1,
            SortValue::Text(_) => 2,
            SortValue::Missing => 3,
        }
    }

    /// Ordering between two present values
    fn compare_present(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Rank(a), SortValue::Rank(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            _ => self.variant_order().cmp(&other.variant_order()),
        }
    }
}

/// Compare two cells under `direction`; missing values sort last either way
pub fn compare_values(a: &SortValue, b: &SortValue, direction: SortDirection) -> Ordering {
    match (a, b) {
        (SortValue::Missing, SortValue::Missing) => Ordering::Equal,
        (SortValue::Missing, _) => Ordering::Greater,
        (_, SortValue::Missing) => Ordering::Less,
        _ => direction.apply(a.compare_present(b)),
    }
}

/// A row type the dashboard tables can sort by named column
pub trait Sortable {
    fn sort_value(&self, column: &str) -> SortValue;
}

/// Stable sort by `column`. Each row's key is computed once.
pub fn sort_rows<T: Sortable>(rows: &mut Vec<T>, column: &str, direction: SortDirection) {
    let mut keyed: Vec<(SortValue, T)> = rows
        .drain(..)
        .map(|row| (row.sort_value(column), row))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_values(a, b, direction));
    rows.extend(keyed.into_iter().map(|(_, row)| row));
}

/// Stable sort with a caller-supplied comparator. `Desc` reverses the
/// comparator; equal rows still keep their input order.
pub fn sort_by_comparator<T, F>(rows: &mut [T], mut compare: F, direction: SortDirection)
where
    F: FnMut(&T, &T) -> Ordering,
{
    rows.sort_by(|a, b| direction.apply(compare(a, b)));
}

impl Sortable for Store {
    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "storeId" => SortValue::text(Some(&self.store_id)),
            "storeName" | "name" => SortValue::text(self.store_name.as_deref()),
            "city" => SortValue::text(self.city.as_deref()),
            "state" => SortValue::text(self.state.as_deref()),
            "status" => SortValue::Rank(self.status().rank()),
            _ => SortValue::Missing,
        }
    }
}

impl Sortable for Hub {
    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "hubId" => SortValue::text(Some(&self.hub_id)),
            "name" => SortValue::text(self.name.as_deref()),
            "storeId" => SortValue::text(self.store_id.as_deref()),
            // online first
            "status" => SortValue::Rank(if self.is_online() { 0 } else { 1 }),
            "lastHeartbeat" => self
                .last_heartbeat
                .map(|t| SortValue::Number(t.timestamp_millis() as f64))
                .unwrap_or(SortValue::Missing),
            _ => SortValue::Missing,
        }
    }
}

impl Sortable for User {
    fn sort_value(&self, column: &str) -> SortValue {
        match column {
            "firstName" => SortValue::text(self.first_name.as_deref()),
            "lastName" => SortValue::text(self.last_name.as_deref()),
            "email" => SortValue::text(self.email.as_deref()),
            "role" => SortValue::text(self.role.as_deref()),
            _ => SortValue::Missing,
        }
    }
}

/// Comparator ranking stores `active < pending < inactive`
pub fn by_store_status(a: &Store, b: &Store) -> Ordering {
    a.status().cmp(&b.status())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn store(id: &str, status: &str) -> Store {
        Store {
            store_id: id.to_string(),
            status: Some(status.to_string()),
            ..Default::default()
        }
    }

    fn ids(stores: &[Store]) -> Vec<&str> {
        stores.iter().map(|s| s.store_id.as_str()).collect()
    }

    #[test]
    fn test_status_comparator_is_stable() {
        let mut stores = vec![
            store("a", "inactive"),
            store("b", "active"),
            store("c", "pending"),
            store("d", "active"),
            store("e", "inactive"),
            store("f", "pending"),
        ];
        sort_by_comparator(&mut stores, by_store_status, SortDirection::Asc);
        assert_eq!(ids(&stores), vec!["b", "d", "c", "f", "a", "e"]);
        assert!(stores
            .windows(2)
            .all(|w| w[0].status() <= w[1].status()));
    }

    #[test]
    fn test_status_column_matches_comparator() {
        let mut stores = vec![store("a", "pending"), store("b", "inactive"), store("c", "active")];
        sort_rows(&mut stores, "status", SortDirection::Asc);
        assert_eq!(ids(&stores), vec!["c", "a", "b"]);
        sort_rows(&mut stores, "status", SortDirection::Desc);
        assert_eq!(ids(&stores), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_descending_keeps_ties_in_input_order() {
        let mut stores = vec![store("a", "active"), store("b", "pending"), store("c", "active")];
        sort_by_comparator(&mut stores, by_store_status, SortDirection::Desc);
        assert_eq!(ids(&stores), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_text_is_case_insensitive_and_missing_last() {
        let mut stores = vec![
            Store { store_id: "1".into(), city: Some("nashville".into()), ..Default::default() },
            Store { store_id: "2".into(), city: None, ..Default::default() },
            Store { store_id: "3".into(), city: Some("Clarksville".into()), ..Default::default() },
        ];
        sort_rows(&mut stores, "city", SortDirection::Asc);
        assert_eq!(ids(&stores), vec!["3", "1", "2"]);
        sort_rows(&mut stores, "city", SortDirection::Desc);
        assert_eq!(ids(&stores), vec!["1", "3", "2"]);
    }

    #[test]
    fn test_hubs_by_heartbeat() {
        let hub = |id: &str, minute: Option<u32>| Hub {
            hub_id: id.to_string(),
            last_heartbeat: minute.map(|m| Utc.with_ymd_and_hms(2026, 10, 19, 12, m, 0).unwrap()),
            ..Default::default()
        };
        let mut hubs = vec![hub("old", Some(1)), hub("never", None), hub("new", Some(30))];
        sort_rows(&mut hubs, "lastHeartbeat", SortDirection::Desc);
        let order: Vec<&str> = hubs.iter().map(|h| h.hub_id.as_str()).collect();
        assert_eq!(order, vec!["new", "old", "never"]);
    }

    #[test]
    fn test_direction_parses_any_case() {
        for (raw, expected) in [("asc", SortDirection::Asc), ("DESC", SortDirection::Desc), ("Asc", SortDirection::Asc)] {
            let parsed: SortDirection = serde_json::from_value(serde_json::json!(raw)).unwrap();
            assert_eq!(parsed, expected);
        }
        assert!(serde_json::from_value::<SortDirection>(serde_json::json!("sideways")).is_err());
    }

    struct Counted<'a> {
        id: &'static str,
        calls: &'a std::cell::Cell<usize>,
    }

    impl Sortable for Counted<'_> {
        fn sort_value(&self, _column: &str) -> SortValue {
            self.calls.set(self.calls.get() + 1);
            SortValue::text(Some(self.id))
        }
    }

    #[test]
    fn test_sort_keys_are_computed_once_per_row() {
        let calls = std::cell::Cell::new(0);
        let mut rows: Vec<Counted> = ["delta", "Alpha", "charlie", "Bravo", "echo", "alpha"]
            .into_iter()
            .map(|id| Counted { id, calls: &calls })
            .collect();
        sort_rows(&mut rows, "id", SortDirection::Asc);
        assert_eq!(calls.get(), 6);
        let order: Vec<&str> = rows.iter().map(|r| r.id).collect();
        assert_eq!(order, vec!["Alpha", "alpha", "Bravo", "charlie", "delta", "echo"]);
    }

    #[test]
    fn test_unknown_column_leaves_order_alone() {
        let mut stores = vec![store("z", "active"), store("a", "inactive")];
        sort_rows(&mut stores, "revenue", SortDirection::Asc);
        assert_eq!(ids(&stores), vec!["z", "a"]);
    }
}
