use serde::Serialize;
use utoipa::ToSchema;

use crate::device::SatelliteEntry;

use super::badges::{tle_badge, Badge};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CatalogRow {
    pub name: String,
    pub norad_id: String,
    pub has_tle: bool,
    pub tle_badge: Badge,
    pub selected: bool,
}

/// Filtered catalog; `Empty` is a distinct state so the caller can render a
/// "no matches" notice instead of an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CatalogView {
    Empty { search: String },
    Entries { rows: Vec<CatalogRow> },
}

/// Case-insensitive substring match of `search` against satellite names.
pub fn filter_catalog(
    satellites: &[SatelliteEntry],
    search: &str,
    selected: Option<&str>,
) -> CatalogView {
    let needle = search.trim().to_lowercase();

    let rows: Vec<CatalogRow> = satellites
        .iter()
        .filter(|sat| sat.name.to_lowercase().contains(&needle))
        .map(|sat| CatalogRow {
            name: sat.name.clone(),
            norad_id: sat.norad_id.clone(),
            has_tle: sat.has_tle,
            tle_badge: tle_badge(Some(&sat.tle_age)),
            selected: selected == Some(sat.name.as_str()),
        })
        .collect();

    if rows.is_empty() {
        CatalogView::Empty {
            search: search.to_string(),
        }
    } else {
        CatalogView::Entries { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, age: &str) -> SatelliteEntry {
        SatelliteEntry {
            name: name.to_string(),
            norad_id: "0".to_string(),
            has_tle: age != "none",
            tle_age: age.to_string(),
        }
    }

    fn catalog() -> Vec<SatelliteEntry> {
        vec![
            entry("ISS", "2h"),
            entry("HUBBLE", "9d"),
            entry("TIANGONG", "none"),
            entry("STARLINK-1007", "1d"),
        ]
    }

    fn names(view: &CatalogView) -> Vec<&str> {
        match view {
            CatalogView::Entries { rows } => rows.iter().map(|r| r.name.as_str()).collect(),
            CatalogView::Empty { .. } => Vec::new(),
        }
    }

    #[test]
    fn empty_search_lists_everything() {
        assert_eq!(names(&filter_catalog(&catalog(), "", None)).len(), 4);
    }

    #[test]
    fn match_is_case_insensitive_substring() {
        let view = filter_catalog(&catalog(), "i", None);
        assert_eq!(names(&view), vec!["ISS", "TIANGONG", "STARLINK-1007"]);

        let view = filter_catalog(&catalog(), "hub", None);
        assert_eq!(names(&view), vec!["HUBBLE"]);
    }

    #[test]
    fn no_match_is_a_distinct_empty_state() {
        assert_eq!(
            filter_catalog(&catalog(), "voyager", None),
            CatalogView::Empty {
                search: "voyager".to_string()
            }
        );
    }

    #[test]
    fn empty_catalog_is_empty_state() {
        assert!(matches!(
            filter_catalog(&[], "", None),
            CatalogView::Empty { .. }
        ));
    }

    #[test]
    fn marks_device_confirmed_selection() {
        let view = filter_catalog(&catalog(), "", Some("HUBBLE"));
        let CatalogView::Entries { rows } = view else {
            panic!("expected entries");
        };
        let selected: Vec<_> = rows.iter().filter(|r| r.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "HUBBLE");
        assert_eq!(selected[0].tle_badge.class, crate::reconcile::BadgeClass::Danger);
    }
}
