//! Optional scope restriction for retrieval and listing.
//!
//! Retrieval searches the whole corpus unless a caller passes a filter;
//! nothing in this crate applies one implicitly.

use directory::ScopeInfo;
use serde::Deserialize;

/// Conjunction of optional equality constraints on the scope hierarchy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ScopeFilter {
    pub province_id: Option<i32>,
    pub district_id: Option<i32>,
    pub service_id: Option<i32>,
}

impl ScopeFilter {
    /// `true` when no constraint is set.
    pub fn is_empty(&self) -> bool {
        self.province_id.is_none() && self.district_id.is_none() && self.service_id.is_none()
    }

    /// Evaluates the filter against a resolved scope.
    pub fn matches(&self, scope: &ScopeInfo) -> bool {
        self.province_id.is_none_or(|id| id == scope.province_id)
            && self.district_id.is_none_or(|id| id == scope.district_id)
            && self.service_id.is_none_or(|id| id == scope.service_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> ScopeInfo {
        ScopeInfo {
            service_id: 5,
            district_id: 2,
            province_id: 1,
            service_name: "Water".into(),
            district_name: "Mueang".into(),
            province_name: "Chiang Mai".into(),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let f = ScopeFilter::default();
        assert!(f.is_empty());
        assert!(f.matches(&scope()));
    }

    #[test]
    fn all_set_fields_must_match() {
        let f = ScopeFilter {
            province_id: Some(1),
            service_id: Some(6),
            ..Default::default()
        };
        assert!(!f.matches(&scope()));

        let f = ScopeFilter {
            province_id: Some(1),
            district_id: Some(2),
            ..Default::default()
        };
        assert!(f.matches(&scope()));
    }
}
