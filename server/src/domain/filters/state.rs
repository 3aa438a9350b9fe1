//! Filter state controller
//!
//! Holds the in-progress filter selection for one client and hands a
//! complete, consistent `FilterState` to a listener on every accepted
//! change. A price edit that leaves `min > max` is shown (the visible state
//! updates) but is not committed: the listener is skipped and a validation
//! message is set until the range is valid again.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::search::criteria::{SearchParams, normalize_amenity};

/// Lower bound of the default price range
pub const DEFAULT_PRICE_MIN: f64 = 0.0;

/// Upper bound of the default price range
pub const DEFAULT_PRICE_MAX: f64 = 50.0;

/// Which end of the price range an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBound {
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    #[default]
    All,
    Available,
    Unavailable,
}

impl Availability {
    /// Transport value; `None` means "don't filter"
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Available => Some("true"),
            Self::Unavailable => Some("false"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_PRICE_MIN,
            max: DEFAULT_PRICE_MAX,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub price_range: PriceRange,
    pub features: BTreeSet<String>,
    pub availability: Availability,
}

impl FilterState {
    /// Number of non-price filters in effect
    pub fn active_filter_count(&self) -> usize {
        self.features.len() + usize::from(self.availability != Availability::All)
    }

    /// Render as the query parameters the search endpoint accepts
    pub fn to_query_params(&self) -> SearchParams {
        let amenities = (!self.features.is_empty())
            .then(|| self.features.iter().cloned().collect::<Vec<_>>().join(","));

        SearchParams {
            min_price: Some(self.price_range.min.to_string()),
            max_price: Some(self.price_range.max.to_string()),
            amenities,
            available: self.availability.as_param().map(str::to_string),
            ..SearchParams::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Invalid,
}

/// Owns the visible filter state and the last committed one
pub struct FilterController<F>
where
    F: FnMut(&FilterState),
{
    visible: FilterState,
    committed_price: PriceRange,
    error: Option<String>,
    on_change: F,
}

impl<F> FilterController<F>
where
    F: FnMut(&FilterState),
{
    /// Start from `initial`. An initial state with an inverted price range
    /// begins `Invalid`, with the default range as its committed range.
    pub fn new(initial: FilterState, on_change: F) -> Self {
        let (committed_price, error) = if initial.price_range.is_ordered() {
            (initial.price_range, None)
        } else {
            (PriceRange::default(), Some(price_error(initial.price_range)))
        };

        Self {
            visible: initial,
            committed_price,
            error,
            on_change,
        }
    }

    /// Start from the default state
    pub fn with_defaults(on_change: F) -> Self {
        Self::new(FilterState::default(), on_change)
    }

    /// State as currently displayed (may hold an uncommitted price range)
    pub fn state(&self) -> &FilterState {
        &self.visible
    }

    /// State as last delivered to the listener
    pub fn committed(&self) -> FilterState {
        FilterState {
            price_range: self.committed_price,
            ..self.visible.clone()
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn validity(&self) -> Validity {
        if self.error.is_some() {
            Validity::Invalid
        } else {
            Validity::Valid
        }
    }

    pub fn set_price_bound(&mut self, which: PriceBound, value: f64) {
        match which {
            PriceBound::Min => self.visible.price_range.min = value,
            PriceBound::Max => self.visible.price_range.max = value,
        }

        if !self.visible.price_range.is_ordered() {
            tracing::trace!(
                min = self.visible.price_range.min,
                max = self.visible.price_range.max,
                "Price range rejected"
            );
            self.error = Some(price_error(self.visible.price_range));
            return;
        }

        self.error = None;
        self.committed_price = self.visible.price_range;
        self.notify();
    }

    /// Flip membership of `feature`. Always notifies; a blank feature leaves
    /// the set unchanged.
    pub fn toggle_feature(&mut self, feature: &str) {
        let feature = normalize_amenity(feature);
        if !feature.is_empty() && !self.visible.features.remove(&feature) {
            self.visible.features.insert(feature);
        }
        self.notify();
    }

    /// Replace availability. Always notifies.
    pub fn set_availability(&mut self, availability: Availability) {
        self.visible.availability = availability;
        self.notify();
    }

    /// Restore defaults, clear any error, notify
    pub fn reset(&mut self) {
        self.visible = FilterState::default();
        self.committed_price = self.visible.price_range;
        self.error = None;
        self.notify();
    }

    pub fn active_filter_count(&self) -> usize {
        self.visible.active_filter_count()
    }

    /// Query parameters for the committed state
    pub fn to_query_params(&self) -> SearchParams {
        self.committed().to_query_params()
    }

    fn notify(&mut self) {
        let state = self.committed();
        (self.on_change)(&state);
    }
}

fn price_error(range: PriceRange) -> String {
    format!(
        "Minimum price ({}) cannot be greater than maximum price ({})",
        range.min, range.max
    )
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::domain::search::criteria::{SearchCriteria, SearchLimits};

    type Calls = Rc<RefCell<Vec<FilterState>>>;

    fn controller() -> (FilterController<impl FnMut(&FilterState)>, Calls) {
        let calls: Calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let ctrl = FilterController::with_defaults(move |s: &FilterState| {
            sink.borrow_mut().push(s.clone())
        });
        (ctrl, calls)
    }

    fn features(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_valid_min_edit_notifies_full_state() {
        let (mut ctrl, calls) = controller();
        ctrl.set_price_bound(PriceBound::Min, 10.0);

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            FilterState {
                price_range: PriceRange {
                    min: 10.0,
                    max: 50.0
                },
                features: BTreeSet::new(),
                availability: Availability::All,
            }
        );
        assert_eq!(ctrl.validity(), Validity::Valid);
    }

    #[test]
    fn test_inverted_range_is_not_committed_until_reset() {
        let (mut ctrl, calls) = controller();
        ctrl.set_price_bound(PriceBound::Min, 60.0);

        assert!(calls.borrow().is_empty());
        assert_eq!(ctrl.validity(), Validity::Invalid);
        assert!(ctrl.error().is_some());
        assert_eq!(ctrl.state().price_range.min, 60.0);

        ctrl.reset();
        assert_eq!(calls.borrow().len(), 1);
        assert_eq!(calls.borrow()[0], FilterState::default());
        assert!(ctrl.error().is_none());
        assert_eq!(ctrl.validity(), Validity::Valid);
    }

    #[test]
    fn test_restoring_order_leaves_invalid() {
        let (mut ctrl, calls) = controller();
        ctrl.set_price_bound(PriceBound::Min, 60.0);
        ctrl.set_price_bound(PriceBound::Max, 80.0);

        assert_eq!(ctrl.validity(), Validity::Valid);
        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].price_range,
            PriceRange {
                min: 60.0,
                max: 80.0
            }
        );
    }

    #[test]
    fn test_equal_bounds_are_valid() {
        let (mut ctrl, calls) = controller();
        ctrl.set_price_bound(PriceBound::Min, 50.0);
        assert_eq!(ctrl.validity(), Validity::Valid);
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_toggle_while_invalid_carries_committed_range() {
        let (mut ctrl, calls) = controller();
        ctrl.set_price_bound(PriceBound::Max, 5.0);
        ctrl.set_price_bound(PriceBound::Min, 20.0);
        ctrl.toggle_feature("covered");

        assert_eq!(ctrl.validity(), Validity::Invalid);
        let calls = calls.borrow();
        let last = calls.last().unwrap();
        assert_eq!(last.price_range, PriceRange { min: 0.0, max: 5.0 });
        assert!(last.price_range.is_ordered());
        assert_eq!(last.features, features(&["covered"]));
    }

    #[test]
    fn test_toggle_twice_round_trips() {
        let (mut ctrl, calls) = controller();
        ctrl.toggle_feature("ev_charging");
        ctrl.toggle_feature("EV_Charging ");

        assert!(ctrl.state().features.is_empty());
        assert_eq!(calls.borrow().len(), 2);
    }

    #[test]
    fn test_blank_feature_is_not_counted() {
        let (mut ctrl, calls) = controller();
        ctrl.toggle_feature("   ");
        ctrl.toggle_feature("");

        assert!(ctrl.state().features.is_empty());
        assert_eq!(ctrl.active_filter_count(), 0);
        assert_eq!(ctrl.to_query_params().amenities, None);

        let calls = calls.borrow();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|s| *s == FilterState::default()));
    }

    #[test]
    fn test_availability_always_notifies() {
        let (mut ctrl, calls) = controller();
        ctrl.set_availability(Availability::Available);
        ctrl.set_availability(Availability::Available);
        assert_eq!(calls.borrow().len(), 2);
        assert_eq!(calls.borrow()[1].availability, Availability::Available);
    }

    #[test]
    fn test_active_filter_count_is_features_plus_availability() {
        let (mut ctrl, _calls) = controller();
        ctrl.set_price_bound(PriceBound::Min, 30.0);
        assert_eq!(ctrl.active_filter_count(), 0);

        ctrl.toggle_feature("covered");
        ctrl.toggle_feature("security");
        ctrl.set_availability(Availability::Available);
        assert_eq!(ctrl.active_filter_count(), 3);

        // Two features plus a non-"all" availability count as three
        let state = FilterState {
            features: features(&["covered", "security"]),
            availability: Availability::Available,
            ..FilterState::default()
        };
        assert_eq!(state.active_filter_count(), 3);
        assert_eq!(
            FilterState {
                features: features(&["covered"]),
                availability: Availability::Unavailable,
                ..FilterState::default()
            }
            .active_filter_count(),
            2
        );
    }

    #[test]
    fn test_invalid_initial_state_starts_invalid() {
        let initial = FilterState {
            price_range: PriceRange {
                min: 40.0,
                max: 10.0,
            },
            ..FilterState::default()
        };
        let ctrl = FilterController::new(initial, |_: &FilterState| {});
        assert_eq!(ctrl.validity(), Validity::Invalid);
        assert_eq!(ctrl.committed().price_range, PriceRange::default());
    }

    #[test]
    fn test_query_params_feed_the_search_criteria() {
        let (mut ctrl, _calls) = controller();
        ctrl.set_price_bound(PriceBound::Min, 5.0);
        ctrl.set_price_bound(PriceBound::Max, 15.0);
        ctrl.toggle_feature("security");
        ctrl.toggle_feature("covered");
        ctrl.set_availability(Availability::Unavailable);

        let params = ctrl.to_query_params();
        assert_eq!(params.amenities.as_deref(), Some("covered,security"));
        assert_eq!(params.available.as_deref(), Some("false"));

        let criteria = SearchCriteria::from_params(&params, SearchLimits::default()).unwrap();
        assert_eq!(criteria.price_min, Some(5.0));
        assert_eq!(criteria.price_max, Some(15.0));
        assert_eq!(criteria.amenities, features(&["covered", "security"]));
        assert_eq!(criteria.available, Some(false));
    }

    #[test]
    fn test_default_state_serializes_camel_case() {
        let json = serde_json::to_value(FilterState::default()).unwrap();
        assert_eq!(json["priceRange"]["min"], 0.0);
        assert_eq!(json["priceRange"]["max"], 50.0);
        assert_eq!(json["availability"], "all");
    }
}
