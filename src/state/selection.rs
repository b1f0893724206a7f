use serde::{Deserialize, Serialize};

use crate::data::attribute::Attribute;
use crate::data::observation::Observation;

/// What the plot currently shows. Only changed through [`SelectionChange`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    pub x: Attribute,
    pub y: Attribute,
    pub state: String,
    /// `None` plots every year.
    pub year: Option<i32>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            x: Attribute::TempMin,
            y: Attribute::TempMax,
            state: "MD".to_string(),
            year: None,
        }
    }
}

/// A change coming from one of the selector controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    X(Attribute),
    Y(Attribute),
    State(String),
    Year(Option<i32>),
}

impl Selection {
    /// Apply a control change. Returns whether anything actually changed.
    pub fn apply(&mut self, change: SelectionChange) -> bool {
        match change {
            SelectionChange::X(attr) => replace_if_different(&mut self.x, attr),
            SelectionChange::Y(attr) => replace_if_different(&mut self.y, attr),
            SelectionChange::State(state) => replace_if_different(&mut self.state, state),
            SelectionChange::Year(year) => replace_if_different(&mut self.year, year),
        }
    }

    /// The row predicate for this selection: matching state, both plotted
    /// attributes present (finite), and the selected year if there is one.
    pub fn matches(&self, obs: &Observation) -> bool {
        obs.state == self.state
            && self.x.value_of(obs).is_finite()
            && self.y.value_of(obs).is_finite()
            && self.year.map_or(true, |year| obs.year == Some(year))
    }
}

fn replace_if_different<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(state: &str, tmin: f64, tmax: f64) -> Observation {
        let mut obs = Observation::blank("S1", state).with_date(Some(20170101));
        obs.temp_min = tmin;
        obs.temp_max = tmax;
        obs.snow = 0.0;
        obs
    }

    #[test]
    fn default_selection() {
        let sel = Selection::default();
        assert_eq!(sel.x, Attribute::TempMin);
        assert_eq!(sel.y, Attribute::TempMax);
        assert_eq!(sel.state, "MD");
        assert_eq!(sel.year, None);
    }

    #[test]
    fn apply_reports_changes_only() {
        let mut sel = Selection::default();
        assert!(!sel.apply(SelectionChange::X(Attribute::TempMin)));
        assert!(sel.apply(SelectionChange::X(Attribute::Snow)));
        assert_eq!(sel.x, Attribute::Snow);
        assert!(sel.apply(SelectionChange::State("VA".into())));
        assert_eq!(sel.state, "VA");
        assert!(sel.apply(SelectionChange::Year(Some(2017))));
        assert!(!sel.apply(SelectionChange::Year(Some(2017))));
    }

    #[test]
    fn row_with_both_attributes_in_state_matches() {
        let sel = Selection::default();
        assert!(sel.matches(&row("MD", 20.0, 45.0)));
        assert!(!sel.matches(&row("VA", 20.0, 45.0)));
    }

    #[test]
    fn missing_y_value_excludes_row_only_for_that_attribute() {
        let obs = row("MD", 20.0, f64::NAN);
        let mut sel = Selection::default();
        assert!(!sel.matches(&obs));
        sel.apply(SelectionChange::Y(Attribute::Snow));
        assert!(sel.matches(&obs));
    }

    #[test]
    fn infinite_value_excludes_row() {
        let sel = Selection::default();
        assert!(!sel.matches(&row("MD", f64::INFINITY, 45.0)));
        assert!(!sel.matches(&row("MD", 20.0, f64::NEG_INFINITY)));
    }

    #[test]
    fn year_filter_is_a_real_predicate() {
        let obs = row("MD", 20.0, 45.0);
        let mut sel = Selection::default();
        sel.apply(SelectionChange::Year(Some(2017)));
        assert!(sel.matches(&obs));
        sel.apply(SelectionChange::Year(Some(2018)));
        assert!(!sel.matches(&obs));
    }
}
