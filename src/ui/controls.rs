use crate::data::attribute::Attribute;
use crate::data::loader::Dataset;
use crate::state::selection::{Selection, SelectionChange};

/// Options the selectors offer, derived once per loaded dataset.
#[derive(Debug, Clone, Default)]
pub struct ControlOptions {
    pub states: Vec<String>,
    pub years: Option<(i32, i32)>,
}

impl ControlOptions {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            states: dataset.states(),
            years: dataset.year_range(),
        }
    }

    /// State options, always including the current selection so the selector
    /// never shows a value it cannot list.
    pub fn state_options(&self, current: &str) -> Vec<String> {
        let mut states = self.states.clone();
        if !states.iter().any(|s| s == current) {
            states.push(current.to_string());
            states.sort();
        }
        states
    }
}

/// Widget-side memory for the year slider, so unticking "All years" returns
/// to the last year the user looked at.
#[derive(Debug, Clone, Default)]
pub struct YearControl {
    pub last_year: Option<i32>,
}

/// Show the X/Y/state selectors and the year filter. The widgets display the
/// current selection; user edits come back as changes for the caller to apply.
pub fn show_controls(
    ui: &mut egui::Ui,
    selection: &Selection,
    options: &ControlOptions,
    year_control: &mut YearControl,
) -> Vec<SelectionChange> {
    let mut changes = Vec::new();

    ui.label(egui::RichText::new("X Axis").strong());
    if let Some(attr) = attribute_selector(ui, "x_attribute_selector", selection.x) {
        changes.push(SelectionChange::X(attr));
    }
    ui.add_space(8.0);

    ui.label(egui::RichText::new("Y Axis").strong());
    if let Some(attr) = attribute_selector(ui, "y_attribute_selector", selection.y) {
        changes.push(SelectionChange::Y(attr));
    }
    ui.add_space(8.0);

    ui.label(egui::RichText::new("State").strong());
    let mut state = selection.state.clone();
    egui::ComboBox::from_id_salt("state_filter_selector")
        .selected_text(&state)
        .width(220.0)
        .show_ui(ui, |ui| {
            for option in options.state_options(&selection.state) {
                let label = option.clone();
                ui.selectable_value(&mut state, option, label);
            }
        });
    if state != selection.state {
        changes.push(SelectionChange::State(state));
    }
    ui.add_space(8.0);

    ui.label(egui::RichText::new("Year").strong());
    match options.years {
        Some((first, last)) => {
            let mut all_years = selection.year.is_none();
            if ui.checkbox(&mut all_years, "All years").changed() {
                let year = if all_years {
                    None
                } else {
                    Some(year_control.last_year.unwrap_or(last).clamp(first, last))
                };
                changes.push(SelectionChange::Year(year));
            }
            if let Some(current) = selection.year {
                let mut year = current;
                ui.add(egui::Slider::new(&mut year, first..=last).step_by(1.0));
                if year != current {
                    changes.push(SelectionChange::Year(Some(year)));
                }
                year_control.last_year = Some(year);
            }
        }
        None => {
            ui.label(egui::RichText::new("No dated rows").weak());
        }
    }

    changes
}

/// Combo box over every attribute. Returns the new attribute if the user
/// picked a different one.
fn attribute_selector(ui: &mut egui::Ui, id: &str, current: Attribute) -> Option<Attribute> {
    let mut value = current;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.label())
        .width(220.0)
        .show_ui(ui, |ui| {
            for attr in Attribute::ALL {
                ui.selectable_value(&mut value, attr, attr.label());
            }
        });
    (value != current).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_state_is_always_offered() {
        let options = ControlOptions {
            states: vec!["MD".into(), "VA".into()],
            years: None,
        };
        assert_eq!(options.state_options("MD"), vec!["MD", "VA"]);
        assert_eq!(options.state_options("DE"), vec!["DE", "MD", "VA"]);
    }
}
