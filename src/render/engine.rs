//! The render cycle: filter, rescale, rebuild axes, reconcile marks by key and
//! start their transitions.
//!
//! The engine keeps the previous frame's marks between renders. Painting code
//! samples [`RenderEngine::marks_at`] every frame; nothing here touches the UI.

use std::collections::{BTreeMap, HashSet};

use egui::Pos2;

use crate::config::PlotConfig;
use crate::data::loader::Dataset;
use crate::data::observation::ObservationKey;
use crate::processing::kd_tree::HoverTree;
use crate::render::axis::{Axis, AxisSide};
use crate::render::color::FillRule;
use crate::render::scale::LinearScale;
use crate::render::transition::{MarkVisual, Transition};
use crate::state::selection::Selection;

/// Where a mark is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkPhase {
    Entering,
    Updating,
    /// Shrinking to radius 0; detached once the transition ends.
    Exiting,
}

#[derive(Debug, Clone)]
pub struct Mark {
    pub key: ObservationKey,
    /// Index of the observation in the dataset.
    pub row: usize,
    pub phase: MarkPhase,
    pub transition: Transition,
}

impl Mark {
    pub fn is_live(&self) -> bool {
        self.phase != MarkPhase::Exiting
    }
}

/// A mark resolved at one instant, ready to paint.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkSample {
    pub row: usize,
    pub phase: MarkPhase,
    pub visual: MarkVisual,
}

/// What one render changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
    /// Rows of the selected state skipped because an axis value was missing.
    pub dropped: usize,
}

/// Scales and axes of the current frame. Replaced on every render.
#[derive(Debug, Clone)]
pub struct Frame {
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
    pub x_axis: Axis,
    pub y_axis: Axis,
}

impl Frame {
    fn build(x_scale: LinearScale, y_scale: LinearScale, selection: &Selection) -> Self {
        Self {
            x_axis: Axis::build(AxisSide::Bottom, &x_scale, selection.x.label()),
            y_axis: Axis::build(AxisSide::Left, &y_scale, selection.y.label()),
            x_scale,
            y_scale,
        }
    }
}

pub struct RenderEngine {
    width: f64,
    height: f64,
    radius: f32,
    duration: f64,
    fill: Box<dyn FillRule>,
    marks: BTreeMap<ObservationKey, Mark>,
    frame: Frame,
    hover: Option<HoverTree>,
    /// Keys of the marks in `hover`, by tree item index.
    hover_keys: Vec<ObservationKey>,
}

impl RenderEngine {
    pub fn new(config: &PlotConfig, fill: Box<dyn FillRule>) -> Self {
        let width = config.inner_width() as f64;
        let height = config.inner_height() as f64;
        let empty_x = LinearScale::zero_anchored(std::iter::empty(), (0.0, width));
        let empty_y = LinearScale::zero_anchored(std::iter::empty(), (height, 0.0));
        Self {
            width,
            height,
            radius: config.mark_radius,
            duration: config.transition_secs(),
            fill,
            marks: BTreeMap::new(),
            frame: Frame::build(empty_x, empty_y, &config.default_selection),
            hover: None,
            hover_keys: Vec::new(),
        }
    }

    /// Swap the fill rule. Takes effect on the next render.
    pub fn set_fill(&mut self, fill: Box<dyn FillRule>) {
        self.fill = fill;
    }

    /// Forget every mark, e.g. after the dataset was replaced.
    pub fn reset(&mut self) {
        self.marks.clear();
        self.hover = None;
        self.hover_keys.clear();
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Marks that are entering or updating (exiting ones excluded).
    pub fn live_count(&self) -> usize {
        self.marks.values().filter(|m| m.is_live()).count()
    }

    /// Run one render at time `now` (seconds).
    ///
    /// Marks in flight are restarted from wherever they currently are, so a
    /// quick succession of renders never makes a mark jump.
    pub fn render(&mut self, dataset: &Dataset, selection: &Selection, now: f64) -> RenderReport {
        let mut report = RenderReport::default();

        // Filter.
        let mut rows = Vec::new();
        for (i, obs) in dataset.observations.iter().enumerate() {
            if selection.matches(obs) {
                rows.push(i);
            } else if obs.state == selection.state
                && selection.year.map_or(true, |y| obs.year == Some(y))
            {
                report.dropped += 1;
            }
        }

        // Rescale and rebuild axes.
        let obs_at = |i: usize| &dataset.observations[i];
        let x_scale = LinearScale::zero_anchored(
            rows.iter().map(|&i| selection.x.value_of(obs_at(i))),
            (0.0, self.width),
        );
        let y_scale = LinearScale::zero_anchored(
            rows.iter().map(|&i| selection.y.value_of(obs_at(i))),
            (self.height, 0.0),
        );
        self.frame = Frame::build(x_scale, y_scale, selection);

        // Reconcile.
        let mut seen: HashSet<ObservationKey> = HashSet::with_capacity(rows.len());
        for &row in &rows {
            let obs = obs_at(row);
            let target = MarkVisual {
                center: Pos2::new(
                    x_scale.map(selection.x.value_of(obs)) as f32,
                    y_scale.map(selection.y.value_of(obs)) as f32,
                ),
                radius: self.radius,
                fill: self.fill.fill(obs),
            };
            seen.insert(obs.key.clone());

            match self.marks.get_mut(&obs.key) {
                Some(mark) => {
                    let current = mark.transition.sample(now);
                    mark.transition = Transition::new(current, target, now, self.duration);
                    mark.phase = MarkPhase::Updating;
                    mark.row = row;
                    report.updated += 1;
                }
                None => {
                    let start = MarkVisual {
                        radius: 0.0,
                        ..target
                    };
                    self.marks.insert(
                        obs.key.clone(),
                        Mark {
                            key: obs.key.clone(),
                            row,
                            phase: MarkPhase::Entering,
                            transition: Transition::new(start, target, now, self.duration),
                        },
                    );
                    report.entered += 1;
                }
            }
        }

        for mark in self.marks.values_mut() {
            if seen.contains(&mark.key) || !mark.is_live() {
                continue;
            }
            let current = mark.transition.sample(now);
            let gone = MarkVisual {
                radius: 0.0,
                ..current
            };
            mark.transition = Transition::new(current, gone, now, self.duration);
            mark.phase = MarkPhase::Exiting;
            report.exited += 1;
        }

        self.rebuild_hover_index();

        tracing::debug!(
            entered = report.entered,
            updated = report.updated,
            exited = report.exited,
            dropped = report.dropped,
            "render {} vs {} in {}",
            selection.x.key(),
            selection.y.key(),
            selection.state
        );
        report
    }

    /// Detach exiting marks whose transition has ended.
    pub fn prune(&mut self, now: f64) {
        self.marks
            .retain(|_, m| m.is_live() || !m.transition.is_finished(now));
    }

    /// Whether any transition is still running at `now`.
    pub fn is_animating(&self, now: f64) -> bool {
        self.marks.values().any(|m| !m.transition.is_finished(now))
    }

    /// Every attached mark sampled at `now`.
    pub fn marks_at(&self, now: f64) -> Vec<MarkSample> {
        self.marks
            .values()
            .map(|m| MarkSample {
                row: m.row,
                phase: m.phase,
                visual: m.transition.sample(now),
            })
            .collect()
    }

    /// Dataset row of the live mark under `pos` (plot-local pixels), if any.
    pub fn hit_test(&self, pos: Pos2) -> Option<usize> {
        let tree = self.hover.as_ref()?;
        let idx = tree.nearest_within(pos.x as f64, pos.y as f64, self.radius as f64)?;
        let key = self.hover_keys.get(idx)?;
        self.marks.get(key).filter(|m| m.is_live()).map(|m| m.row)
    }

    fn rebuild_hover_index(&mut self) {
        let (keys, points): (Vec<_>, Vec<_>) = self
            .marks
            .values()
            .filter(|m| m.is_live())
            .map(|m| {
                let c = m.transition.to.center;
                (m.key.clone(), [c.x as f64, c.y as f64])
            })
            .unzip();
        self.hover = HoverTree::build(&points);
        self.hover_keys = keys;
    }
}

impl std::fmt::Debug for RenderEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderEngine")
            .field("marks", &self.marks.len())
            .field("frame", &self.frame)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::attribute::Attribute;
    use crate::data::observation::Observation;
    use crate::render::color::{ConstantFill, TemperatureBands, TEMPERATURE_COLORS};
    use crate::state::selection::SelectionChange;

    const SETTLED: f64 = 100.0;

    fn row(station: &str, state: &str, date: i64, tmin: f64, tmax: f64, tavg: f64) -> Observation {
        let mut obs = Observation::blank(station, state).with_date(Some(date));
        obs.temp_min = tmin;
        obs.temp_max = tmax;
        obs.temp_avg = tavg;
        obs.snow = 1.0;
        obs
    }

    fn dataset() -> Dataset {
        Dataset::new(vec![
            row("S1", "MD", 20170101, 20.0, 45.0, 30.0),
            row("S2", "MD", 20170101, 10.0, 40.0, 60.0),
            row("S3", "MD", 20170101, 15.0, f64::NAN, 25.0),
            row("S4", "VA", 20170101, 30.0, 80.0, 90.0),
        ])
    }

    fn engine() -> RenderEngine {
        RenderEngine::new(&PlotConfig::default(), Box::new(ConstantFill::default()))
    }

    #[test]
    fn marks_match_filter_exactly() {
        let ds = dataset();
        let mut eng = engine();
        let report = eng.render(&ds, &Selection::default(), 0.0);
        assert_eq!(report.entered, 2);
        assert_eq!(report.dropped, 1);
        let mut rows: Vec<usize> = eng.marks_at(SETTLED).iter().map(|m| m.row).collect();
        rows.sort();
        assert_eq!(rows, vec![0, 1]);
    }

    #[test]
    fn example_row_lands_at_scaled_coordinates() {
        let ds = Dataset::new(vec![row("S1", "MD", 20170101, 20.0, 45.0, 30.0)]);
        let mut eng = engine();
        eng.render(&ds, &Selection::default(), 0.0);
        let frame = eng.frame();
        assert_eq!(frame.x_scale.domain(), (0.0, 20.0));
        assert_eq!(frame.y_scale.domain(), (0.0, 45.0));
        let m = &eng.marks_at(SETTLED)[0];
        assert_eq!(m.visual.center, Pos2::new(640.0, 0.0));
        assert_eq!(m.visual.radius, 5.0);
    }

    #[test]
    fn domains_are_zero_anchored_and_reach_max() {
        let ds = dataset();
        let mut eng = engine();
        eng.render(&ds, &Selection::default(), 0.0);
        assert_eq!(eng.frame().x_scale.domain(), (0.0, 20.0));
        assert_eq!(eng.frame().y_scale.domain(), (0.0, 45.0));
    }

    #[test]
    fn infinite_cells_never_reach_the_canvas() {
        let text = "station,state,latitude,longitude,elevation,date,TMIN,TMAX,TAVG,AWND,SNOW,PRCP\n\
                    S1,MD,1,2,3,20170101,20,45,30,4,5,6\n\
                    S2,MD,1,2,3,20170101,inf,1e400,30,4,5,6\n";
        let ds = crate::data::loader::load_from_reader(text.as_bytes()).unwrap();
        let mut eng = engine();
        let report = eng.render(&ds, &Selection::default(), 0.0);
        assert_eq!(report.entered, 1);
        assert_eq!(report.dropped, 1);
        assert_eq!(eng.frame().x_scale.domain(), (0.0, 20.0));
        assert_eq!(eng.frame().y_scale.domain(), (0.0, 45.0));
        for m in eng.marks_at(SETTLED) {
            assert!(m.visual.center.x.is_finite() && m.visual.center.y.is_finite());
        }
    }

    #[test]
    fn entering_marks_grow_in_place() {
        let ds = dataset();
        let mut eng = engine();
        eng.render(&ds, &Selection::default(), 0.0);
        let start = eng.marks_at(0.0);
        let settled = eng.marks_at(SETTLED);
        for (s, e) in start.iter().zip(settled.iter()) {
            assert_eq!(s.phase, MarkPhase::Entering);
            assert_eq!(s.visual.radius, 0.0);
            assert_eq!(s.visual.center, e.visual.center);
        }
        assert!(eng.is_animating(0.1));
        assert!(!eng.is_animating(SETTLED));
    }

    #[test]
    fn rerender_with_same_selection_is_idempotent() {
        let ds = dataset();
        let mut eng = engine();
        let sel = Selection::default();
        eng.render(&ds, &sel, 0.0);
        let before = eng.marks_at(SETTLED);
        let report = eng.render(&ds, &sel, SETTLED);
        assert_eq!(report.entered, 0);
        assert_eq!(report.exited, 0);
        assert_eq!(report.updated, 2);
        let after = eng.marks_at(SETTLED * 2.0);
        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(after.iter()) {
            assert_eq!(b.visual, a.visual);
        }
    }

    #[test]
    fn empty_state_yields_no_marks_and_degenerate_axes() {
        let ds = dataset();
        let mut eng = engine();
        let mut sel = Selection::default();
        eng.render(&ds, &sel, 0.0);
        sel.apply(SelectionChange::State("WY".into()));
        let report = eng.render(&ds, &sel, SETTLED);
        assert_eq!(report.exited, 2);
        assert_eq!(eng.live_count(), 0);
        assert_eq!(eng.frame().x_scale.domain(), (0.0, 0.0));
        assert_eq!(eng.frame().y_scale.domain(), (0.0, 0.0));

        // Exiting marks shrink, then detach.
        assert_eq!(eng.marks_at(SETTLED).len(), 2);
        assert!(eng.marks_at(SETTLED * 2.0).iter().all(|m| m.visual.radius == 0.0));
        eng.prune(SETTLED * 2.0);
        assert!(eng.marks_at(SETTLED * 2.0).is_empty());
    }

    #[test]
    fn missing_attribute_is_excluded_then_included() {
        let ds = dataset();
        let mut eng = engine();
        let mut sel = Selection::default();
        eng.render(&ds, &sel, 0.0);
        assert_eq!(eng.live_count(), 2);
        sel.apply(SelectionChange::Y(Attribute::Snow));
        let report = eng.render(&ds, &sel, SETTLED);
        assert_eq!(report.entered, 1);
        assert_eq!(report.updated, 2);
        assert_eq!(eng.live_count(), 3);
    }

    #[test]
    fn stable_keys_survive_a_rebuilt_dataset() {
        let mut eng = engine();
        let sel = Selection::default();
        eng.render(&dataset(), &sel, 0.0);
        let report = eng.render(&dataset(), &sel, SETTLED);
        assert_eq!(report.entered, 0);
        assert_eq!(report.updated, 2);
    }

    #[test]
    fn temperature_change_only_recolors() {
        let mut eng = RenderEngine::new(&PlotConfig::default(), Box::new(TemperatureBands));
        let sel = Selection::default();
        let mut ds = dataset();
        eng.render(&ds, &sel, 0.0);
        let before = eng.marks_at(SETTLED);
        assert_eq!(before[0].visual.fill, TEMPERATURE_COLORS[0]);

        ds.observations[0].temp_avg = 95.0;
        eng.render(&ds, &sel, SETTLED);
        let after = eng.marks_at(SETTLED * 2.0);
        assert_eq!(after[0].visual.center, before[0].visual.center);
        assert_eq!(after[0].visual.radius, before[0].visual.radius);
        assert_eq!(after[0].visual.fill, TEMPERATURE_COLORS[4]);
        assert_eq!(after[1].visual, before[1].visual);
    }

    #[test]
    fn interrupted_transition_restarts_from_current_state() {
        let ds = dataset();
        let mut eng = engine();
        let mut sel = Selection::default();
        eng.render(&ds, &sel, 0.0);
        let duration = PlotConfig::default().transition_secs();
        let mid = duration / 2.0;
        let halfway = eng.marks_at(mid);
        sel.apply(SelectionChange::X(Attribute::Snow));
        eng.render(&ds, &sel, mid);
        let restarted = eng.marks_at(mid);
        for (h, r) in halfway.iter().zip(restarted.iter()) {
            assert_eq!(h.visual, r.visual);
        }
    }

    #[test]
    fn exiting_mark_is_revived_when_it_returns() {
        let ds = dataset();
        let mut eng = engine();
        let mut sel = Selection::default();
        eng.render(&ds, &sel, 0.0);
        sel.apply(SelectionChange::State("VA".into()));
        eng.render(&ds, &sel, SETTLED);
        sel.apply(SelectionChange::State("MD".into()));
        let report = eng.render(&ds, &sel, SETTLED + 0.01);
        assert_eq!(report.entered, 0);
        assert_eq!(report.updated, 2);
        assert_eq!(report.exited, 1);
    }

    #[test]
    fn hit_test_finds_live_mark() {
        let ds = Dataset::new(vec![row("S1", "MD", 20170101, 20.0, 45.0, 30.0)]);
        let mut eng = engine();
        eng.render(&ds, &Selection::default(), 0.0);
        assert_eq!(eng.hit_test(Pos2::new(638.0, 2.0)), Some(0));
        assert_eq!(eng.hit_test(Pos2::new(300.0, 300.0)), None);
    }
}
