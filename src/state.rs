use std::sync::Arc;

use crate::data::aggregate::{
    count_by_generation, count_by_profession, count_by_profession_and_gender,
    count_by_province_and_gender, income_histogram, income_spending_points, province_map_points,
    CountTable, HistogramBin, MapPoint, ProfessionGender, ScatterPoint, INCOME_BINS,
};
use crate::data::filter::FilterPredicate;
use crate::data::model::{AgeRange, CustomerDataset, DashboardData};
use crate::error::ControlError;

/// Age range selected before the user touches the slider.
pub const DEFAULT_AGE_RANGE: AgeRange = AgeRange { min: 20, max: 50 };

// ---------------------------------------------------------------------------
// Control state: the two interactive inputs
// ---------------------------------------------------------------------------

/// Current values of the profession selector and the age-range slider.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    selected_profession: String,
    age_range: AgeRange,
    /// Sorted distinct professions of the dataset; the selector's options.
    professions: Vec<String>,
    /// `[min(age), max(age)]` of the dataset; the slider's limits.
    age_bounds: Option<AgeRange>,
}

impl ControlState {
    /// Defaults: first profession in sorted order, `[20, 50]` clamped to
    /// the dataset's age bounds.
    pub fn new(dataset: &CustomerDataset) -> Self {
        let age_bounds = dataset.age_bounds();
        let age_range = match age_bounds {
            Some(bounds) => DEFAULT_AGE_RANGE.clamp_to(bounds),
            None => DEFAULT_AGE_RANGE,
        };
        ControlState {
            selected_profession: dataset.professions().first().cloned().unwrap_or_default(),
            age_range,
            professions: dataset.professions().to_vec(),
            age_bounds,
        }
    }

    pub fn selected_profession(&self) -> &str {
        &self.selected_profession
    }

    pub fn age_range(&self) -> AgeRange {
        self.age_range
    }

    pub fn professions(&self) -> &[String] {
        &self.professions
    }

    pub fn age_bounds(&self) -> Option<AgeRange> {
        self.age_bounds
    }

    pub fn set_profession(&mut self, profession: &str) -> Result<(), ControlError> {
        if !self.professions.iter().any(|p| p == profession) {
            return Err(ControlError::UnknownProfession(profession.to_string()));
        }
        self.selected_profession = profession.to_string();
        Ok(())
    }

    pub fn set_age_range(&mut self, min: i64, max: i64) -> Result<(), ControlError> {
        self.age_range = AgeRange::new(min, max)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Chart tables
// ---------------------------------------------------------------------------

/// Every table the dashboard draws.
#[derive(Debug, Clone, Default)]
pub struct Charts {
    /// Customers per profession, whole dataset.
    pub professions: CountTable<String>,
    /// Province bubbles, whole dataset.
    pub province_map: Vec<MapPoint>,
    /// Customers per generation within the selected profession.
    pub generations: CountTable<String>,
    /// (profession, gender) counts within the selected age range.
    pub gender_by_profession: CountTable<ProfessionGender>,
    pub income_spending: Vec<ScatterPoint>,
    pub income_histogram: Vec<HistogramBin>,
}

// ---------------------------------------------------------------------------
// Dashboard state: one per session
// ---------------------------------------------------------------------------

/// Session state: shared read-only data, this session's controls, and the
/// chart tables derived from them.
pub struct DashboardState {
    data: Arc<DashboardData>,
    controls: ControlState,
    charts: Charts,
    /// Message for the last rejected control change, cleared on success.
    pub status_message: Option<String>,
}

impl DashboardState {
    pub fn new(data: Arc<DashboardData>) -> Self {
        let controls = ControlState::new(&data.customers);
        let mut state = DashboardState {
            data,
            controls,
            charts: Charts::default(),
            status_message: None,
        };
        state.compute_static_charts();
        state.recompute_generations();
        state.recompute_gender_by_profession();
        state
    }

    pub fn data(&self) -> &DashboardData {
        &self.data
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn charts(&self) -> &Charts {
        &self.charts
    }

    /// Select a profession and refresh the generation chart.
    ///
    /// On error the previous selection and chart stay in place.
    pub fn set_profession(&mut self, profession: &str) -> Result<(), ControlError> {
        let result = self.controls.set_profession(profession);
        self.settle(&result);
        if result.is_ok() {
            self.recompute_generations();
        }
        result
    }

    /// Select an age range and refresh the profession/gender chart.
    ///
    /// On error the previous range and chart stay in place.
    pub fn set_age_range(&mut self, min: i64, max: i64) -> Result<(), ControlError> {
        let result = self.controls.set_age_range(min, max);
        self.settle(&result);
        if result.is_ok() {
            self.recompute_gender_by_profession();
        }
        result
    }

    fn settle(&mut self, result: &Result<(), ControlError>) {
        match result {
            Ok(()) => self.status_message = None,
            Err(e) => {
                log::warn!("Rejected control change: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    fn compute_static_charts(&mut self) {
        let all = self.data.customers.view();
        let provinces = count_by_province_and_gender(&all);

        self.charts.professions = count_by_profession(&all);
        self.charts.province_map = province_map_points(&provinces, &self.data.coordinates);
        self.charts.income_spending = income_spending_points(&all);
        self.charts.income_histogram = income_histogram(&all, INCOME_BINS);
    }

    fn recompute_generations(&mut self) {
        let profession = self.controls.selected_profession();
        let view = FilterPredicate::profession(profession).apply(self.data.customers.records());
        self.charts.generations = count_by_generation(&view);
        log::debug!(
            "Generation chart for '{profession}': {} customers in {} generations",
            view.len(),
            self.charts.generations.len()
        );
    }

    fn recompute_gender_by_profession(&mut self) {
        let range = self.controls.age_range();
        let view = FilterPredicate::age(range).apply(self.data.customers.records());
        self.charts.gender_by_profession = count_by_profession_and_gender(&view);
        log::debug!(
            "Gender chart for ages {range}: {} customers in {} rows",
            view.len(),
            self.charts.gender_by_profession.len()
        );
    }
}
