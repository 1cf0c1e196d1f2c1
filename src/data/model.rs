use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::filter::FilteredView;
use crate::error::ControlError;

// ---------------------------------------------------------------------------
// Gender
// ---------------------------------------------------------------------------

/// Customer gender as recorded in the source table.
///
/// Variants are declared alphabetically so that grouped tables list
/// `Female` before `Male`, the same column order a cross-tabulation gives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Female, Gender::Male];

    /// Parse a gender label, ignoring case and surrounding whitespace.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("male") {
            Some(Gender::Male)
        } else if label.eq_ignore_ascii_case("female") {
            Some(Gender::Female)
        } else {
            None
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Female => write!(f, "Female"),
            Gender::Male => write!(f, "Male"),
        }
    }
}

// ---------------------------------------------------------------------------
// CustomerRecord – one row of the customer table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRecord {
    pub profession: String,
    pub province: String,
    pub gender: Gender,
    pub age: i64,
    /// Birth-year bucket such as `Millennial` or `Boomer`.
    pub generation: String,
    pub annual_income: f64,
    pub spending_score: f64,
}

// ---------------------------------------------------------------------------
// ProvinceCoordinate – one row of the coordinate table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvinceCoordinate {
    pub province: String,
    pub latitude: f64,
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// AgeRange – inclusive [min, max]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeRange {
    pub min: i64,
    pub max: i64,
}

impl AgeRange {
    pub fn new(min: i64, max: i64) -> Result<Self, ControlError> {
        if min > max {
            return Err(ControlError::InvalidRange { min, max });
        }
        Ok(AgeRange { min, max })
    }

    pub fn contains(&self, age: i64) -> bool {
        self.min <= age && age <= self.max
    }

    /// Clamp both ends into `bounds`, keeping `min <= max`.
    pub fn clamp_to(&self, bounds: AgeRange) -> AgeRange {
        let min = self.min.clamp(bounds.min, bounds.max);
        let max = self.max.clamp(bounds.min, bounds.max);
        AgeRange { min, max: max.max(min) }
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.min, self.max)
    }
}

// ---------------------------------------------------------------------------
// CustomerDataset – the complete loaded customer table
// ---------------------------------------------------------------------------

/// The customer table with pre-computed column summaries.
#[derive(Debug, Clone)]
pub struct CustomerDataset {
    records: Vec<CustomerRecord>,
    /// Sorted distinct professions.
    professions: Vec<String>,
    /// `[min(age), max(age)]`, absent for an empty table.
    age_bounds: Option<AgeRange>,
}

impl CustomerDataset {
    pub fn from_records(records: Vec<CustomerRecord>) -> Self {
        let professions: BTreeSet<&str> = records.iter().map(|r| r.profession.as_str()).collect();
        let professions = professions.into_iter().map(str::to_string).collect();

        let age_bounds = records.iter().fold(None, |acc: Option<AgeRange>, r| {
            Some(match acc {
                None => AgeRange { min: r.age, max: r.age },
                Some(b) => AgeRange {
                    min: b.min.min(r.age),
                    max: b.max.max(r.age),
                },
            })
        });

        CustomerDataset {
            records,
            professions,
            age_bounds,
        }
    }

    pub fn records(&self) -> &[CustomerRecord] {
        &self.records
    }

    /// A view over every record.
    pub fn view(&self) -> FilteredView<'_> {
        self.records.iter().collect()
    }

    pub fn professions(&self) -> &[String] {
        &self.professions
    }

    pub fn has_profession(&self, profession: &str) -> bool {
        self.professions
            .binary_search_by(|p| p.as_str().cmp(profession))
            .is_ok()
    }

    pub fn age_bounds(&self) -> Option<AgeRange> {
        self.age_bounds
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// DashboardData – everything loaded at start-up
// ---------------------------------------------------------------------------

/// Immutable inputs shared by every dashboard session.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub customers: CustomerDataset,
    pub coordinates: Vec<ProvinceCoordinate>,
}


#[cfg(test)]
mod tests {
    use super::fixtures::sample_dataset;
    use super::*;

    #[test]
    fn gender_parse_is_case_insensitive() {
        assert_eq!(Gender::parse("Male"), Some(Gender::Male));
        assert_eq!(Gender::parse(" female "), Some(Gender::Female));
        assert_eq!(Gender::parse("unknown"), None);
    }

    #[test]
    fn dataset_summarises_professions_and_ages() {
        let ds = sample_dataset();
        assert_eq!(ds.professions(), ["Artist", "Doctor", "Engineer", "Lawyer"]);
        assert_eq!(ds.age_bounds(), Some(AgeRange { min: 17, max: 62 }));
        assert!(ds.has_profession("Doctor"));
        assert!(!ds.has_profession("doctor"));
    }

    #[test]
    fn empty_dataset_has_no_age_bounds() {
        let ds = CustomerDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.professions().is_empty());
        assert_eq!(ds.age_bounds(), None);
    }

    #[test]
    fn age_range_rejects_inverted_bounds() {
        assert_eq!(
            AgeRange::new(51, 50),
            Err(ControlError::InvalidRange { min: 51, max: 50 })
        );
        assert!(AgeRange::new(50, 50).is_ok());
    }

    #[test]
    fn clamp_keeps_range_inside_bounds() {
        let bounds = AgeRange { min: 25, max: 40 };
        let clamped = AgeRange { min: 20, max: 50 }.clamp_to(bounds);
        assert_eq!(clamped, AgeRange { min: 25, max: 40 });

        let inside = AgeRange { min: 30, max: 35 }.clamp_to(bounds);
        assert_eq!(inside, AgeRange { min: 30, max: 35 });
    }
}
