use std::iter::Copied;
use std::slice;

use super::model::{AgeRange, CustomerRecord};
use crate::error::ControlError;

// ---------------------------------------------------------------------------
// FilteredView – a borrowed selection of customer records
// ---------------------------------------------------------------------------

/// Read-only subset of the customer table. Holds references, never copies.
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    records: Vec<&'a CustomerRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> Copied<slice::Iter<'_, &'a CustomerRecord>> {
        self.records.iter().copied()
    }
}

impl<'a> FromIterator<&'a CustomerRecord> for FilteredView<'a> {
    fn from_iter<I: IntoIterator<Item = &'a CustomerRecord>>(iter: I) -> Self {
        FilteredView {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'v, 'a> IntoIterator for &'v FilteredView<'a> {
    type Item = &'a CustomerRecord;
    type IntoIter = Copied<slice::Iter<'v, &'a CustomerRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Records whose profession equals `profession` exactly (case-sensitive).
///
/// No match is not an error: the result is simply empty.
pub fn filter_by_profession<'a, I>(records: I, profession: &str) -> FilteredView<'a>
where
    I: IntoIterator<Item = &'a CustomerRecord>,
{
    FilterPredicate::profession(profession).apply(records)
}

/// Records with `min <= age <= max`.
pub fn filter_by_age_range<'a, I>(
    records: I,
    min: i64,
    max: i64,
) -> Result<FilteredView<'a>, ControlError>
where
    I: IntoIterator<Item = &'a CustomerRecord>,
{
    Ok(FilterPredicate::age(AgeRange::new(min, max)?).apply(records))
}

/// Profession constraint of a [`FilterPredicate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProfessionFilter {
    #[default]
    Any,
    Exact(String),
}

/// A combined predicate. Absent parts do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPredicate {
    pub profession: ProfessionFilter,
    pub age: Option<AgeRange>,
}

impl FilterPredicate {
    pub fn profession(profession: impl Into<String>) -> Self {
        FilterPredicate {
            profession: ProfessionFilter::Exact(profession.into()),
            age: None,
        }
    }

    pub fn age(range: AgeRange) -> Self {
        FilterPredicate {
            profession: ProfessionFilter::Any,
            age: Some(range),
        }
    }

    pub fn matches(&self, record: &CustomerRecord) -> bool {
        let profession_ok = match &self.profession {
            ProfessionFilter::Any => true,
            ProfessionFilter::Exact(p) => record.profession == *p,
        };
        profession_ok && self.age.map_or(true, |range| range.contains(record.age))
    }

    pub fn apply<'a, I>(&self, records: I) -> FilteredView<'a>
    where
        I: IntoIterator<Item = &'a CustomerRecord>,
    {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::sample_dataset;

    #[test]
    fn profession_filter_is_exact_and_case_sensitive() {
        let ds = sample_dataset();
        let artists = filter_by_profession(ds.records(), "Artist");
        assert_eq!(artists.len(), 3);
        assert!(artists.iter().all(|r| r.profession == "Artist"));

        assert!(filter_by_profession(ds.records(), "artist").is_empty());
        assert!(filter_by_profession(ds.records(), "NotARealJob").is_empty());
    }

    #[test]
    fn age_filter_is_inclusive_on_both_ends() {
        let ds = sample_dataset();
        let view = filter_by_age_range(ds.records(), 20, 50).unwrap();

        assert!(view.iter().all(|r| (20..=50).contains(&r.age)));
        let expected = ds
            .records()
            .iter()
            .filter(|r| r.age >= 20 && r.age <= 50)
            .count();
        assert_eq!(view.len(), expected);
        assert!(view.iter().any(|r| r.age == 20));
        assert!(view.iter().any(|r| r.age == 50));
        assert!(view.iter().all(|r| r.age != 19 && r.age != 51));
    }

    #[test]
    fn inverted_age_range_is_rejected() {
        let ds = sample_dataset();
        let err = filter_by_age_range(ds.records(), 51, 50).unwrap_err();
        assert_eq!(err, ControlError::InvalidRange { min: 51, max: 50 });
    }

    #[test]
    fn filters_compose_over_views() {
        let ds = sample_dataset();
        let adults = filter_by_age_range(&ds.view(), 20, 50).unwrap();
        let engineers = filter_by_profession(&adults, "Engineer");
        assert_eq!(engineers.len(), 2);

        let combined = FilterPredicate {
            profession: ProfessionFilter::Exact("Engineer".into()),
            age: Some(AgeRange { min: 20, max: 50 }),
        };
        assert_eq!(combined.apply(ds.records()).len(), 2);
    }

    #[test]
    fn default_predicate_keeps_everything() {
        let ds = sample_dataset();
        assert_eq!(FilterPredicate::default().apply(ds.records()).len(), ds.len());
    }
}
