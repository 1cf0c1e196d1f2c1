use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::filter::FilteredView;
use super::model::{CustomerRecord, Gender, ProvinceCoordinate};

// ---------------------------------------------------------------------------
// CountTable – grouping key → number of records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountRow<K> {
    pub key: K,
    pub count: usize,
}

/// Result of grouping a view by one or more category keys.
///
/// Rows are unique per key. Only keys present in the input appear, so no row
/// has a zero count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountTable<K> {
    rows: Vec<CountRow<K>>,
}

impl<K> Default for CountTable<K> {
    fn default() -> Self {
        CountTable { rows: Vec::new() }
    }
}

impl<K> CountTable<K> {
    pub fn rows(&self) -> &[CountRow<K>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of all counts; equals the size of the aggregated view.
    pub fn total(&self) -> usize {
        self.rows.iter().map(|r| r.count).sum()
    }

    pub fn get(&self, key: &K) -> Option<usize>
    where
        K: PartialEq,
    {
        self.rows.iter().find(|r| r.key == *key).map(|r| r.count)
    }

    /// Stable ascending sort by count; equal counts keep key order.
    pub fn sorted_by_count(mut self) -> Self {
        self.rows.sort_by_key(|r| r.count);
        self
    }
}

/// Group `view` by `key` and count. Rows come out in key order.
pub fn count_by<'a, K, F>(view: &FilteredView<'a>, key: F) -> CountTable<K>
where
    K: Ord,
    F: Fn(&'a CustomerRecord) -> K,
{
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for record in view {
        *counts.entry(key(record)).or_default() += 1;
    }
    CountTable {
        rows: counts
            .into_iter()
            .map(|(key, count)| CountRow { key, count })
            .collect(),
    }
}

pub fn count_by_profession(view: &FilteredView<'_>) -> CountTable<String> {
    count_by(view, |r| r.profession.clone())
}

/// Expected to run over a profession-filtered view.
pub fn count_by_generation(view: &FilteredView<'_>) -> CountTable<String> {
    count_by(view, |r| r.generation.clone())
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ProfessionGender {
    pub profession: String,
    pub gender: Gender,
}

/// Long-form (profession, gender) counts, ascending by count.
///
/// Expected to run over an age-filtered view.
pub fn count_by_profession_and_gender(view: &FilteredView<'_>) -> CountTable<ProfessionGender> {
    count_by(view, |r| ProfessionGender {
        profession: r.profession.clone(),
        gender: r.gender,
    })
    .sorted_by_count()
}

// ---------------------------------------------------------------------------
// Province × gender cross-tabulation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvinceGenderRow {
    pub province: String,
    pub male: usize,
    pub female: usize,
    /// Always `male + female`.
    pub total: usize,
}

pub fn count_by_province_and_gender(view: &FilteredView<'_>) -> Vec<ProvinceGenderRow> {
    let mut by_province: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for record in view {
        let entry = by_province.entry(record.province.as_str()).or_default();
        match record.gender {
            Gender::Male => entry.0 += 1,
            Gender::Female => entry.1 += 1,
        }
    }
    by_province
        .into_iter()
        .map(|(province, (male, female))| ProvinceGenderRow {
            province: province.to_string(),
            male,
            female,
            total: male + female,
        })
        .collect()
}

/// A province bubble on the customer map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub province: String,
    pub latitude: f64,
    pub longitude: f64,
    pub male: usize,
    pub female: usize,
    pub total: usize,
}

/// Inner join of province counts with the coordinate table.
///
/// Provinces without coordinates are dropped.
pub fn province_map_points(
    rows: &[ProvinceGenderRow],
    coordinates: &[ProvinceCoordinate],
) -> Vec<MapPoint> {
    let lookup: HashMap<&str, &ProvinceCoordinate> = coordinates
        .iter()
        .map(|c| (c.province.as_str(), c))
        .collect();

    rows.iter()
        .filter_map(|row| {
            let Some(coord) = lookup.get(row.province.as_str()) else {
                log::debug!("No coordinates for province '{}', left off the map", row.province);
                return None;
            };
            Some(MapPoint {
                province: row.province.clone(),
                latitude: coord.latitude,
                longitude: coord.longitude,
                male: row.male,
                female: row.female,
                total: row.total,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Income distribution
// ---------------------------------------------------------------------------

/// Number of bins in the dashboard's income histogram.
pub const INCOME_BINS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Equal-width histogram of annual income over `[min, max]`.
///
/// Bins are `[lower, upper)` except the last, which also takes `max`.
/// If every income is the same the result is a single bin.
pub fn income_histogram(view: &FilteredView<'_>, bins: usize) -> Vec<HistogramBin> {
    let bounds = view
        .iter()
        .map(|r| r.annual_income)
        .fold(None, |acc: Option<(f64, f64)>, v| {
            Some(match acc {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            })
        });
    let Some((min, max)) = bounds else {
        return Vec::new();
    };

    let range = max - min;
    if range <= 0.0 || bins <= 1 {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: view.len(),
        }];
    }

    let width = range / bins as f64;
    let mut counts = vec![0usize; bins];
    for record in view {
        let idx = ((record.annual_income - min) / width) as usize;
        counts[idx.min(bins - 1)] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + i as f64 * width,
            upper: if i + 1 == bins {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            count,
        })
        .collect()
}

/// One dot of the income / spending-score scatter plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub spending_score: f64,
    pub annual_income: f64,
}

pub fn income_spending_points(view: &FilteredView<'_>) -> Vec<ScatterPoint> {
    view.iter()
        .map(|r| ScatterPoint {
            spending_score: r.spending_score,
            annual_income: r.annual_income,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter_by_age_range, filter_by_profession};
    use crate::data::model::fixtures::{customer, sample_dataset};
    use crate::data::model::CustomerDataset;

    #[test]
    fn profession_counts_cover_every_record() {
        let ds = sample_dataset();
        let table = count_by_profession(&ds.view());

        let keys: Vec<&str> = table.rows().iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ds.professions().iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(table.get(&"Artist".to_string()), Some(3));
        assert_eq!(table.get(&"Lawyer".to_string()), Some(1));
        assert_eq!(table.total(), ds.len());
    }

    #[test]
    fn filtered_profession_counts_omit_absent_professions() {
        let ds = sample_dataset();
        let view = filter_by_age_range(ds.records(), 40, 70).unwrap();
        let table = count_by_profession(&view);
        assert_eq!(table.get(&"Artist".to_string()), None);
        assert!(table.rows().iter().all(|r| r.count > 0));
        assert_eq!(table.total(), view.len());
    }

    #[test]
    fn province_totals_add_up() {
        let ds = sample_dataset();
        let rows = count_by_province_and_gender(&ds.view());

        assert_eq!(rows.len(), 4);
        for row in &rows {
            assert_eq!(row.total, row.male + row.female);
        }
        let jakarta = rows.iter().find(|r| r.province == "DKI Jakarta").unwrap();
        assert_eq!((jakarta.male, jakarta.female, jakarta.total), (2, 1, 3));
        let papua = rows.iter().find(|r| r.province == "Papua").unwrap();
        assert_eq!((papua.male, papua.female), (0, 1));
        assert_eq!(rows.iter().map(|r| r.total).sum::<usize>(), ds.len());
    }

    #[test]
    fn generation_counts_for_one_profession() {
        let ds = sample_dataset();
        let artists = filter_by_profession(ds.records(), "Artist");
        let table = count_by_generation(&artists);

        assert_eq!(table.get(&"Gen Z".to_string()), Some(2));
        assert_eq!(table.get(&"Millennial".to_string()), Some(1));
        assert_eq!(table.get(&"Boomer".to_string()), None);
        assert_eq!(table.total(), artists.len());
    }

    #[test]
    fn profession_gender_rows_are_sorted_by_count() {
        let ds = sample_dataset();
        let view = filter_by_age_range(ds.records(), 20, 50).unwrap();
        let table = count_by_profession_and_gender(&view);

        let counts: Vec<usize> = table.rows().iter().map(|r| r.count).collect();
        let mut sorted = counts.clone();
        sorted.sort();
        assert_eq!(counts, sorted);
        assert_eq!(table.total(), view.len());

        let engineer_male = ProfessionGender {
            profession: "Engineer".into(),
            gender: Gender::Male,
        };
        assert_eq!(table.get(&engineer_male), Some(2));
        assert_eq!(table.rows().last().map(|r| &r.key), Some(&engineer_male));

        // Engineer/Female only exists outside the age range.
        let engineer_female = ProfessionGender {
            profession: "Engineer".into(),
            gender: Gender::Female,
        };
        assert_eq!(table.get(&engineer_female), None);
    }

    #[test]
    fn equal_counts_keep_key_order() {
        let ds = CustomerDataset::from_records(vec![
            customer("Doctor", "Bali", Gender::Male, 40),
            customer("Artist", "Bali", Gender::Male, 30),
            customer("Doctor", "Bali", Gender::Male, 41),
            customer("Artist", "Bali", Gender::Female, 31),
            customer("Lawyer", "Bali", Gender::Female, 50),
            customer("Artist", "Bali", Gender::Female, 32),
            customer("Artist", "Bali", Gender::Male, 33),
        ]);
        let table = count_by_profession_and_gender(&ds.view());

        let order: Vec<(&str, Gender, usize)> = table
            .rows()
            .iter()
            .map(|r| (r.key.profession.as_str(), r.key.gender, r.count))
            .collect();
        assert_eq!(
            order,
            [
                ("Lawyer", Gender::Female, 1),
                ("Artist", Gender::Female, 2),
                ("Artist", Gender::Male, 2),
                ("Doctor", Gender::Male, 2),
            ]
        );
    }

    #[test]
    fn empty_views_give_empty_tables() {
        let ds = sample_dataset();
        let empty = filter_by_profession(ds.records(), "NotARealJob");

        assert!(count_by_profession(&empty).is_empty());
        assert!(count_by_generation(&empty).is_empty());
        assert!(count_by_profession_and_gender(&empty).is_empty());
        assert!(count_by_province_and_gender(&empty).is_empty());
        assert!(income_histogram(&empty, INCOME_BINS).is_empty());
        assert!(income_spending_points(&empty).is_empty());
    }

    #[test]
    fn map_points_drop_provinces_without_coordinates() {
        let ds = sample_dataset();
        let rows = count_by_province_and_gender(&ds.view());
        let coordinates = vec![
            ProvinceCoordinate {
                province: "Bali".into(),
                latitude: -8.34,
                longitude: 115.09,
            },
            ProvinceCoordinate {
                province: "Papua".into(),
                latitude: -4.27,
                longitude: 138.08,
            },
        ];

        let points = province_map_points(&rows, &coordinates);
        assert_eq!(points.len(), 2);
        let bali = &points[0];
        assert_eq!(bali.province, "Bali");
        assert_eq!((bali.male, bali.female, bali.total), (2, 1, 3));
        assert_eq!(bali.latitude, -8.34);
    }

    #[test]
    fn histogram_bins_cover_the_income_range() {
        let ds = sample_dataset();
        let bins = income_histogram(&ds.view(), INCOME_BINS);

        assert_eq!(bins.len(), INCOME_BINS);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), ds.len());
        assert_eq!(bins[0].lower, 17_000.0);
        assert_eq!(bins[INCOME_BINS - 1].upper, 62_000.0);
        // The maximum lands in the closed last bin.
        assert!(bins[INCOME_BINS - 1].count >= 1);
    }

    #[test]
    fn histogram_of_identical_incomes_is_one_bin() {
        let ds = CustomerDataset::from_records(vec![
            customer("Artist", "Bali", Gender::Male, 30),
            customer("Doctor", "Bali", Gender::Female, 30),
        ]);
        let bins = income_histogram(&ds.view(), INCOME_BINS);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[0].width(), 0.0);
    }

    #[test]
    fn scatter_has_one_point_per_record() {
        let ds = sample_dataset();
        let points = income_spending_points(&ds.view());
        assert_eq!(points.len(), ds.len());
        assert_eq!(points[0].annual_income, 19_000.0);
        assert_eq!(points[0].spending_score, 19.0);
    }
}
