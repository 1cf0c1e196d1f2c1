use std::fs;
use std::sync::Arc;

use customer_dashboard::data::aggregate::{
    count_by_generation, count_by_profession, count_by_profession_and_gender,
    count_by_province_and_gender,
};
use customer_dashboard::data::filter::{filter_by_age_range, filter_by_profession};
use customer_dashboard::data::loader::load;
use customer_dashboard::data::model::{AgeRange, DashboardData};
use customer_dashboard::error::ControlError;
use customer_dashboard::state::DashboardState;
use tempfile::tempdir;

const CUSTOMERS_CSV: &str = "\
Profession,province,gender,age,generation,Annual_Income,Spending_Score
Healthcare,Bali,Female,19,Gen Z,40000,80
Healthcare,Bali,Male,20,Gen Z,42000,75
Engineer,Jawa Barat,Male,35,Millennial,110000,40
Engineer,Jawa Barat,Female,50,Gen X,130000,35
Artist,DKI Jakarta,Female,51,Gen X,90000,60
Artist,DKI Jakarta,Male,64,Boomer,70000,20
Lawyer,Maluku,Male,42,Millennial,150000,10
";

const COORDINATES_CSV: &str = "\
province,latitude,longitude
Bali,-8.3405,115.092
Jawa Barat,-6.9175,107.6191
DKI Jakarta,-6.2088,106.8456
";

fn load_fixture() -> DashboardData {
    let dir = tempdir().unwrap();
    let customers = dir.path().join("customer_merge.csv");
    let coordinates = dir.path().join("coordinate.csv");
    fs::write(&customers, CUSTOMERS_CSV).unwrap();
    fs::write(&coordinates, COORDINATES_CSV).unwrap();
    load(&customers, &coordinates).unwrap()
}

#[test]
fn every_grouping_sums_to_its_view() {
    let data = load_fixture();
    let records = data.customers.records();

    let mut views = vec![data.customers.view()];
    for profession in data.customers.professions() {
        views.push(filter_by_profession(records, profession));
    }
    for (min, max) in [(0, 100), (20, 50), (51, 64), (70, 90)] {
        views.push(filter_by_age_range(records, min, max).unwrap());
    }

    for view in &views {
        assert_eq!(count_by_profession(view).total(), view.len());
        assert_eq!(count_by_generation(view).total(), view.len());
        assert_eq!(count_by_profession_and_gender(view).total(), view.len());

        let provinces = count_by_province_and_gender(view);
        assert!(provinces.iter().all(|r| r.total == r.male + r.female));
        assert_eq!(provinces.iter().map(|r| r.total).sum::<usize>(), view.len());
    }
}

#[test]
fn session_follows_control_changes() {
    let mut state = DashboardState::new(Arc::new(load_fixture()));

    // Defaults: first profession alphabetically, [20, 50] inside [19, 64].
    assert_eq!(state.controls().selected_profession(), "Artist");
    assert_eq!(state.controls().age_range(), AgeRange { min: 20, max: 50 });

    // Maluku has no coordinates and is left off the map.
    assert_eq!(state.charts().province_map.len(), 3);
    assert_eq!(state.charts().professions.total(), 7);

    state.set_profession("Healthcare").unwrap();
    assert_eq!(state.charts().generations.total(), 2);

    state.set_age_range(19, 20).unwrap();
    let rows = state.charts().gender_by_profession.rows();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.key.profession == "Healthcare"));

    assert_eq!(
        state.set_age_range(51, 50),
        Err(ControlError::InvalidRange { min: 51, max: 50 })
    );
    assert_eq!(state.controls().age_range(), AgeRange { min: 19, max: 20 });

    assert_eq!(
        state.set_profession("NotARealJob"),
        Err(ControlError::UnknownProfession("NotARealJob".into()))
    );
    assert_eq!(state.controls().selected_profession(), "Healthcare");
}
