use std::path::PathBuf;

pub const CUSTOMERS_ENV: &str = "DASHBOARD_CUSTOMERS";
pub const COORDINATES_ENV: &str = "DASHBOARD_COORDINATES";

const DEFAULT_CUSTOMERS: &str = "data/customer_merge.parquet";
const DEFAULT_COORDINATES: &str = "data/coordinate.csv";

/// Where the dashboard reads its two input tables from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub customers: PathBuf,
    pub coordinates: PathBuf,
}

impl Config {
    /// Positional arguments win, then the environment, then the defaults.
    pub fn resolve<A, E>(args: A, env: E) -> Self
    where
        A: IntoIterator<Item = String>,
        E: Fn(&str) -> Option<String>,
    {
        let mut args = args.into_iter();
        let mut pick = |env_key: &str, default: &str| -> PathBuf {
            args.next()
                .or_else(|| env(env_key))
                .unwrap_or_else(|| default.to_string())
                .into()
        };
        let customers = pick(CUSTOMERS_ENV, DEFAULT_CUSTOMERS);
        let coordinates = pick(COORDINATES_ENV, DEFAULT_COORDINATES);
        Config {
            customers,
            coordinates,
        }
    }

    pub fn from_env() -> Self {
        Self::resolve(std::env::args().skip(1), |key| std::env::var(key).ok())
    }
}
