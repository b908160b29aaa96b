// src/dataset/id.rs

use std::fmt;

/// Release root of the NYC TLC mirror; datasets live under `<base>/<color>/`.
pub const DEFAULT_RELEASE_BASE: &str =
    "https://github.com/DataTalksClub/nyc-tlc-data/releases/download";

/// Identifies one monthly trip-record file, e.g. green taxis for 2020-01.
///
/// `color` goes into paths verbatim. `month` is not range-checked: a bad
/// value just produces a URL that fails to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetId {
    pub color: String,
    pub year: u16,
    pub month: u8,
}

impl DatasetId {
    pub fn new(color: impl Into<String>, year: u16, month: u8) -> Self {
        Self {
            color: color.into(),
            year,
            month,
        }
    }

    /// Two-digit month, `1` → `"01"`.
    pub fn padded_month(&self) -> String {
        format!("{:02}", self.month)
    }

    /// `<color>_tripdata_<year>-<MM>`, shared by the source file and the parquet output.
    pub fn file_stem(&self) -> String {
        format!(
            "{}_tripdata_{}-{}",
            self.color,
            self.year,
            self.padded_month()
        )
    }

    /// Source URL on the public release mirror.
    pub fn url(&self) -> String {
        self.url_with_base(DEFAULT_RELEASE_BASE)
    }

    /// Source URL under an arbitrary release root (trailing `/` tolerated).
    pub fn url_with_base(&self, base: &str) -> String {
        format!(
            "{}/{}/{}.csv.gz",
            base.trim_end_matches('/'),
            self.color,
            self.file_stem()
        )
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}-{}", self.color, self.year, self.padded_month())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_green_2020_01_names() {
        let id = DatasetId::new("green", 2020, 1);
        assert_eq!(id.file_stem(), "green_tripdata_2020-01");
        assert_eq!(
            id.url(),
            "https://github.com/DataTalksClub/nyc-tlc-data/releases/download/green/green_tripdata_2020-01.csv.gz"
        );
    }

    #[test]
    fn test_month_is_always_two_digits() {
        for month in 1..=12u8 {
            let padded = DatasetId::new("yellow", 2021, month).padded_month();
            assert_eq!(padded.len(), 2, "month {} padded to {:?}", month, padded);
        }
        assert_eq!(DatasetId::new("yellow", 2021, 1).padded_month(), "01");
        assert_eq!(DatasetId::new("yellow", 2021, 12).padded_month(), "12");
    }

    #[test]
    fn test_color_used_verbatim() {
        let id = DatasetId::new("fhv Mixed", 2019, 7);
        assert_eq!(id.file_stem(), "fhv Mixed_tripdata_2019-07");
    }

    #[test]
    fn test_url_with_base_trims_slash() {
        let id = DatasetId::new("green", 2020, 1);
        assert_eq!(
            id.url_with_base("http://127.0.0.1:8080/releases/"),
            "http://127.0.0.1:8080/releases/green/green_tripdata_2020-01.csv.gz"
        );
        assert_eq!(id.to_string(), "green/2020-01");
    }
}
