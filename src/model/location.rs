use std::fmt;

/// A single search to run: one category in one area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationTask {
    pub area: String,
    pub expected_population: u64,
    pub category: String,
}

impl LocationTask {
    pub fn new(area: impl Into<String>, expected_population: u64, category: impl Into<String>) -> Self {
        Self {
            area: area.into(),
            expected_population,
            category: category.into(),
        }
    }

    /// The free-text query typed into the map search, e.g. "Bares en Centro"
    pub fn query(&self, connector: &str) -> String {
        format!("{} {} {}", self.category, connector, self.area)
    }
}

impl fmt::Display for LocationTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.area, self.category)
    }
}
