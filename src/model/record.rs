use crate::model::{LocationTask, PhoneNumber};

/// Name stored for a listing that has a valid phone but no readable name
pub const UNNAMED_BUSINESS: &str = "Sin nombre";

/// Fields read from one opened result card
///
/// Every field is best-effort: a missing or unreadable element leaves the
/// field as `None` rather than failing the candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    /// Cleaned display name
    pub name: Option<String>,

    pub address: Option<String>,

    /// Phone number, already validated
    pub phone: Option<PhoneNumber>,
}

impl Candidate {
    /// Name to use in log lines, whether or not one was found
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED_BUSINESS)
    }

    /// Promotes the candidate to a business record for the given search
    ///
    /// Returns `None` when the candidate has no valid phone; such candidates
    /// are never persisted.
    pub fn into_record(self, task: &LocationTask) -> Option<BusinessRecord> {
        let phone = self.phone?;

        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNNAMED_BUSINESS.to_string());

        Some(BusinessRecord {
            name,
            phone,
            address: self.address,
            area: task.area.clone(),
            expected_population: task.expected_population,
            category: task.category.clone(),
        })
    }
}

/// A validated business contact ready for the ingestion gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessRecord {
    pub name: String,
    pub phone: PhoneNumber,
    pub address: Option<String>,
    pub area: String,
    pub expected_population: u64,
    pub category: String,
}

/// A stored business entry as read back from a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedEntry {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub area: String,
    pub expected_population: u64,
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> LocationTask {
        LocationTask::new("Centro", 5000, "Bar")
    }

    #[test]
    fn test_candidate_without_phone_is_dropped() {
        let candidate = Candidate {
            name: Some("Bar Pepe".to_string()),
            address: Some("Calle Mayor 1".to_string()),
            phone: None,
        };

        assert!(candidate.into_record(&task()).is_none());
    }

    #[test]
    fn test_candidate_becomes_record() {
        let candidate = Candidate {
            name: Some("Bar Pepe".to_string()),
            address: None,
            phone: PhoneNumber::parse("612345678"),
        };

        let record = candidate.into_record(&task()).unwrap();
        assert_eq!(record.name, "Bar Pepe");
        assert_eq!(record.phone.as_str(), "612345678");
        assert_eq!(record.area, "Centro");
        assert_eq!(record.expected_population, 5000);
        assert_eq!(record.category, "Bar");
        assert_eq!(record.address, None);
    }

    #[test]
    fn test_nameless_candidate_gets_placeholder() {
        let candidate = Candidate {
            name: None,
            address: None,
            phone: PhoneNumber::parse("712345678"),
        };

        assert_eq!(candidate.display_name(), UNNAMED_BUSINESS);
        let record = candidate.into_record(&task()).unwrap();
        assert_eq!(record.name, UNNAMED_BUSINESS);
    }
}
