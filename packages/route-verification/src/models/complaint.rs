use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status text the server sets when it escalates a complaint
const ESCALATION_MARKER: &str = "Higher Officials";

/// Complaint as returned by the platform API.
///
/// Escalation is decided server-side; the client only reads the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: String,
    #[serde(default)]
    pub is_escalated: bool,
    #[serde(default)]
    pub village_name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Complaint {
    pub fn is_escalated(&self) -> bool {
        self.is_escalated || self.status.contains(ESCALATION_MARKER)
    }

    pub fn is_resolved(&self) -> bool {
        self.status == "Resolved"
    }

    /// Label for status badges
    pub fn display_status(&self) -> &str {
        if self.is_escalated() {
            "Escalated"
        } else {
            &self.status
        }
    }
}

/// Filter tabs on the official complaints view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComplaintFilter {
    #[default]
    All,
    Pending,
    Resolved,
    Escalated,
}

impl ComplaintFilter {
    pub fn matches(&self, complaint: &Complaint) -> bool {
        match self {
            ComplaintFilter::All => true,
            ComplaintFilter::Pending => complaint.status == "Pending",
            ComplaintFilter::Resolved => complaint.is_resolved(),
            ComplaintFilter::Escalated => complaint.is_escalated,
        }
    }

    pub fn apply<'a>(&self, complaints: &'a [Complaint]) -> Vec<&'a Complaint> {
        complaints.iter().filter(|c| self.matches(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complaint(status: &str, is_escalated: bool) -> Complaint {
        Complaint {
            id: status.to_string(),
            title: "Broken culvert".to_string(),
            description: String::new(),
            status: status.to_string(),
            is_escalated,
            village_name: "Hosur".to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_escalation_from_flag_or_status_text() {
        assert!(complaint("Pending", true).is_escalated());
        assert!(complaint("Migrated to Higher Officials", false).is_escalated());
        assert!(!complaint("Pending", false).is_escalated());
    }

    #[test]
    fn test_display_status() {
        assert_eq!(
            complaint("Migrated to Higher Officials", false).display_status(),
            "Escalated"
        );
        assert_eq!(complaint("Resolved", false).display_status(), "Resolved");
    }

    #[test]
    fn test_filters() {
        let complaints = vec![
            complaint("Pending", false),
            complaint("Resolved", false),
            complaint("Migrated to Higher Officials", true),
        ];

        assert_eq!(ComplaintFilter::All.apply(&complaints).len(), 3);
        assert_eq!(ComplaintFilter::Pending.apply(&complaints).len(), 1);
        assert_eq!(ComplaintFilter::Resolved.apply(&complaints).len(), 1);

        let escalated = ComplaintFilter::Escalated.apply(&complaints);
        assert_eq!(escalated.len(), 1);
        assert_eq!(escalated[0].id, "Migrated to Higher Officials");
    }

    #[test]
    fn test_deserialize_minimal() {
        let c: Complaint =
            serde_json::from_str(r#"{"id": "1", "title": "Water", "status": "Pending"}"#).unwrap();
        assert!(!c.is_escalated());
        assert!(c.created_at.is_none());
    }
}
