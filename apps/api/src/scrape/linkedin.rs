//! LinkedIn profile scraping is not implemented. The endpoint exists so the
//! web client's import flow renders; it always returns the empty shape, and
//! `linkedin_data` on resumes stays null.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkedInProfile {
    pub experience: Vec<Value>,
    pub education: Vec<Value>,
    pub skills: Vec<String>,
}

pub fn placeholder_profile() -> LinkedInProfile {
    LinkedInProfile::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_profile_is_empty() {
        let profile = placeholder_profile();
        assert!(profile.experience.is_empty());
        assert!(profile.education.is_empty());
        assert!(profile.skills.is_empty());
    }
}
