use serde::{Deserialize, Serialize};

/// Account identity plus the two denormalized dashboard counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub profile_complete: bool,
    pub resume_count: u32,
}

impl User {
    pub fn new(email: &str, name: &str) -> Self {
        User {
            id: super::new_id(),
            email: email.to_string(),
            name: name.to_string(),
            profile_complete: false,
            resume_count: 0,
        }
    }
}
