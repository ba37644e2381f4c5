//! Academic calendar sync configuration.

use serde::{Deserialize, Serialize};

/// Settings for discovering and fetching academic calendar documents.
///
/// URL templates may contain `{year}` and `{next_year}` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Templates probed with HEAD requests to discover new calendars.
    #[serde(default = "default_candidate_urls")]
    pub candidate_urls: Vec<String>,
    /// Sources that are always fetched.
    #[serde(default)]
    pub known_sources: Vec<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            candidate_urls: default_candidate_urls(),
            known_sources: Vec::new(),
            request_timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_candidate_urls() -> Vec<String> {
    vec![
        "https://oidb.university.edu.tr/akademik-takvim/{year}-{next_year}-akademik-takvim.pdf"
            .to_string(),
        "https://oidb.university.edu.tr/files/akademik_takvim_{year}_{next_year}.pdf".to_string(),
        "https://www.university.edu.tr/academic-calendar-{year}-{next_year}.pdf".to_string(),
    ]
}

fn default_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    "campus-clinic-calendar-sync/0.1".to_string()
}
