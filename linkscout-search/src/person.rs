use serde::{Deserialize, Serialize};

/// One person to locate online.
///
/// Field declaration order is the output key order; every key is always
/// serialized, with `null` standing in for anything the input did not carry.
/// Unknown input keys are ignored. Records are read from the input file,
/// progressively enriched with `query` and `search_results`, and written
/// back out once at the end of the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub intro: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub company_industry: Option<String>,
    #[serde(default)]
    pub company_size: Option<String>,
    #[serde(default)]
    pub social_profile: Option<Vec<String>>,
    #[serde(default)]
    pub query: Option<Vec<String>>,
    #[serde(default)]
    pub search_results: Option<Vec<String>>,
}

impl PersonRecord {
    /// The person's name, or an empty string when the record has none.
    pub fn name_text(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Queries already present on the record, if any non-empty list exists.
    pub fn existing_queries(&self) -> Option<&[String]> {
        self.query
            .as_deref()
            .filter(|queries| !queries.is_empty())
    }
}
