use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(MovieId);

/// One catalog entry as returned by the remote service. Only `id` is
/// interpreted by the core (stable presentation key); the remaining fields
/// are pass-through data for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl MovieSummary {
    /// Release year as shown on cards, when the catalog provided a date.
    pub fn release_year(&self) -> Option<&str> {
        let date = self.release_date.as_deref()?;
        let year = date.split('-').next()?;
        if year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()) {
            Some(year)
        } else {
            None
        }
    }
}
