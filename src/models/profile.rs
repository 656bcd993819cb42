//! Candidate and job value objects handed to the engine by its caller

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateProfile {
    pub skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience_years: f32,
    pub education: Vec<EducationEntry>,
    /// Résumé narrative, possibly empty.
    #[serde(deserialize_with = "null_as_default")]
    pub resume_text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPosting {
    pub title: String,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub min_experience_years: f32,
    pub education_level: EducationLevel,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    pub requirements: Vec<String>,
}

/// Envelope for callers whose payload may omit either side entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRequest {
    pub candidate: Option<CandidateProfile>,
    pub job: Option<JobPosting>,
}

/// `null` reads as the field's default instead of failing the whole document.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Education level. Parsing never fails: any spelling that names no
/// known level becomes [`EducationLevel::Unknown`], which every candidate meets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    Unknown,
    HighSchool,
    Associate,
    #[default]
    Bachelor,
    Master,
    Phd,
}

impl<'de> Deserialize<'de> for EducationLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(match raw {
            Some(raw) => Self::from_degree(&raw).unwrap_or(EducationLevel::Unknown),
            None => EducationLevel::default(),
        })
    }
}

impl EducationLevel {
    /// Keywords searched for in free-form degree names, highest rank first.
    const KEYWORDS: [(&'static str, EducationLevel); 6] = [
        ("phd", EducationLevel::Phd),
        ("doctorate", EducationLevel::Phd),
        ("master", EducationLevel::Master),
        ("bachelor", EducationLevel::Bachelor),
        ("associate", EducationLevel::Associate),
        ("high school", EducationLevel::HighSchool),
    ];

    pub fn rank(self) -> u8 {
        match self {
            EducationLevel::Unknown => 0,
            EducationLevel::HighSchool => 1,
            EducationLevel::Associate => 2,
            EducationLevel::Bachelor => 3,
            EducationLevel::Master => 4,
            EducationLevel::Phd => 5,
        }
    }

    /// Highest level named anywhere in a degree string, if any.
    pub fn from_degree(degree: &str) -> Option<Self> {
        let degree = degree.to_lowercase().replace(['-', '_'], " ");
        Self::KEYWORDS
            .iter()
            .find(|(keyword, _)| degree.contains(keyword))
            .map(|(_, level)| *level)
    }
}
