//! Seller profile bodies.
//!
//! Nested collections in [`SellerProfileSetup`] replace the stored ones
//! wholesale; a `None` collection leaves the stored one untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Self-assessed skill level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    /// Beginner.
    Beginner,
    /// Intermediate.
    Intermediate,
    /// Advanced.
    Advanced,
    /// Expert.
    Expert,
}

/// Spoken language proficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageLevel {
    /// Basic.
    Basic,
    /// Conversational.
    Conversational,
    /// Fluent.
    Fluent,
    /// Native.
    Native,
}

/// A degree or course listed on the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    /// Server id, absent on new entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// School or university.
    pub institution_name: String,
    /// Degree or certificate.
    pub degree_title: String,
    /// First year.
    pub start_year: u16,
    /// Last year, `None` while ongoing.
    #[serde(default)]
    pub end_year: Option<u16>,
    /// Creation time.
    #[serde(default, skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Education {
    /// A new entry.
    pub fn new(
        institution_name: impl Into<String>,
        degree_title: impl Into<String>,
        start_year: u16,
        end_year: Option<u16>,
    ) -> Self {
        Self {
            id: None,
            institution_name: institution_name.into(),
            degree_title: degree_title.into(),
            start_year,
            end_year,
            created_at: None,
        }
    }
}

/// A skill and how well the seller masters it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Server id, absent on new entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Skill name.
    pub name: String,
    /// Level.
    pub level: SkillLevel,
    /// Creation time.
    #[serde(default, skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Skill {
    /// A new entry.
    pub fn new(name: impl Into<String>, level: SkillLevel) -> Self {
        Self {
            id: None,
            name: name.into(),
            level,
            created_at: None,
        }
    }
}

/// A language the seller speaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Server id, absent on new entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Language name.
    pub name: String,
    /// Level.
    pub level: LanguageLevel,
    /// Creation time.
    #[serde(default, skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Language {
    /// A new entry.
    pub fn new(name: impl Into<String>, level: LanguageLevel) -> Self {
        Self {
            id: None,
            name: name.into(),
            level,
            created_at: None,
        }
    }
}

/// Work sample. The backend wants at least a link or an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioItem {
    /// Server id, absent on new entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// External link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_link: Option<String>,
    /// URL of an uploaded file. Read-only.
    #[serde(default, skip_serializing)]
    pub media_file: Option<String>,
    /// Creation time.
    #[serde(default, skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update.
    #[serde(default, skip_serializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PortfolioItem {
    /// A new entry pointing at an external link.
    pub fn link(
        title: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: description.into(),
            url_link: Some(url.into()),
            media_file: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// A seller profile as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SellerProfile {
    /// Headline.
    #[serde(default)]
    pub profile_title: Option<String>,
    /// About text.
    #[serde(default)]
    pub bio: Option<String>,
    /// External portfolio.
    #[serde(default)]
    pub portfolio_link: Option<String>,
    /// Set by the backend once every required section is filled in.
    #[serde(default)]
    pub is_profile_complete: bool,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Education entries.
    #[serde(default)]
    pub educations: Vec<Education>,
    /// Skills.
    #[serde(default)]
    pub skills: Vec<Skill>,
    /// Languages.
    #[serde(default)]
    pub languages: Vec<Language>,
    /// Work samples.
    #[serde(default)]
    pub portfolio_items: Vec<PortfolioItem>,
}

/// Body for [`AccountApi::setup_seller_profile`](crate::AccountApi::setup_seller_profile).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SellerProfileSetup {
    /// Headline, at least 5 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_title: Option<String>,
    /// About text, at least 50 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// External portfolio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_link: Option<String>,
    /// Replaces all education entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub educations: Option<Vec<Education>>,
    /// Replaces all skills.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<Skill>>,
    /// Replaces all languages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<Language>>,
    /// Replaces all work samples.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_items: Option<Vec<PortfolioItem>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_setup_omits_untouched_sections() {
        let setup = SellerProfileSetup {
            profile_title: Some("Rust backend developer".into()),
            skills: Some(vec![
                Skill::new("Rust", SkillLevel::Expert),
                Skill::new("PostgreSQL", SkillLevel::Advanced),
            ]),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&setup).unwrap(),
            json!({
                "profile_title": "Rust backend developer",
                "skills": [
                    {"name": "Rust", "level": "expert"},
                    {"name": "PostgreSQL", "level": "advanced"}
                ]
            })
        );
    }

    #[test]
    fn test_read_only_fields_are_not_sent() {
        let mut item = PortfolioItem::link(
            "Shop",
            "An online shop built with Axum.",
            "https://shop.example",
        );
        item.id = Some(3);
        item.media_file = Some("/uploads/shop.png".into());

        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({
                "id": 3,
                "title": "Shop",
                "description": "An online shop built with Axum.",
                "url_link": "https://shop.example"
            })
        );
    }

    #[test]
    fn test_profile_from_backend() {
        let profile: SellerProfile = serde_json::from_value(json!({
            "profile_title": "Illustrator",
            "bio": null,
            "portfolio_link": "",
            "is_profile_complete": false,
            "created_at": "2024-05-02T10:00:00Z",
            "educations": [{
                "id": 1,
                "institution_name": "Art School",
                "degree_title": "BA Illustration",
                "start_year": 2015,
                "end_year": null,
                "created_at": "2024-05-02T10:00:00Z"
            }],
            "skills": [],
            "languages": [{"id": 2, "name": "French", "level": "native"}],
            "portfolio_items": [],
            "education_count": 1,
            "skills_count": 0
        }))
        .unwrap();

        assert_eq!(profile.profile_title.as_deref(), Some("Illustrator"));
        assert_eq!(profile.educations[0].end_year, None);
        assert_eq!(profile.languages[0].level, LanguageLevel::Native);
        assert!(!profile.is_profile_complete);
    }
}
