//! Request and response types for the content-generation service

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Target age group for generated content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AgeGroup {
    #[serde(rename = "3-5")]
    Preschool,
    #[default]
    #[serde(rename = "6-8")]
    EarlyReader,
    #[serde(rename = "9-12")]
    Preteen,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 3] = [AgeGroup::Preschool, AgeGroup::EarlyReader, AgeGroup::Preteen];

    pub fn as_str(self) -> &'static str {
        match self {
            AgeGroup::Preschool => "3-5",
            AgeGroup::EarlyReader => "6-8",
            AgeGroup::Preteen => "9-12",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Preschool => "Ages 3-5 years",
            AgeGroup::EarlyReader => "Ages 6-8 years",
            AgeGroup::Preteen => "Ages 9-12 years",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AgeGroup::Preschool => "Simple vocabulary and basic concepts",
            AgeGroup::EarlyReader => "Engaging stories with educational elements",
            AgeGroup::Preteen => "Complex narratives with deeper themes",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content filter applied by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentFilter {
    #[default]
    Educational,
    MoralValues,
    FunOnly,
}

impl ContentFilter {
    pub const ALL: [ContentFilter; 3] = [
        ContentFilter::Educational,
        ContentFilter::MoralValues,
        ContentFilter::FunOnly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentFilter::Educational => "educational",
            ContentFilter::MoralValues => "moral_values",
            ContentFilter::FunOnly => "fun_only",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentFilter::Educational => "Educational",
            ContentFilter::MoralValues => "Value-Based",
            ContentFilter::FunOnly => "Entertainment",
        }
    }
}

impl fmt::Display for ContentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Desired story length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl StoryLength {
    pub const ALL: [StoryLength; 3] = [StoryLength::Short, StoryLength::Medium, StoryLength::Long];

    pub fn label(self) -> &'static str {
        match self {
            StoryLength::Short => "Short Story",
            StoryLength::Medium => "Medium Story",
            StoryLength::Long => "Long Story",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StoryLength::Short => "Perfect for a quick story session",
            StoryLength::Medium => "Balanced length for storytelling",
            StoryLength::Long => "Extended narrative for deeper engagement",
        }
    }

    /// Number of segments a story of this length usually runs to
    pub fn target_segments(self) -> usize {
        match self {
            StoryLength::Short => 3,
            StoryLength::Medium => 5,
            StoryLength::Long => 8,
        }
    }
}

// ============================================================================
// Story
// ============================================================================

/// Request to start a new story
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryStartRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_name: Option<String>,
    pub age_group: AgeGroup,
    pub story_length: StoryLength,
    pub content_filter: ContentFilter,
}

/// Request to continue an existing story
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryContinueRequest {
    pub session_id: String,
    pub user_input: String,
}

/// A generated story segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryResponse {
    pub session_id: String,
    pub story_content: String,
    #[serde(default)]
    pub choices: Option<Vec<String>>,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub word_count: usize,
    #[serde(default)]
    pub content_filter_applied: Option<String>,
    #[serde(default)]
    pub message_count: usize,
}

// ============================================================================
// Tutor
// ============================================================================

/// Request to open a tutor session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TutorStartRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub age_group: AgeGroup,
    pub content_filter: ContentFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_question: Option<String>,
}

/// Request to ask a question in an open tutor session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TutorAskRequest {
    pub session_id: String,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_hint: Option<String>,
}

/// A tutor answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorResponse {
    pub session_id: String,
    pub answer: String,
    #[serde(default)]
    pub subject_detected: Option<String>,
    #[serde(default)]
    pub follow_up_suggestions: Option<Vec<String>>,
    #[serde(default)]
    pub educational_level: Option<String>,
    #[serde(default)]
    pub content_filter_applied: Option<String>,
    #[serde(default)]
    pub message_count: usize,
    #[serde(default = "default_true")]
    pub is_appropriate: bool,
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Catalogs
// ============================================================================

/// Content filters offered by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FilterCatalog {
    #[serde(default)]
    pub available_filters: Vec<ContentFilter>,
    #[serde(default)]
    pub descriptions: HashMap<String, String>,
    #[serde(default)]
    pub default_filter: Option<ContentFilter>,
}

impl FilterCatalog {
    pub fn description(&self, filter: ContentFilter) -> Option<&str> {
        self.descriptions.get(filter.as_str()).map(String::as_str)
    }
}

/// Subjects the tutor covers, with example questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SubjectCatalog {
    #[serde(default)]
    pub available_subjects: Vec<String>,
    #[serde(default)]
    pub subject_descriptions: HashMap<String, String>,
    #[serde(default)]
    pub example_questions: HashMap<String, Vec<String>>,
}

impl SubjectCatalog {
    /// First few example questions for a subject
    pub fn examples(&self, subject: &str, limit: usize) -> &[String] {
        self.example_questions
            .get(subject)
            .map_or(&[][..], |qs| &qs[..qs.len().min(limit)])
    }
}

/// Human-readable subject name
pub fn subject_display_name(subject: &str) -> &str {
    match subject {
        "math" => "Mathematics",
        "science" => "Science",
        "language" => "Language Arts",
        "social_studies" => "Social Studies",
        "art" => "Arts & Crafts",
        "general" => "General Knowledge",
        other => other,
    }
}

/// Service health report
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub llm_provider: Option<String>,
    #[serde(default)]
    pub session_backend: Option<String>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
