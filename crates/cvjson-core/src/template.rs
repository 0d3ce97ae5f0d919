//! Extraction templates.
//!
//! Each [`TemplateId`] selects an immutable [`SchemaSpec`]: the system prompt
//! that tells the model which JSON shape to produce, plus the key lists the
//! strict validator checks against. Both templates produce the same
//! `employee` / `histories` record and differ only in formatting conventions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Marker the model is told to use for any scalar the résumé does not supply.
pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TemplateId {
    Template1,
    Template2,
    /// Any identifier the registry does not know. Resolves to template1.
    #[default]
    Default,
}

impl TemplateId {
    pub fn parse(id: &str) -> Self {
        match id.trim().to_lowercase().as_str() {
            "template1" => Self::Template1,
            "template2" => Self::Template2,
            _ => Self::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Template1 => "template1",
            Self::Template2 => "template2",
            Self::Default => "default",
        }
    }
}

impl From<&str> for TemplateId {
    fn from(id: &str) -> Self {
        Self::parse(id)
    }
}

impl From<String> for TemplateId {
    fn from(id: String) -> Self {
        Self::parse(&id)
    }
}

impl From<TemplateId> for String {
    fn from(id: TemplateId) -> Self {
        id.as_str().to_string()
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the ordered lists under `histories`.
#[derive(Debug)]
pub struct HistorySection {
    pub name: &'static str,
    pub required_fields: &'static [&'static str],
    pub optional_fields: &'static [&'static str],
}

#[derive(Debug)]
pub struct SchemaSpec {
    pub id: TemplateId,
    pub name: &'static str,
    /// Sent verbatim as the system message.
    pub instructions: &'static str,
    pub placeholder: &'static str,
    pub top_level_keys: &'static [&'static str],
    pub employee_fields: &'static [&'static str],
    pub biodata_fields: &'static [&'static str],
    pub history_sections: &'static [HistorySection],
}

const TOP_LEVEL_KEYS: &[&str] = &["employee", "histories"];
const EMPLOYEE_FIELDS: &[&str] = &["name", "position", "email", "phone", "image"];
const BIODATA_FIELDS: &[&str] = &["profile", "objective", "placeOfBirth", "dateOfBirth", "gender"];

const HISTORY_SECTIONS: &[HistorySection] = &[
    HistorySection {
        name: "employment",
        required_fields: &["employer", "position", "from", "to"],
        optional_fields: &[],
    },
    HistorySection {
        name: "certification",
        required_fields: &["title", "provider", "date", "duration", "certificate"],
        optional_fields: &[],
    },
    HistorySection {
        name: "education",
        required_fields: &["school", "degree", "subject", "from", "to"],
        optional_fields: &["GPA"],
    },
    HistorySection {
        name: "project",
        required_fields: &[
            "projectName",
            "role",
            "from",
            "to",
            "customer",
            "projectDescription",
            "technicalInformation",
            "jobDescription",
        ],
        optional_fields: &[],
    },
];

const TEMPLATE1_INSTRUCTIONS: &str = concat!(
    "You are a CV parser that converts CV content into JSON format.\n",
    "Always return the JSON in this exact structure:\n",
    r#"{
  "employee": {
    "name": "Your Name",
    "position": "Your Position",
    "email": "Your Email",
    "phone": "Your Phone",
    "image": "Image URL",
    "biodata": {
      "profile": "Your profile description",
      "objective": "Your objectives or skills",
      "placeOfBirth": "Place of Birth",
      "dateOfBirth": "YYYY-MM-DD",
      "gender": "Male/Female"
    }
  },
  "histories": {
    "employment": [
      {
        "employer": "Employer Name",
        "position": "Position",
        "from": "Start Year",
        "to": "End Year or Present"
      }
    ],
    "certification": [
      {
        "title": "Certification Title",
        "provider": "Provider",
        "date": "Completion Date",
        "duration": "Duration",
        "certificate": "Yes/No"
      }
    ],
    "education": [
      {
        "school": "School Name",
        "degree": "Degree",
        "subject": "Subject",
        "from": "Start Year",
        "to": "End Year",
        "GPA": "GPA (optional)"
      }
    ],
    "project": [
      {
        "projectName": "Project Name",
        "role": "Your Role",
        "from": "Start Date",
        "to": "End Date or Present",
        "customer": "Customer",
        "projectDescription": "Brief description of the project",
        "technicalInformation": "Technical info or tools used",
        "jobDescription": "Your responsibilities in the project"
      }
    ]
  }
}"#,
    "\n",
    "Ensure all data is properly categorized and formatted according to this structure.\n",
    "If any information is not available in the CV, use \"-\" for string values\n",
    "and empty arrays [] for array values. For date fields, use \"YYYY\" format for years\n",
    "and \"YYYY-MM-DD\" for full dates. If a date is ongoing or current, use \"Present\".\n",
    "For the \"gender\" field, use either \"Male\", \"Female\", or \"-\".\n",
    "For the \"certificate\" field in certifications, use either \"Yes\", \"No\", or \"-\".\n",
    "The \"GPA\" field in education is optional; if it is not available, use \"-\".\n",
    "Ensure that all array fields (employment, certification, education, project)\n",
    "are always present, even if empty.\n",
    "Return only the JSON object, without markdown fences or commentary.",
);

const TEMPLATE2_INSTRUCTIONS: &str = concat!(
    "You are a CV parser that converts CV content into JSON format for a recruiter profile.\n",
    "Always return the JSON in this exact structure:\n",
    r#"{
  "employee": {
    "name": "Full Name",
    "position": "Most recent job title",
    "email": "Email",
    "phone": "Phone in international format",
    "image": "Image URL",
    "biodata": {
      "profile": "Summary of at most three sentences",
      "objective": "Comma-separated list of key skills",
      "placeOfBirth": "Place of Birth",
      "dateOfBirth": "YYYY-MM-DD",
      "gender": "Male/Female"
    }
  },
  "histories": {
    "employment": [
      { "employer": "Employer Name", "position": "Position", "from": "YYYY-MM", "to": "YYYY-MM or Present" }
    ],
    "certification": [
      { "title": "Certification Title", "provider": "Provider", "date": "YYYY-MM", "duration": "Duration", "certificate": "Yes/No" }
    ],
    "education": [
      { "school": "School Name", "degree": "Degree", "subject": "Subject", "from": "YYYY", "to": "YYYY", "GPA": "GPA (optional)" }
    ],
    "project": [
      {
        "projectName": "Project Name",
        "role": "Role",
        "from": "YYYY-MM",
        "to": "YYYY-MM or Present",
        "customer": "Customer",
        "projectDescription": "One-sentence description",
        "technicalInformation": "Comma-separated tools and technologies",
        "jobDescription": "Responsibilities in the project"
      }
    ]
  }
}"#,
    "\n",
    "List every array newest first.\n",
    "Use \"YYYY-MM\" when the month is known and \"YYYY\" otherwise; use \"Present\" for ongoing entries.\n",
    "If any information is not available in the CV, use \"-\" for string values\n",
    "and empty arrays [] for array values.\n",
    "For the \"gender\" field, use either \"Male\", \"Female\", or \"-\".\n",
    "For the \"certificate\" field in certifications, use either \"Yes\", \"No\", or \"-\".\n",
    "Ensure that all array fields (employment, certification, education, project)\n",
    "are always present, even if empty.\n",
    "Return only the JSON object, without markdown fences or commentary.",
);

static TEMPLATE1: SchemaSpec = SchemaSpec {
    id: TemplateId::Template1,
    name: "Template 1",
    instructions: TEMPLATE1_INSTRUCTIONS,
    placeholder: PLACEHOLDER,
    top_level_keys: TOP_LEVEL_KEYS,
    employee_fields: EMPLOYEE_FIELDS,
    biodata_fields: BIODATA_FIELDS,
    history_sections: HISTORY_SECTIONS,
};

static TEMPLATE2: SchemaSpec = SchemaSpec {
    id: TemplateId::Template2,
    name: "Template 2",
    instructions: TEMPLATE2_INSTRUCTIONS,
    placeholder: PLACEHOLDER,
    top_level_keys: TOP_LEVEL_KEYS,
    employee_fields: EMPLOYEE_FIELDS,
    biodata_fields: BIODATA_FIELDS,
    history_sections: HISTORY_SECTIONS,
};

/// Looks up the schema for a template. Total: `Default` resolves to template1.
pub fn resolve(id: TemplateId) -> &'static SchemaSpec {
    match id {
        TemplateId::Template1 | TemplateId::Default => &TEMPLATE1,
        TemplateId::Template2 => &TEMPLATE2,
    }
}

/// Every selectable template, in display order.
pub fn templates() -> [&'static SchemaSpec; 2] {
    [&TEMPLATE1, &TEMPLATE2]
}
