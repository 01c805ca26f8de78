//! Resume extraction: reads an uploaded document and returns profile fields.
//!
//! The document goes inline (base64) with its media type. Only `fullName`, `email`
//! and `mainSkill` are required; every other field stays `None` when the document
//! does not provide it.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::with_json_rule;
use crate::llm_client::{
    complete_json, CompletionError, CompletionRequest, Part, StructuredCompletion,
};

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Exact types accepted besides any `image/*`.
pub const SUPPORTED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    DOCX_MIME,
    "text/plain",
];

/// Declared by clients that do not know the type; resolved from the file name.
const GENERIC_MIME: &str = "application/octet-stream";

const EXTRACTION_SYSTEM: &str = "You extract structured candidate data from resumes. \
    Copy values as written in the document. Never invent data that is not present.";

const EXTRACTION_INSTRUCTION: &str = "Extract name, e-mail, main skill, experiences, education, \
    CERTIFICATIONS and PERSONAL PROJECTS/PORTFOLIO as JSON.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedExperience {
    pub role: Option<String>,
    pub company: Option<String>,
    pub period: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedEducation {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeExtraction {
    pub full_name: String,
    pub email: String,
    pub main_skill: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiences: Option<Vec<ExtractedExperience>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<ExtractedEducation>>,
}

fn string_array() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

fn object_array(fields: &[&str]) -> Value {
    let properties: serde_json::Map<String, Value> = fields
        .iter()
        .map(|f| (f.to_string(), json!({ "type": "STRING" })))
        .collect();
    json!({
        "type": "ARRAY",
        "items": { "type": "OBJECT", "properties": properties }
    })
}

pub fn resume_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "fullName": { "type": "STRING" },
            "email": { "type": "STRING" },
            "mainSkill": { "type": "STRING" },
            "certifications": string_array(),
            "projects": string_array(),
            "experiences": object_array(&["role", "company", "period"]),
            "education": object_array(&["degree", "institution", "year"])
        },
        "required": ["fullName", "email", "mainSkill"]
    })
}

/// Normalizes a declared content type (`application/pdf; charset=..`) and checks support.
pub fn normalize_mime(raw: &str) -> Result<String, AppError> {
    let mime = raw
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let image = mime
        .strip_prefix("image/")
        .is_some_and(|subtype| !subtype.is_empty());
    if image || SUPPORTED_MIME_TYPES.contains(&mime.as_str()) {
        Ok(mime)
    } else {
        Err(AppError::Validation(format!(
            "Unsupported document type '{raw}'. Accepted: {}, image/*",
            SUPPORTED_MIME_TYPES.join(", ")
        )))
    }
}

fn mime_for_extension(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let mime = match ext.to_ascii_lowercase().as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => DOCX_MIME,
        "txt" => "text/plain",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "gif" => "image/gif",
        _ => return None,
    };
    Some(mime)
}

/// Picks the media type for an upload part. A missing or generic declared type
/// falls back to the file extension.
pub fn resolve_mime(declared: Option<&str>, file_name: Option<&str>) -> Result<String, AppError> {
    let declared = declared.map(str::trim).filter(|d| !d.is_empty());
    let generic = declared.map_or(true, |d| d.eq_ignore_ascii_case(GENERIC_MIME));
    if !generic {
        return normalize_mime(declared.unwrap_or_default());
    }
    match file_name.and_then(mime_for_extension) {
        Some(mime) => Ok(mime.to_string()),
        None => Err(AppError::Validation(format!(
            "Could not determine the document type of '{}'. Upload a PDF, Word or image file",
            file_name.unwrap_or("upload")
        ))),
    }
}

pub async fn extract_resume(
    completion: &dyn StructuredCompletion,
    model: &str,
    bytes: &[u8],
    mime_type: &str,
) -> Result<ResumeExtraction, AppError> {
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded document is empty".to_string()));
    }
    let mime = normalize_mime(mime_type)?;

    let request = CompletionRequest {
        model: model.to_string(),
        system: Some(with_json_rule(EXTRACTION_SYSTEM)),
        parts: vec![
            Part::inline_data(bytes, mime.as_str()),
            Part::text(EXTRACTION_INSTRUCTION),
        ],
        schema: resume_response_schema(),
    };

    let extraction: ResumeExtraction = complete_json(completion, &request)
        .await
        .map_err(|e| {
            warn!(%model, "resume extraction failed: {e}");
            CompletionError::from(e)
        })?;

    info!(
        %model,
        mime = %mime,
        size = bytes.len(),
        "resume extracted"
    );
    Ok(extraction)
}
