//! WhatsApp contact links opened after an application or from the review screen.

use reqwest::Url;

use crate::errors::AppError;
use crate::marketplace::models::JobPosting;

const WA_BASE: &str = "https://wa.me";
const DEFAULT_CANDIDATE_NAME: &str = "Candidato(a)";

/// Greeting sent by the candidate right after applying (or re-applying).
pub fn candidate_greeting(candidate_name: &str, job: &JobPosting) -> String {
    let name = match candidate_name.trim() {
        "" => DEFAULT_CANDIDATE_NAME,
        name => name,
    };
    format!(
        "Olá! Sou o(a) {name}. Me candidatei à vaga de \"{}\" em {} através do JOBWAY e gostaria de dar continuidade ao processo seletivo!",
        job.title, job.city
    )
}

/// Greeting a company sends to a candidate it is reviewing.
pub fn company_greeting(candidate_name: &str, job: &JobPosting) -> String {
    format!(
        "Olá {}, vimos sua candidatura para {} no JOBWAY!",
        candidate_name.trim(),
        job.title
    )
}

/// `https://wa.me/<phone>?text=<urlencoded message>`
pub fn whatsapp_link(phone: &str, message: &str) -> Result<String, AppError> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(AppError::Internal(anyhow::anyhow!(
            "contact phone has no digits: '{phone}'"
        )));
    }
    let url = Url::parse_with_params(&format!("{WA_BASE}/{digits}"), &[("text", message)])
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid contact link: {e}")))?;
    Ok(url.to_string())
}
