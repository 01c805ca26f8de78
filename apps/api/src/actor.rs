//! Current actor context.
//!
//! Authentication lives in front of this service. The gateway forwards the verified
//! user id and role as `x-actor-id` / `x-actor-role`; handlers receive them as an
//! explicit `ActorContext` argument.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Professional,
    Company,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorContext {
    pub id: Uuid,
    pub role: ActorRole,
}

impl ActorContext {
    pub fn require_professional(&self) -> Result<(), AppError> {
        match self.role {
            ActorRole::Professional => Ok(()),
            ActorRole::Company => Err(AppError::Forbidden(
                "Only professional profiles can do this".to_string(),
            )),
        }
    }

    pub fn require_company(&self) -> Result<(), AppError> {
        match self.role {
            ActorRole::Company => Ok(()),
            ActorRole::Professional => Err(AppError::Forbidden(
                "Only company profiles can do this".to_string(),
            )),
        }
    }

    /// Ensures the actor is the company that owns a posting.
    pub fn require_owner(&self, company_id: Uuid) -> Result<(), AppError> {
        self.require_company()?;
        if self.id == company_id {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "This posting belongs to another company".to_string(),
            ))
        }
    }
}

fn parse_role(raw: &str) -> Option<ActorRole> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "professional" => Some(ActorRole::Professional),
        "company" => Some(ActorRole::Company),
        _ => None,
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ActorContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let id = header(ACTOR_ID_HEADER)
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .ok_or(AppError::Unauthorized)?;
        let role = header(ACTOR_ROLE_HEADER)
            .as_deref()
            .and_then(parse_role)
            .ok_or(AppError::Unauthorized)?;

        Ok(ActorContext { id, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(headers: &[(&str, &str)]) -> Result<ActorContext, AppError> {
        let mut builder = Request::builder().uri("/");
        for (k, v) in headers {
            builder = builder.header(*k, *v);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        ActorContext::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_extracts_actor_from_headers() {
        let id = Uuid::new_v4();
        let actor = extract(&[
            (ACTOR_ID_HEADER, &id.to_string()),
            (ACTOR_ROLE_HEADER, "Company"),
        ])
        .await
        .unwrap();
        assert_eq!(actor.id, id);
        assert_eq!(actor.role, ActorRole::Company);
    }

    #[tokio::test]
    async fn test_missing_headers_are_unauthorized() {
        assert!(matches!(extract(&[]).await, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_unknown_role_is_unauthorized() {
        let id = Uuid::new_v4().to_string();
        let result = extract(&[(ACTOR_ID_HEADER, &id), (ACTOR_ROLE_HEADER, "admin")]).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_owner_check_rejects_other_company() {
        let actor = ActorContext {
            id: Uuid::new_v4(),
            role: ActorRole::Company,
        };
        assert!(actor.require_owner(actor.id).is_ok());
        assert!(matches!(
            actor.require_owner(Uuid::new_v4()),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_professional_cannot_act_as_company() {
        let actor = ActorContext {
            id: Uuid::new_v4(),
            role: ActorRole::Professional,
        };
        assert!(actor.require_professional().is_ok());
        assert!(actor.require_company().is_err());
    }
}
