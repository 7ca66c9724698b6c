use crate::errors::RequestError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// Tokens are minted by the external identity provider; this service only
// verifies them against the shared JWT_SECRET.
#[derive(Debug, Serialize, Deserialize)]
struct AuthClaim {
    id: i64,
    exp: i64,
}

pub struct AuthUser {
    pub id: i64,
}

pub struct MaybeUser(pub Option<AuthUser>);

impl MaybeUser {
    pub fn get_id(&self) -> Option<i64> {
        self.0.as_ref().map(|a| a.id)
    }

    /// Resolves to the authenticated caller or rejects with a 401, for
    /// operations that are only defined for an identified user.
    pub fn require(self) -> Result<AuthUser, RequestError> {
        match self.0 {
            Some(user) => Ok(user),
            None => Err(RequestError::NotAuthorized("Need to be authorized")),
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync + 'static,
{
    type Rejection = RequestError;
    async fn from_request_parts(
        parts: &mut Parts,
        _: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let header = match parts.headers.get("Authorization") {
            Some(header) => header,
            None => return Ok(MaybeUser(None)),
        };
        let header = match header.to_str() {
            Ok(header) => header,
            Err(_) => return Err(RequestError::NotAuthorized("Invalid token")),
        };

        let token = match header.strip_prefix("Token ") {
            Some(token) => token,
            None => return Err(RequestError::NotAuthorized("Invalid token")),
        };

        let id = verify_jwt_token(token)?;

        Ok(MaybeUser(Some(AuthUser { id })))
    }
}

pub fn verify_jwt_token(token: &str) -> Result<i64, RequestError> {
    let jwt_secret = std::env::var("JWT_SECRET").map_err(|_| RequestError::ServerError)?;
    let token_data = jsonwebtoken::decode::<AuthClaim>(
        token,
        &jsonwebtoken::DecodingKey::from_secret(jwt_secret.as_ref()),
        &jsonwebtoken::Validation::default(),
    )
    .map_err(|_| RequestError::NotAuthorized("Invalid Token"))?;
    let claim = token_data.claims;
    if claim.exp < OffsetDateTime::now_utc().unix_timestamp() {
        return Err(RequestError::NotAuthorized("Token expired"));
    }
    Ok(claim.id)
}
