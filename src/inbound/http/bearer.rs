//! Bearer token extraction for per-user endpoints.
//!
//! Wraps the `Authorization` header so handlers only deal with verified
//! domain claims instead of raw header parsing.

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};

use crate::domain::{Error, TokenClaims, UserId};
use crate::inbound::http::state::HttpState;

/// Verified claims of the request's bearer token.
#[derive(Debug, Clone)]
pub struct BearerClaims(TokenClaims);

impl BearerClaims {
    /// The verified claims.
    pub fn claims(&self) -> &TokenClaims {
        &self.0
    }

    /// Require that the token belongs to `user_id` or return `403 Forbidden`.
    pub fn require_user(&self, user_id: &UserId) -> Result<(), Error> {
        if self.0.authorises(user_id) {
            Ok(())
        } else {
            Err(Error::forbidden("token does not grant access to this user"))
        }
    }
}

fn extract(req: &HttpRequest) -> Result<BearerClaims, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state missing from app data"))?;
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let raw = header_value
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    let token = raw
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::unauthorized("authorization scheme must be Bearer"))?;
    let claims = state
        .tokens
        .verify(token)
        .map_err(|_| Error::unauthorized("token is invalid or expired"))?;
    Ok(BearerClaims(claims))
}

impl FromRequest for BearerClaims {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::TokenClaims;

    fn claims_for(uid: UserId) -> BearerClaims {
        BearerClaims(TokenClaims {
            sub: "ada".to_owned(),
            uid,
            exp: i64::MAX,
        })
    }

    #[rstest]
    fn require_user_accepts_matching_id() {
        let uid = UserId::random();
        assert!(claims_for(uid).require_user(&uid).is_ok());
    }

    #[rstest]
    fn require_user_rejects_other_id() {
        let err = claims_for(UserId::random())
            .require_user(&UserId::random())
            .expect_err("mismatched user must be forbidden");
        assert_eq!(err.code(), crate::domain::ErrorCode::Forbidden);
    }
}
