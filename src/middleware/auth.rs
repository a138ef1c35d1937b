use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,     // subject (email)
    pub exp: usize,      // expiration time
    pub iat: usize,      // issued at
    pub user_id: String, // hex ObjectId of the account
}

/// Server-wide signing secret. The fallback keeps local development and the
/// test suite working without an environment file.
pub fn jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "tripmind_dev_secret".to_string())
}

fn token_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    // Zero leeway: a token is rejected the minute its 24h window closes
    validation.leeway = 0;
    // iat and user_id are enforced by deserialization into Claims
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation
}

pub fn decode_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = jwt_secret();
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(key.as_bytes()),
        &token_validation(),
    )
    .map(|data| data.claims)
}

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let auth_header = match req.headers().get("Authorization") {
            Some(header) => header,
            None => {
                return Box::pin(ready(Err(
                    ApiError::Auth("Token is missing!".to_string()).into()
                )))
            }
        };

        let auth_str = match auth_header.to_str() {
            Ok(s) => s,
            Err(_) => {
                return Box::pin(ready(Err(ApiError::Auth(
                    "Token format is invalid!".to_string(),
                )
                .into())))
            }
        };

        let token = match auth_str.strip_prefix("Bearer ") {
            Some(token) if !token.is_empty() => token,
            _ => {
                return Box::pin(ready(Err(ApiError::Auth(
                    "Token format is invalid!".to_string(),
                )
                .into())))
            }
        };

        match decode_token(token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                Box::pin(self.service.call(req))
            }
            Err(err) => {
                println!("Error decoding token: {:?}", err);
                Box::pin(ready(Err(ApiError::Auth(format!(
                    "Token is invalid! {}",
                    err
                ))
                .into())))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn make_token(iat_offset_secs: i64, exp_offset_secs: i64) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "test@example.com".to_string(),
            iat: (now + iat_offset_secs) as usize,
            exp: (now + exp_offset_secs) as usize,
            user_id: "64b5f0a0a0a0a0a0a0a0a0a0".to_string(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(jwt_secret().as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn accepts_token_inside_validity_window() {
        // Issued now, one minute left of the 24h window
        let token = make_token(-(TOKEN_TTL_HOURS * 3600 - 60), 60);
        let claims = decode_token(&token).expect("token should still be valid");
        assert_eq!(claims.sub, "test@example.com");
    }

    #[test]
    fn rejects_token_past_validity_window() {
        // Expired one minute ago
        let token = make_token(-(TOKEN_TTL_HOURS * 3600 + 60), -60);
        let err = decode_token(&token).unwrap_err();
        assert!(matches!(
            err.kind(),
            jsonwebtoken::errors::ErrorKind::ExpiredSignature
        ));
    }

    #[test]
    fn rejects_token_signed_with_wrong_secret() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "test@example.com".to_string(),
            iat: now as usize,
            exp: (now + 3600) as usize,
            user_id: "64b5f0a0a0a0a0a0a0a0a0a0".to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"some_other_secret"),
        )
        .unwrap();
        assert!(decode_token(&token).is_err());
    }
}
