use actix_web::{web, HttpResponse};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::Client;
use serde_json::json;
use std::sync::Arc;

use crate::db::mongo::{DB_NAME, USERS_COLLECTION};
use crate::errors::ApiError;
use crate::middleware::auth::{jwt_secret, Claims, TOKEN_TTL_HOURS};
use crate::models::user::{LoginRequest, LoginResponse, RegisterRequest, User, UserSummary};

pub(crate) fn users_collection(client: &Client) -> mongodb::Collection<User> {
    client.database(DB_NAME).collection(USERS_COLLECTION)
}

pub async fn register(
    data: web::Data<Arc<Client>>,
    input: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();

    let email = input.email.filter(|e| !e.trim().is_empty());
    let password = input.password.filter(|p| !p.is_empty());
    let (email, password) = match (email, password) {
        (Some(email), Some(password)) => (email, password),
        _ => return Err(ApiError::Validation("Missing required fields".to_string())),
    };

    if !is_valid_email(&email) {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }

    let collection = users_collection(&data);

    if collection.find_one(doc! { "email": &email }).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

    let curr_time = Utc::now();
    let user = User {
        id: None,
        full_name: input.name.unwrap_or_default(),
        email,
        password: password_hash,
        last_signin: None,
        failed_signins: None,
        created_at: Some(curr_time),
        updated_at: Some(curr_time),
    };

    match collection.insert_one(&user).await {
        Ok(_) => Ok(HttpResponse::Created().json(json!({
            "message": "User registered successfully"
        }))),
        // The unique email index closes the race the find_one check leaves open
        Err(err) => Err(map_insert_error(err)),
    }
}

pub async fn login(
    data: web::Data<Arc<Client>>,
    input: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();

    let email = input.email.filter(|e| !e.is_empty());
    let password = input.password.filter(|p| !p.is_empty());
    let (email, password) = match (email, password) {
        (Some(email), Some(password)) => (email, password),
        _ => return Err(ApiError::Validation("Missing data".to_string())),
    };

    let collection = users_collection(&data);

    // Unknown email and wrong password are indistinguishable to the caller
    let user = match collection.find_one(doc! { "email": &email }).await? {
        Some(user) => user,
        None => return Err(ApiError::Auth("Invalid credentials".to_string())),
    };

    if !bcrypt::verify(&password, &user.password).unwrap_or(false) {
        let failed_signins = user.failed_signins.unwrap_or(0) + 1;
        let update = doc! { "$set": { "failed_signins": failed_signins } };
        if let Err(err) = collection.update_one(doc! { "email": &email }, update).await {
            eprintln!("Failed to update failed signins: {:?}", err);
        }
        return Err(ApiError::Auth("Invalid credentials".to_string()));
    }

    let user_id = user
        .id
        .ok_or_else(|| ApiError::Internal("User record missing id".to_string()))?;

    let update = doc! {
        "$set": {
            "last_signin": Utc::now().to_rfc3339(),
            "failed_signins": 0
        }
    };
    if let Err(err) = collection.update_one(doc! { "email": &email }, update).await {
        eprintln!("Failed to update signin bookkeeping: {:?}", err);
    }

    let token = generate_token(&user.email, user_id)
        .map_err(|_| ApiError::Internal("Token generation failed".to_string()))?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        user: UserSummary {
            id: user_id.to_hex(),
            name: user.full_name,
            email: user.email,
        },
    }))
}

pub fn generate_token(
    email: &str,
    user_id: ObjectId,
) -> Result<String, jsonwebtoken::errors::Error> {
    let secret = jwt_secret();
    let now = Utc::now();

    let claims = Claims {
        sub: email.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
        user_id: user_id.to_hex(),
    };

    let header = Header::new(Algorithm::HS256);
    encode(&header, &claims, &EncodingKey::from_secret(secret.as_ref()))
}

fn is_valid_email(email: &str) -> bool {
    let re = regex::Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*$",
    );
    re.map(|re| re.is_match(email)).unwrap_or(false)
}

fn map_insert_error(err: mongodb::error::Error) -> ApiError {
    if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = &*err.kind {
        if write_error.code == 11000 {
            return ApiError::Conflict("User already exists".to_string());
        }
    }
    ApiError::Database(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::decode_token;

    #[test]
    fn accepts_plain_addresses_and_rejects_garbage() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("traveler+kyoto@example.co.uk"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@domain@twice.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn issued_tokens_decode_to_the_same_identity() {
        let user_id = ObjectId::new();
        let token = generate_token("a@b.com", user_id).unwrap();
        let claims = decode_token(&token).unwrap();
        assert_eq!(claims.sub, "a@b.com");
        assert_eq!(claims.user_id, user_id.to_hex());
        assert_eq!(claims.exp - claims.iat, (TOKEN_TTL_HOURS * 3600) as usize);
    }
}
