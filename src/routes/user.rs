use actix_web::{web, HttpResponse};
use chrono::Utc;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::Client;
use serde_json::json;
use std::sync::Arc;

use crate::db::mongo::{DB_NAME, TRIPS_COLLECTION};
use crate::errors::ApiError;
use crate::middleware::auth::Claims;
use crate::models::trip::Trip;
use crate::models::user::{PasswordUpdateRequest, User, UserProfile};
use crate::routes::auth::users_collection;

/// Resolves token claims to a live account. A token whose account has been
/// deleted since issuance is treated as invalid, not as an anonymous caller.
pub(crate) async fn resolve_user(client: &Client, claims: &Claims) -> Result<User, ApiError> {
    let user_id = ObjectId::parse_str(&claims.user_id)
        .map_err(|_| ApiError::Auth("Token is invalid! Unknown user id".to_string()))?;

    match users_collection(client)
        .find_one(doc! { "_id": user_id })
        .await?
    {
        Some(user) => Ok(user),
        None => Err(ApiError::Auth(
            "Token is invalid! Account no longer exists".to_string(),
        )),
    }
}

pub async fn profile(
    claims: web::ReqData<Claims>,
    data: web::Data<Arc<Client>>,
) -> Result<HttpResponse, ApiError> {
    let user = resolve_user(&data, &claims).await?;

    Ok(HttpResponse::Ok().json(UserProfile {
        id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
        name: user.full_name,
        email: user.email,
        created_at: user.created_at,
    }))
}

pub async fn update_password(
    claims: web::ReqData<Claims>,
    data: web::Data<Arc<Client>>,
    input: web::Json<PasswordUpdateRequest>,
) -> Result<HttpResponse, ApiError> {
    let new_password = input
        .into_inner()
        .new_password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::Validation("New password required".to_string()))?;

    let user = resolve_user(&data, &claims).await?;
    let user_id = user
        .id
        .ok_or_else(|| ApiError::Internal("User record missing id".to_string()))?;

    let password_hash = bcrypt::hash(new_password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

    let update = doc! {
        "$set": {
            "password": password_hash,
            "updated_at": Utc::now().to_rfc3339()
        }
    };
    users_collection(&data)
        .update_one(doc! { "_id": user_id }, update)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Password updated successfully" })))
}

pub async fn delete_account(
    claims: web::ReqData<Claims>,
    data: web::Data<Arc<Client>>,
) -> Result<HttpResponse, ApiError> {
    let user = resolve_user(&data, &claims).await?;
    let user_id = user
        .id
        .ok_or_else(|| ApiError::Internal("User record missing id".to_string()))?;

    // Trips go with the account
    let trips: mongodb::Collection<Trip> = data.database(DB_NAME).collection(TRIPS_COLLECTION);
    trips.delete_many(doc! { "user_id": user_id }).await?;

    users_collection(&data)
        .delete_one(doc! { "_id": user_id })
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Account deleted successfully" })))
}
