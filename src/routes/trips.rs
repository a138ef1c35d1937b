use actix_web::{web, HttpResponse};
use bson::doc;
use chrono::{NaiveDate, Utc};
use futures::TryStreamExt;
use mongodb::{bson::oid::ObjectId, Client};
use serde_json::json;
use std::sync::Arc;

use crate::db::mongo::{DB_NAME, TRIPS_COLLECTION};
use crate::errors::ApiError;
use crate::middleware::auth::Claims;
use crate::models::trip::{SaveTripRequest, Trip, TripCreateRequest, TripDetail, TripSummary};

fn trips_collection(client: &Client) -> mongodb::Collection<Trip> {
    client.database(DB_NAME).collection(TRIPS_COLLECTION)
}

fn owner_id(claims: &Claims) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(&claims.user_id)
        .map_err(|_| ApiError::Auth("Token is invalid! Unknown user id".to_string()))
}

fn parse_trip_date(value: Option<&str>, field: &str) -> Result<NaiveDate, ApiError> {
    let raw = match value {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => {
            return Err(ApiError::Validation(format!(
                "{} is required (YYYY-MM-DD)",
                field
            )))
        }
    };

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        ApiError::Validation(format!("{} must be a valid date (YYYY-MM-DD)", field))
    })
}

/*
    POST /api/trips
*/
pub async fn create_trip(
    claims: web::ReqData<Claims>,
    data: web::Data<Arc<Client>>,
    input: web::Json<TripCreateRequest>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();

    let city = input
        .city
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("city is required".to_string()))?;

    let start_date = parse_trip_date(input.start_date.as_deref(), "startDate")?;
    let end_date = parse_trip_date(input.end_date.as_deref(), "endDate")?;
    if start_date > end_date {
        return Err(ApiError::Validation(
            "startDate must not be after endDate".to_string(),
        ));
    }

    let user_id = owner_id(&claims)?;
    let curr_time = Utc::now();

    let trip = Trip {
        id: None,
        user_id,
        name: format!("{} Adventure", city),
        destination: city,
        country: None,
        budget_type: None,
        start_date: Some(start_date),
        end_date: Some(end_date),
        description: input.notes,
        plan_details: input.final_plan,
        created_at: Some(curr_time),
        updated_at: Some(curr_time),
    };

    let result = trips_collection(&data).insert_one(&trip).await?;
    let trip_id = result
        .inserted_id
        .as_object_id()
        .map(|id| id.to_hex())
        .unwrap_or_default();

    Ok(HttpResponse::Created().json(json!({
        "message": "Trip created!",
        "trip_id": trip_id
    })))
}

/*
    GET /api/trips
*/
pub async fn list_trips(
    claims: web::ReqData<Claims>,
    data: web::Data<Arc<Client>>,
) -> Result<HttpResponse, ApiError> {
    let user_id = owner_id(&claims)?;

    let cursor = trips_collection(&data)
        .find(doc! { "user_id": user_id })
        .sort(doc! { "created_at": -1 })
        .await?;
    let trips: Vec<Trip> = cursor.try_collect().await?;

    let summaries: Vec<TripSummary> = trips.into_iter().map(TripSummary::from).collect();
    Ok(HttpResponse::Ok().json(summaries))
}

/*
    GET /api/trips/{id}
*/
pub async fn get_trip(
    claims: web::ReqData<Claims>,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = owner_id(&claims)?;

    // A malformed id is indistinguishable from an unknown one
    let trip_id = ObjectId::parse_str(path.into_inner().as_str())
        .map_err(|_| ApiError::NotFound("Trip not found".to_string()))?;

    // Filtering on owner makes someone else's trip look like a missing one
    match trips_collection(&data)
        .find_one(doc! { "_id": trip_id, "user_id": user_id })
        .await?
    {
        Some(trip) => Ok(HttpResponse::Ok().json(TripDetail::from(trip))),
        None => Err(ApiError::NotFound("Trip not found".to_string())),
    }
}

/*
    POST /api/save-trip (planner flow)
*/
pub async fn save_trip(
    claims: web::ReqData<Claims>,
    data: web::Data<Arc<Client>>,
    input: web::Json<SaveTripRequest>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();

    if input.city.trim().is_empty() {
        return Err(ApiError::Validation("city is required".to_string()));
    }

    let user_id = owner_id(&claims)?;
    let curr_time = Utc::now();

    let trip = Trip {
        id: None,
        user_id,
        name: format!("{} Adventure", input.city),
        destination: input.city,
        country: Some(input.country),
        budget_type: Some(input.budget_type),
        start_date: None,
        end_date: None,
        description: None,
        plan_details: Some(input.final_plan),
        created_at: Some(curr_time),
        updated_at: Some(curr_time),
    };

    trips_collection(&data).insert_one(&trip).await?;

    Ok(HttpResponse::Ok().json(json!({ "status": "saved" })))
}
