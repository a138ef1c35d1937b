use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::errors::ApiError;
use crate::models::planner::{CitySearchRequest, PlanModifyRequest, PlanRequest};
use crate::services::planner_service::PlannerService;

/*
    POST /api/create-agentic-plan
*/
pub async fn create_agentic_plan(
    planner: web::Data<PlannerService>,
    input: web::Json<PlanRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = input.into_inner();

    let outcome = planner.generate_trip_plan(&request).await;
    let source = outcome.source();

    Ok(HttpResponse::Ok().json(json!({
        "plan": outcome.into_inner(),
        "source": source
    })))
}

/*
    POST /api/modify-plan
*/
pub async fn modify_plan(
    planner: web::Data<PlannerService>,
    input: web::Json<PlanModifyRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = input.into_inner();

    let outcome = planner
        .modify_plan(&request.current_plan, &request.user_instruction)
        .await;
    let source = outcome.source();

    Ok(HttpResponse::Ok().json(json!({
        "plan": outcome.into_inner(),
        "source": source
    })))
}

/*
    POST /api/search-cities
*/
pub async fn search_cities(
    planner: web::Data<PlannerService>,
    input: web::Json<CitySearchRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = input.into_inner();

    let outcome = planner.search_cities(&request.query).await;
    let source = outcome.source();

    Ok(HttpResponse::Ok().json(json!({
        "cities": outcome.into_inner(),
        "source": source
    })))
}
