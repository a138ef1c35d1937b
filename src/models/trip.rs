use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Trip {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub name: String,
    pub destination: String,
    pub country: Option<String>,
    pub budget_type: Option<String>,
    // Trips saved from the planner flow carry no date range
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub plan_details: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct TripCreateRequest {
    pub city: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    pub notes: Option<String>,
    pub final_plan: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveTripRequest {
    pub city: String,
    pub country: String,
    #[serde(rename = "budgetType")]
    pub budget_type: String,
    pub final_plan: String,
}

#[derive(Debug, Serialize)]
pub struct TripSummary {
    pub id: String,
    pub name: String,
    pub dates: String,
    pub location: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TripDetail {
    pub id: String,
    pub name: String,
    pub city: String,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub plan_details: Option<String>,
}

impl From<Trip> for TripSummary {
    fn from(trip: Trip) -> Self {
        let dates = match (trip.start_date, trip.end_date) {
            (Some(start), Some(end)) => format!("{} - {}", start, end),
            _ => "Flexible dates".to_string(),
        };

        TripSummary {
            id: trip.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: trip.name,
            dates,
            location: trip.destination,
            description: trip.description,
        }
    }
}

impl From<Trip> for TripDetail {
    fn from(trip: Trip) -> Self {
        TripDetail {
            id: trip.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: trip.name,
            city: trip.destination,
            start_date: trip.start_date.map(|d| d.to_string()),
            end_date: trip.end_date.map(|d| d.to_string()),
            description: trip.description,
            plan_details: trip.plan_details,
        }
    }
}
