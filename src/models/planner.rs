use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct PlanRequest {
    pub city: String,
    pub country: String,
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
    #[serde(rename = "budgetType")]
    pub budget_type: String,
    #[serde(rename = "budgetAmount", default)]
    pub budget_amount: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlanModifyRequest {
    pub current_plan: String,
    pub user_instruction: String,
}

#[derive(Debug, Deserialize)]
pub struct CitySearchRequest {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub name: String,
    pub rating: f32,
    #[serde(rename = "type")]
    pub category: String,
    pub img: String,
    pub description: String,
}
