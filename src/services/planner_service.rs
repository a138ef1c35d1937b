use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::error::Error;
use std::fmt;
use std::time::Duration;

use crate::models::planner::{CitySuggestion, PlanRequest};

const DEFAULT_MODEL: &str = "google/gemini-3-flash-preview";
const DEFAULT_API_BASE: &str = "https://api.bytez.com/models/v2";
const REQUEST_TIMEOUT_SECS: u64 = 30;

const MIN_SUGGESTIONS: usize = 4;
const MAX_SUGGESTIONS: usize = 6;
const MIN_RATING: f32 = 4.5;
const MAX_RATING: f32 = 5.0;

/// Outcome of a planner operation. Every operation succeeds from the caller's
/// point of view; `Fallback` marks content that was substituted because the
/// model could not be called or its response could not be used.
#[derive(Debug, Clone, PartialEq)]
pub enum AiOutcome<T> {
    Generated(T),
    Fallback(T),
}

impl<T> AiOutcome<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, AiOutcome::Fallback(_))
    }

    pub fn source(&self) -> &'static str {
        match self {
            AiOutcome::Generated(_) => "model",
            AiOutcome::Fallback(_) => "fallback",
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            AiOutcome::Generated(value) | AiOutcome::Fallback(value) => value,
        }
    }
}

#[derive(Debug)]
pub enum PlannerError {
    MissingCredential,
    HttpError(reqwest::Error),
    ResponseError(String),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerError::MissingCredential => write!(f, "No model credential configured"),
            PlannerError::HttpError(err) => write!(f, "HTTP error: {}", err),
            PlannerError::ResponseError(msg) => write!(f, "Response error: {}", msg),
        }
    }
}

impl Error for PlannerError {}

impl From<reqwest::Error> for PlannerError {
    fn from(err: reqwest::Error) -> Self {
        PlannerError::HttpError(err)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ModelRunRequest {
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ModelRunResponse {
    error: Option<String>,
    output: Option<Vec<ChatMessage>>,
}

#[derive(Clone)]
pub struct PlannerService {
    client: Client,
    api_key: Option<String>,
    model: String,
    api_base: String,
}

impl PlannerService {
    pub fn from_env() -> Self {
        let api_key = env::var("BYTEZ_API_KEY")
            .ok()
            .filter(|key| is_real_key(key));
        if api_key.is_none() {
            println!("PlannerService: no model credential configured, serving fallback content");
        }

        let model = env::var("BYTEZ_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let api_base = env::var("BYTEZ_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            model,
            api_base,
        }
    }

    /// A service with no credential: every operation takes the fallback path
    /// without touching the network. Used by tests and demo deployments.
    pub fn without_credential() -> Self {
        Self {
            client: Client::new(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn generate_trip_plan(&self, request: &PlanRequest) -> AiOutcome<String> {
        match self.run_model(&generation_prompt(request)).await {
            Ok(text) => AiOutcome::Generated(text),
            Err(err) => {
                eprintln!("AI generation failed: {}", err);
                AiOutcome::Fallback(fallback_plan(&request.city, &request.country))
            }
        }
    }

    pub async fn modify_plan(&self, current_plan: &str, instruction: &str) -> AiOutcome<String> {
        match self.run_model(&modification_prompt(current_plan, instruction)).await {
            Ok(text) => AiOutcome::Generated(text),
            Err(err) => {
                eprintln!("AI modification failed: {}", err);
                AiOutcome::Fallback(fallback_modification(current_plan, instruction))
            }
        }
    }

    pub async fn search_cities(&self, query: &str) -> AiOutcome<Vec<CitySuggestion>> {
        let result = match self.run_model(&search_prompt(query)).await {
            Ok(text) => parse_city_suggestions(&text),
            Err(err) => Err(err),
        };

        match result {
            Ok(cities) => AiOutcome::Generated(cities),
            Err(err) => {
                eprintln!("AI city search failed: {}", err);
                AiOutcome::Fallback(fallback_cities())
            }
        }
    }

    /// Single attempt against the model endpoint. No retries; callers fall
    /// back on any error.
    async fn run_model(&self, prompt: &str) -> Result<String, PlannerError> {
        let api_key = self.api_key.as_ref().ok_or(PlannerError::MissingCredential)?;

        let url = format!("{}/{}", self.api_base, self.model);
        let request = ModelRunRequest {
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Key {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PlannerError::ResponseError(format!(
                "Model request failed with status {}: {}",
                status, error_text
            )));
        }

        let parsed: ModelRunResponse = response.json().await.map_err(|e| {
            PlannerError::ResponseError(format!("Failed to parse model response: {}", e))
        })?;

        if let Some(error) = parsed.error {
            return Err(PlannerError::ResponseError(error));
        }

        parsed
            .output
            .and_then(|output| output.into_iter().next())
            .map(|message| message.content)
            .ok_or_else(|| PlannerError::ResponseError("Model returned no output".to_string()))
    }
}

/// A key is only trusted when it is non-empty and not the repository's
/// starred-out placeholder.
fn is_real_key(key: &str) -> bool {
    !key.trim().is_empty() && !key.contains('*')
}

fn generation_prompt(request: &PlanRequest) -> String {
    let budget = match &request.budget_amount {
        Some(amount) => format!("{} (around {})", request.budget_type, amount),
        None => request.budget_type.clone(),
    };
    let notes = request.notes.as_deref().unwrap_or("none");

    format!(
        "You are a professional AI travel planner.\n\
         Create a detailed day-by-day itinerary for a trip to {city}, {country} \
         from {start} to {end}.\n\
         Budget tier: {budget}. Traveler notes: {notes}.\n\
         Structure each day as 'Day N: <title>' with Morning, Afternoon, Evening \
         and Food sections listing concrete places with one-line descriptions.\n\
         Return plain text only.",
        city = request.city,
        country = request.country,
        start = request.start_date,
        end = request.end_date,
        budget = budget,
        notes = notes,
    )
}

fn modification_prompt(current_plan: &str, instruction: &str) -> String {
    format!(
        "You are a professional AI travel planner.\n\
         Revise the following itinerary according to the instruction, keeping \
         the same 'Day N' structure and returning the full revised plan as \
         plain text.\n\nInstruction: {instruction}\n\nItinerary:\n{current_plan}",
    )
}

fn search_prompt(query: &str) -> String {
    format!(
        "You are a professional AI travel planner.\n\
         Suggest between {MIN_SUGGESTIONS} and {MAX_SUGGESTIONS} destinations matching: {query}.\n\
         Respond with ONLY a JSON array, each element an object with keys \
         \"name\", \"rating\" (number between {MIN_RATING} and {MAX_RATING}), \"type\", \
         \"img\" (image URL) and \"description\" (one sentence).",
    )
}

/// The model is asked for a bare JSON array but will occasionally wrap it in
/// markdown fences or prose. Extract the array, parse it, and hold it to the
/// suggestion contract; any miss is reported as a response error so the
/// caller falls back.
fn parse_city_suggestions(text: &str) -> Result<Vec<CitySuggestion>, PlannerError> {
    let start = text.find('[');
    let end = text.rfind(']');
    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => {
            return Err(PlannerError::ResponseError(
                "Model response contained no JSON array".to_string(),
            ))
        }
    };

    let mut cities: Vec<CitySuggestion> = serde_json::from_str(json).map_err(|e| {
        PlannerError::ResponseError(format!("Failed to parse city suggestions: {}", e))
    })?;

    if cities.len() < MIN_SUGGESTIONS {
        return Err(PlannerError::ResponseError(format!(
            "Model returned {} suggestions, expected at least {}",
            cities.len(),
            MIN_SUGGESTIONS
        )));
    }
    cities.truncate(MAX_SUGGESTIONS);

    for city in &mut cities {
        city.rating = city.rating.clamp(MIN_RATING, MAX_RATING);
    }

    Ok(cities)
}

pub fn fallback_plan(city: &str, country: &str) -> String {
    format!(
        "Day 1: {city} Exploration\n\
         Morning:\n\
         - City Center Square - Historic gathering place with beautiful architecture.\n\
         - Central Cathedral - 12th-century cathedral with stunning stained glass.\n\
         Afternoon:\n\
         - National Museum - Cultural history of {country}.\n\
         - River Walk - Scenic promenade perfect for photos.\n\
         Evening:\n\
         - Sunset Point - Best view of the city line.\n\
         Food:\n\
         - Local Bistro - Try the traditional spiced stew.\n\
         \n\
         Day 2: Adventure & Culture\n\
         Morning:\n\
         - Botanical Gardens - Lush greenery and exotic plants.\n\
         Afternoon:\n\
         - Old Market - Shopping for handicrafts and souvenirs.\n\
         Evening:\n\
         - Cultural Show - Traditional dance performance.\n\
         Food:\n\
         - Street Food Alley - Famous for local snacks.",
    )
}

pub fn fallback_modification(current_plan: &str, instruction: &str) -> String {
    format!(
        "{current_plan}\n\n[NOTE: AI Modification simulated due to missing API Key. User asked: {instruction}]",
    )
}

pub fn fallback_cities() -> Vec<CitySuggestion> {
    vec![
        CitySuggestion {
            name: "Kyoto, Japan".to_string(),
            rating: 4.8,
            category: "Historic".to_string(),
            img: "https://images.unsplash.com/photo-1493976040374-85c8e12f0c0e?auto=format&fit=crop&q=80&w=400".to_string(),
            description: "Temples, tea houses and gardens from Japan's imperial past".to_string(),
        },
        CitySuggestion {
            name: "Santorini, Greece".to_string(),
            rating: 4.9,
            category: "Romantic".to_string(),
            img: "https://images.unsplash.com/photo-1570077188670-e3a8d69ac5ff?auto=format&fit=crop&q=80&w=400".to_string(),
            description: "Whitewashed cliff villages above the Aegean caldera".to_string(),
        },
        CitySuggestion {
            name: "New York, USA".to_string(),
            rating: 4.7,
            category: "Urban".to_string(),
            img: "https://images.unsplash.com/photo-1496442226666-8d4d0e62e6e9?auto=format&fit=crop&q=80&w=400".to_string(),
            description: "Museums, skyline views and food from every corner of the world".to_string(),
        },
        CitySuggestion {
            name: "Cape Town, SA".to_string(),
            rating: 4.6,
            category: "Adventure".to_string(),
            img: "https://images.unsplash.com/photo-1580060839134-75a5edca2e99?auto=format&fit=crop&q=80&w=400".to_string(),
            description: "Table Mountain hikes, beaches and winelands in one trip".to_string(),
        },
    ]
}
