use gloo_net::http::Request;
use shared::api::{
    BookingResponse, CreateBookingRequest, EventTypeResponse, GetScheduleResponse,
    ListEventTypesResponse,
};
use uuid::Uuid;

const API_BASE_URL: &str = "/api";

pub struct ApiService;

impl ApiService {
    pub async fn list_event_types() -> Result<ListEventTypesResponse, String> {
        let url = format!("{}/event-types", API_BASE_URL);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("Request failed: {:?}", e))?;

        if !response.ok() {
            return Err(format!("HTTP error: {}", response.status()));
        }

        response
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {:?}", e))
    }

    pub async fn get_event_type(slug: &str) -> Result<EventTypeResponse, String> {
        let url = format!("{}/event-types/{}", API_BASE_URL, slug);

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("Request failed: {:?}", e))?;

        if !response.ok() {
            return Err(format!("HTTP error: {}", response.status()));
        }

        response
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {:?}", e))
    }

    /// Fetch the `{ slots }` availability mapping for one month
    /// (`month` formatted `YYYY-MM`).
    pub async fn get_schedule(
        event_type_id: Uuid,
        month: &str,
    ) -> Result<GetScheduleResponse, String> {
        let url = format!(
            "{}/schedule?event_type_id={}&month={}",
            API_BASE_URL, event_type_id, month
        );

        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("Request failed: {:?}", e))?;

        if !response.ok() {
            return Err(format!("HTTP error: {}", response.status()));
        }

        response
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {:?}", e))
    }

    pub async fn create_booking(request: CreateBookingRequest) -> Result<BookingResponse, String> {
        let url = format!("{}/bookings", API_BASE_URL);

        let response = Request::post(&url)
            .json(&request)
            .map_err(|e| format!("Failed to serialize request: {:?}", e))?
            .send()
            .await
            .map_err(|e| format!("Request failed: {:?}", e))?;

        if !response.ok() {
            return Err(format!("HTTP error: {}", response.status()));
        }

        response
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {:?}", e))
    }
}
