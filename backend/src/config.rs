use anyhow::{Context, Result};
use std::env;

/// OAuth client settings for the Zoom integration
#[derive(Debug, Clone)]
pub struct ZoomConfig {
    pub client_id: String,
    pub client_secret: String,
}

/// OAuth client settings for the Zoho Calendar integration
#[derive(Debug, Clone)]
pub struct ZohoConfig {
    pub client_id: String,
    pub client_secret: String,
    pub calendar_uid: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub frontend_dir: String,
    /// None when the Zoom env vars are absent; video bookings then fall back
    /// to no meeting link
    pub zoom: Option<ZoomConfig>,
    pub zoho: Option<ZohoConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid number")?;

        let frontend_dir =
            env::var("FRONTEND_DIR").unwrap_or_else(|_| "frontend/dist".to_string());

        let zoom = match (env::var("ZOOM_CLIENT_ID"), env::var("ZOOM_CLIENT_SECRET")) {
            (Ok(client_id), Ok(client_secret)) => Some(ZoomConfig {
                client_id,
                client_secret,
            }),
            _ => None,
        };

        let zoho = match (env::var("ZOHO_CLIENT_ID"), env::var("ZOHO_CLIENT_SECRET")) {
            (Ok(client_id), Ok(client_secret)) => Some(ZohoConfig {
                client_id,
                client_secret,
                calendar_uid: env::var("ZOHO_CALENDAR_UID")
                    .unwrap_or_else(|_| "primary".to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            port,
            frontend_dir,
            zoom,
            zoho,
        })
    }
}
