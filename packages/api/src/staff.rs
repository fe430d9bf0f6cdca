//! Staff server functions. All but login require a session token.

use dioxus::prelude::*;
use walkin_core::{QueueEntry, QueueSummary, Settings};

use crate::types::LoginResponse;

/// Exchange the staff credential for a session token.
#[post("/api/staff/login")]
pub async fn staff_login(username: String, password: String) -> Result<LoginResponse, ServerFnError> {
    #[cfg(feature = "server")]
    {
        let staff = crate::init::staff_auth().await?;

        staff.login(&username, &password).map_err(|e| {
            tracing::info!("Failed staff login for {:?}", username);
            ServerFnError::new(e.to_string())
        })
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Mark a called token as served.
#[post("/api/staff/complete/:token_no")]
pub async fn complete_token(token: String, token_no: String) -> Result<QueueEntry, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use walkin_core::TokenNo;

        crate::verify_staff(&token).await?;
        let token_no = TokenNo::parse(&token_no).map_err(crate::queue_error)?;

        crate::walk_in()
            .await?
            .complete(token_no)
            .await
            .map_err(crate::queue_error)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Mark a called token as a no-show.
#[post("/api/staff/skip/:token_no")]
pub async fn skip_token(token: String, token_no: String) -> Result<QueueEntry, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use walkin_core::TokenNo;

        crate::verify_staff(&token).await?;
        let token_no = TokenNo::parse(&token_no).map_err(crate::queue_error)?;

        crate::walk_in()
            .await?
            .skip(token_no)
            .await
            .map_err(crate::queue_error)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Clear the queue now. Returns how many entries were removed.
#[post("/api/staff/reset")]
pub async fn reset_queue(token: String) -> Result<u64, ServerFnError> {
    #[cfg(feature = "server")]
    {
        crate::verify_staff(&token).await?;

        let removed = crate::walk_in()
            .await?
            .clear_day()
            .await
            .map_err(crate::queue_error)?;

        tracing::info!("Queue reset by staff, {} entries removed", removed);
        Ok(removed)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Current queue settings.
#[get("/api/settings")]
pub async fn get_settings() -> Result<Settings, ServerFnError> {
    #[cfg(feature = "server")]
    {
        crate::walk_in()
            .await?
            .settings()
            .await
            .map_err(crate::queue_error)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Change the average service time used for estimates.
#[post("/api/staff/settings")]
pub async fn update_settings(
    token: String,
    avg_service_time_minutes: f64,
) -> Result<Settings, ServerFnError> {
    #[cfg(feature = "server")]
    {
        crate::verify_staff(&token).await?;
        let settings = Settings::new(avg_service_time_minutes).map_err(crate::queue_error)?;

        crate::walk_in()
            .await?
            .update_settings(settings)
            .await
            .map_err(crate::queue_error)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Counts per status and the token being served, for display boards.
#[get("/api/walkin/summary")]
pub async fn queue_summary() -> Result<QueueSummary, ServerFnError> {
    #[cfg(feature = "server")]
    {
        crate::walk_in()
            .await?
            .summary()
            .await
            .map_err(crate::queue_error)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}
