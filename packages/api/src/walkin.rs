//! Walk-in server functions: intake and the public queue views.

use dioxus::prelude::*;
use walkin_core::QueueEntry;

use crate::types::{CallNextResponse, CurrentTokenResponse, EnqueueResponse, EtaResponse};

/// Issue a token to a walk-in patient.
#[post("/api/walkin/enqueue")]
pub async fn enqueue_walk_in(
    patient_ref: Option<String>,
    doctor_ref: Option<String>,
) -> Result<EnqueueResponse, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use walkin_core::NewEntry;

        let entry = crate::walk_in()
            .await?
            .enqueue(NewEntry::new(patient_ref, doctor_ref))
            .await
            .map_err(crate::queue_error)?;

        Ok(EnqueueResponse {
            token_no: entry.token_no.get(),
        })
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Every entry of the current operating day, by ascending token.
#[get("/api/walkin/queue")]
pub async fn list_queue() -> Result<Vec<QueueEntry>, ServerFnError> {
    #[cfg(feature = "server")]
    {
        crate::walk_in()
            .await?
            .list_queue()
            .await
            .map_err(crate::queue_error)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Call the lowest waiting token.
#[post("/api/walkin/call-next")]
pub async fn call_next() -> Result<CallNextResponse, ServerFnError> {
    #[cfg(feature = "server")]
    {
        let called = crate::walk_in()
            .await?
            .call_next()
            .await
            .map_err(crate::queue_error)?;

        Ok(match called {
            Some(entry) => CallNextResponse::called(entry.token_no.get()),
            None => CallNextResponse::no_waiting(),
        })
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Token currently being served.
#[get("/api/walkin/current")]
pub async fn current_token() -> Result<CurrentTokenResponse, ServerFnError> {
    #[cfg(feature = "server")]
    {
        let token = crate::walk_in()
            .await?
            .current_called()
            .await
            .map_err(crate::queue_error)?;

        Ok(CurrentTokenResponse {
            token_no: token.map(|t| t.get()),
        })
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Estimated wait in minutes for a token.
#[get("/api/walkin/eta/:token_no")]
pub async fn walk_in_eta(token_no: String) -> Result<EtaResponse, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use walkin_core::TokenNo;

        let token_no = TokenNo::parse(&token_no).map_err(crate::queue_error)?;

        let eta_minutes = crate::walk_in()
            .await?
            .estimate(token_no)
            .await
            .map_err(crate::queue_error)?;

        Ok(EtaResponse { eta_minutes })
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}
