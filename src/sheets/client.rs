//! Authorized requests, status handling and connection testing.

use log::{debug, error, info, warn};
use reqwest::{RequestBuilder, Response, StatusCode};

use crate::auth::Session;
use crate::error::{PosError, Result};

use super::SheetsApi;

/// Which side of the store a request touches; picks the error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    Read,
    Write,
}

impl Access {
    pub(crate) fn error(self, range: &str, message: String) -> PosError {
        match self {
            Access::Read => PosError::RemoteRead {
                range: range.to_string(),
                message,
            },
            Access::Write => PosError::RemoteWrite {
                range: range.to_string(),
                message,
            },
        }
    }
}

impl SheetsApi {
    /// Attaches the session's bearer token and sends the request.
    ///
    /// Non-success statuses become errors: 401/403 map to
    /// [`PosError::AuthorizationDenied`], everything else to a read or write failure.
    pub(crate) async fn send(
        &self,
        session: &Session,
        request: RequestBuilder,
        range: &str,
        access: Access,
    ) -> Result<Response> {
        let token = session.bearer_token().await?;

        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| access.error(range, format!("request failed: {e}")))?;

        let status = response.status();
        debug!("Response status for {range}: {status}");

        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        error!("Request for {range} failed with status {status}: {error_text}");

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(PosError::AuthorizationDenied(
                format!("{status} from spreadsheet API, sign in again"),
            )),
            _ => Err(access.error(range, format!("{status} - {error_text}"))),
        }
    }

    /// Tests access to the spreadsheet.
    ///
    /// Returns `Ok(true)` if the spreadsheet metadata can be read, `Ok(false)`
    /// on any other status. Authorization failures are returned as errors.
    pub async fn test_connection(&self, session: &Session) -> Result<bool> {
        info!("Testing spreadsheet connection");
        let url = format!("{}/spreadsheets/{}", self.base_url, self.spreadsheet_id);
        debug!("Testing connection at: {url}");

        let request = self
            .client
            .get(&url)
            .query(&[("fields", "spreadsheetId,properties.title")]);

        match self.send(session, request, "metadata", Access::Read).await {
            Ok(response) => {
                let body = response.text().await.unwrap_or_default();
                info!("Spreadsheet connection successful. Response: {body}");
                Ok(true)
            }
            Err(e) if e.is_authorization() => Err(e),
            Err(e) => {
                warn!("Spreadsheet connection test failed: {e}");
                Ok(false)
            }
        }
    }
}
