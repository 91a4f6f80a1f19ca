//! HTTP implementation of [`SubmitHandler`] posting to the submission
//! endpoint of a running server.

use std::{future::Future, time::Duration};

use portfolio_validation::FieldError;
use serde::Deserialize;
use url::Url;

use crate::{ContactFormValues, SubmissionAccepted, SubmitError, SubmitHandler};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HttpSubmitHandler {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpSubmitHandler {
    pub fn new(base_url: Url) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let endpoint = base_url.join("api/contact")?;

        Ok(Self { client, endpoint })
    }
}

impl SubmitHandler for HttpSubmitHandler {
    fn submit(
        &self,
        values: ContactFormValues,
    ) -> impl Future<Output = Result<SubmissionAccepted, SubmitError>> + Send {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();

        async move {
            let response = client
                .post(endpoint)
                .json(&values)
                .send()
                .await
                .map_err(|err| SubmitError::Transport(err.into()))?;

            let status = response.status();
            let body: ResponseBody = response
                .json()
                .await
                .map_err(|err| SubmitError::Transport(err.into()))?;

            if status.is_success() && body.success {
                let email_result = body.email_result.unwrap_or_default();
                return Ok(SubmissionAccepted {
                    message: body.message,
                    message_id: email_result.message_id,
                    simulated: email_result.simulated,
                });
            }

            if status == reqwest::StatusCode::BAD_REQUEST {
                return Err(SubmitError::Rejected(body.errors.unwrap_or_default()));
            }

            Err(SubmitError::Delivery(body.error.unwrap_or(body.message)))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseBody {
    success: bool,
    #[serde(default)]
    message: String,
    email_result: Option<EmailResultBody>,
    errors: Option<Vec<FieldError>>,
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailResultBody {
    #[serde(default)]
    message_id: Option<String>,
    #[serde(default)]
    simulated: bool,
}
