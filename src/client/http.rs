use awc::Client;
use url::Url;

use super::{GraphqlRequest, GraphqlResponse, GraphqlTransport};
use crate::errors::ClientError;

/// Posts documents to a running server.
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(endpoint: Url) -> Self {
        HttpTransport {
            client: Client::default(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl GraphqlTransport for HttpTransport {
    async fn execute(&self, request: GraphqlRequest) -> Result<GraphqlResponse, ClientError> {
        let mut response = self
            .client
            .post(self.endpoint.as_str())
            .send_json(&request)
            .await
            .map_err(|err| ClientError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::Transport(format!(
                "{} answered {}",
                self.endpoint,
                response.status()
            )));
        }

        response
            .json::<GraphqlResponse>()
            .await
            .map_err(|err| ClientError::Decode(err.to_string()))
    }
}
