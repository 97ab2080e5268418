use async_graphql::{Request, Variables};

use super::{GraphqlRequest, GraphqlResponse, GraphqlTransport};
use crate::errors::ClientError;
use crate::handlers::graphql::BushoSchema;

/// Executes documents against a schema in the same process.
pub struct SchemaTransport {
    schema: BushoSchema,
}

impl SchemaTransport {
    pub fn new(schema: BushoSchema) -> Self {
        SchemaTransport { schema }
    }
}

impl GraphqlTransport for SchemaTransport {
    async fn execute(&self, request: GraphqlRequest) -> Result<GraphqlResponse, ClientError> {
        let request = Request::new(request.query).variables(Variables::from_json(request.variables));
        let response = self.schema.execute(request).await;
        let raw = serde_json::to_value(&response)?;
        Ok(serde_json::from_value(raw)?)
    }
}
