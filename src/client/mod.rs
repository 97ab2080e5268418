//! GraphQL client used by the views.
//!
//! `BushoClient` knows the four busho documents; how a document reaches the
//! server is up to the `GraphqlTransport` it wraps.

pub mod http;
pub mod local;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::ClientError;
use crate::models::department::Department;

pub use self::http::HttpTransport;
pub use self::local::SchemaTransport;

pub const GET_BUSHO: &str = "query getData($id: String) { busho(id: $id) { id name } }";
pub const ADD_BUSHO: &str =
    "mutation addData($id: String!, $name: String!) { addBusho(id: $id, name: $name) { id name } }";
pub const UPD_BUSHO: &str =
    "mutation updData($id: String!, $name: String!) { updBusho(id: $id, name: $name) { id name } }";
pub const DEL_BUSHO: &str = "mutation delData($id: String!) { delBusho(id: $id) { id name } }";

#[derive(Serialize, Debug, Clone)]
pub struct GraphqlRequest {
    pub query: &'static str,
    pub variables: Value,
}

#[derive(Deserialize, Debug)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphqlErrorEntry>,
}

#[derive(Deserialize, Debug)]
pub struct GraphqlErrorEntry {
    pub message: String,
}

#[allow(async_fn_in_trait)]
pub trait GraphqlTransport {
    async fn execute(&self, request: GraphqlRequest) -> Result<GraphqlResponse, ClientError>;
}

pub struct BushoClient<T> {
    transport: T,
}

impl<T: GraphqlTransport> BushoClient<T> {
    pub fn new(transport: T) -> Self {
        BushoClient { transport }
    }

    /// `id: None` sends no variable at all, which fetches every record.
    pub async fn fetch(&self, id: Option<&str>) -> Result<Vec<Department>, ClientError> {
        let variables = match id {
            Some(id) => json!({ "id": id }),
            None => json!({}),
        };
        self.call(GET_BUSHO, variables, "busho").await
    }

    pub async fn add(&self, id: &str, name: &str) -> Result<Vec<Department>, ClientError> {
        self.call(ADD_BUSHO, json!({ "id": id, "name": name }), "addBusho").await
    }

    pub async fn update(&self, id: &str, name: &str) -> Result<Vec<Department>, ClientError> {
        self.call(UPD_BUSHO, json!({ "id": id, "name": name }), "updBusho").await
    }

    pub async fn delete(&self, id: &str) -> Result<Vec<Department>, ClientError> {
        self.call(DEL_BUSHO, json!({ "id": id }), "delBusho").await
    }

    async fn call(
        &self,
        query: &'static str,
        variables: Value,
        field: &str,
    ) -> Result<Vec<Department>, ClientError> {
        let response = self
            .transport
            .execute(GraphqlRequest { query, variables })
            .await?;
        decode_field(response, field)
    }
}

fn decode_field(response: GraphqlResponse, field: &str) -> Result<Vec<Department>, ClientError> {
    if !response.errors.is_empty() {
        return Err(ClientError::Graphql(
            response.errors.into_iter().map(|entry| entry.message).collect(),
        ));
    }
    let mut data = response
        .data
        .ok_or_else(|| ClientError::Decode("response carries no data".to_string()))?;
    match data.get_mut(field).map(Value::take) {
        Some(Value::Null) | None => Err(ClientError::Decode(format!("field {} missing from response", field))),
        Some(value) => Ok(serde_json::from_value(value)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(raw: Value) -> GraphqlResponse {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn decodes_requested_field() {
        let records = decode_field(
            response(json!({ "data": { "busho": [{ "id": "10", "name": "Sales" }] } })),
            "busho",
        )
        .unwrap();
        assert_eq!(records, vec![Department::new("10", "Sales")]);
    }

    #[test]
    fn error_entries_win_over_data() {
        let err = decode_field(
            response(json!({ "data": null, "errors": [{ "message": "Storage Error: boom" }] })),
            "busho",
        )
        .unwrap_err();
        assert!(matches!(err, ClientError::Graphql(ref messages) if messages[0] == "Storage Error: boom"));
    }

    #[test]
    fn missing_field_is_decode_error() {
        let err = decode_field(response(json!({ "data": {} })), "addBusho").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
