//! GraphQL surface: the `busho` query and the three busho mutations.

use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};
use async_graphql::http::{parse_query_string, GraphiQLSource};
use async_graphql::parser::parse_query;
use async_graphql::parser::types::{DocumentOperations, OperationType};
use async_graphql::{Context, EmptySubscription, ErrorExtensions, Object, Request, Schema};
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};

use crate::db::{Applied, BushoStore};
use crate::errors::AppError;
use crate::models::department::{
    BushoCommand, Department, DepartmentKey, DepartmentUpdate, NewDepartment, Outcome,
};
use crate::utils::config::Config;
use crate::utils::validation::validate_payload;

pub const GRAPHQL_PATH: &str = "/graphql";

pub type BushoSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Shared by every resolver through the schema data.
pub struct GraphqlState {
    pub store: Arc<BushoStore>,
    pub strict_mutations: bool,
}

impl GraphqlState {
    async fn run(&self, command: BushoCommand) -> Result<Vec<Department>, AppError> {
        let Applied { records, outcome } = self.store.apply(&command).await?;
        if !self.strict_mutations {
            return Ok(records);
        }
        match outcome {
            Outcome::Applied => Ok(records),
            Outcome::AlreadyExists => Err(AppError::Conflict(format!(
                "Department id {} already exists",
                command.id()
            ))),
            Outcome::NotFound => Err(AppError::NotFound(format!(
                "Department id {} not found",
                command.id()
            ))),
        }
    }
}

fn state<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a GraphqlState> {
    ctx.data::<GraphqlState>()
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Every department, or only those whose id equals `id`.
    async fn busho(&self, ctx: &Context<'_>, id: Option<String>) -> async_graphql::Result<Vec<Department>> {
        state(ctx)?
            .store
            .select(id.as_deref())
            .await
            .map_err(|err| err.extend())
    }
}

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Appends a department unless the id is already taken.
    async fn add_busho(
        &self,
        ctx: &Context<'_>,
        id: String,
        name: String,
    ) -> async_graphql::Result<Vec<Department>> {
        let input = NewDepartment { id, name };
        validate_payload(&input).map_err(|err| err.extend())?;
        state(ctx)?.run(input.into()).await.map_err(|err| err.extend())
    }

    /// Renames every department with the given id.
    async fn upd_busho(
        &self,
        ctx: &Context<'_>,
        id: String,
        name: String,
    ) -> async_graphql::Result<Vec<Department>> {
        let input = DepartmentUpdate { id, name };
        validate_payload(&input).map_err(|err| err.extend())?;
        state(ctx)?.run(input.into()).await.map_err(|err| err.extend())
    }

    /// Removes every department with the given id.
    async fn del_busho(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<Vec<Department>> {
        let input = DepartmentKey { id };
        validate_payload(&input).map_err(|err| err.extend())?;
        state(ctx)?.run(input.into()).await.map_err(|err| err.extend())
    }
}

pub fn build_schema(store: Arc<BushoStore>, strict_mutations: bool) -> BushoSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(GraphqlState {
            store,
            strict_mutations,
        })
        .finish()
}

pub async fn graphql_post(schema: web::Data<BushoSchema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

/// `GET /graphql?query=...` executes queries only; a bare GET serves GraphiQL.
pub async fn graphql_get(
    req: HttpRequest,
    schema: web::Data<BushoSchema>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    if req.query_string().is_empty() {
        if !config.graphiql {
            return Err(AppError::NotFound("GraphiQL is disabled".to_string()));
        }
        let page = GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish();
        return Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(page));
    }

    let request = parse_query_string(req.query_string())
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    if selects_mutation(&request) {
        return Err(AppError::MethodNotAllowed(
            "Can only perform a mutation operation from a POST request".to_string(),
        ));
    }
    let response = schema.execute(request).await;
    Ok(HttpResponse::Ok().json(response))
}

/// Whether the operation the request would run is a mutation. Documents that
/// do not parse are left to the executor to report.
fn selects_mutation(request: &Request) -> bool {
    let Ok(document) = parse_query(&request.query) else {
        return false;
    };
    match &document.operations {
        DocumentOperations::Single(operation) => operation.node.ty == OperationType::Mutation,
        DocumentOperations::Multiple(operations) => match &request.operation_name {
            Some(name) => operations
                .get(name.as_str())
                .map_or(false, |operation| operation.node.ty == OperationType::Mutation),
            None => operations
                .values()
                .any(|operation| operation.node.ty == OperationType::Mutation),
        },
    }
}
