use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use tracing::{debug, error};

use crate::{
    directory::UserDirectory,
    error::{Error, Subject},
    response::Envelope,
    user::UserId,
};

/// Body of a registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterRequest {
    name: Option<String>,

    #[serde(default)]
    is_admin: Option<bool>,
}

/// Query of a search.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchQuery {
    filter: Option<String>,
}

/// Body of a connect.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConnectRequest {
    connect_user_name: Option<String>,
}

type Directory = Extension<Arc<UserDirectory>>;

type HandlerResult = Result<Response, Error>;

fn body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Error> {
    body.map(|Json(body)| body).map_err(|rejection| {
        debug!(%rejection, "Unusable request body");
        Error::Validation(format!("The request body could not be used: {rejection}"))
    })
}

fn query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, Error> {
    query.map(|Query(query)| query).map_err(|rejection| {
        debug!(%rejection, "Unusable query");
        Error::Validation(format!("The query could not be used: {rejection}"))
    })
}

/// Ids not even looking like ids are just users that do not exist.
fn user_id(path: Result<Path<String>, PathRejection>) -> Result<UserId, Error> {
    let Path(raw) = path.map_err(|rejection| {
        debug!(%rejection, "Unusable path");
        Error::Validation(format!("The path could not be used: {rejection}"))
    })?;

    raw.parse().map_err(|_| Error::requester_not_found(raw))
}

pub(crate) async fn register(
    Extension(directory): Directory,
    request: Result<Json<RegisterRequest>, JsonRejection>,
) -> HandlerResult {
    // A request without a (JSON) body has no name.
    let request = match request {
        Err(JsonRejection::MissingJsonContentType(_)) => RegisterRequest {
            name: None,
            is_admin: None,
        },
        other => body(other)?,
    };

    let registered = directory
        .register(request.name, request.is_admin.unwrap_or_default())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::new("User created successfully.", registered)),
    )
        .into_response())
}

pub(crate) async fn search(
    Extension(directory): Directory,
    path: Result<Path<String>, PathRejection>,
    search_query: Result<Query<SearchQuery>, QueryRejection>,
) -> HandlerResult {
    let requester = user_id(path)?;
    let search_query = query(search_query)?;
    let filter = search_query.filter.as_deref();

    let names = directory.search(&requester, filter).await?;

    Ok(Json(Envelope::new(
        format!(
            "Successfully retrieved list of users matching: {}",
            filter.unwrap_or_default()
        ),
        names,
    ))
    .into_response())
}

pub(crate) async fn connect(
    Extension(directory): Directory,
    path: Result<Path<String>, PathRejection>,
    request: Result<Json<ConnectRequest>, JsonRejection>,
) -> HandlerResult {
    let requester = user_id(path)?;

    // An unknown requester is reported before any problem with the body.
    directory.requester(&requester).await?;
    let request = body(request)?;

    // A missing name can't match anyone.
    let target = request.connect_user_name.unwrap_or_default();

    let (requester, target) = directory.connect(&requester, &target).await?;

    Ok(Json(Envelope::new(
        format!("Successfully created connection between: {requester} and {target}"),
        (requester, target),
    ))
    .into_response())
}

pub(crate) async fn list(
    Extension(directory): Directory,
    path: Result<Path<String>, PathRejection>,
) -> HandlerResult {
    let requester = user_id(path)?;

    let users = directory.list(&requester).await?;

    Ok(Json(Envelope::new("Successfully retrieved list of users", users)).into_response())
}

pub(crate) async fn show_version() -> impl IntoResponse {
    format!("User Directory v{}\n", env!("CARGO_PKG_VERSION"))
}

impl Error {
    fn status(&self) -> StatusCode {
        match self {
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::Validation(_)
            | Error::DuplicateName(_)
            | Error::NotFound { .. }
            | Error::Storage(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// What the client gets to see.
    fn public_message(&self) -> String {
        match self {
            Error::Validation(message) => message.clone(),
            Error::DuplicateName(_) => "Duplicate name. Please choose another name".into(),
            Error::NotFound {
                subject: Subject::Requester,
                key,
            } => format!("User `{key}` not found"),
            Error::NotFound {
                subject: Subject::Target,
                key,
            } => format!("User to connect with `{key}` was not found"),
            Error::Unauthorized(_) => "Unauthorized".into(),
            Error::Storage(_) => "Internal storage error".into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::Storage(cause) => error!(?cause, "Storage failed while handling request"),
            other => debug!("Error response: <{other}>"),
        }

        (self.status(), Json(Envelope::message_only(self.public_message()))).into_response()
    }
}
