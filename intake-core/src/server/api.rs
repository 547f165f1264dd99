//! HTTP API for account requests

use crate::access::{Caller, ResourceClass};
use crate::actions::params;
use crate::actions::{AccountRequestActions, ActionError};
use crate::models::MessageOutput;
use crate::services::logging::log_error;
use serde::Serialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::{Filter, Rejection, Reply};

type Query = HashMap<String, String>;

/// Health check response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub account_requests: usize,
}

/// Create HTTP API routes
pub fn create_api_routes(
    actions: Arc<AccountRequestActions>,
    max_body_size: u64,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let caller_actions = Arc::clone(&actions);
    let caller_filter = warp::header::optional::<String>("authorization").map(
        move |authorization: Option<String>| {
            caller_actions.guard().identify(authorization.as_deref())
        },
    );
    let actions_filter = warp::any().map(move || Arc::clone(&actions));
    let body_filter = warp::body::content_length_limit(max_body_size).and(warp::body::bytes());

    // PUT /webapi/account/request?id=<id> - Update an account request
    let update_request = warp::path!("webapi" / "account" / "request")
        .and(warp::put())
        .and(caller_filter.clone())
        .and(warp::query::<Query>())
        .and(body_filter.clone())
        .and(actions_filter.clone())
        .and_then(handle_update_request);

    // GET /webapi/account/request?id=<id> - Get an account request
    let get_request = warp::path!("webapi" / "account" / "request")
        .and(warp::get())
        .and(caller_filter.clone())
        .and(warp::query::<Query>())
        .and(actions_filter.clone())
        .and_then(handle_get_request);

    // POST /webapi/account/request - Create an account request
    let create_request = warp::path!("webapi" / "account" / "request")
        .and(warp::post())
        .and(caller_filter.clone())
        .and(body_filter.clone())
        .and(actions_filter.clone())
        .and_then(handle_create_request);

    // DELETE /webapi/account/request?id=<id> - Delete an account request
    let delete_request = warp::path!("webapi" / "account" / "request")
        .and(warp::delete())
        .and(caller_filter.clone())
        .and(warp::query::<Query>())
        .and(actions_filter.clone())
        .and_then(handle_delete_request);

    // PUT /webapi/account/request/reset?id=<id> - Reset a registration
    let reset_request = warp::path!("webapi" / "account" / "request" / "reset")
        .and(warp::put())
        .and(caller_filter.clone())
        .and(warp::query::<Query>())
        .and(actions_filter.clone())
        .and_then(handle_reset_request);

    // PUT /webapi/account/request/register?key=<key> - Join with a registration key
    let register_request = warp::path!("webapi" / "account" / "request" / "register")
        .and(warp::put())
        .and(caller_filter.clone())
        .and(warp::query::<Query>())
        .and(actions_filter.clone())
        .and_then(handle_register_request);

    // GET /webapi/search/accountrequests?searchkey=<key> - Search account requests
    let search_requests = warp::path!("webapi" / "search" / "accountrequests")
        .and(warp::get())
        .and(caller_filter.clone())
        .and(warp::query::<Query>())
        .and(actions_filter.clone())
        .and_then(handle_search_requests);

    // GET /webapi/health - Health check endpoint
    let get_health = warp::path!("webapi" / "health")
        .and(warp::get())
        .and(actions_filter.clone())
        .and_then(handle_get_health);

    update_request
        .or(get_request)
        .or(create_request)
        .or(delete_request)
        .or(reset_request)
        .or(register_request)
        .or(search_requests)
        .or(get_health)
        .recover(handle_rejection)
}

/// Render an action result as JSON with the matching status code
fn into_response<T: Serialize>(
    result: Result<T, ActionError>,
    success: StatusCode,
) -> warp::reply::Response {
    match result {
        Ok(body) => warp::reply::with_status(warp::reply::json(&body), success).into_response(),
        Err(err) => {
            if let ActionError::Internal(message) = &err {
                log_error(message, Some("account request action"));
            } else {
                tracing::debug!(kind = err.kind(), message = %err, "Action rejected");
            }
            warp::reply::with_status(warp::reply::json(&err.to_output()), err.status_code())
                .into_response()
        }
    }
}

/// Fetch the record id parameter; a missing id is only reported to authorized callers
fn id_param<'a>(
    actions: &AccountRequestActions,
    caller: &Caller,
    query: &'a Query,
    action: &str,
) -> Result<&'a str, ActionError> {
    params::required_param(query, params::ACCOUNT_REQUEST_ID).map_err(|missing| {
        match actions.authorize(caller, ResourceClass::AccountRequest, action) {
            Ok(()) => missing,
            Err(denied) => denied,
        }
    })
}

/// Handle PUT /webapi/account/request
async fn handle_update_request(
    caller: Caller,
    query: Query,
    body: Bytes,
    actions: Arc<AccountRequestActions>,
) -> Result<warp::reply::Response, Rejection> {
    let result = match id_param(&actions, &caller, &query, "update_account_request") {
        Ok(raw_id) => actions.update_json(&caller, raw_id, &body).await,
        Err(e) => Err(e),
    };
    Ok(into_response(result, StatusCode::OK))
}

/// Handle GET /webapi/account/request
async fn handle_get_request(
    caller: Caller,
    query: Query,
    actions: Arc<AccountRequestActions>,
) -> Result<warp::reply::Response, Rejection> {
    let result = match id_param(&actions, &caller, &query, "get_account_request") {
        Ok(raw_id) => actions.get(&caller, raw_id).await,
        Err(e) => Err(e),
    };
    Ok(into_response(result, StatusCode::OK))
}

/// Handle POST /webapi/account/request
async fn handle_create_request(
    caller: Caller,
    body: Bytes,
    actions: Arc<AccountRequestActions>,
) -> Result<warp::reply::Response, Rejection> {
    let result = actions.create_json(&caller, &body).await;
    Ok(into_response(result, StatusCode::CREATED))
}

/// Handle DELETE /webapi/account/request
async fn handle_delete_request(
    caller: Caller,
    query: Query,
    actions: Arc<AccountRequestActions>,
) -> Result<warp::reply::Response, Rejection> {
    let result = match id_param(&actions, &caller, &query, "delete_account_request") {
        Ok(raw_id) => actions.delete(&caller, raw_id).await,
        Err(e) => Err(e),
    };
    Ok(into_response(result, StatusCode::OK))
}

/// Handle PUT /webapi/account/request/reset
async fn handle_reset_request(
    caller: Caller,
    query: Query,
    actions: Arc<AccountRequestActions>,
) -> Result<warp::reply::Response, Rejection> {
    let result = match id_param(&actions, &caller, &query, "reset_account_request") {
        Ok(raw_id) => actions.reset(&caller, raw_id).await,
        Err(e) => Err(e),
    };
    Ok(into_response(result, StatusCode::OK))
}

/// Handle PUT /webapi/account/request/register
async fn handle_register_request(
    caller: Caller,
    query: Query,
    actions: Arc<AccountRequestActions>,
) -> Result<warp::reply::Response, Rejection> {
    let key = query.get(params::REGISTRATION_KEY).map(String::as_str);
    let result = actions.register(&caller, key).await;
    Ok(into_response(result, StatusCode::OK))
}

/// Handle GET /webapi/search/accountrequests
async fn handle_search_requests(
    caller: Caller,
    query: Query,
    actions: Arc<AccountRequestActions>,
) -> Result<warp::reply::Response, Rejection> {
    let key = query.get(params::SEARCH_KEY).map(String::as_str);
    let result = actions.search(&caller, key).await;
    Ok(into_response(result, StatusCode::OK))
}

/// Handle GET /webapi/health
async fn handle_get_health(
    actions: Arc<AccountRequestActions>,
) -> Result<warp::reply::Response, Rejection> {
    let result = actions
        .store()
        .count()
        .await
        .map(|account_requests| HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            account_requests,
        })
        .map_err(ActionError::from);
    Ok(into_response(result, StatusCode::OK))
}

/// Turn warp's own rejections into the same JSON message body actions use
async fn handle_rejection(rejection: Rejection) -> Result<warp::reply::Response, Infallible> {
    // Body limits are checked first; other routes report a method mismatch for the same request
    let (status, message) = if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "Resource not found")
    } else if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Request body is too large")
    } else if rejection.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Request body length is required")
    } else if rejection
        .find::<warp::reject::MethodNotAllowed>()
        .is_some()
    {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else {
        tracing::warn!(rejection = ?rejection, "Unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    };

    Ok(
        warp::reply::with_status(warp::reply::json(&MessageOutput::new(message)), status)
            .into_response(),
    )
}
