use std::borrow::Cow;

use log::debug;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{response, Request};
use serde::Serialize;

use telemetry::IsErr;

use crate::tool::ToolError;

#[derive(Debug)]
pub enum ApiError {
    UnknownTool(String),
    InvalidArguments(String),
}

impl From<ToolError> for ApiError {
    fn from(e: ToolError) -> Self {
        match e {
            ToolError::UnknownTool(name) => ApiError::UnknownTool(name),
            ToolError::InvalidArguments(e) => ApiError::InvalidArguments(e),
        }
    }
}

// Every variant is caused by the caller
impl IsErr for ApiError {
    fn is_err(&self) -> bool {
        false
    }

    fn reason(&self) -> &str {
        match self {
            ApiError::UnknownTool(_) => "unknown_tool",
            ApiError::InvalidArguments(_) => "invalid_arguments",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    message: Cow<'a, str>,
}

impl<'r> response::Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let (message, status) = match self {
            ApiError::UnknownTool(name) => (
                Cow::Owned(format!("Unknown tool: {}", name)),
                Status::BadRequest,
            ),
            ApiError::InvalidArguments(e) => (
                Cow::Owned(format!("Invalid arguments: {}", e)),
                Status::BadRequest,
            ),
        };
        debug!("Rejected tool invocation: {}", message);
        response::status::Custom(status, Json(ErrorResponse { message })).respond_to(req)
    }
}
