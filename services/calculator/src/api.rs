use rocket::serde::json::Json;
use rocket::{Route, State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::IntoEnumIterator;

use arithmetic::Evaluator;
use telemetry::Measure;

use crate::error::ApiError;
use crate::tool::{self, CalcArgs, Tool, ToolDescriptor};

lazy_static! {
    static ref CALC_MEASURE: Measure = Measure::new("controller", "calc");
    static ref INVOKE_MEASURE: Measure = Measure::new("controller", "invoke");
}

/// A tool call as emitted by the assistant, e.g.
/// `{"tool": "calc", "args": {"expression": "25 * 4"}}`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
struct Action {
    tool: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
struct ToolOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool: Option<String>,
    result: String,
}

#[get("/api/v1/tools")]
fn tools() -> Json<Vec<ToolDescriptor>> {
    Json(Tool::iter().map(Tool::descriptor).collect())
}

#[post("/api/v1/tools/calc", format = "json", data = "<args>")]
async fn calc(
    args: Json<CalcArgs>,
    evaluator: &State<Evaluator>,
) -> Result<Json<ToolOutput>, ApiError> {
    CALC_MEASURE
        .stats(async move {
            let result = tool::calc(evaluator, &args.expression);
            Ok(Json(ToolOutput { tool: None, result }))
        })
        .await
}

#[post("/api/v1/invoke", format = "json", data = "<action>")]
async fn invoke(
    action: Json<Action>,
    evaluator: &State<Evaluator>,
) -> Result<Json<ToolOutput>, ApiError> {
    INVOKE_MEASURE
        .stats(async move {
            let Action { tool, args } = action.into_inner();
            let result = Tool::named(&tool)?.invoke(evaluator, args)?;

            Ok(Json(ToolOutput {
                tool: Some(tool),
                result,
            }))
        })
        .await
}

pub fn routes() -> Vec<Route> {
    routes![tools, calc, invoke]
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use rocket::http::{ContentType, Status};
    use rocket::local::blocking::Client;
    use serde::de::DeserializeOwned;

    use arithmetic::Limits;

    use super::*;

    #[derive(Deserialize)]
    struct ErrorResponse {
        message: String,
    }

    fn client(limits: Limits) -> Result<Client, Box<dyn Error>> {
        let rocket = rocket::build()
            .manage(Evaluator::new(limits))
            .mount("/", routes());
        Ok(Client::untracked(rocket)?)
    }

    fn post<T: DeserializeOwned>(
        client: &Client,
        uri: &str,
        body: &str,
    ) -> Result<(Status, T), Box<dyn Error>> {
        let response = client
            .post(uri)
            .header(ContentType::JSON)
            .body(body)
            .dispatch();
        let status = response.status();
        let decoded = serde_json::from_str(&response.into_string().ok_or("empty body")?)?;
        Ok((status, decoded))
    }

    #[test]
    fn test_tools() -> Result<(), Box<dyn Error>> {
        let client = client(Limits::default())?;
        let response = client.get("/api/v1/tools").dispatch();

        assert_eq!(response.status(), Status::Ok);
        let decoded: Vec<ToolDescriptor> =
            serde_json::from_str(&response.into_string().ok_or("empty body")?)?;
        assert_eq!(
            decoded,
            vec![Tool::Calc.descriptor(), Tool::GetTime.descriptor()]
        );
        Ok(())
    }

    #[test]
    fn test_calc() -> Result<(), Box<dyn Error>> {
        let client = client(Limits::default())?;

        let (s1, r1): (_, ToolOutput) =
            post(&client, "/api/v1/tools/calc", r#"{"expression": "2+3*4"}"#)?;
        let (s2, r2): (_, ToolOutput) =
            post(&client, "/api/v1/tools/calc", r#"{"expressions": "(10-2)/4"}"#)?;
        let (s3, r3): (_, ToolOutput) =
            post(&client, "/api/v1/tools/calc", r#"{"expression": "2/0"}"#)?;

        assert_eq!((s1, r1.result.as_str()), (Status::Ok, "14"));
        assert_eq!((s2, r2.result.as_str()), (Status::Ok, "2"));
        assert_eq!(
            (s3, r3.result.as_str()),
            (Status::Ok, "Error: Division by zero")
        );
        assert_eq!(r1.tool, None);
        Ok(())
    }

    #[test]
    fn test_calc_limits() -> Result<(), Box<dyn Error>> {
        let client = client(Limits {
            max_depth: 2,
            ..Limits::default()
        })?;

        let (status, output): (_, ToolOutput) =
            post(&client, "/api/v1/tools/calc", r#"{"expression": "(((1)))"}"#)?;

        assert_eq!(status, Status::Ok);
        assert_eq!(output.result, "Error: Expression too complex");
        Ok(())
    }

    #[test]
    fn test_invoke() -> Result<(), Box<dyn Error>> {
        let client = client(Limits::default())?;

        let (status, output): (_, ToolOutput) = post(
            &client,
            "/api/v1/invoke",
            r#"{"tool": "calc", "args": {"expression": "25 * 4"}}"#,
        )?;

        assert_eq!(status, Status::Ok);
        assert_eq!(output.tool.as_deref(), Some("calc"));
        assert_eq!(output.result, "100");
        Ok(())
    }

    #[test]
    fn test_invoke_get_time() -> Result<(), Box<dyn Error>> {
        let client = client(Limits::default())?;

        let (status, output): (_, ToolOutput) =
            post(&client, "/api/v1/invoke", r#"{"tool": "get_time", "args": {}}"#)?;

        assert_eq!(status, Status::Ok);
        assert_eq!(output.tool.as_deref(), Some("get_time"));
        assert!(output.result.ends_with('Z'));
        chrono::DateTime::parse_from_rfc3339(&output.result)?;
        Ok(())
    }

    #[test]
    fn test_invoke_unknown_tool() -> Result<(), Box<dyn Error>> {
        let client = client(Limits::default())?;

        let (status, error): (_, ErrorResponse) = post(
            &client,
            "/api/v1/invoke",
            r#"{"tool": "launch_app", "args": {"app_name": "calc"}}"#,
        )?;

        assert_eq!(status, Status::BadRequest);
        assert_eq!(error.message, "Unknown tool: launch_app");
        Ok(())
    }

    #[test]
    fn test_invoke_invalid_arguments() -> Result<(), Box<dyn Error>> {
        let client = client(Limits::default())?;

        let (status, error): (_, ErrorResponse) =
            post(&client, "/api/v1/invoke", r#"{"tool": "calc"}"#)?;

        assert_eq!(status, Status::BadRequest);
        assert!(error.message.starts_with("Invalid arguments: "));
        Ok(())
    }
}
