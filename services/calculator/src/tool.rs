use chrono::{DateTime, SecondsFormat, Utc};
use derive_more::Display;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, EnumIter, EnumString};

use arithmetic::{render, EvalError, Evaluator};
use telemetry::{IsErr, Measure};

lazy_static! {
    static ref CALC_MEASURE: Measure = Measure::new("tool", "calc");
}

const CALC_DESCRIPTION: &str = "Safely evaluate a mathematical expression. \
    Supports +, -, *, /, **, % and parentheses. \
    Examples: '2+3*4', '(10-2)/4', '2**3'";

const GET_TIME_DESCRIPTION: &str = "Return current UTC time in ISO format.";

#[derive(Debug, Display)]
pub enum ToolError {
    #[display(fmt = "Unknown tool: {}", _0)]
    UnknownTool(String),

    #[display(fmt = "Invalid arguments: {}", _0)]
    InvalidArguments(String),
}

impl std::error::Error for ToolError {}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        ToolError::InvalidArguments(e.to_string())
    }
}

// Expressions come from model output, so a rejection is not a service failure
struct Rejection(EvalError);

impl IsErr for Rejection {
    fn is_err(&self) -> bool {
        false
    }

    fn reason(&self) -> &str {
        self.0.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Tool {
    Calc,
    GetTime,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub args: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CalcArgs {
    #[serde(alias = "expressions")]
    pub expression: String,
}

impl Tool {
    pub fn named(name: &str) -> Result<Tool, ToolError> {
        name.parse()
            .map_err(|_: strum::ParseError| ToolError::UnknownTool(name.to_string()))
    }

    pub fn descriptor(self) -> ToolDescriptor {
        match self {
            Tool::Calc => ToolDescriptor {
                name: self.as_ref().to_string(),
                description: CALC_DESCRIPTION.to_string(),
                args: vec!["expression".to_string()],
            },
            Tool::GetTime => ToolDescriptor {
                name: self.as_ref().to_string(),
                description: GET_TIME_DESCRIPTION.to_string(),
                args: vec![],
            },
        }
    }

    pub fn invoke(self, evaluator: &Evaluator, args: Value) -> Result<String, ToolError> {
        match self {
            Tool::Calc => {
                let args: CalcArgs = serde_json::from_value(args)?;
                Ok(calc(evaluator, &args.expression))
            }
            // Takes no arguments, whatever the caller sends is ignored
            Tool::GetTime => Ok(get_time(Utc::now())),
        }
    }
}

pub fn get_time(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Evaluates `expression`, folding any rejection into the returned text
pub fn calc(evaluator: &Evaluator, expression: &str) -> String {
    let result = CALC_MEASURE
        .observe(|| evaluator.try_evaluate(expression).map_err(Rejection))
        .map_err(|r| r.0);

    match &result {
        Ok(_) => info!("Evaluated expression of {} bytes", expression.len()),
        Err(e) => debug!("Rejected expression: {}", e),
    }
    render(&result)
}
