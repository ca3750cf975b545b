//! Calculator tool definition.
//!
//! Basic arithmetic on two operands. Division by zero and non-finite results
//! are reported as errors rather than returned as `inf`/`NaN`.

use anyhow::bail;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};

use super::parse_arguments;
use crate::domains::tools::descriptor::ToolDescriptor;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Arithmetic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }
}

/// Parameters for the calculate tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CalculateParams {
    /// The mathematical operation to perform
    pub operation: Operation,

    /// First operand
    pub a: f64,

    /// Second operand
    pub b: f64,
}

/// Result of a calculation.
#[derive(Debug, Clone, Serialize)]
pub struct Calculation {
    pub operation: Operation,
    pub a: Value,
    pub b: Value,
    pub result: Value,
    pub expression: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Calculator tool - performs basic arithmetic.
pub struct CalculatorTool;

impl CalculatorTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "calculate";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Performs basic arithmetic calculations";

    /// Execute the calculation.
    #[instrument(skip_all, fields(operation = ?params.operation))]
    pub fn execute(params: &CalculateParams) -> anyhow::Result<Calculation> {
        let CalculateParams { operation, a, b } = *params;
        info!("Calculate tool called: {} {} {}", a, operation.symbol(), b);

        let result = match operation {
            Operation::Add => a + b,
            Operation::Subtract => a - b,
            Operation::Multiply => a * b,
            Operation::Divide => {
                if b == 0.0 {
                    bail!("Calculation error: Division by zero is not allowed");
                }
                a / b
            }
        };

        if !result.is_finite() {
            bail!("Calculation error: Result is not a finite number");
        }

        Ok(Calculation {
            operation,
            a: number(a),
            b: number(b),
            result: number(result),
            expression: format!("{} {} {} = {}", a, operation.symbol(), b, result),
        })
    }

    /// Handler entry point: parse arguments, calculate, serialize.
    pub async fn handle(arguments: JsonObject) -> anyhow::Result<Value> {
        let params: CalculateParams = match parse_arguments(arguments) {
            Ok(params) => params,
            Err(e) => bail!("Calculation error: {}", e),
        };
        let calculation = Self::execute(&params)?;
        Ok(serde_json::to_value(calculation)?)
    }

    /// Create the descriptor for this tool.
    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::for_params::<CalculateParams>(Self::NAME, Self::DESCRIPTION, Self::handle)
    }
}

/// All tools of this set.
pub fn tools() -> Vec<ToolDescriptor> {
    vec![CalculatorTool::descriptor()]
}

/// Render a float as a JSON number, using an integer when it is integral.
fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}
