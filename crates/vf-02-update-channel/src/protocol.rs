//! # Rule-Update Protocol
//!
//! One command per line. The controller may prefix a line with its `[CCPDN]`
//! tag and flow updates with the `FLOW` keyword:
//!
//! ```text
//! [CCPDN] Hello                                  -> [VERIFLOW] Hello
//! [CCPDN] FLOW A#S1-10.0.0.0/24-S2               -> [VERIFLOW] Success | Fail ...
//! R#S1-10.0.0.0/24-S2                            -> [VERIFLOW] Success | Fail ...
//! L#S1          (or `listflows S1`)              -> [VERIFLOW] Flows S1: ...
//! S#                                             -> [VERIFLOW] Status ...
//! ```
//!
//! NUL padding and surrounding whitespace are stripped. Anything else is
//! rejected before it reaches the verifier.

use std::fmt;

use shared_types::{NodeId, Rule};
use vf_01_verification::{NetworkError, NetworkStatus};

use crate::error::CommandError;

/// Tag the controller puts in front of its messages.
pub const CONTROLLER_TAG: &str = "[CCPDN]";

/// Tag in front of every response.
pub const RESPONSE_TAG: &str = "[VERIFLOW]";

/// A validated controller command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Liveness probe
    Handshake,
    AddRule(Rule),
    RemoveRule(Rule),
    /// Rules installed on one switch
    ListFlows(NodeId),
    /// Network size and violation count
    Status,
}

impl Command {
    /// Short label for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Handshake => "hello",
            Command::AddRule(_) => "add",
            Command::RemoveRule(_) => "remove",
            Command::ListFlows(_) => "listflows",
            Command::Status => "status",
        }
    }
}

/// Parse one line of controller input.
pub fn parse_command(raw: &str) -> Result<Command, CommandError> {
    let line = raw.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    let line = match line.strip_prefix(CONTROLLER_TAG) {
        Some(rest) => rest.trim_start(),
        None => line,
    };
    if line.is_empty() {
        return Err(CommandError::Empty);
    }
    if line == "Hello" {
        return Ok(Command::Handshake);
    }
    if let Some(switch) = line.strip_prefix("listflows ") {
        return list_flows(switch.trim());
    }

    let line = match line.strip_prefix("FLOW ") {
        Some(rest) => rest.trim_start(),
        None => line,
    };
    let (op, argument) = line
        .split_once('#')
        .ok_or(CommandError::MissingSeparator)?;

    match op {
        "A" => Ok(Command::AddRule(argument.parse()?)),
        "R" => Ok(Command::RemoveRule(argument.parse()?)),
        "L" => list_flows(argument),
        "S" if argument.is_empty() => Ok(Command::Status),
        "S" => Err(CommandError::UnexpectedArgument(argument.to_string())),
        other => Err(CommandError::UnknownOperation(other.to_string())),
    }
}

fn list_flows(switch: &str) -> Result<Command, CommandError> {
    NodeId::new(switch)
        .map(Command::ListFlows)
        .map_err(CommandError::InvalidSwitchId)
}

/// Reply sent back on the same connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Hello,
    /// Mutation applied and the re-verified ECs are well-formed
    Success,
    /// Mutation applied but re-verification found violations
    Violations(Vec<NetworkError>),
    /// Command refused; nothing was changed
    Rejected(String),
    /// Verification could not complete
    Aborted(String),
    Flows { switch: NodeId, rules: Vec<Rule> },
    Status(NetworkStatus),
}

impl Response {
    /// Whether the controller should treat the reply as a failure.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Response::Violations(_) | Response::Rejected(_) | Response::Aborted(_)
        )
    }

    /// Outcome label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Response::Violations(_) => "fail",
            Response::Rejected(_) => "rejected",
            Response::Aborted(_) => "error",
            _ => "success",
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", RESPONSE_TAG)?;
        match self {
            Response::Hello => f.write_str("Hello"),
            Response::Success => f.write_str("Success"),
            Response::Violations(errors) => {
                write!(f, "Fail {} violation(s)", errors.len())?;
                for (i, error) in errors.iter().enumerate() {
                    f.write_str(if i == 0 { ": " } else { "; " })?;
                    write!(f, "{error}")?;
                }
                Ok(())
            }
            Response::Rejected(reason) => write!(f, "Fail rejected: {reason}"),
            Response::Aborted(reason) => write!(f, "Fail error: {reason}"),
            Response::Flows { switch, rules } => {
                write!(f, "Flows {switch}:")?;
                if rules.is_empty() {
                    return f.write_str(" (none)");
                }
                for (i, rule) in rules.iter().enumerate() {
                    f.write_str(if i == 0 { " " } else { ", " })?;
                    write!(f, "{rule}")?;
                }
                Ok(())
            }
            Response::Status(status) => write!(
                f,
                "Status switches={} hosts={} rules={} ecs={} errors={}",
                status.switches, status.hosts, status.rules, status.ec_count, status.errors
            ),
        }
    }
}
