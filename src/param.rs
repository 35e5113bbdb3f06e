//! Parameter Model (spec §4.C): a finite schema maps each recognized name to
//! (whitelist, default, required?, arity), and the parser's output contract
//! is fixed regardless of which input mode (CLI / json / rawjson) produced
//! it.
//!
//! Grounded on the teacher's `cli.rs` clap-derive subcommand shape,
//! generalized into a schema table so all three input modes share one
//! validator.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::ScanError;

pub const PARAM_TARGET: &str = "target";
pub const PARAM_TASK_ID: &str = "taskId";
pub const PARAM_TESTS: &str = "tests";
pub const PARAM_ANTI_BOT: &str = "antiBotDetection";
pub const PARAM_USER_AGENT: &str = "userAgent";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Single,
    Variadic,
    Flag,
}

#[derive(Debug, Clone)]
pub struct ParamSchemaEntry {
    pub name: &'static str,
    pub arity: Arity,
    pub required: bool,
    /// `None` means no whitelist restriction; args accepted as-is.
    pub whitelist: Option<Vec<String>>,
}

/// (name, args[]) — the parser's validated output unit (spec §3).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandParameter {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Arguments", default)]
    pub args: Vec<String>,
}

impl CommandParameter {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self { name: name.into(), args }
    }

    /// clap's flag/option names carry a leading `--`; the schema stores the
    /// bare name, so callers normalize before validating.
    pub fn bare_name(&self) -> &str {
        self.name.trim_start_matches("--")
    }
}

/// Parameter document for `json`/`rawjson` input modes (spec §6).
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterDocument {
    #[serde(rename = "Target")]
    pub target: String,
    #[serde(rename = "Parameters")]
    pub parameters: Vec<CommandParameter>,
}

pub fn schema(sink_configured: bool, analyzer_ids: &[String]) -> Vec<ParamSchemaEntry> {
    vec![
        ParamSchemaEntry {
            name: PARAM_TARGET,
            arity: Arity::Single,
            required: true,
            whitelist: None,
        },
        ParamSchemaEntry {
            name: PARAM_TASK_ID,
            arity: Arity::Single,
            required: sink_configured,
            whitelist: None,
        },
        ParamSchemaEntry {
            name: PARAM_TESTS,
            arity: Arity::Variadic,
            required: true,
            whitelist: Some(analyzer_ids.to_vec()),
        },
        ParamSchemaEntry {
            name: PARAM_ANTI_BOT,
            arity: Arity::Flag,
            required: false,
            whitelist: None,
        },
        ParamSchemaEntry {
            name: PARAM_USER_AGENT,
            arity: Arity::Single,
            required: false,
            whitelist: None,
        },
    ]
}

/// The first positional argument selects the input mode (`test`/`json`/
/// `rawjson`/`help`); its absence is one of the parser's six fixed codes
/// (spec §4.C), distinct from `validate`'s per-parameter codes because it's
/// raised before any `CommandParameter` list exists to validate.
pub fn missing_subcommand_error() -> ScanError {
    ScanError::non_retryable(201, "missing subcommand keyword", "parser")
}

/// Validates a raw parameter list against the schema, returning the
/// validated list unchanged on success. Codes per spec §4.C.
pub fn validate(
    params: &[CommandParameter],
    sink_configured: bool,
    analyzer_ids: &[String],
) -> Result<(), ScanError> {
    if params.is_empty() {
        return Err(ScanError::non_retryable(100, "too few parameters supplied", "parser"));
    }

    let entries = schema(sink_configured, analyzer_ids);
    let mut seen_names: HashSet<String> = HashSet::new();

    for p in params {
        let bare = p.bare_name();
        let entry = entries
            .iter()
            .find(|e| e.name == bare)
            .ok_or_else(|| ScanError::non_retryable(304, format!("unknown parameter: {}", p.name), "parser"))?;

        if !seen_names.insert(bare.to_string()) {
            return Err(ScanError::non_retryable(305, format!("duplicate parameter: {}", p.name), "parser"));
        }

        let mut args_seen: HashSet<&str> = HashSet::new();
        for a in &p.args {
            if !args_seen.insert(a.as_str()) {
                return Err(ScanError::non_retryable(305, format!("duplicate argument for {}: {}", p.name, a), "parser"));
            }
        }

        match entry.arity {
            Arity::Flag => {
                if !p.args.is_empty() {
                    return Err(ScanError::non_retryable(306, format!("{} takes no arguments", p.name), "parser"));
                }
            }
            Arity::Single => {
                if p.args.len() > 1 {
                    return Err(ScanError::non_retryable(306, format!("{} accepts only one argument", p.name), "parser"));
                }
                if p.args.is_empty() && entry.required {
                    return Err(ScanError::non_retryable(303, format!("{} requires an argument", p.name), "parser"));
                }
            }
            Arity::Variadic => {
                if p.args.is_empty() && entry.required {
                    return Err(ScanError::non_retryable(303, format!("{} requires at least one argument", p.name), "parser"));
                }
            }
        }

        if let Some(whitelist) = &entry.whitelist {
            for a in &p.args {
                if !whitelist.contains(a) {
                    return Err(ScanError::non_retryable(304, format!("invalid argument for {}: {}", p.name, a), "parser"));
                }
            }
        }
    }

    for entry in &entries {
        if entry.required && !seen_names.contains(entry.name) {
            return Err(ScanError::non_retryable(303, format!("missing required parameter: --{}", entry.name), "parser"));
        }
    }

    Ok(())
}

/// Parses a `ParameterDocument` (json/rawjson input modes) into the raw
/// parameter list, folding `Target` in as the `--target` parameter so it
/// flows through the same validator as the CLI path.
pub fn params_from_document(doc: ParameterDocument) -> Result<Vec<CommandParameter>, ScanError> {
    if doc.target.trim().is_empty() {
        return Err(ScanError::non_retryable(303, "Target must not be empty", "parser"));
    }
    if doc.parameters.is_empty() {
        return Err(ScanError::non_retryable(100, "Parameters must not be empty", "parser"));
    }
    let mut params = vec![CommandParameter::new(PARAM_TARGET, vec![doc.target])];
    params.extend(doc.parameters);
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer_ids() -> Vec<String> {
        vec!["https".to_string(), "hsts".to_string()]
    }

    #[test]
    fn rejects_empty_parameter_list() {
        let err = validate(&[], false, &analyzer_ids()).unwrap_err();
        assert_eq!(err.code, 100);
        assert_eq!(err.source, "parser");
    }

    #[test]
    fn accepts_minimal_valid_scan_parameters() {
        let params = vec![
            CommandParameter::new("--target", vec!["example.com".into()]),
            CommandParameter::new("--tests", vec!["https".into(), "hsts".into()]),
        ];
        validate(&params, false, &analyzer_ids()).unwrap();
    }

    #[test]
    fn requires_task_id_when_sink_configured() {
        let params = vec![
            CommandParameter::new("--target", vec!["example.com".into()]),
            CommandParameter::new("--tests", vec!["https".into()]),
        ];
        let err = validate(&params, true, &analyzer_ids()).unwrap_err();
        assert_eq!(err.code, 303);
    }

    #[test]
    fn rejects_unknown_analyzer_id_in_whitelist() {
        let params = vec![
            CommandParameter::new("--target", vec!["example.com".into()]),
            CommandParameter::new("--tests", vec!["bogus".into()]),
        ];
        let err = validate(&params, false, &analyzer_ids()).unwrap_err();
        assert_eq!(err.code, 304);
    }

    #[test]
    fn rejects_duplicate_argument_within_one_parameter() {
        let params = vec![
            CommandParameter::new("--target", vec!["example.com".into()]),
            CommandParameter::new("--tests", vec!["https".into(), "https".into()]),
        ];
        let err = validate(&params, false, &analyzer_ids()).unwrap_err();
        assert_eq!(err.code, 305);
    }

    #[test]
    fn rejects_over_arity_on_single_valued_parameter() {
        let params = vec![
            CommandParameter::new("--target", vec!["example.com".into(), "extra".into()]),
            CommandParameter::new("--tests", vec!["https".into()]),
        ];
        let err = validate(&params, false, &analyzer_ids()).unwrap_err();
        assert_eq!(err.code, 306);
    }

    #[test]
    fn rejects_args_on_flag_parameter() {
        let params = vec![
            CommandParameter::new("--target", vec!["example.com".into()]),
            CommandParameter::new("--tests", vec!["https".into()]),
            CommandParameter::new("--antiBotDetection", vec!["oops".into()]),
        ];
        let err = validate(&params, false, &analyzer_ids()).unwrap_err();
        assert_eq!(err.code, 306);
    }

    #[test]
    fn missing_subcommand_carries_its_own_fixed_code() {
        let err = missing_subcommand_error();
        assert_eq!(err.code, 201);
        assert_eq!(err.source, "parser");
    }

    #[test]
    fn parameter_document_rejects_empty_target() {
        let doc = ParameterDocument { target: String::new(), parameters: vec![] };
        let err = params_from_document(doc).unwrap_err();
        assert_eq!(err.code, 303);
    }

    #[test]
    fn parameter_document_rejects_empty_parameters() {
        let doc = ParameterDocument {
            target: "example.com".to_string(),
            parameters: vec![],
        };
        let err = params_from_document(doc).unwrap_err();
        assert_eq!(err.code, 100);
    }
}
