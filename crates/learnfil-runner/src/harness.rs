//! Wrapper script generation and result decoding.
//!
//! Learner code is placed inside an async function. With a harness
//! expression the function returns that expression, evaluated in the same
//! scope as the learner's declarations; without one the learner code is the
//! function body. The result is printed as a JSON envelope on a marked line
//! so ordinary `console.log` output does not interfere. The marker carries a
//! per-run nonce handed over in the environment, so learner code that prints
//! its own marker line is not mistaken for the result.

use serde::Deserialize;
use serde_json::Value;

use learnfil_core::error::ExecError;

/// Prefix of the stdout line carrying the result envelope.
pub const RESULT_MARKER: &str = "__LEARNFIL_RESULT__";

/// Environment variable carrying the per-run nonce into the script.
pub const NONCE_ENV: &str = "LEARNFIL_RESULT_NONCE";

// The nonce, `write` and `stringify` are captured before learner code runs
// and removed from its reach: the env var is deleted and the IIFE parameters
// shadow the privileged names.
const PRELUDE: &str = r#"const __learnfilEncode = (value) => {
  if (value === undefined) return null;
  if (typeof value === "bigint") return value.toString();
  if (typeof value === "function") return "[Function]";
  return value;
};
const __learnfilEmit = ((nonce, write, stringify) => (envelope) => {
  write("\n__LEARNFIL_RESULT__" + nonce + " " + stringify(envelope) + "\n");
})(
  process.env.LEARNFIL_RESULT_NONCE || "",
  process.stdout.write.bind(process.stdout),
  JSON.stringify
);
delete process.env.LEARNFIL_RESULT_NONCE;
(async function (__learnfilEmit, __learnfilEncode) {
"#;

const POSTLUDE: &str = r#"
})().then(
  (value) => {
    try {
      __learnfilEmit({ ok: true, value: __learnfilEncode(value) });
    } catch (e) {
      __learnfilEmit({ ok: false, error: "result is not serializable: " + e.message });
    }
  },
  (err) => {
    const message = err && err.name && err.message ? err.name + ": " + err.message : String(err);
    __learnfilEmit({ ok: false, error: message });
  }
);
"#;

/// Build the script that runs `code` and reports its value.
pub fn wrap(code: &str, harness: Option<&str>) -> String {
    let mut script = String::with_capacity(PRELUDE.len() + code.len() + POSTLUDE.len() + 64);
    script.push_str(PRELUDE);
    script.push_str(code);
    script.push('\n');
    if let Some(expr) = harness {
        script.push_str("return (");
        script.push_str(expr);
        script.push_str(");");
    }
    script.push_str(POSTLUDE);
    script
}

#[derive(Debug, Deserialize)]
struct Envelope {
    ok: bool,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    error: Option<String>,
}

/// Decode interpreter output into the learner code's value.
///
/// Only lines marked with this run's `nonce` count; the last one wins. With
/// no marked line the failure is classified from stderr.
pub fn decode_output(stdout: &str, stderr: &str, nonce: &str) -> Result<Value, ExecError> {
    let marker = format!("{RESULT_MARKER}{nonce} ");
    if let Some(line) = stdout
        .lines()
        .rev()
        .find_map(|l| l.trim_end().strip_prefix(marker.as_str()))
    {
        let envelope: Envelope = serde_json::from_str(line)
            .map_err(|e| ExecError::InvalidOutput(format!("bad result envelope: {e}")))?;
        return if envelope.ok {
            Ok(envelope.value)
        } else {
            Err(ExecError::Thrown(
                envelope.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        };
    }

    match first_error_line(stderr) {
        Some(line) => match line.strip_prefix("SyntaxError: ") {
            Some(rest) => Err(ExecError::Syntax(rest.to_string())),
            None => Err(ExecError::Thrown(line.to_string())),
        },
        None => Err(ExecError::InvalidOutput(
            "interpreter exited without reporting a result".to_string(),
        )),
    }
}

/// The first stderr line that looks like `SomethingError: message`.
fn first_error_line(stderr: &str) -> Option<&str> {
    stderr.lines().map(str::trim).find(|line| {
        line.split_once(": ").is_some_and(|(name, _)| {
            name.ends_with("Error") && name.chars().all(|c| c.is_ascii_alphanumeric())
        })
    })
}
