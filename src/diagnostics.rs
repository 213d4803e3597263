//! Message helpers shared by the input loaders and the CLI.
//!
//! `error_message` records the failure as a tracing event before it is handed
//! to `bail!`/`with_context`, so the point of failure shows up in the log even
//! when the error is later wrapped. `warn` is for conditions that do not stop
//! generation.

pub fn error_message(msg: impl Into<String>) -> String {
    let msg = msg.into();
    tracing::debug!(error = %msg, "generation failed");
    msg
}

pub fn warn(msg: impl Into<String>) {
    let msg = msg.into();
    tracing::warn!("{}", msg);
}
