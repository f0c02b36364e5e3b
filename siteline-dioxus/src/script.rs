//! Calls into the bundled overlay script (`assets/overlay.js`).
//!
//! Every DOM side effect a dialog needs beyond rendering goes through here:
//! moving portal containers, scroll locking and focus save/restore, and the
//! two halves of the Tab trap. Decisions stay in Rust; the script only
//! queries and applies.

use dioxus::prelude::*;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("overlay script failed: {0}")]
    Eval(String),
    #[error("unexpected reply from overlay script: {0}")]
    Reply(#[from] serde_json::Error),
}

/// Tabbable elements of a dialog as seen by the webview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct FocusState {
    pub len: usize,
    /// Index of the focused element, `None` when focus is outside the set.
    pub active: Option<usize>,
}

/// Source of a call to `sitelineOverlay.<function>(args..)`.
fn call(function: &str, args: &[Value]) -> String {
    let args = args.iter().map(Value::to_string).collect::<Vec<_>>().join(", ");
    format!("return window.sitelineOverlay.{function}({args});")
}

async fn eval_value(js: String) -> Result<Value, ScriptError> {
    document::eval(&js)
        .await
        .map_err(|err| ScriptError::Eval(err.to_string()))
}

/// Move `container_id` under the mount point. Returns whether the mount
/// point had to be created.
pub async fn attach(container_id: &str, root_id: &str) -> Result<bool, ScriptError> {
    let reply = eval_value(call("attach", &[container_id.into(), root_id.into()])).await?;
    Ok(serde_json::from_value(reply)?)
}

pub fn release(root_id: &str) {
    document::eval(&call("release", &[root_id.into()]));
}

/// Save focus, lock scroll and focus the dialog root `id`.
pub fn open(id: &str) {
    document::eval(&call("open", &[id.into()]));
}

/// Undo [`open`] for `id`.
pub fn close(id: &str) {
    document::eval(&call("close", &[id.into()]));
}

pub async fn focus_state(id: &str) -> Result<FocusState, ScriptError> {
    let reply = eval_value(call("focusState", &[id.into()])).await?;
    Ok(serde_json::from_value(reply)?)
}

pub fn focus_at(id: &str, index: usize) {
    document::eval(&call("focusAt", &[id.into(), index.into()]));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_quotes_arguments() {
        assert_eq!(
            call("attach", &["portal-3".into(), "portal-root".into()]),
            r#"return window.sitelineOverlay.attach("portal-3", "portal-root");"#
        );
        assert_eq!(
            call("focusAt", &["overlay-\"x\"".into(), 2.into()]),
            r#"return window.sitelineOverlay.focusAt("overlay-\"x\"", 2);"#
        );
    }

    #[test]
    fn focus_state_reply_parses() {
        let state: FocusState =
            serde_json::from_value(serde_json::json!({ "len": 5, "active": null })).expect("parse");
        assert_eq!(state, FocusState { len: 5, active: None });
        let state: FocusState =
            serde_json::from_value(serde_json::json!({ "len": 5, "active": 4 })).expect("parse");
        assert_eq!(state.active, Some(4));
    }
}
