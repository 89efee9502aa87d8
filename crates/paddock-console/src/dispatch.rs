//! The query dispatcher: normalizes a SQL string, submits it to the
//! execution endpoint, and renders the outcome as an HTML fragment.
//!
//! The rendering follows a three-state panel: *loading* while the request is
//! in flight, then *success* or *error*. Callers replace their container's
//! content with whatever [`render_panel`] produces.

use paddock_types::{Envelope, Status};
use serde_json::Value;

/// Panel display state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Loading,
    Success,
    Error,
}

impl PanelState {
    fn css_class(self) -> &'static str {
        match self {
            PanelState::Loading => "response__status--loading",
            PanelState::Success => "response__status--success",
            PanelState::Error => "response__status--error",
        }
    }
}

/// One rendered response panel: a status line, the normalized query, and
/// optionally the result rows.
#[derive(Debug, Clone)]
pub struct Panel {
    pub state: PanelState,
    pub message: String,
    pub query: Option<String>,
    pub rows: Option<Value>,
}

impl Panel {
    pub fn loading(message: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            state: PanelState::Loading,
            message: message.into(),
            query: Some(query.into()),
            rows: None,
        }
    }

    pub fn success(message: impl Into<String>, query: impl Into<String>, rows: Value) -> Self {
        Self {
            state: PanelState::Success,
            message: message.into(),
            query: Some(query.into()),
            rows: Some(rows),
        }
    }

    pub fn error(message: impl Into<String>, query: Option<String>) -> Self {
        Self {
            state: PanelState::Error,
            message: message.into(),
            query,
            rows: None,
        }
    }
}

/// Collapses a multi-line SQL string into one display line: lines are
/// trimmed, empties dropped, and the rest joined with single spaces. The
/// normalized form is both what gets sent and what gets shown.
pub fn normalize_query(sql: &str) -> String {
    sql.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Renders result rows as an HTML table, inferring columns from the first
/// row's keys. Null, non-array and empty payloads render as a "no rows"
/// paragraph; a scalar payload renders as plain text.
pub fn render_table(data: &Value) -> String {
    if data.is_null() {
        return "<p>No rows returned.</p>".to_string();
    }

    // A non-array payload is treated as a single row.
    let rows: &[Value] = data.as_array().map_or(std::slice::from_ref(data), Vec::as_slice);

    if rows.is_empty() {
        return "<p>No rows returned.</p>".to_string();
    }

    let Some(first) = rows[0].as_object() else {
        return format!("<p>{}</p>", cell_text(&rows[0]));
    };

    let columns: Vec<&String> = first.keys().collect();
    let header: String = columns
        .iter()
        .map(|col| format!("<th>{col}</th>"))
        .collect();
    let body: String = rows
        .iter()
        .map(|row| {
            let cells: String = columns
                .iter()
                .map(|col| {
                    let value = row.get(col.as_str()).unwrap_or(&Value::Null);
                    format!("<td>{}</td>", cell_text(value))
                })
                .collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();

    format!(
        "<div class=\"table-wrapper\"><table>\
         <thead><tr>{header}</tr></thead>\
         <tbody>{body}</tbody>\
         </table></div>"
    )
}

/// Renders a panel to its HTML fragment.
pub fn render_panel(panel: &Panel) -> String {
    let mut parts = vec![format!(
        "<div class=\"response__status {}\">{}</div>",
        panel.state.css_class(),
        panel.message
    )];

    if let Some(query) = &panel.query {
        parts.push(format!("<pre class=\"response__query\">{query}</pre>"));
    }

    if let Some(rows) = &panel.rows {
        parts.push(render_table(rows));
    }

    parts.join("")
}

/// Submits a SQL string to the execution endpoint and returns the final
/// panel.
///
/// Any non-2xx response or a payload whose `status` is not `"success"` is
/// an error, surfacing the payload's `message` when present ("Unknown
/// error." otherwise). Transport and decode failures surface their own text
/// with a generic fallback. Nothing is retried.
pub async fn send_query(client: &reqwest::Client, api_url: &str, sql: &str) -> Panel {
    let query = normalize_query(sql);

    tracing::debug!(%query, "submitting query");

    let response = match client
        .post(api_url)
        .json(&serde_json::json!({ "query": query }))
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            let message = non_empty_or(e.to_string(), "Failed to execute query.");
            return Panel::error(message, Some(query));
        }
    };

    let http_ok = response.status().is_success();
    let payload: Envelope = match response.json().await {
        Ok(payload) => payload,
        Err(e) => {
            let message = non_empty_or(e.to_string(), "Failed to execute query.");
            return Panel::error(message, Some(query));
        }
    };

    if !http_ok || payload.status != Status::Success {
        let message = payload.message.unwrap_or_else(|| "Unknown error.".to_string());
        return Panel::error(message, Some(query));
    }

    let results = payload
        .results
        .map_or_else(|| "n/a".to_string(), |n| n.to_string());
    let rows = payload
        .data
        .map_or(Value::Null, |rows| {
            Value::Array(rows.into_iter().map(Value::Object).collect())
        });
    Panel::success(
        format!("Success! Rows affected/returned: {results}"),
        query,
        rows,
    )
}

fn non_empty_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
