//! HTML index page
//!
//! Renders the storage directory as a browsable page with download links and
//! delete buttons. The page talks back to the JSON API for deletes.

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, response::Html};
use std::sync::Arc;

/// GET / - Render the index of stored CSV files
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    state.store().ensure_root().await?;
    let files = state.store().list().await?;
    Ok(Html(render_index(&files)))
}

/// Build the index document for the given filenames
fn render_index(files: &[String]) -> String {
    let rows = if files.is_empty() {
        r#"      <tr><td colspan="2" class="empty">No files uploaded yet</td></tr>"#.to_string()
    } else {
        files
            .iter()
            .map(|name| {
                let escaped = escape_html(name);
                format!(
                    r#"      <tr>
        <td>{escaped}</td>
        <td>
          <a href="/download_csv/{escaped}" download>Download</a>
          <button onclick="deleteFile('{escaped}')">Delete</button>
        </td>
      </tr>"#
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Participant CSV Uploads</title>
    <style>
      body {{ font-family: sans-serif; margin: 2em; }}
      table {{ border-collapse: collapse; min-width: 40em; }}
      td, th {{ border: 1px solid #ccc; padding: 0.4em 0.8em; text-align: left; }}
      .empty {{ color: #888; }}
    </style>
  </head>
  <body>
    <h1>Participant CSV Uploads</h1>
    <table>
      <tr><th>File</th><th>Actions</th></tr>
{rows}
    </table>
    <script>
      function deleteFile(name) {{
        if (!confirm('Delete ' + name + '?')) {{
          return;
        }}
        fetch('/delete_csv/' + encodeURIComponent(name), {{ method: 'DELETE' }})
          .then(function (resp) {{
            if (resp.ok) {{
              location.reload();
            }} else {{
              alert('Delete failed');
            }}
          }});
      }}
    </script>
  </body>
</html>
"#
    )
}

/// Escape a filename for interpolation into HTML
fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
