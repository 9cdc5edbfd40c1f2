//! Rendered output serving.
//!
//! `GET /guide/install` serves `<output>/guide/install/index.html` with the
//! live reload script injected. Paths whose last segment has an extension
//! are served as files with a guessed content type.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};

use crate::live_reload::inject_reload_script;
use crate::state::AppState;

/// What a request path maps to on disk.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Target {
    /// A rendered page (`index.html` of a directory).
    Page(PathBuf),
    /// Any other file.
    File(PathBuf),
}

impl Target {
    /// Map a URL path to a file under `output_dir`.
    ///
    /// Returns `None` for paths that try to leave the output directory.
    pub(crate) fn resolve(output_dir: &Path, url_path: &str) -> Option<Self> {
        let mut segments: Vec<&str> = url_path.split('/').filter(|s| !s.is_empty()).collect();
        if !segments.iter().all(|s| is_plain_segment(s)) {
            return None;
        }

        if segments.last() == Some(&"index.html") {
            segments.pop();
        }

        let relative: PathBuf = segments.iter().collect();
        let is_file = segments
            .last()
            .is_some_and(|last| Path::new(last).extension().is_some());

        Some(if is_file {
            Self::File(output_dir.join(relative))
        } else {
            Self::Page(output_dir.join(relative).join("index.html"))
        })
    }

    fn path(&self) -> &Path {
        match self {
            Self::Page(path) | Self::File(path) => path,
        }
    }
}

fn is_plain_segment(segment: &str) -> bool {
    !segment.contains('\\')
        && matches!(
            Path::new(segment).components().next(),
            Some(Component::Normal(_))
        )
}

/// Serve a rendered page or output file.
pub(crate) async fn serve_path(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let Some(target) = Target::resolve(&state.output_dir, uri.path()) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let bytes = match tokio::fs::read(target.path()).await {
        Ok(bytes) => bytes,
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::IsADirectory) => {
            return StatusCode::NOT_FOUND.into_response();
        }
        Err(e) => {
            tracing::error!(path = %target.path().display(), error = %e, "Unable to read output file");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match target {
        Target::Page(_) => {
            let html = String::from_utf8_lossy(&bytes);
            if state.live_reload_enabled() {
                Html(inject_reload_script(&html)).into_response()
            } else {
                Html(html.into_owned()).into_response()
            }
        }
        Target::File(path) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response()
        }
    }
}
