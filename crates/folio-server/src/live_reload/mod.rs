//! Live reload: file watching, rebuilds and browser notification.

mod debouncer;
mod manager;
mod registry;
mod websocket;

pub(crate) use manager::LiveReloadManager;
pub(crate) use websocket::ws_handler;

/// Script injected into served pages; reloads the page on any message.
pub(crate) const RELOAD_SCRIPT: &str = r#"<script>(() => {
  const ws = new WebSocket(`${location.protocol === "https:" ? "wss" : "ws"}://${location.host}/reload`);
  ws.onmessage = () => location.reload();
  ws.onclose = () => console.log("folio: live reload disconnected");
})()</script>
"#;

/// Insert the reload script before the last `</body>`, or append it.
pub(crate) fn inject_reload_script(html: &str) -> String {
    let mut out = String::with_capacity(html.len() + RELOAD_SCRIPT.len());
    match html.rfind("</body>") {
        Some(pos) => {
            out.push_str(&html[..pos]);
            out.push_str(RELOAD_SCRIPT);
            out.push_str(&html[pos..]);
        }
        None => {
            out.push_str(html);
            out.push_str(RELOAD_SCRIPT);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_before_body_end() {
        let html = inject_reload_script("<html><body><p>x</p></body></html>");

        assert!(html.starts_with("<html><body><p>x</p><script>"));
        assert!(html.ends_with("</script>\n</body></html>"));
        assert!(html.contains("/reload"));
    }

    #[test]
    fn test_inject_without_body_appends() {
        let html = inject_reload_script("<p>fragment</p>");

        assert!(html.starts_with("<p>fragment</p><script>"));
    }
}
