//! Baseline global stylesheet.
//!
//! A small reset plus typography defaults, parameterised by the CSS variable
//! prefix so several prefixed design systems can share a page. Colors go
//! through the same `--color-<token>` properties the utilities use.

/// Returns the global reset / typography stylesheet for `prefix`.
pub fn global_styles(prefix: &str) -> String {
    format!(
        r#"/* Aurora UI global styles ({p}) */
*, *::before, *::after {{ box-sizing: border-box; }}
html {{ -webkit-text-size-adjust: 100%; text-size-adjust: 100%; }}
body {{
  margin: 0;
  font-family: var(--{p}-font-family, Roboto, system-ui, -apple-system, "Segoe UI", sans-serif);
  font-size: var(--{p}-font-size-body, 1rem);
  line-height: var(--{p}-line-height-body, 1.5);
  color: var(--color-on-surface);
  background-color: var(--color-surface);
  -webkit-font-smoothing: antialiased;
}}
h1, h2, h3, h4, h5, h6 {{ margin: 0; font-weight: var(--{p}-font-weight-heading, 500); line-height: 1.2; }}
p {{ margin: 0; }}
img, svg, video, canvas {{ display: block; max-width: 100%; }}
button, input, select, textarea {{ font: inherit; color: inherit; }}
a {{ color: var(--color-primary); }}
:focus-visible {{ outline: 2px solid var(--color-primary); outline-offset: 2px; }}
::selection {{ background-color: var(--color-primary-container); color: var(--color-on-primary-container); }}
@media (prefers-reduced-motion: reduce) {{
  *, *::before, *::after {{ animation-duration: 0.01ms !important; transition-duration: 0.01ms !important; }}
}}"#,
        p = prefix
    )
}
