use aurora_cli::{render, run, Cli};
use clap::Parser;

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("aurora-css").chain(args.iter().copied())).unwrap()
}

#[test]
fn custom_prefix_and_spacing() {
    let css = render(&cli(&[
        "--prefix",
        "custom",
        "--no-backgrounds",
        "--no-text-colors",
        "--no-borders",
        "--spacing",
        "sm=0.25rem",
    ]))
    .unwrap();

    assert!(css.starts_with("/* Spacing utilities */"));
    assert!(css.contains(".custom-p-sm { padding: 0.25rem; }"));
    assert!(css.contains(".custom-my-sm { margin-top: 0.25rem; margin-bottom: 0.25rem; }"));
}

#[test]
fn classes_format_lists_one_per_line() {
    let text = render(&cli(&[
        "--no-backgrounds",
        "--no-text-colors",
        "--no-borders",
        "--spacing",
        "sm=1px",
        "--format",
        "classes",
    ]))
    .unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 14);
    assert_eq!(lines[0], "aurora-p-sm");
    assert_eq!(lines[1], "aurora-m-sm");
}

#[test]
fn stats_format_is_json() {
    let text = render(&cli(&["--format", "stats"])).unwrap();
    let stats: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(stats["backgrounds"], 33);
    assert_eq!(stats["border_colors"], 9);
    assert_eq!(stats["spacing"], 182);
    assert_eq!(stats["total"], 33 + 33 + 9 + 182);
}

#[test]
fn global_flag_prepends_global_styles() {
    let css = render(&cli(&["--global", "--prefix", "app"])).unwrap();
    let global_at = css.find("/* Aurora UI global styles (app) */").unwrap();
    let utilities_at = css.find("/* Background color utilities */").unwrap();
    assert!(global_at < utilities_at);
}

#[test]
fn responsive_flag_adds_media_queries() {
    let css = render(&cli(&["--responsive"])).unwrap();
    assert!(css.contains("@media (min-width: 1536px) {"));
    assert!(css.contains(".\\32 xl\\:aurora-bg-primary"));
}

#[test]
fn config_file_with_flag_override() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("utilities.yaml");
    std::fs::write(
        &path,
        "prefix: site\nbackgrounds: false\ntext_colors: false\nspacing: false\n",
    )
    .unwrap();

    let path_arg = path.to_str().unwrap();
    let text = render(&cli(&["--config", path_arg, "--format", "classes"])).unwrap();
    assert_eq!(text.lines().count(), 9);
    assert!(text.starts_with("site-border-outline\n"));

    let text = render(&cli(&["--config", path_arg, "--prefix", "x", "--format", "classes"]))
        .unwrap();
    assert!(text.starts_with("x-border-outline\n"));
}

#[test]
fn missing_config_file_is_error() {
    let err = render(&cli(&["--config", "/nonexistent/aurora.yaml"])).unwrap_err();
    assert!(format!("{:#}", err).contains("/nonexistent/aurora.yaml"));
}

#[test]
fn output_file_is_written() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("aurora.css");
    run(&cli(&["--output", path.to_str().unwrap(), "--no-spacing"])).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains(".aurora-border-danger { border-color: var(--color-danger); }"));
    assert!(!written.contains("padding"));
}
