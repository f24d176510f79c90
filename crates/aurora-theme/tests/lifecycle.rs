//! End-to-end provider lifecycle against an in-memory document.

use std::cell::Cell;
use std::rc::Rc;

use aurora_css::{global_styles_id, utility_styles_id};
use aurora_theme::{
    initialize_theme, try_use_theme, use_theme, Environment, MemoryDocument, MemoryStorage,
    Reconfiguration, StorageError, ThemeConfig, ThemeError, ThemeMode, ThemeOptions,
    ThemeProvider, ThemeStorage, ThemeUpdate, DEFAULT_STORAGE_KEY,
};

/// Storage whose every call fails, counting attempts.
#[derive(Default)]
struct BrokenStorage {
    calls: Cell<usize>,
}

impl ThemeStorage for BrokenStorage {
    fn get_theme(&self, _key: &str) -> Result<Option<ThemeUpdate>, StorageError> {
        self.calls.set(self.calls.get() + 1);
        Err(StorageError::Unavailable("SecurityError".into()))
    }

    fn set_theme(&self, _key: &str, _config: &ThemeConfig) -> Result<(), StorageError> {
        self.calls.set(self.calls.get() + 1);
        Err(StorageError::Unavailable("QuotaExceededError".into()))
    }
}

// =============================================================================
// Bootstrap
// =============================================================================

#[test]
fn cold_start_with_stored_dark() {
    let doc = MemoryDocument::new();
    doc.storage
        .set_theme(DEFAULT_STORAGE_KEY, &ThemeConfig::dark())
        .unwrap();

    let provider = ThemeProvider::mount(ThemeOptions::new(doc.environment()));

    // Attribute is set before mount returns, with a single write.
    assert_eq!(doc.root.theme().as_deref(), Some("dark"));
    assert_eq!(doc.root.attribute_writes(), 1);
    assert_eq!(provider.context().mode(), ThemeMode::Dark);
}

#[test]
fn standalone_bootstrap_matches_provider() {
    let standalone = MemoryDocument::new().prefers_dark(true);
    let mounted = MemoryDocument::new().prefers_dark(true);
    let stored = ThemeConfig::auto().with_color("primary", "#d0bcff");
    standalone.storage.set_theme("k", &stored).unwrap();
    mounted.storage.set_theme("k", &stored).unwrap();

    let options = |doc: &MemoryDocument| ThemeOptions::new(doc.environment()).storage_key("k");
    let config = initialize_theme(&options(&standalone));
    let provider = ThemeProvider::mount(options(&mounted));

    assert_eq!(config, provider.context().theme());
    assert_eq!(standalone.root.theme(), mounted.root.theme());
    assert_eq!(standalone.root.theme().as_deref(), Some("dark"));
}

#[test]
fn bootstrap_then_mount_writes_attribute_once() {
    let doc = MemoryDocument::new();
    doc.storage
        .set_theme(DEFAULT_STORAGE_KEY, &ThemeConfig::dark())
        .unwrap();
    let options = ThemeOptions::new(doc.environment());

    initialize_theme(&options);
    let _provider = ThemeProvider::mount(options);
    assert_eq!(doc.root.attribute_writes(), 1);
}

#[test]
fn corrupt_storage_falls_back_to_default() {
    let doc = MemoryDocument::new()
        .with_storage(Rc::new(MemoryStorage::new().with_raw(DEFAULT_STORAGE_KEY, "{oops")));

    let provider = ThemeProvider::mount(
        ThemeOptions::new(doc.environment()).default_theme(ThemeConfig::dark()),
    );
    assert_eq!(provider.context().mode(), ThemeMode::Dark);
    assert_eq!(doc.root.theme().as_deref(), Some("dark"));
    // default was persisted over the corrupt value
    assert_eq!(
        doc.storage.raw(DEFAULT_STORAGE_KEY).as_deref(),
        Some(r#"{"mode":"dark"}"#)
    );
}

#[test]
fn storage_failures_never_block_theming() {
    let doc = MemoryDocument::new();
    let storage = Rc::new(BrokenStorage::default());
    let provider = ThemeProvider::mount(
        ThemeOptions::new(doc.environment())
            .storage(storage.clone())
            .default_theme(ThemeConfig::light()),
    );
    assert_eq!(doc.root.theme().as_deref(), Some("light"));

    let ctx = provider.context();
    ctx.set_theme(ThemeMode::Dark);
    assert_eq!(ctx.mode(), ThemeMode::Dark);
    assert_eq!(doc.root.theme().as_deref(), Some("dark"));
    assert_eq!(storage.calls.get(), 3);
}

#[test]
fn headless_environment_is_inert() {
    let storage = Rc::new(MemoryStorage::new());
    let provider = ThemeProvider::mount(
        ThemeOptions::new(Environment::Headless)
            .storage(storage.clone())
            .auto_global_styles(true)
            .generate_utilities(true),
    );
    assert_eq!(provider.context().theme(), ThemeConfig::light());
    assert_eq!(storage.write_count(), 0);
}

// =============================================================================
// Mutations
// =============================================================================

#[test]
fn persisted_theme_survives_remount() {
    let doc = MemoryDocument::new();
    let provider = ThemeProvider::mount(ThemeOptions::new(doc.environment()));
    provider.context().set_theme(
        ThemeUpdate::mode(ThemeMode::Dark).with_custom_properties([("--radius", "12px")]),
    );
    drop(provider);

    let remounted = ThemeProvider::mount(ThemeOptions::new(doc.environment()));
    let theme = remounted.context().theme();
    assert_eq!(theme.mode, ThemeMode::Dark);
    assert_eq!(theme.custom_properties.unwrap()["--radius"], "12px");
}

#[test]
fn toggle_from_auto_lands_on_dark_even_when_os_is_dark() {
    let doc = MemoryDocument::new().prefers_dark(true);
    let provider = ThemeProvider::mount(
        ThemeOptions::new(doc.environment()).default_theme(ThemeConfig::auto()),
    );
    let ctx = provider.context();

    ctx.toggle_mode();
    assert_eq!(ctx.mode(), ThemeMode::Dark);
    ctx.toggle_mode();
    assert_eq!(ctx.mode(), ThemeMode::Light);
    assert_eq!(doc.root.theme().as_deref(), Some("light"));
}

#[test]
fn redundant_mode_writes_are_skipped() {
    let doc = MemoryDocument::new();
    let provider = ThemeProvider::mount(
        ThemeOptions::new(doc.environment()).default_theme(ThemeConfig::auto()),
    );
    let ctx = provider.context();
    assert_eq!(doc.root.attribute_writes(), 1);

    // auto (light) -> light resolves to the same scheme
    ctx.set_theme(ThemeMode::Light);
    // OS flips do not reach a light-mode provider
    doc.color_scheme.set_prefers_dark(true);
    ctx.set_theme(ThemeMode::Light);
    assert_eq!(doc.root.attribute_writes(), 1);

    ctx.set_theme(ThemeMode::Auto);
    assert_eq!(doc.root.theme().as_deref(), Some("dark"));
    assert_eq!(doc.root.attribute_writes(), 2);
}

#[test]
fn custom_properties_are_written_on_change() {
    let doc = MemoryDocument::new();
    let provider = ThemeProvider::mount(ThemeOptions::new(doc.environment()).default_theme(
        ThemeConfig::light()
            .with_color("primary", "#6750a4")
            .with_custom_property("--font-size-base", "16px"),
    ));
    assert_eq!(
        doc.root.style_properties(),
        vec![
            ("--color-primary".to_string(), "#6750a4".to_string()),
            ("--font-size-base".to_string(), "16px".to_string()),
        ]
    );
    let writes = doc.root.style_writes();

    provider.context().set_theme(ThemeMode::Dark);
    assert_eq!(doc.root.style_writes(), writes);

    provider
        .context()
        .set_theme(ThemeUpdate::new().with_colors([("primary", "#d0bcff")]));
    assert_eq!(
        doc.root.style_property("--color-primary").as_deref(),
        Some("#d0bcff")
    );
}

// =============================================================================
// Auto mode
// =============================================================================

#[test]
fn auto_mode_tracks_os_changes() {
    let doc = MemoryDocument::new();
    let provider = ThemeProvider::mount(
        ThemeOptions::new(doc.environment()).default_theme(ThemeConfig::auto()),
    );
    let ctx = provider.context();
    assert_eq!(doc.root.theme().as_deref(), Some("light"));
    assert!(!ctx.is_dark());

    doc.color_scheme.set_prefers_dark(true);
    assert_eq!(doc.root.theme().as_deref(), Some("dark"));
    assert!(ctx.is_dark());
    assert_eq!(ctx.mode(), ThemeMode::Auto);

    doc.color_scheme.set_prefers_dark(false);
    assert_eq!(doc.root.theme().as_deref(), Some("light"));
}

#[test]
fn no_os_notifications_after_unmount() {
    let doc = MemoryDocument::new();
    let provider = ThemeProvider::mount(
        ThemeOptions::new(doc.environment()).default_theme(ThemeConfig::auto()),
    );
    assert_eq!(doc.color_scheme.listener_count(), 1);

    drop(provider);
    assert_eq!(doc.color_scheme.listener_count(), 0);

    let writes = doc.root.attribute_writes();
    doc.color_scheme.set_prefers_dark(true);
    assert_eq!(doc.root.attribute_writes(), writes);
}

// =============================================================================
// Stylesheets
// =============================================================================

#[test]
fn global_styles_precede_utilities() {
    let doc = MemoryDocument::new();
    let _provider = ThemeProvider::mount(
        ThemeOptions::new(doc.environment())
            .auto_global_styles(true)
            .generate_utilities(true)
            .css_variables_prefix("app"),
    );
    assert_eq!(
        doc.head.ids(),
        vec![global_styles_id("app"), utility_styles_id("app")]
    );
}

#[test]
fn prefix_change_leaves_single_element() {
    let doc = MemoryDocument::new();
    let provider = ThemeProvider::mount(
        ThemeOptions::new(doc.environment())
            .auto_global_styles(true)
            .generate_utilities(true),
    );

    provider.reconfigure(Reconfiguration::new().css_variables_prefix("one"));
    provider.reconfigure(Reconfiguration::new().css_variables_prefix("two"));

    assert_eq!(
        doc.head.ids(),
        vec![global_styles_id("two"), utility_styles_id("two")]
    );
}

#[test]
fn toggling_flags_injects_and_removes() {
    let doc = MemoryDocument::new();
    let provider = ThemeProvider::mount(ThemeOptions::new(doc.environment()));
    assert!(doc.head.is_empty());

    provider.reconfigure(Reconfiguration::new().generate_utilities(true));
    assert_eq!(doc.head.count(&utility_styles_id("aurora")), 1);

    provider.reconfigure(Reconfiguration::new().generate_utilities(false));
    assert!(doc.head.is_empty());
}

#[test]
fn strict_remount_keeps_one_element_per_id() {
    let doc = MemoryDocument::new();
    let options = ThemeOptions::new(doc.environment())
        .auto_global_styles(true)
        .generate_utilities(true);

    // mount, unmount, mount again
    let first = ThemeProvider::mount(options.clone());
    first.unmount();
    let second = ThemeProvider::mount(options);

    assert_eq!(doc.head.count(&global_styles_id("aurora")), 1);
    assert_eq!(doc.head.count(&utility_styles_id("aurora")), 1);

    // late drop of the first provider does not touch the second's elements
    drop(first);
    assert_eq!(doc.head.len(), 2);
    drop(second);
    assert!(doc.head.is_empty());
}

#[test]
fn overlapping_providers_share_singleton() {
    let doc = MemoryDocument::new();
    let options = ThemeOptions::new(doc.environment()).generate_utilities(true);

    let first = ThemeProvider::mount(options.clone());
    let second = ThemeProvider::mount(options);
    assert_eq!(doc.head.count(&utility_styles_id("aurora")), 1);

    drop(first);
    assert_eq!(doc.head.count(&utility_styles_id("aurora")), 1);
    drop(second);
    assert!(doc.head.is_empty());
}

// =============================================================================
// Context
// =============================================================================

#[test]
fn hook_outside_provider() {
    assert!(matches!(try_use_theme(), Err(ThemeError::MissingProvider)));
}

#[test]
fn hook_inside_provider() {
    let doc = MemoryDocument::new();
    let provider = ThemeProvider::mount(ThemeOptions::new(doc.environment()));

    let _scope = provider.enter();
    use_theme().set_theme(ThemeMode::Dark);
    assert_eq!(doc.root.theme().as_deref(), Some("dark"));
}

#[test]
fn hook_fails_after_provider_drops_inside_scope() {
    let doc = MemoryDocument::new();
    let provider = ThemeProvider::mount(ThemeOptions::new(doc.environment()));
    let _scope = provider.enter();

    drop(provider);
    assert!(matches!(try_use_theme(), Err(ThemeError::MissingProvider)));
    assert_eq!(doc.root.theme().as_deref(), Some("light"));
}
