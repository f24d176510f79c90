//! Utility-class generation.
//!
//! [`generate`] turns a [`UtilityConfig`] into CSS text, the list of class
//! names it defines and per-category counts. It is a pure function: the same
//! configuration always yields byte-identical CSS and the same class order,
//! which the injector relies on when it replaces a stylesheet after a
//! reconfiguration.
//!
//! # Output layout
//!
//! ```text
//! /* Background color utilities */
//! .aurora-bg-primary { background-color: var(--color-primary); }
//! ...
//!
//! /* Text color utilities */
//! ...
//!
//! /* Responsive utilities */
//! @media (min-width: 640px) {
//!   .sm\:aurora-bg-primary { background-color: var(--color-primary); }
//! }
//! ```
//!
//! Category blocks always appear in the order backgrounds, text, borders,
//! spacing. Responsive variants are appended after the base rules and never
//! replace them.

use serde::Serialize;

use crate::config::UtilityConfig;
use crate::tokens::{Breakpoint, ColorToken, Direction};

/// A single-class CSS rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Class name as listed in [`UtilityOutput::class_names`].
    pub class_name: String,
    /// Declarations in emission order.
    pub declarations: Vec<(String, String)>,
}

impl Rule {
    fn new(class_name: String) -> Self {
        Self {
            class_name,
            declarations: Vec::new(),
        }
    }

    fn declare(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.declarations.push((property.into(), value.into()));
        self
    }

    /// Renders `.class { prop: value; ... }` with the selector escaped.
    pub fn to_css(&self) -> String {
        self.render(&escape_class(&self.class_name))
    }

    fn render(&self, selector_class: &str) -> String {
        let body = self
            .declarations
            .iter()
            .map(|(property, value)| format!("{}: {};", property, value))
            .collect::<Vec<_>>()
            .join(" ");
        format!(".{} {{ {} }}", selector_class, body)
    }
}

/// Utility categories, in emission order.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum UtilityCategory {
    Backgrounds,
    TextColors,
    BorderColors,
    Spacing,
}

impl UtilityCategory {
    pub const ALL: [UtilityCategory; 4] = [
        UtilityCategory::Backgrounds,
        UtilityCategory::TextColors,
        UtilityCategory::BorderColors,
        UtilityCategory::Spacing,
    ];

    fn header(self) -> &'static str {
        match self {
            UtilityCategory::Backgrounds => "/* Background color utilities */",
            UtilityCategory::TextColors => "/* Text color utilities */",
            UtilityCategory::BorderColors => "/* Border color utilities */",
            UtilityCategory::Spacing => "/* Spacing utilities */",
        }
    }

    fn enabled(self, config: &UtilityConfig) -> bool {
        match self {
            UtilityCategory::Backgrounds => config.generate_backgrounds,
            UtilityCategory::TextColors => config.generate_text_colors,
            UtilityCategory::BorderColors => config.generate_border_colors,
            UtilityCategory::Spacing => config.generate_spacing,
        }
    }

    /// The rules this category contributes for `config`.
    pub fn rules(self, config: &UtilityConfig) -> Vec<Rule> {
        let prefix = &config.prefix;
        match self {
            UtilityCategory::Backgrounds => {
                color_rules(prefix, "bg", "background-color", &ColorToken::ALL)
            }
            UtilityCategory::TextColors => color_rules(prefix, "text", "color", &ColorToken::ALL),
            UtilityCategory::BorderColors => {
                color_rules(prefix, "border", "border-color", &ColorToken::BORDER)
            }
            UtilityCategory::Spacing => spacing_rules(config),
        }
    }
}

/// Per-category class counts.
///
/// Category counts are taken before responsive expansion; `total` is the
/// length of the final class list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UtilityStats {
    pub backgrounds: usize,
    pub text_colors: usize,
    pub border_colors: usize,
    pub spacing: usize,
    pub total: usize,
}

impl UtilityStats {
    fn record(&mut self, category: UtilityCategory, count: usize) {
        match category {
            UtilityCategory::Backgrounds => self.backgrounds = count,
            UtilityCategory::TextColors => self.text_colors = count,
            UtilityCategory::BorderColors => self.border_colors = count,
            UtilityCategory::Spacing => self.spacing = count,
        }
    }
}

/// Result of [`generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtilityOutput {
    pub css: String,
    /// Every class defined by `css`, in emission order, without duplicates.
    pub class_names: Vec<String>,
    pub stats: UtilityStats,
}

impl UtilityOutput {
    pub fn is_empty(&self) -> bool {
        self.class_names.is_empty()
    }
}

/// Generates the utility stylesheet for `config`.
pub fn generate(config: &UtilityConfig) -> UtilityOutput {
    let mut blocks = Vec::new();
    let mut base_rules: Vec<Rule> = Vec::new();
    let mut stats = UtilityStats::default();

    for category in UtilityCategory::ALL {
        if !category.enabled(config) {
            continue;
        }
        let rules = category.rules(config);
        stats.record(category, rules.len());

        let mut block = vec![category.header().to_string()];
        block.extend(rules.iter().map(Rule::to_css));
        blocks.push(block.join("\n"));

        base_rules.extend(rules);
    }

    let mut class_names: Vec<String> = base_rules.iter().map(|r| r.class_name.clone()).collect();

    if config.include_responsive && !base_rules.is_empty() {
        let mut media_blocks = vec!["/* Responsive utilities */".to_string()];
        for breakpoint in Breakpoint::ALL {
            let mut lines = vec![format!("@media {} {{", breakpoint.media_query())];
            for rule in &base_rules {
                let raw = format!("{}:{}", breakpoint.name(), rule.class_name);
                lines.push(format!("  {}", rule.render(&escape_class(&raw))));
                class_names.push(responsive_class_name(breakpoint, &rule.class_name));
            }
            lines.push("}".to_string());
            media_blocks.push(lines.join("\n"));
        }
        blocks.push(media_blocks.join("\n"));
    }

    stats.total = class_names.len();

    tracing::trace!(
        prefix = %config.prefix,
        total = stats.total,
        "generated utility classes"
    );

    UtilityOutput {
        css: blocks.join("\n\n"),
        class_names,
        stats,
    }
}

/// Responsive class name in its listed form: `<breakpoint>\:<name>`.
pub fn responsive_class_name(breakpoint: Breakpoint, class_name: &str) -> String {
    format!("{}\\:{}", breakpoint.name(), class_name)
}

/// Escapes a class name for use in a CSS selector.
///
/// Characters outside `[A-Za-z0-9_-]` get a backslash, and a leading digit is
/// written as a hex escape (`2xl` becomes `\32 xl`).
pub fn escape_class(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if i == 0 && c.is_ascii_digit() {
            escaped.push_str(&format!("\\{:x} ", c as u32));
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            escaped.push(c);
        } else {
            escaped.push('\\');
            escaped.push(c);
        }
    }
    escaped
}

fn color_rules(prefix: &str, kind: &str, property: &str, tokens: &[ColorToken]) -> Vec<Rule> {
    tokens
        .iter()
        .map(|token| {
            Rule::new(format!("{}-{}-{}", prefix, kind, token.name()))
                .declare(property, token.css_var())
        })
        .collect()
}

fn spacing_rules(config: &UtilityConfig) -> Vec<Rule> {
    let scale = config.spacing_scale();
    let mut rules = Vec::with_capacity(scale.len() * Direction::ALL.len() * 2);

    for (key, value) in &scale {
        for direction in Direction::ALL {
            for (letter, property) in [("p", "padding"), ("m", "margin")] {
                let class_name = format!("{}-{}{}-{}", config.prefix, letter, direction.suffix(), key);
                let rule = direction
                    .properties(property)
                    .into_iter()
                    .fold(Rule::new(class_name), |rule, prop| rule.declare(prop, value.as_str()));
                rules.push(rule);
            }
        }
    }

    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spacing_only(prefix: &str) -> UtilityConfig {
        UtilityConfig::new(prefix)
            .backgrounds(false)
            .text_colors(false)
            .border_colors(false)
    }

    #[test]
    fn test_rule_to_css() {
        let rule = Rule::new("x-px-1".to_string())
            .declare("padding-left", "1px")
            .declare("padding-right", "1px");
        assert_eq!(
            rule.to_css(),
            ".x-px-1 { padding-left: 1px; padding-right: 1px; }"
        );
    }

    #[test]
    fn test_escape_class() {
        assert_eq!(escape_class("aurora-p-4"), "aurora-p-4");
        assert_eq!(escape_class("aurora-p-0.5"), "aurora-p-0\\.5");
        assert_eq!(escape_class("md:aurora-p-4"), "md\\:aurora-p-4");
        assert_eq!(escape_class("2xl:aurora-p-4"), "\\32 xl\\:aurora-p-4");
        assert_eq!(escape_class("w-1/2"), "w-1\\/2");
    }

    #[test]
    fn test_background_block() {
        let output = generate(
            &UtilityConfig::new("a")
                .text_colors(false)
                .border_colors(false)
                .spacing(false),
        );
        assert!(output.css.starts_with("/* Background color utilities */\n"));
        assert!(output
            .css
            .contains(".a-bg-primary { background-color: var(--color-primary); }"));
        assert!(output.css.contains(
            ".a-bg-surface-container-highest { background-color: var(--color-surface-container-highest); }"
        ));
        assert_eq!(output.stats.backgrounds, ColorToken::ALL.len());
        assert_eq!(output.stats.total, ColorToken::ALL.len());
        assert_eq!(output.class_names[0], "a-bg-primary");
    }

    #[test]
    fn test_text_and_border_blocks() {
        let output = generate(&UtilityConfig::new("a").backgrounds(false).spacing(false));
        assert!(output.css.contains(".a-text-on-primary { color: var(--color-on-primary); }"));
        assert!(output
            .css
            .contains(".a-border-outline-variant { border-color: var(--color-outline-variant); }"));
        assert!(!output.class_names.contains(&"a-border-primary-container".to_string()));
        assert_eq!(output.stats.text_colors, 33);
        assert_eq!(output.stats.border_colors, 9);
        assert_eq!(output.stats.backgrounds, 0);
    }

    #[test]
    fn test_default_spacing_counts() {
        let output = generate(&spacing_only("a"));
        // 13 scale steps x 7 directions x (padding, margin)
        assert_eq!(output.stats.spacing, 182);
        assert!(output.css.contains(".a-p-0 { padding: 0; }"));
        assert!(output.css.contains(".a-mt-4 { margin-top: 1rem; }"));
        assert!(output
            .css
            .contains(".a-my-2 { margin-top: 0.5rem; margin-bottom: 0.5rem; }"));
    }

    #[test]
    fn test_spacing_order_padding_then_margin() {
        let output = generate(&spacing_only("a").custom_spacing([("1", "1px")]));
        assert_eq!(
            output.class_names,
            vec![
                "a-p-1", "a-m-1", "a-pt-1", "a-mt-1", "a-pr-1", "a-mr-1", "a-pb-1", "a-mb-1",
                "a-pl-1", "a-ml-1", "a-px-1", "a-mx-1", "a-py-1", "a-my-1",
            ]
        );
    }

    #[test]
    fn test_category_order_in_css() {
        let css = generate(&UtilityConfig::new("a")).css;
        let bg = css.find("/* Background").unwrap();
        let text = css.find("/* Text").unwrap();
        let border = css.find("/* Border").unwrap();
        let spacing = css.find("/* Spacing").unwrap();
        assert!(bg < text && text < border && border < spacing);
        assert!(css.contains("}\n\n/* Text color utilities */"));
    }

    #[test]
    fn test_all_disabled_yields_empty_output() {
        let output = generate(&spacing_only("a").spacing(false).responsive(true));
        assert!(output.is_empty());
        assert_eq!(output.css, "");
        assert_eq!(output.stats, UtilityStats::default());
    }

    #[test]
    fn test_responsive_variants() {
        let config = spacing_only("c").custom_spacing([("sm", "0.25rem")]).responsive(true);
        let output = generate(&config);

        assert_eq!(output.stats.spacing, 14);
        assert_eq!(output.stats.total, 14 * 6);
        assert!(output.class_names.contains(&"md\\:c-p-sm".to_string()));
        assert!(output.class_names.contains(&"2xl\\:c-mx-sm".to_string()));
        assert!(output.css.contains("@media (min-width: 768px) {\n  .md\\:c-p-sm { padding: 0.25rem; }"));
        assert!(output.css.contains(".\\32 xl\\:c-p-sm { padding: 0.25rem; }"));
        // base rules are still present
        assert!(output.css.contains("\n.c-p-sm { padding: 0.25rem; }"));
    }
}
