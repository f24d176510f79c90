//! Closed design-system catalogues used by the utility generator.
//!
//! Colors, breakpoints and spacing directions are fixed by the design system,
//! so they are modelled as enums rather than string maps. Open-ended data (the
//! spacing scale a consumer passes in, theme color overrides) stays in ordered
//! maps on the configuration types.
//!
//! Every catalogue exposes its members in a fixed order through an `ALL`
//! constant. The generator iterates those constants, which is what makes its
//! output byte-for-byte reproducible.

use std::fmt;

/// Material 3 color roles that utilities can reference.
///
/// Each token maps to the CSS custom property `--color-<name>`, the same
/// property the theme provider writes when a consumer overrides a color.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum ColorToken {
    // Brand families
    Primary,
    OnPrimary,
    PrimaryContainer,
    OnPrimaryContainer,
    Secondary,
    OnSecondary,
    SecondaryContainer,
    OnSecondaryContainer,
    Tertiary,
    OnTertiary,
    TertiaryContainer,
    OnTertiaryContainer,

    // Error family
    Error,
    OnError,
    ErrorContainer,
    OnErrorContainer,

    // Surface family
    Surface,
    SurfaceDim,
    SurfaceBright,
    SurfaceContainerLowest,
    SurfaceContainerLow,
    SurfaceContainer,
    SurfaceContainerHigh,
    SurfaceContainerHighest,
    OnSurface,
    SurfaceVariant,
    OnSurfaceVariant,

    // Outline family
    Outline,
    OutlineVariant,

    // Semantic aliases
    Success,
    Warning,
    Info,
    Danger,
}

impl ColorToken {
    /// Every token, in catalogue order.
    pub const ALL: [ColorToken; 33] = [
        ColorToken::Primary,
        ColorToken::OnPrimary,
        ColorToken::PrimaryContainer,
        ColorToken::OnPrimaryContainer,
        ColorToken::Secondary,
        ColorToken::OnSecondary,
        ColorToken::SecondaryContainer,
        ColorToken::OnSecondaryContainer,
        ColorToken::Tertiary,
        ColorToken::OnTertiary,
        ColorToken::TertiaryContainer,
        ColorToken::OnTertiaryContainer,
        ColorToken::Error,
        ColorToken::OnError,
        ColorToken::ErrorContainer,
        ColorToken::OnErrorContainer,
        ColorToken::Surface,
        ColorToken::SurfaceDim,
        ColorToken::SurfaceBright,
        ColorToken::SurfaceContainerLowest,
        ColorToken::SurfaceContainerLow,
        ColorToken::SurfaceContainer,
        ColorToken::SurfaceContainerHigh,
        ColorToken::SurfaceContainerHighest,
        ColorToken::OnSurface,
        ColorToken::SurfaceVariant,
        ColorToken::OnSurfaceVariant,
        ColorToken::Outline,
        ColorToken::OutlineVariant,
        ColorToken::Success,
        ColorToken::Warning,
        ColorToken::Info,
        ColorToken::Danger,
    ];

    /// Tokens that make sense as a border color.
    ///
    /// Container and "on-*" roles are never used for borders, so border
    /// utilities only cover the outlines, the three brand hues and the
    /// semantic aliases.
    pub const BORDER: [ColorToken; 9] = [
        ColorToken::Outline,
        ColorToken::OutlineVariant,
        ColorToken::Primary,
        ColorToken::Secondary,
        ColorToken::Tertiary,
        ColorToken::Success,
        ColorToken::Warning,
        ColorToken::Info,
        ColorToken::Danger,
    ];

    /// Kebab-case token name used in class names and custom properties.
    pub fn name(self) -> &'static str {
        match self {
            ColorToken::Primary => "primary",
            ColorToken::OnPrimary => "on-primary",
            ColorToken::PrimaryContainer => "primary-container",
            ColorToken::OnPrimaryContainer => "on-primary-container",
            ColorToken::Secondary => "secondary",
            ColorToken::OnSecondary => "on-secondary",
            ColorToken::SecondaryContainer => "secondary-container",
            ColorToken::OnSecondaryContainer => "on-secondary-container",
            ColorToken::Tertiary => "tertiary",
            ColorToken::OnTertiary => "on-tertiary",
            ColorToken::TertiaryContainer => "tertiary-container",
            ColorToken::OnTertiaryContainer => "on-tertiary-container",
            ColorToken::Error => "error",
            ColorToken::OnError => "on-error",
            ColorToken::ErrorContainer => "error-container",
            ColorToken::OnErrorContainer => "on-error-container",
            ColorToken::Surface => "surface",
            ColorToken::SurfaceDim => "surface-dim",
            ColorToken::SurfaceBright => "surface-bright",
            ColorToken::SurfaceContainerLowest => "surface-container-lowest",
            ColorToken::SurfaceContainerLow => "surface-container-low",
            ColorToken::SurfaceContainer => "surface-container",
            ColorToken::SurfaceContainerHigh => "surface-container-high",
            ColorToken::SurfaceContainerHighest => "surface-container-highest",
            ColorToken::OnSurface => "on-surface",
            ColorToken::SurfaceVariant => "surface-variant",
            ColorToken::OnSurfaceVariant => "on-surface-variant",
            ColorToken::Outline => "outline",
            ColorToken::OutlineVariant => "outline-variant",
            ColorToken::Success => "success",
            ColorToken::Warning => "warning",
            ColorToken::Info => "info",
            ColorToken::Danger => "danger",
        }
    }

    /// The `var(...)` expression referencing this token's custom property.
    pub fn css_var(self) -> String {
        format!("var(--color-{})", self.name())
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Responsive breakpoints, smallest first.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Breakpoint {
    Sm,
    Md,
    Lg,
    Xl,
    Xxl,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 5] = [
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
        Breakpoint::Xxl,
    ];

    /// Prefix used in responsive class names (`md:...`).
    pub fn name(self) -> &'static str {
        match self {
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
            Breakpoint::Xxl => "2xl",
        }
    }

    /// Minimum viewport width in pixels.
    pub fn min_width(self) -> u32 {
        match self {
            Breakpoint::Sm => 640,
            Breakpoint::Md => 768,
            Breakpoint::Lg => 1024,
            Breakpoint::Xl => 1280,
            Breakpoint::Xxl => 1536,
        }
    }

    /// The media query condition, e.g. `(min-width: 768px)`.
    pub fn media_query(self) -> String {
        format!("(min-width: {}px)", self.min_width())
    }
}

/// Box sides a spacing utility applies to.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Direction {
    All,
    Top,
    Right,
    Bottom,
    Left,
    Horizontal,
    Vertical,
}

impl Direction {
    pub const ALL: [Direction; 7] = [
        Direction::All,
        Direction::Top,
        Direction::Right,
        Direction::Bottom,
        Direction::Left,
        Direction::Horizontal,
        Direction::Vertical,
    ];

    /// Suffix appended to `p` / `m` in the class name.
    pub fn suffix(self) -> &'static str {
        match self {
            Direction::All => "",
            Direction::Top => "t",
            Direction::Right => "r",
            Direction::Bottom => "b",
            Direction::Left => "l",
            Direction::Horizontal => "x",
            Direction::Vertical => "y",
        }
    }

    /// Property names for the given box property (`padding` or `margin`).
    pub fn properties(self, property: &str) -> Vec<String> {
        let sides: &[&str] = match self {
            Direction::All => return vec![property.to_string()],
            Direction::Top => &["top"],
            Direction::Right => &["right"],
            Direction::Bottom => &["bottom"],
            Direction::Left => &["left"],
            Direction::Horizontal => &["left", "right"],
            Direction::Vertical => &["top", "bottom"],
        };
        sides
            .iter()
            .map(|side| format!("{}-{}", property, side))
            .collect()
    }
}

/// Steps of the default spacing scale, in quarter-rem units.
pub const DEFAULT_SPACING_STEPS: [u32; 13] = [0, 1, 2, 3, 4, 5, 6, 8, 10, 12, 16, 20, 24];

/// Converts a spacing step to its CSS length (`0`, `0.25rem`, `1rem`, ...).
pub fn spacing_step_value(step: u32) -> String {
    if step == 0 {
        return "0".to_string();
    }
    format!("{}rem", f64::from(step) * 0.25)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_color_token_names_are_unique() {
        let names: HashSet<&str> = ColorToken::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names.len(), ColorToken::ALL.len());
    }

    #[test]
    fn test_border_tokens_are_subset_of_catalogue() {
        for token in ColorToken::BORDER {
            assert!(ColorToken::ALL.contains(&token), "{token} missing");
        }
        assert!(!ColorToken::BORDER.contains(&ColorToken::PrimaryContainer));
    }

    #[test]
    fn test_css_var_uses_color_namespace() {
        assert_eq!(
            ColorToken::SurfaceContainerHigh.css_var(),
            "var(--color-surface-container-high)"
        );
    }

    #[test]
    fn test_breakpoints_are_ascending() {
        let widths: Vec<u32> = Breakpoint::ALL.iter().map(|b| b.min_width()).collect();
        let mut sorted = widths.clone();
        sorted.sort_unstable();
        assert_eq!(widths, sorted);
        assert_eq!(Breakpoint::Md.media_query(), "(min-width: 768px)");
    }

    #[test]
    fn test_direction_properties() {
        assert_eq!(Direction::All.properties("padding"), vec!["padding"]);
        assert_eq!(Direction::Top.properties("margin"), vec!["margin-top"]);
        assert_eq!(
            Direction::Horizontal.properties("padding"),
            vec!["padding-left", "padding-right"]
        );
        assert_eq!(
            Direction::Vertical.properties("margin"),
            vec!["margin-top", "margin-bottom"]
        );
    }

    #[test]
    fn test_spacing_step_values() {
        assert_eq!(spacing_step_value(0), "0");
        assert_eq!(spacing_step_value(1), "0.25rem");
        assert_eq!(spacing_step_value(2), "0.5rem");
        assert_eq!(spacing_step_value(4), "1rem");
        assert_eq!(spacing_step_value(6), "1.5rem");
        assert_eq!(spacing_step_value(24), "6rem");
    }
}
