use iced::theme::Palette;
use iced::{Color, Theme};

use livecheck_core::liveness::domain::verdict::Verdict;

use crate::settings::Appearance;

/// Stock iced light or dark theme; high contrast swaps in a pure black or
/// white background with maximum-contrast text.
pub fn resolve_theme(appearance: Appearance, high_contrast: bool) -> Theme {
    let base = match appearance {
        Appearance::Dark => Theme::Dark,
        Appearance::Light => Theme::Light,
    };
    if !high_contrast {
        return base;
    }
    let (background, text) = match appearance {
        Appearance::Dark => (Color::BLACK, Color::WHITE),
        Appearance::Light => (Color::WHITE, Color::BLACK),
    };
    Theme::custom(
        "High contrast",
        Palette {
            background,
            text,
            ..base.palette()
        },
    )
}

/// Secondary text: captions, hints, per-face details.
pub fn muted_color(theme: &Theme) -> Color {
    Color {
        a: 0.6,
        ..theme.palette().text
    }
}

/// Panel behind the video while no frame is shown.
pub fn surface_color(theme: &Theme) -> Color {
    let base = if theme.extended_palette().is_dark {
        Color::WHITE
    } else {
        Color::BLACK
    };
    Color { a: 0.06, ..base }
}

/// Text color for a verdict, matching the overlay box colors.
pub fn verdict_color(theme: &Theme, verdict: Verdict) -> Color {
    match verdict {
        Verdict::Live => theme.palette().success,
        Verdict::Spoof => theme.palette().danger,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::dark(Appearance::Dark, true)]
    #[case::light(Appearance::Light, false)]
    fn test_appearance_picks_matching_base(#[case] appearance: Appearance, #[case] dark: bool) {
        let theme = resolve_theme(appearance, false);
        assert_eq!(theme.extended_palette().is_dark, dark);
    }

    #[test]
    fn test_high_contrast_dark_is_white_on_black() {
        let palette = resolve_theme(Appearance::Dark, true).palette();
        assert_eq!(palette.background, Color::BLACK);
        assert_eq!(palette.text, Color::WHITE);
        assert_eq!(palette.success, Theme::Dark.palette().success);
    }

    #[test]
    fn test_verdict_colors_differ() {
        let theme = resolve_theme(Appearance::Light, false);
        assert_ne!(
            verdict_color(&theme, Verdict::Live),
            verdict_color(&theme, Verdict::Spoof)
        );
    }
}
