//! Integration tests for the color manager.
//!
//! Tests verify:
//! - Construction and surface acquisition
//! - Theme application (partial themes, transparency policy, selection)
//! - Extended palette handling
//! - Restore snapshots
//! - Option changes and contrast cache coherence

use std::cell::Cell;
use std::sync::Arc;

use chromatic::palette;
use chromatic::{
    Color, ColorContrastCache, ColorError, ColorManager, ColorOptions, ColorSlot, ContrastCache,
    OptionValue, SoftwareHost, SoftwareSurface, SurfaceHost, Theme, ValidationSurface,
};
use tracing_test::traced_test;

// ===========================================================================
// Helpers
// ===========================================================================

fn manager() -> ColorManager {
    ColorManager::new(&SoftwareHost, false).expect("software host provides a surface")
}

fn manager_with_cache(options: ColorOptions) -> (ColorManager, Arc<ColorContrastCache>) {
    let cache = Arc::new(ColorContrastCache::new());
    let shared: Arc<dyn ContrastCache> = cache.clone();
    let manager = ColorManager::with_contrast_cache(&SoftwareHost, options, shared)
        .expect("software host provides a surface");
    (manager, cache)
}

/// A host whose platform has no drawing surface.
struct HeadlessHost;

impl SurfaceHost for HeadlessHost {
    type Surface = SoftwareSurface;

    fn acquire_surface(&self) -> Option<SoftwareSurface> {
        None
    }
}

/// Host that counts how many surfaces it hands out.
#[derive(Default)]
struct CountingHost {
    acquired: Cell<usize>,
}

impl SurfaceHost for CountingHost {
    type Surface = SoftwareSurface;

    fn acquire_surface(&self) -> Option<SoftwareSurface> {
        self.acquired.set(self.acquired.get() + 1);
        Some(SoftwareSurface::new())
    }
}

/// Surface whose rendered pixel drifts by one unit of blue, like a lossy
/// GPU canvas.
#[derive(Debug, Default)]
struct DriftingSurface {
    inner: SoftwareSurface,
}

impl ValidationSurface for DriftingSurface {
    fn set_fill_style(&mut self, spec: &str) -> Option<String> {
        self.inner.set_fill_style(spec)
    }

    fn fill_pixel(&mut self) -> [u8; 4] {
        let [r, g, b, a] = self.inner.fill_pixel();
        [r, g, b.saturating_add(1), a]
    }
}

struct DriftingHost;

impl SurfaceHost for DriftingHost {
    type Surface = DriftingSurface;

    fn acquire_surface(&self) -> Option<DriftingSurface> {
        Some(DriftingSurface::default())
    }
}

// ===========================================================================
// Construction
// ===========================================================================

mod construction_tests {
    use super::*;

    #[test]
    fn test_construction_fails_without_surface() {
        let result = ColorManager::new(&HeadlessHost, false);
        assert!(matches!(result, Err(ColorError::SurfaceUnavailable)));
    }

    #[test]
    fn test_construction_uses_defaults() {
        let manager = manager();
        let colors = manager.colors();
        assert_eq!(&colors.foreground, palette::default_foreground());
        assert_eq!(&colors.background, palette::default_background());
        assert_eq!(&colors.cursor, palette::default_cursor());
        assert_eq!(&colors.cursor_accent, palette::default_cursor_accent());
        assert_eq!(&colors.selection_transparent, palette::default_selection());
        assert_eq!(
            colors.selection_opaque,
            chromatic::color::blend(palette::default_background(), palette::default_selection())
        );
        assert_eq!(&*colors.ansi, palette::default_ansi_colors());
    }

    #[test]
    fn test_with_options() {
        let options = ColorOptions::default()
            .with_allow_transparency(true)
            .with_minimum_contrast_ratio(4.5);
        let manager = ColorManager::with_options(&SoftwareHost, options).expect("surface");
        assert!(manager.allow_transparency());
        assert!((manager.minimum_contrast_ratio() - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_surface_is_acquired_once_and_reused() {
        let host = CountingHost::default();
        let mut manager = ColorManager::new(&host, false).expect("surface");
        manager.set_theme(&Theme::new().with_foreground("#123456"));
        manager.set_theme(&Theme::new().with_background("#654321"));
        manager.restore_color(None);

        assert_eq!(host.acquired.get(), 1);
        assert_eq!(manager.colors().foreground.css(), "#ffffff");
        assert_eq!(manager.colors().background.css(), "#654321");
    }
}

// ===========================================================================
// Theme application
// ===========================================================================

mod theme_tests {
    use super::*;

    #[test]
    fn test_empty_theme_keeps_defaults() {
        let mut manager = manager();
        let before = manager.colors().clone();
        manager.set_theme(&Theme::new());
        assert_eq!(manager.colors(), &before);
        assert!(manager.colors().selection_foreground.is_none());
    }

    #[test]
    fn test_partial_theme_resets_unset_roles() {
        let mut manager = manager();
        manager.set_theme(&Theme::new().with_foreground("#111111").with_ansi(3, "#333333"));
        manager.set_theme(&Theme::new().with_background("#222222"));

        let colors = manager.colors();
        assert_eq!(colors.background.css(), "#222222");
        assert_eq!(&colors.foreground, palette::default_foreground());
        assert_eq!(colors.ansi[3], palette::default_ansi_colors()[3]);
    }

    #[test]
    fn test_opaque_input_uses_canonical_css() {
        let mut manager = manager();
        manager.set_theme(
            &Theme::new()
                .with_foreground("RGB(51 102 153)")
                .with_ansi(0, "Navy")
                .with_ansi(9, "#F00"),
        );
        let colors = manager.colors();
        assert_eq!(colors.foreground.css(), "#336699");
        assert_eq!(colors.foreground.rgba(), 0x3366_99ff);
        assert_eq!(colors.ansi[0].css(), "#000080");
        assert_eq!(colors.ansi[9].css(), "#ff0000");
    }

    #[test]
    fn test_opaque_channels_come_from_rendered_pixel() {
        let mut manager = ColorManager::new(&DriftingHost, false).expect("surface");
        manager.set_theme(&Theme::new().with_foreground("#336699"));
        let foreground = &manager.colors().foreground;
        assert_eq!(foreground.css(), "#336699");
        assert_eq!(foreground.rgba(), 0x3366_9aff);
    }

    #[test]
    #[traced_test]
    fn test_invalid_entry_only_affects_its_role() {
        let mut manager = manager();
        manager.set_theme(
            &Theme::new()
                .with_foreground("definitely not a color")
                .with_background("#101010")
                .with_ansi(2, "#00aa00"),
        );
        let colors = manager.colors();
        assert_eq!(&colors.foreground, palette::default_foreground());
        assert_eq!(colors.background.css(), "#101010");
        assert_eq!(colors.ansi[2].css(), "#00aa00");
        assert!(logs_contain("Color is invalid"));
        assert!(logs_contain("definitely not a color"));
    }

    #[test]
    #[traced_test]
    fn test_transparency_rejected_for_standard_roles() {
        let mut manager = manager();
        manager.set_theme(
            &Theme::new()
                .with_background("rgba(10, 20, 30, 0.5)")
                .with_ansi(4, "#0000ff80"),
        );
        let colors = manager.colors();
        assert_eq!(&colors.background, palette::default_background());
        assert_eq!(colors.ansi[4], palette::default_ansi_colors()[4]);
        assert!(logs_contain("allowTransparency is false"));
    }

    #[test]
    fn test_transparency_allowed_keeps_original_string() {
        let mut manager = ColorManager::new(&SoftwareHost, true).expect("surface");
        manager.set_theme(&Theme::new().with_background("rgba(10, 20, 30, 0.5)"));
        let background = &manager.colors().background;
        assert_eq!(background.css(), "rgba(10, 20, 30, 0.5)");
        assert_eq!(background.rgba(), 0x0a14_1e80);
    }

    #[test]
    fn test_overlay_roles_always_accept_transparency() {
        let mut manager = manager();
        manager.set_theme(
            &Theme::new()
                .with_cursor("rgba(255, 255, 255, 0.5)")
                .with_cursor_accent("#00000080")
                .with_selection("rgba(0, 128, 255, 0.25)"),
        );
        let colors = manager.colors();
        assert_eq!(colors.cursor.rgba(), 0xffff_ff80);
        assert_eq!(colors.cursor_accent.rgba(), 0x0000_0080);
        assert_eq!(colors.selection_transparent.rgba(), 0x0080_ff40);
        assert_eq!(colors.selection_transparent.css(), "rgba(0, 128, 255, 0.25)");
    }

    #[test]
    fn test_opaque_selection_forced_to_thirty_percent() {
        let mut manager = manager();
        manager.set_theme(&Theme::new().with_selection("#ffffff"));
        let selection = &manager.colors().selection_transparent;
        assert_eq!(selection.alpha(), 0x4d);
        assert_eq!(selection.channels(), (0xff, 0xff, 0xff, 0x4d));
    }

    #[test]
    fn test_selection_opaque_uses_new_background() {
        let mut manager = manager();
        manager.set_theme(
            &Theme::new()
                .with_background("#ffffff")
                .with_selection("rgba(0, 0, 0, 0.5)"),
        );
        let colors = manager.colors();
        assert!(colors.selection_opaque.is_opaque());
        assert_eq!(colors.selection_opaque.rgba(), 0x7f7f_7fff);
    }

    #[test]
    fn test_selection_foreground_is_optional() {
        let mut manager = manager();
        manager.set_theme(&Theme::new().with_selection_foreground("#abcdef"));
        assert_eq!(
            manager.colors().selection_foreground.as_ref().map(Color::css),
            Some("#abcdef")
        );

        manager.set_theme(&Theme::new());
        assert!(manager.colors().selection_foreground.is_none());

        manager.set_theme(&Theme::new().with_selection_foreground("nope"));
        assert!(manager.colors().selection_foreground.is_none());
    }

    #[test]
    fn test_selection_foreground_follows_transparency_policy() {
        let mut manager = manager();
        manager.set_theme(&Theme::new().with_selection_foreground("#ffffff80"));
        assert!(manager.colors().selection_foreground.is_none());

        manager.set_allow_transparency(true);
        manager.set_theme(&Theme::new().with_selection_foreground("#ffffff80"));
        assert_eq!(
            manager.colors().selection_foreground.as_ref().map(Color::rgba),
            Some(0xffff_ff80)
        );
    }

    #[test]
    fn test_applying_same_theme_twice_is_idempotent() {
        let theme = Theme::new()
            .with_foreground("#c0caf5")
            .with_background("#1a1b26")
            .with_selection("#33467c")
            .with_selection_foreground("white")
            .with_ansi(1, "#f7768e")
            .with_extended_ansi(["#010101", "#020202"]);

        let mut manager = manager();
        manager.set_theme(&theme);
        let first = manager.colors().clone();
        manager.set_theme(&theme);
        let second = manager.colors();

        assert_eq!(&first, second);
        assert_eq!(first.foreground.css(), second.foreground.css());
        assert_eq!(first.selection_transparent.css(), second.selection_transparent.css());
    }
}

// ===========================================================================
// Extended palette
// ===========================================================================

mod extended_ansi_tests {
    use super::*;

    #[test]
    fn test_extended_entries_fill_from_slot_sixteen() {
        let mut manager = manager();
        manager.set_theme(&Theme::new().with_extended_ansi(["#010101", "#020202", "bogus"]));
        let ansi = &manager.colors().ansi;
        let defaults = palette::default_ansi_colors();
        assert_eq!(ansi[16].css(), "#010101");
        assert_eq!(ansi[17].css(), "#020202");
        assert_eq!(ansi[18], defaults[18]);
        assert_eq!(ansi[255], defaults[255]);
    }

    #[test]
    fn test_missing_extended_resets_upper_palette() {
        let mut manager = manager();
        manager.set_theme(&Theme::new().with_extended_ansi(["#010101", "#020202"]));
        manager.set_theme(&Theme::new().with_foreground("#eeeeee"));

        let ansi = &manager.colors().ansi;
        let defaults = palette::default_ansi_colors();
        assert_eq!(ansi[16], defaults[16]);
        assert_eq!(ansi[17], defaults[17]);
        assert_eq!(&**ansi, defaults);
    }

    #[test]
    fn test_shorter_extended_list_resets_the_rest() {
        let mut manager = manager();
        manager.set_theme(&Theme::new().with_extended_ansi(["#010101", "#020202"]));
        manager.set_theme(&Theme::new().with_extended_ansi(["#030303"]));
        let ansi = &manager.colors().ansi;
        assert_eq!(ansi[16].css(), "#030303");
        assert_eq!(ansi[17], palette::default_ansi_colors()[17]);
    }

    #[test]
    #[traced_test]
    fn test_entries_beyond_palette_are_ignored() {
        let mut manager = manager();
        let extended: Vec<String> = (0..300).map(|i| format!("#0000{:02x}", i % 256)).collect();
        manager.set_theme(&Theme::new().with_extended_ansi(extended));
        let ansi = &manager.colors().ansi;
        assert_eq!(ansi.len(), 256);
        assert_eq!(ansi[16].css(), "#000000");
        assert_eq!(ansi[255].css(), "#0000ef");
        assert!(logs_contain("beyond the palette"));
    }
}

// ===========================================================================
// Restore
// ===========================================================================

mod restore_tests {
    use super::*;

    #[test]
    fn test_restore_all_uses_last_theme() {
        let mut manager = manager();
        manager.set_theme(&Theme::new().with_ansi(1, "#aa0000"));
        manager.set_theme(&Theme::new().with_ansi(1, "#bb0000").with_extended_ansi(["#123123"]));

        assert!(manager.set_color(ColorSlot::Ansi(1), "#00ff00"));
        assert!(manager.set_color(ColorSlot::Ansi(16), "#00ff00"));
        assert!(manager.set_color(ColorSlot::Ansi(200), "#00ff00"));
        manager.restore_color(None);

        let ansi = &manager.colors().ansi;
        assert_eq!(ansi[1].css(), "#bb0000");
        assert_eq!(ansi[16].css(), "#123123");
        assert_eq!(ansi[200], palette::default_ansi_colors()[200]);
    }

    #[test]
    fn test_dynamic_color_does_not_survive_theme() {
        let mut manager = manager();
        let defaults = palette::default_ansi_colors();
        assert!(manager.set_color(ColorSlot::Ansi(100), "#ff0000"));
        assert!(manager.set_color(ColorSlot::Ansi(2), "#ff0000"));

        manager.set_theme(&Theme::new());
        assert_eq!(manager.colors().ansi[100], defaults[100]);
        assert_eq!(manager.colors().ansi[2], defaults[2]);

        manager.restore_color(None);
        assert_eq!(manager.colors().ansi[100], defaults[100]);
        assert_eq!(&*manager.colors().ansi, defaults);
    }

    #[test]
    fn test_restore_all_leaves_structural_colors() {
        let mut manager = manager();
        manager.set_theme(&Theme::new().with_foreground("#aaaaaa"));
        assert!(manager.set_color(ColorSlot::Foreground, "#bbbbbb"));
        assert!(manager.set_color(ColorSlot::Ansi(5), "#bbbbbb"));
        manager.restore_color(None);

        assert_eq!(manager.colors().foreground.css(), "#bbbbbb");
        assert_eq!(manager.colors().ansi[5], palette::default_ansi_colors()[5]);
    }

    #[test]
    fn test_restore_foreground_only() {
        let mut manager = manager();
        manager.set_theme(
            &Theme::new()
                .with_foreground("#aaaaaa")
                .with_background("#111111")
                .with_cursor("#cccccc"),
        );
        for slot in [
            ColorSlot::Foreground,
            ColorSlot::Background,
            ColorSlot::Cursor,
            ColorSlot::Ansi(7),
        ] {
            assert!(manager.set_color(slot, "#ff00ff"));
        }
        manager.restore_color(Some(ColorSlot::Foreground));

        let colors = manager.colors();
        assert_eq!(colors.foreground.css(), "#aaaaaa");
        assert_eq!(colors.background.css(), "#ff00ff");
        assert_eq!(colors.cursor.css(), "#ff00ff");
        assert_eq!(colors.ansi[7].css(), "#ff00ff");
    }

    #[test]
    fn test_restore_single_ansi_slot() {
        let mut manager = manager();
        assert!(manager.set_color(ColorSlot::Ansi(3), "#010203"));
        assert!(manager.set_color(ColorSlot::Ansi(4), "#010203"));
        manager.restore_color(Some(ColorSlot::Ansi(3)));

        let ansi = &manager.colors().ansi;
        assert_eq!(ansi[3], palette::default_ansi_colors()[3]);
        assert_eq!(ansi[4].css(), "#010203");
    }

    #[test]
    fn test_restore_index_maps_structural_slots() {
        let mut manager = manager();
        manager.set_theme(&Theme::new().with_background("#202020"));
        assert!(manager.set_color(ColorSlot::Background, "#404040"));
        manager.restore_index(chromatic::BACKGROUND_INDEX).expect("in range");
        assert_eq!(manager.colors().background.css(), "#202020");
    }

    #[test]
    fn test_restore_index_out_of_range_is_an_error() {
        let mut manager = manager();
        assert!(manager.set_color(ColorSlot::Ansi(0), "#010203"));
        let before = manager.colors().clone();

        assert_eq!(manager.restore_index(259), Err(ColorError::SlotOutOfRange(259)));
        assert_eq!(manager.colors(), &before);
    }

    #[test]
    #[traced_test]
    fn test_set_color_rejects_invalid_input() {
        let mut manager = manager();
        assert!(!manager.set_color(ColorSlot::Cursor, "no such color"));
        assert!(!manager.set_color(ColorSlot::Ansi(1), "#ff000080"));
        assert_eq!(&manager.colors().cursor, palette::default_cursor());
        assert_eq!(manager.colors().ansi[1], palette::default_ansi_colors()[1]);
        assert!(logs_contain("no such color"));
    }
}

// ===========================================================================
// Options and contrast cache
// ===========================================================================

mod option_tests {
    use super::*;

    fn fill(cache: &ColorContrastCache) {
        cache.set_color(0x0000_00ff, 0x1111_11ff, None);
        cache.set_css(0x0000_00ff, 0x2222_22ff, Some("#ffffff".into()));
        assert!(!cache.is_empty());
    }

    #[test]
    fn test_minimum_contrast_ratio_clears_cache() {
        let (mut manager, cache) = manager_with_cache(ColorOptions::default());
        fill(&cache);
        manager.on_options_change("minimumContrastRatio", &OptionValue::from(4.5));

        assert!(cache.is_empty());
        assert_eq!(cache.get_color(0x0000_00ff, 0x1111_11ff), None);
        assert_eq!(cache.get_css(0x0000_00ff, 0x2222_22ff), None);
        assert!((manager.minimum_contrast_ratio() - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    #[traced_test]
    fn test_wrongly_typed_ratio_still_clears_cache() {
        let (mut manager, cache) = manager_with_cache(ColorOptions::default());
        fill(&cache);
        manager.on_options_change("minimumContrastRatio", &OptionValue::from("high"));

        assert!(cache.is_empty());
        assert!((manager.minimum_contrast_ratio() - 1.0).abs() < f64::EPSILON);
        assert!(logs_contain("Ignoring option value"));
    }

    #[test]
    fn test_allow_transparency_option() {
        let mut manager = manager();
        manager.on_options_change("allowTransparency", &OptionValue::from(true));
        assert!(manager.allow_transparency());

        manager.set_theme(&Theme::new().with_foreground("#ffffff80"));
        assert_eq!(manager.colors().foreground.rgba(), 0xffff_ff80);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let (mut manager, cache) = manager_with_cache(ColorOptions::default());
        fill(&cache);
        let before = manager.colors().clone();

        manager.on_options_change("fontSize", &OptionValue::from(14.0));
        manager.on_options_change("theme", &OptionValue::from("dark"));

        assert_eq!(manager.colors(), &before);
        assert!(!manager.allow_transparency());
        assert!(!cache.is_empty());
    }

    #[test]
    fn test_color_changes_clear_cache() {
        let (mut manager, cache) = manager_with_cache(ColorOptions::default());

        fill(&cache);
        manager.set_theme(&Theme::new());
        assert!(cache.is_empty());

        fill(&cache);
        manager.restore_color(None);
        assert!(cache.is_empty());

        fill(&cache);
        assert!(manager.set_color(ColorSlot::Ansi(1), "red"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_contrast_foreground_is_cached() {
        let options = ColorOptions::default().with_minimum_contrast_ratio(4.5);
        let (manager, cache) = manager_with_cache(options);
        let bg = Color::from_rgb(0, 0, 0);
        let fg = Color::from_rgb(0x33, 0x33, 0x33);

        let adjusted = manager.contrast_foreground(&bg, &fg).expect("needs adjustment");
        let ratio = chromatic::color::contrast_ratio(
            adjusted.relative_luminance(),
            bg.relative_luminance(),
        );
        assert!(ratio >= 4.5);
        assert_eq!(cache.get_color(bg.rgba(), fg.rgba()), Some(Some(adjusted.clone())));
        assert_eq!(manager.contrast_foreground(&bg, &fg), Some(adjusted));
    }

    #[test]
    fn test_contrast_foreground_caches_sufficient_pairs() {
        let options = ColorOptions::default().with_minimum_contrast_ratio(4.5);
        let (manager, cache) = manager_with_cache(options);
        let bg = Color::from_rgb(0, 0, 0);
        let fg = Color::from_rgb(0xff, 0xff, 0xff);

        assert_eq!(manager.contrast_foreground(&bg, &fg), None);
        assert_eq!(cache.get_color(bg.rgba(), fg.rgba()), Some(None));
    }

    #[test]
    fn test_managers_share_cache_through_color_set() {
        let (manager, cache) = manager_with_cache(ColorOptions::default());
        manager.colors().contrast_cache().set_css(1, 2, None);
        assert_eq!(cache.get_css(1, 2), Some(None));
    }
}
