use beandregs::{thumbnail_dimensions, Location};
use proptest::prelude::*;

proptest! {
    #[test]
    fn thumbnail_fits_inside_box(
        width in 1u32..=5000u32,
        height in 1u32..=5000u32,
        max_width in 1u32..=2000u32,
        max_height in 1u32..=2000u32
    ) {
        let (w, h) = thumbnail_dimensions(width, height, max_width, max_height);
        prop_assert!(w <= max_width);
        prop_assert!(h <= max_height);
        prop_assert!(w >= 1 && h >= 1);
    }

    #[test]
    fn thumbnail_never_upscales(
        width in 1u32..=5000u32,
        height in 1u32..=5000u32,
        max_width in 1u32..=2000u32,
        max_height in 1u32..=2000u32
    ) {
        let (w, h) = thumbnail_dimensions(width, height, max_width, max_height);
        prop_assert!(w <= width);
        prop_assert!(h <= height);
    }

    #[test]
    fn image_within_box_is_untouched(
        max_width in 1u32..=2000u32,
        max_height in 1u32..=2000u32,
        width_frac in 0.01f64..=1.0f64,
        height_frac in 0.01f64..=1.0f64
    ) {
        let width = ((max_width as f64 * width_frac) as u32).max(1);
        let height = ((max_height as f64 * height_frac) as u32).max(1);
        prop_assert_eq!(
            thumbnail_dimensions(width, height, max_width, max_height),
            (width, height)
        );
    }

    #[test]
    fn thumbnail_fills_one_side_of_box(
        width in 1u32..=5000u32,
        height in 1u32..=5000u32,
        max_width in 1u32..=2000u32,
        max_height in 1u32..=2000u32
    ) {
        prop_assume!(width > max_width || height > max_height);
        let (w, h) = thumbnail_dimensions(width, height, max_width, max_height);
        prop_assert!(w == max_width || h == max_height);
    }

    #[test]
    fn thumbnail_keeps_aspect_ratio_within_one_pixel(
        width in 10u32..=5000u32,
        height in 10u32..=5000u32,
        max_width in 10u32..=2000u32,
        max_height in 10u32..=2000u32
    ) {
        prop_assume!(width > max_width || height > max_height);
        let (w, h) = thumbnail_dimensions(width, height, max_width, max_height);
        let aspect = width as f64 / height as f64;

        // The scaled side is within one pixel of the exact value.
        if w == max_width && h != max_height {
            prop_assert!((w as f64 / aspect - h as f64).abs() <= 1.0);
        } else if h == max_height && w != max_width {
            prop_assert!((h as f64 * aspect - w as f64).abs() <= 1.0);
        }
    }

    #[test]
    fn well_formed_line_round_trips_through_display(
        name in "[A-Za-z0-9_-]{1,20}",
        url in "https?://[a-z]{1,10}\\.com/[a-z0-9]{1,10}\\.(png|jpg|gif)"
    ) {
        let line = format!("  {} =   {}  ", name, url);
        let location = Location::parse_line(&line, 1).unwrap().unwrap();
        prop_assert_eq!(&location.name, &name);
        prop_assert_eq!(&location.url, &url);
        prop_assert_eq!(location.to_string(), format!("{} = {}", name, url));
    }

    #[test]
    fn comment_only_lines_are_ignored(text in "[^\n]{0,40}") {
        let line = format!("# {}", text);
        prop_assert!(Location::parse_line(&line, 1).is_none());
    }
}
