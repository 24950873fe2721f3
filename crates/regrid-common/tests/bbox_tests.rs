//! Tests for LatLonBox operations used by cropping.

use regrid_common::LatLonBox;

// ============================================================================
// Geometry
// ============================================================================

#[test]
fn test_bbox_dimensions() {
    let bbox = LatLonBox::new(-100.0, 30.0, -90.0, 40.0);
    assert!((bbox.width() - 10.0).abs() < f64::EPSILON);
    assert!((bbox.height() - 10.0).abs() < f64::EPSILON);

    let (clon, clat) = bbox.center();
    assert!((clon - (-95.0)).abs() < f64::EPSILON);
    assert!((clat - 35.0).abs() < f64::EPSILON);
}

#[test]
fn test_bbox_default_is_global() {
    let bbox = LatLonBox::default();
    assert_eq!(bbox.min_lon, -180.0);
    assert_eq!(bbox.max_lat, 90.0);
}

// ============================================================================
// Padding and snapping (the crop preparation pipeline)
// ============================================================================

#[test]
fn test_zero_padding_is_identity() {
    let bbox = LatLonBox::new(-70.0, 5.0, -30.0, 20.0);
    assert_eq!(bbox.expand_fraction(0.0), bbox);
}

#[test]
fn test_padding_then_snapping_grows_monotonically() {
    let bbox = LatLonBox::new(-56.3, 11.1, -53.7, 12.9);
    let prepared = bbox.expand_fraction(0.1).snap_outward();

    assert!(prepared.min_lon <= bbox.min_lon);
    assert!(prepared.min_lat <= bbox.min_lat);
    assert!(prepared.max_lon >= bbox.max_lon);
    assert!(prepared.max_lat >= bbox.max_lat);
    assert_eq!(prepared.min_lon, prepared.min_lon.floor());
    assert_eq!(prepared.max_lat, prepared.max_lat.ceil());
}

#[test]
fn test_clamp_to_valid() {
    let bbox = LatLonBox::new(-200.0, -95.0, 200.0, 95.0).clamp_to_valid();
    assert_eq!(bbox.min_lon, -180.0);
    assert_eq!(bbox.min_lat, -90.0);
    assert_eq!(bbox.max_lon, 180.0);
    assert_eq!(bbox.max_lat, 90.0);
}

// ============================================================================
// Longitude shifting (0-360 datasets)
// ============================================================================

#[test]
fn test_shift_into_0_360_range() {
    let bbox = LatLonBox::new(-70.0, 5.0, -30.0, 20.0);
    let shifted = bbox.shift_lon(360.0);

    assert_eq!(shifted.min_lon, 290.0);
    assert_eq!(shifted.max_lon, 330.0);
    // Latitudes untouched
    assert_eq!(shifted.min_lat, bbox.min_lat);
    assert_eq!(shifted.max_lat, bbox.max_lat);
}

#[test]
fn test_serde_roundtrip() {
    let bbox = LatLonBox::new(-125.0, 24.0, -66.0, 50.0);
    let json = serde_json::to_string(&bbox).unwrap();
    let back: LatLonBox = serde_json::from_str(&json).unwrap();
    assert_eq!(bbox, back);
}
