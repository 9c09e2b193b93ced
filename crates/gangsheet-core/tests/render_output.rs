use gangsheet_core::decode::{SourceFormat, decode_artwork, jpeg_dpi, png_dpi};
use gangsheet_core::prelude::*;
use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use image::{ExtendedColorType, Rgb, RgbImage, Rgba, RgbaImage};

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// 4 in roll at 10 DPI, no header, 2 in billing unit: a 1 in square lands at (0.5, 0.5).
fn small_roll() -> RollConfig {
    RollConfig::builder()
        .roll_width(4.0)
        .margin(0.5)
        .dpi(10)
        .billing_unit(2.0)
        .header_allowance(0.0)
        .build()
}

fn red_square() -> Artwork {
    Artwork::with_print_size("red.png", RgbaImage::from_pixel(10, 10, RED), 1.0, 1.0).unwrap()
}

#[test]
fn raster_places_artwork_at_margin_offset() {
    let cfg = small_roll();
    let arts = vec![red_square()];
    let layout = compute_layout(&arts, &cfg).unwrap();
    assert_eq!(layout.billable_length, 2.0);

    let canvas = render_raster(&layout, &arts, cfg.dpi, &RenderOptions::default()).unwrap();
    assert_eq!(canvas.dimensions(), (40, 20));
    assert_eq!(*canvas.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    assert_eq!(*canvas.get_pixel(5, 5), RED);
    assert_eq!(*canvas.get_pixel(14, 14), RED);
    assert_eq!(canvas.get_pixel(15, 15)[3], 0);
}

#[test]
fn mirror_flips_the_whole_sheet() {
    let cfg = small_roll();
    let arts = vec![red_square()];
    let layout = compute_layout(&arts, &cfg).unwrap();
    let opts = RenderOptions {
        mirror: true,
        ..Default::default()
    };
    let canvas = render_raster(&layout, &arts, cfg.dpi, &opts).unwrap();
    assert_eq!(canvas.get_pixel(10, 10)[3], 0);
    assert_eq!(*canvas.get_pixel(34, 5), RED);
    assert_eq!(*canvas.get_pixel(25, 14), RED);
}

#[test]
fn header_band_pushes_artwork_down() {
    let cfg = RollConfig::builder()
        .roll_width(4.0)
        .margin(0.5)
        .dpi(10)
        .billing_unit(2.0)
        .header_allowance(1.0)
        .build();
    let arts = vec![red_square()];
    let layout = compute_layout(&arts, &cfg).unwrap();
    // 2 in content + 1 in header rounds to 4 in
    assert_eq!(layout.billable_length, 4.0);
    let canvas = render_raster(&layout, &arts, cfg.dpi, &RenderOptions::default()).unwrap();
    assert_eq!(canvas.dimensions(), (40, 40));
    assert_eq!(canvas.get_pixel(5, 5)[3], 0);
    assert_eq!(*canvas.get_pixel(5, 15), RED);
}

#[test]
fn raster_header_text_leaves_band_blank() {
    let cfg = RollConfig::builder()
        .roll_width(4.0)
        .margin(0.5)
        .dpi(10)
        .billing_unit(2.0)
        .header_allowance(1.0)
        .build();
    let arts = vec![red_square()];
    let layout = compute_layout(&arts, &cfg).unwrap();
    let with_text = RenderOptions {
        mirror: false,
        header_text: Some("CUSTOMER: Acme | ORDER: #7".into()),
    };
    let plain = render_raster(&layout, &arts, cfg.dpi, &RenderOptions::default()).unwrap();
    let labeled = render_raster(&layout, &arts, cfg.dpi, &with_text).unwrap();
    assert_eq!(plain, labeled);
    assert!((0..10).all(|y| (0..40).all(|x| labeled.get_pixel(x, y)[3] == 0)));
}

#[test]
fn rotated_artwork_is_resampled_to_print_size() {
    let cfg = small_roll();
    // 2x1 source printed 1 in wide, 2 in tall: rotated to 2x1 on the roll
    let mut src = RgbaImage::from_pixel(10, 20, RED);
    src.put_pixel(0, 0, Rgba([0, 0, 255, 255]));
    let arts = vec![Artwork::with_print_size("tall.png", src, 1.0, 2.0).unwrap()];
    let layout = compute_layout(&arts, &cfg).unwrap();
    let placed = &layout.placement.items[0];
    assert!(placed.rotated);
    assert_eq!((placed.width, placed.height), (2.0, 1.0));

    let canvas = render_raster(&layout, &arts, cfg.dpi, &RenderOptions::default()).unwrap();
    // a 20x10 block starting at (5, 5)
    assert_eq!(canvas.get_pixel(24, 14)[3], 255);
    assert_eq!(canvas.get_pixel(25, 14)[3], 0);
}

#[test]
fn png_carries_render_dpi() {
    let canvas = RgbaImage::from_pixel(300, 150, RED);
    let bytes = encode_png(&canvas, 300).unwrap();
    assert_eq!(png_dpi(&bytes), Some(300.0));

    let decoded = decode_artwork(&bytes, SourceFormat::Png, 300, None).unwrap();
    assert_eq!(decoded.image.dimensions(), (300, 150));
    assert_eq!(decoded.dpi, 300.0);
    // natural print size follows the embedded density
    let art = Artwork::new("sheet.png", decoded.image, decoded.dpi).unwrap();
    assert_eq!((art.width(), art.height()), (1.0, 0.5));
}

#[test]
fn tiny_natural_size_is_clamped() {
    // 1x30 px at 300 DPI rounds to 0.0 x 0.1 in
    let art = Artwork::new("hairline.png", RgbaImage::new(1, 30), 300.0).unwrap();
    assert_eq!((art.width(), art.height()), (0.1, 0.1));
    let art = Artwork::new("dot.png", RgbaImage::new(1, 1), 600.0).unwrap();
    assert_eq!((art.width(), art.height()), (0.1, 0.1));
}

fn encode_jpeg(w: u32, h: u32, density: Option<PixelDensity>) -> Vec<u8> {
    let rgb = RgbImage::from_pixel(w, h, Rgb([200, 30, 30]));
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, 90);
    if let Some(d) = density {
        encoder.set_pixel_density(d);
    }
    encoder
        .encode(rgb.as_raw(), w, h, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

#[test]
fn jpeg_density_sets_natural_size() {
    let bytes = encode_jpeg(720, 360, Some(PixelDensity::dpi(72)));
    assert_eq!(jpeg_dpi(&bytes), Some(72.0));

    let decoded = decode_artwork(&bytes, SourceFormat::Jpeg, 300, None).unwrap();
    assert_eq!(decoded.dpi, 72.0);
    let art = Artwork::new("photo.jpg", decoded.image, decoded.dpi).unwrap();
    assert_eq!((art.width(), art.height()), (10.0, 5.0));
}

#[test]
fn jpeg_without_density_falls_back_to_300() {
    // the encoder default only stores a 1:1 aspect ratio
    let bytes = encode_jpeg(600, 300, None);
    assert_eq!(jpeg_dpi(&bytes), None);
    let decoded = decode_artwork(&bytes, SourceFormat::Jpeg, 300, None).unwrap();
    assert_eq!(decoded.dpi, 300.0);
}

#[test]
fn job_png_round_trips_through_decoder() {
    let mut job = Job::new(JobDetails::default(), small_roll()).unwrap();
    job.add_artwork(red_square(), 2).unwrap();
    let bytes = job.render_png(&RenderOptions::default()).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (40, 20));
    assert_eq!(*decoded.get_pixel(5, 5), RED);
    assert_eq!(*decoded.get_pixel(25, 5), RED);
}

#[test]
fn pdf_embeds_each_raster_once() {
    let mut job = Job::new(JobDetails::default(), small_roll()).unwrap();
    job.add_artwork(red_square(), 3).unwrap();
    let opts = RenderOptions {
        mirror: false,
        header_text: Some(job.header_text()),
    };
    let bytes = job.render_pdf(&opts).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/MediaBox"));
    assert!(text.contains("/SMask"));
    assert!(text.contains("CUSTOMER: Retail Client | ORDER: #1001"));
    // one color image plus its soft mask, shared by all three copies
    assert_eq!(text.matches("/Subtype /Image").count(), 2);
    assert_eq!(text.matches("/Im0 Do").count(), 3);
}
