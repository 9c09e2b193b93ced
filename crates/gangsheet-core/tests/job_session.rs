use gangsheet_core::error::GangSheetError;
use gangsheet_core::prelude::*;
use image::RgbaImage;

fn art(key: &str, w: f64, h: f64) -> Artwork {
    Artwork::with_print_size(key, RgbaImage::new(4, 4), w, h).unwrap()
}

fn details() -> JobDetails {
    JobDetails {
        customer: "Acme Tees".into(),
        order_number: "2045".into(),
        price_per_foot: 15.0,
    }
}

#[test]
fn quote_reflects_the_current_inventory() {
    let mut job = Job::new(details(), RollConfig::default()).unwrap();
    job.add_artwork(art("front.png", 10.0, 10.0), 2).unwrap();

    let quote = job.quote().unwrap();
    assert_eq!(quote.stats.num_items, 2);
    assert_eq!(quote.stats.billable_length, 12.0);
    assert_eq!(quote.cost, 15.0);
    assert_eq!(quote.autofill.as_ref().map(|f| f.count), Some(0));

    job.add_artwork(art("back.png", 10.0, 10.0), 1).unwrap();
    let quote = job.quote().unwrap();
    // 11 in shelf + 11 in shelf + 1 in header
    assert_eq!(quote.stats.content_length, 22.0);
    assert_eq!(quote.stats.billable_length, 24.0);
    assert_eq!(quote.cost, 30.0);
}

#[test]
fn zero_quantity_is_rejected() {
    let mut job = Job::new(details(), RollConfig::default()).unwrap();
    let err = job.add_artwork(art("a.png", 2.0, 2.0), 0).unwrap_err();
    assert!(matches!(err, GangSheetError::InvalidConfig(_)));
    assert!(job.inventory().is_empty());
}

#[test]
fn resize_keeps_old_size_on_error() {
    let mut job = Job::new(details(), RollConfig::default()).unwrap();
    job.add_artwork(art("a.png", 4.0, 3.0), 1).unwrap();

    job.resize_artwork(0, 8.0, 6.0).unwrap();
    let a = job.inventory().get(0).unwrap();
    assert_eq!((a.width(), a.height()), (8.0, 6.0));

    let err = job.resize_artwork(0, 30.0, 25.0).unwrap_err();
    assert!(matches!(err, GangSheetError::ArtworkTooWide { .. }));
    let err = job.resize_artwork(0, 0.0, 6.0).unwrap_err();
    assert!(matches!(err, GangSheetError::InvalidDimensions { .. }));
    let a = job.inventory().get(0).unwrap();
    assert_eq!((a.width(), a.height()), (8.0, 6.0));

    let err = job.resize_artwork(5, 1.0, 1.0).unwrap_err();
    assert!(matches!(
        err,
        GangSheetError::IndexOutOfRange { index: 5, len: 1 }
    ));
}

#[test]
fn clear_resets_to_an_empty_roll() {
    let mut job = Job::new(details(), RollConfig::default()).unwrap();
    job.add_artwork(art("a.png", 4.0, 3.0), 5).unwrap();
    assert_eq!(job.inventory().len(), 5);
    job.clear();
    assert!(job.inventory().is_empty());
    let quote = job.quote().unwrap();
    assert_eq!(quote.stats.billable_length, 0.0);
    assert_eq!(quote.cost, 0.0);
    assert_eq!(quote.autofill, None);
}

#[test]
fn output_names_follow_job_details() {
    let job = Job::new(details(), RollConfig::default()).unwrap();
    assert_eq!(job.header_text(), "CUSTOMER: Acme Tees | ORDER: #2045");
    assert_eq!(job.pdf_file_name(), "Order_2045_Acme Tees.pdf");
    assert_eq!(job.png_file_name(), "Acme Tees_2045.png");

    let odd = JobDetails {
        customer: "A/B: Co".into(),
        order_number: "7?".into(),
        price_per_foot: 15.0,
    };
    let job = Job::new(odd, RollConfig::default()).unwrap();
    assert_eq!(job.pdf_file_name(), "Order_7__A_B_ Co.pdf");
}

#[test]
fn manifest_lists_every_placement() {
    let mut job = Job::new(details(), RollConfig::default()).unwrap();
    job.add_artwork(art("front.png", 10.0, 15.0), 1).unwrap();
    job.add_artwork(art("tag.png", 2.0, 1.0), 2).unwrap();
    let m = job.manifest().unwrap();

    assert_eq!(m["job"]["customer"], "Acme Tees");
    assert_eq!(m["job"]["order"], "2045");
    assert_eq!(m["roll"]["width"], 22.0);
    assert_eq!(m["roll"]["billableLength"], 12.0);
    assert_eq!(m["roll"]["cost"], 15.0);
    let items = m["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["key"], "front.png");
    assert_eq!(items[0]["rotated"], true);
    assert_eq!(items[0]["w"], 15.0);
    assert_eq!(m["stats"]["num_items"], 3);
}

#[test]
fn invalid_config_is_refused_up_front() {
    let cfg = RollConfig::builder().margin(11.0).build();
    assert!(matches!(
        Job::new(details(), cfg),
        Err(GangSheetError::InvalidConfig(_))
    ));
}
