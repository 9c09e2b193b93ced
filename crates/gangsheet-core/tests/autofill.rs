use gangsheet_core::prelude::*;
use image::RgbaImage;

fn art(key: &str, w: f64, h: f64) -> Artwork {
    Artwork::with_print_size(key, RgbaImage::new(2, 2), w, h).expect("valid size")
}

fn billable(arts: &[Artwork], cfg: &RollConfig) -> f64 {
    compute_layout(arts, cfg).expect("layout").billable_length
}

#[test]
fn counts_copies_that_fit_the_paid_foot() {
    let cfg = RollConfig::default();
    // 6x6 footprints, three per shelf; shelf 1 plus the 1 in header = 7 in of a 12 in foot
    let fill = suggest_autofill(&[art("logo", 5.0, 5.0)], &cfg)
        .unwrap()
        .expect("non-empty");
    assert_eq!(fill.key, "logo");
    assert_eq!(fill.count, 2);
    assert_eq!(fill.billable_length, 12.0);
    assert!(!fill.capped);

    let no_header = RollConfig::builder().header_allowance(0.0).build();
    let fill = suggest_autofill(&[art("logo", 5.0, 5.0)], &no_header)
        .unwrap()
        .expect("non-empty");
    assert_eq!(fill.count, 5);
}

#[test]
fn full_roll_suggests_nothing() {
    let cfg = RollConfig::default();
    let fill = suggest_autofill(&[art("a", 10.0, 10.0), art("b", 10.0, 10.0)], &cfg)
        .unwrap()
        .expect("non-empty");
    assert_eq!(fill.count, 0);
}

#[test]
fn suggestion_is_maximal() {
    for packing in [PackingPolicy::Shelf, PackingPolicy::Justified] {
        let cfg = RollConfig::builder().packing(packing).build();
        let base = vec![art("big", 14.0, 9.0), art("mid", 6.0, 4.0), art("chip", 2.5, 3.0)];
        let fill = suggest_autofill(&base, &cfg).unwrap().expect("non-empty");
        let before = billable(&base, &cfg);

        let mut filled = base.clone();
        for _ in 0..fill.count {
            filled.push(base[2].clone());
        }
        assert_eq!(billable(&filled, &cfg), before, "{packing:?}");

        filled.push(base[2].clone());
        assert!(billable(&filled, &cfg) > before, "{packing:?}");
    }
}

#[test]
fn search_stops_at_configured_limit() {
    let cfg = RollConfig::builder()
        .billing_unit(120.0)
        .max_autofill(4)
        .build();
    let fill = suggest_autofill(&[art("dot", 0.5, 0.5)], &cfg)
        .unwrap()
        .expect("non-empty");
    assert_eq!(fill.count, 4);
    assert!(fill.capped);
}

#[test]
fn job_applies_the_suggestion_to_its_inventory() {
    let mut job = Job::new(JobDetails::default(), RollConfig::default()).unwrap();
    job.add_artwork(art("logo", 5.0, 5.0), 1).unwrap();
    let before = job.layout().unwrap().billable_length;

    let added = job.apply_autofill().unwrap();
    assert_eq!(added, 2);
    assert_eq!(job.inventory().len(), 3);
    assert_eq!(job.layout().unwrap().billable_length, before);

    let first = job.inventory().get(0).unwrap();
    assert!(job.inventory().iter().all(|a| a.shares_raster_with(first)));
    assert_eq!(job.apply_autofill().unwrap(), 0);
}

#[test]
fn zero_search_limit_is_rejected() {
    let cfg = RollConfig::builder().max_autofill(0).build();
    let err = suggest_autofill(&[art("dot", 0.5, 0.5)], &cfg).unwrap_err();
    assert!(matches!(
        err,
        gangsheet_core::error::GangSheetError::InvalidConfig(_)
    ));
}
