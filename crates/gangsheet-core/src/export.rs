use crate::job::JobDetails;
use crate::model::Layout;
use serde_json::{Value, json};

/// Serialize a layout as a JSON cut manifest `{ job, roll, items, stats }`.
/// Positions are inches from the top-left of the content area; `frame` is the
/// margin-inclusive cell an operator can trim along.
pub fn to_json_manifest(layout: &Layout, details: &JobDetails) -> Value {
    let items = layout
        .placement
        .items
        .iter()
        .map(|it| {
            json!({
                "key": it.key,
                "index": it.index,
                "x": it.x,
                "y": it.y,
                "w": it.width,
                "h": it.height,
                "rotated": it.rotated,
                "frame": {"x": it.frame.x, "y": it.frame.y, "w": it.frame.w, "h": it.frame.h},
            })
        })
        .collect::<Vec<_>>();
    let stats = layout.stats();
    json!({
        "job": {
            "customer": details.customer,
            "order": details.order_number,
            "pricePerFoot": details.price_per_foot,
        },
        "roll": {
            "width": layout.roll_width,
            "margin": layout.margin,
            "headerAllowance": layout.header_allowance,
            "contentLength": layout.content_length(),
            "billableLength": layout.billable_length,
            "cost": layout.cost(details.price_per_foot),
        },
        "items": items,
        "stats": stats,
        "meta": {
            "app": "gangsheet",
            "version": env!("CARGO_PKG_VERSION"),
            "schemaVersion": "1",
        },
    })
}
