use crate::compositing::RenderOptions;
use crate::decode::POINTS_PER_INCH;
use crate::error::{GangSheetError, Result};
use crate::model::{Artwork, Layout};
use crate::orientation::oriented_raster;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::RgbaImage;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect as PdfRect, Ref, Str};
use std::collections::HashMap;
use std::io::Write;
use tracing::{debug, instrument};

const HEADER_FONT_SIZE: f32 = 14.0;
/// Header text baseline, inches below the top edge.
const HEADER_BASELINE_IN: f64 = 0.4;

#[instrument(skip_all)]
/// Writes the layout as a single-page PDF sized `roll_width x billable_length` inches.
///
/// Each distinct raster/rotation pair is embedded once (RGB + soft mask, Flate) and
/// drawn at every placement. The page origin is bottom-left, so a placement at
/// content `y` lands at `billable - (y + header) - height`.
pub fn render_pdf(layout: &Layout, artworks: &[Artwork], opts: &RenderOptions) -> Result<Vec<u8>> {
    if layout.is_empty() {
        return Err(GangSheetError::EmptyInventory);
    }
    let page_w = (layout.roll_width * POINTS_PER_INCH) as f32;
    let page_h = (layout.billable_length * POINTS_PER_INCH) as f32;

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let content_id = Ref::new(4);
    let font_id = Ref::new(5);
    let mut next_id = 6;

    let mut pdf = Pdf::new();
    let mut images: Vec<(String, Ref)> = Vec::new();
    let mut embedded: HashMap<(usize, bool), usize> = HashMap::new();

    let mut content = Content::new();
    content.save_state();
    if opts.mirror {
        content.transform([-1.0, 0.0, 0.0, 1.0, page_w, 0.0]);
    }

    for item in &layout.placement.items {
        let art = artworks
            .get(item.index)
            .ok_or(GangSheetError::IndexOutOfRange {
                index: item.index,
                len: artworks.len(),
            })?;
        let slot = match embedded.get(&(art.raster_id(), item.rotated)) {
            Some(&slot) => slot,
            None => {
                let image_id = Ref::new(next_id);
                let mask_id = Ref::new(next_id + 1);
                next_id += 2;
                let raster = oriented_raster(art.image(), item.rotated);
                write_image(&mut pdf, image_id, mask_id, &raster)?;
                images.push((format!("Im{}", images.len()), image_id));
                embedded.insert((art.raster_id(), item.rotated), images.len() - 1);
                images.len() - 1
            }
        };

        let x = item.x * POINTS_PER_INCH;
        let y = (layout.billable_length - (item.y + layout.header_allowance) - item.height)
            * POINTS_PER_INCH;
        content.save_state();
        content.transform([
            (item.width * POINTS_PER_INCH) as f32,
            0.0,
            0.0,
            (item.height * POINTS_PER_INCH) as f32,
            x as f32,
            y as f32,
        ]);
        content.x_object(Name(images[slot].0.as_bytes()));
        content.restore_state();
    }

    if let Some(text) = &opts.header_text {
        draw_header(&mut content, layout, text);
    }
    content.restore_state();

    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);
    {
        let mut page = pdf.page(page_id);
        page.media_box(PdfRect::new(0.0, 0.0, page_w, page_h));
        page.parent(page_tree_id);
        page.contents(content_id);
        let mut resources = page.resources();
        resources.fonts().pair(Name(b"F1"), font_id);
        let mut x_objects = resources.x_objects();
        for (name, id) in &images {
            x_objects.pair(Name(name.as_bytes()), *id);
        }
    }
    pdf.type1_font(font_id).base_font(Name(b"Helvetica-Bold"));
    pdf.stream(content_id, &content.finish());

    debug!(
        images = images.len(),
        items = layout.placement.items.len(),
        "pdf written"
    );
    Ok(pdf.finish())
}

/// Job text and a rule line across the top margin.
fn draw_header(content: &mut Content, layout: &Layout, text: &str) {
    let top = layout.billable_length * POINTS_PER_INCH;
    let left = layout.margin * POINTS_PER_INCH;
    let right = (layout.roll_width - layout.margin) * POINTS_PER_INCH;
    let rule_y = top - layout.margin * POINTS_PER_INCH;
    // Type1 base fonts only cover Latin-1; keep the band readable
    let ascii: Vec<u8> = text
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c as u8 } else { b'?' })
        .collect();

    content.begin_text();
    content.set_font(Name(b"F1"), HEADER_FONT_SIZE);
    content.next_line(left as f32, (top - HEADER_BASELINE_IN * POINTS_PER_INCH) as f32);
    content.show(Str(&ascii));
    content.end_text();

    content.set_line_width(1.0);
    content.move_to(left as f32, rule_y as f32);
    content.line_to(right as f32, rule_y as f32);
    content.stroke();
}

fn write_image(pdf: &mut Pdf, image_id: Ref, mask_id: Ref, raster: &RgbaImage) -> Result<()> {
    let (w, h) = raster.dimensions();
    let mut rgb = Vec::with_capacity(w as usize * h as usize * 3);
    let mut alpha = Vec::with_capacity(w as usize * h as usize);
    for p in raster.pixels() {
        rgb.extend_from_slice(&p.0[..3]);
        alpha.push(p.0[3]);
    }
    let rgb = deflate(&rgb)?;
    let alpha = deflate(&alpha)?;

    let mut image = pdf.image_xobject(image_id, &rgb);
    image.filter(Filter::FlateDecode);
    image.width(w as i32);
    image.height(h as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    image.s_mask(mask_id);
    image.finish();

    let mut mask = pdf.image_xobject(mask_id, &alpha);
    mask.filter(Filter::FlateDecode);
    mask.width(w as i32);
    mask.height(h as i32);
    mask.color_space().device_gray();
    mask.bits_per_component(8);
    mask.finish();
    Ok(())
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
