//! Extraction of gallery posts from storefront HTML.
//!
//! The storefront renders each embedded social post as a `<gallery-item>`
//! element whose `data-*` attributes carry the post metadata, usually with
//! an `<img>` inside for the thumbnail. Parsing never fails on odd markup:
//! a page without gallery items simply yields no records.

use crate::domain::ImageRecord;
use scraper::{ElementRef, Html, Selector};
use shared::{Error, Result};
use tracing::debug;

pub const GALLERY_ITEM_SELECTOR: &str = "gallery-item";
pub const INSTAGRAM_SOURCE: &str = "instagram";

const IMAGE_URL: &str = "data-image-url";
const HIGH_RES_URL: &str = "data-high-res-url";
const ITEM_ID: &str = "data-item-id";
const ITEM_SOURCE: &str = "data-item-source";
const ITEM_TYPE: &str = "data-item-type";
const ITEM_INDEX: &str = "data-item-index";
const USERNAME: &str = "data-username";
const CREATED_TIME: &str = "data-created-time";
const ALT_TAG: &str = "data-alt-tag";

/// Raw attributes of one `<gallery-item>`. Empty attribute values are
/// stored as `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GalleryItem {
    pub image_url: Option<String>,
    pub high_res_url: Option<String>,
    pub item_id: Option<String>,
    pub item_source: Option<String>,
    pub item_type: Option<String>,
    pub item_index: Option<String>,
    pub username: Option<String>,
    pub created_time: Option<String>,
    pub alt_tag: Option<String>,
    pub img_src: Option<String>,
    pub img_srcset: Option<String>,
    pub img_alt: Option<String>,
}

impl GalleryItem {
    fn from_element(element: ElementRef<'_>, img_selector: &Selector) -> Self {
        let attr = |name: &str| non_empty(element.value().attr(name));
        let img = element.select(img_selector).next();
        let img_attr = |name: &str| img.and_then(|img| non_empty(img.value().attr(name)));

        Self {
            image_url: attr(IMAGE_URL),
            high_res_url: attr(HIGH_RES_URL),
            item_id: attr(ITEM_ID),
            item_source: attr(ITEM_SOURCE),
            item_type: attr(ITEM_TYPE),
            item_index: attr(ITEM_INDEX),
            username: attr(USERNAME),
            created_time: attr(CREATED_TIME),
            alt_tag: attr(ALT_TAG),
            img_src: img_attr("src"),
            img_srcset: img_attr("srcset"),
            img_alt: img_attr("alt"),
        }
    }

    /// True for posts with an image, sourced from Instagram, by `username`.
    pub fn belongs_to(&self, username: &str) -> bool {
        self.image_url.is_some()
            && self.item_source.as_deref() == Some(INSTAGRAM_SOURCE)
            && self.username.as_deref() == Some(username)
    }

    /// Maps the item into a record, or `None` when it has no image URL.
    ///
    /// Defaults: `index` 0 when absent or not a number, `caption` from the
    /// alt tag then the nested image's alt then empty, `id` from the item id
    /// then the image URL, `high_res_url` from its attribute then the widest
    /// `srcset` candidate of the nested image.
    pub fn into_record(self, scraped_at: &str) -> Option<ImageRecord> {
        let image_url = self.image_url?;
        let high_res_url = self
            .high_res_url
            .or_else(|| self.img_srcset.as_deref().and_then(widest_srcset_candidate));

        Some(ImageRecord {
            id: self.item_id.unwrap_or_else(|| image_url.clone()),
            high_res_url,
            kind: self.item_type,
            index: self.item_index.as_deref().map(parse_index).unwrap_or(0),
            username: self.username.unwrap_or_default(),
            created_time: self.created_time,
            caption: self.alt_tag.or(self.img_alt).unwrap_or_default(),
            scraped_at: scraped_at.to_string(),
            image_url,
        })
    }
}

/// Returns every `<gallery-item>` in document order.
pub fn parse_gallery_items(html: &str) -> Result<Vec<GalleryItem>> {
    let item_selector = selector(GALLERY_ITEM_SELECTOR)?;
    let img_selector = selector("img")?;
    let document = Html::parse_document(html);

    Ok(document
        .select(&item_selector)
        .map(|element| GalleryItem::from_element(element, &img_selector))
        .collect())
}

/// Parses, filters to `username`'s Instagram posts, and sorts by index.
///
/// The sort is stable, so items sharing an index keep document order.
pub fn extract_images(html: &str, username: &str, scraped_at: &str) -> Result<Vec<ImageRecord>> {
    let items = parse_gallery_items(html)?;
    let total = items.len();

    let mut records: Vec<ImageRecord> = items
        .into_iter()
        .filter(|item| {
            let keep = item.belongs_to(username);
            if !keep {
                debug!(
                    "Skipping gallery item id={:?} source={:?} username={:?}",
                    item.item_id, item.item_source, item.username
                );
            }
            keep
        })
        .filter_map(|item| item.into_record(scraped_at))
        .collect();

    records.sort_by_key(|record| record.index);

    debug!("Kept {} of {} gallery items", records.len(), total);
    Ok(records)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Parse(format!("invalid selector '{css}': {e}")))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Leading integer of `raw`, like `parseInt(raw, 10)`; 0 when there is none.
fn parse_index(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end]
        .parse::<i64>()
        .map(|n| sign * n)
        .unwrap_or(0)
}

/// Picks the candidate with the largest `w`/`x` descriptor from a `srcset`.
fn widest_srcset_candidate(srcset: &str) -> Option<String> {
    srcset
        .split(',')
        .filter_map(|candidate| {
            let mut parts = candidate.split_whitespace();
            let url = parts.next()?;
            let weight = parts
                .next()
                .and_then(|d| d.trim_end_matches(['w', 'x']).parse::<f64>().ok())
                .unwrap_or(1.0);
            Some((url, weight))
        })
        .fold(None::<(&str, f64)>, |best, (url, weight)| match best {
            Some((_, best_weight)) if best_weight >= weight => best,
            _ => Some((url, weight)),
        })
        .map(|(url, _)| url.to_string())
}
