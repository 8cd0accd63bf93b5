// SPDX-License-Identifier: AGPL-3.0
// Art Catalog CLI - Text rendering

use art_catalog_core::Item;

fn heart(favorited: bool) -> &'static str {
    if favorited {
        "♥"
    } else {
        "♡"
    }
}

fn deal_text(item: &Item) -> Option<String> {
    item.has_deal()
        .then(|| format!("Limited Time Deal: {}% off", item.discount_percent()))
}

/// One line per item: marker, id, name, price and any active deal
pub fn list_row(item: &Item, favorited: bool) -> String {
    let mut row = format!("{} [{}] {} ${}", heart(favorited), item.id, item.name, item.price);
    if let Some(deal) = deal_text(item) {
        row.push_str(" - ");
        row.push_str(&deal);
    }
    row
}

pub fn detail(item: &Item, favorited: bool) -> String {
    let mut lines = vec![
        format!("{} {}", heart(favorited), item.name),
        format!("Price: ${}", item.price),
    ];
    if !item.brand.is_empty() {
        lines.push(format!("Brand: {}", item.brand));
    }
    if item.glass_surface {
        lines.push("Suitable for glass surfaces".to_string());
    }
    if !item.description.is_empty() {
        lines.push(item.description.clone());
    }
    if let Some(deal) = deal_text(item) {
        lines.push(deal);
    }
    if !item.image_url.is_empty() {
        lines.push(format!("Image: {}", item.image_url));
    }
    lines.join("\n")
}
