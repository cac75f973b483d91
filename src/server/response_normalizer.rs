//! Post-processing of fetched documents before they are returned.

use serde_json::Value;

use crate::query_compiler::{order_location_chain, PageVariant, PlacePair};

/// Discriminator of a page document.
pub const PAGE_TYPE_FIELD: &str = "type";
/// Discriminator of the author attached to a post or comment.
pub const AUTHOR_TYPE_FIELD: &str = "authorType";

/// Set each of `fields` in `document` to its resolved variant label. The
/// fields were requested by the statement, so a missing, null or unrecognised
/// value is reported as `"unknown"`. Only top-level keys are touched.
pub fn normalize_discriminators(document: &mut Value, fields: &[&str]) {
    let Some(object) = document.as_object_mut() else {
        return;
    };
    for &field in fields {
        let variant = PageVariant::from_document_value(object.get(field));
        if variant == PageVariant::Unknown {
            log::debug!(
                "Unresolved `{}` value {:?} reported as unknown",
                field,
                object.get(field)
            );
        }
        object.insert(field.to_string(), Value::String(variant.as_str().to_string()));
    }
}

/// Reorder a page's `location` array leaf → root.
pub fn normalize_location(document: &mut Value, max_depth: usize) {
    let Some(location) = document.get_mut("location") else {
        return;
    };
    let pairs: Vec<PlacePair> = match serde_json::from_value(location.clone()) {
        Ok(pairs) => pairs,
        Err(e) => {
            log::warn!("Leaving location chain unordered: {}", e);
            return;
        }
    };
    let ordered = order_location_chain(&pairs, max_depth);
    match serde_json::to_value(ordered) {
        Ok(value) => *location = value,
        Err(e) => log::warn!("Failed to serialise ordered location chain: {}", e),
    }
}

/// A single page profile.
pub fn normalize_page(mut document: Value, max_depth: usize) -> Value {
    normalize_discriminators(&mut document, &[PAGE_TYPE_FIELD]);
    normalize_location(&mut document, max_depth);
    document
}

/// Posts, comments and the page list, each carrying the discriminator `field`.
pub fn normalize_documents(mut documents: Vec<Value>, field: &str) -> Vec<Value> {
    for document in &mut documents {
        normalize_discriminators(document, &[field]);
    }
    documents
}

/// A place document; its nested `pages` carry their own discriminators.
pub fn normalize_place(mut document: Value) -> Value {
    if let Some(Value::Array(pages)) = document.get_mut("pages") {
        for page in pages {
            normalize_discriminators(page, &[PAGE_TYPE_FIELD]);
        }
    }
    document
}
