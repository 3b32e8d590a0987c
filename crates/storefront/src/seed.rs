//! Cart initialization from an existing document.
//!
//! Any element whose class list contains `cart-item` is a row. A row spans
//! from its opening tag to its matching closing tag and supplies:
//! - `data-id` - integer product ID
//! - `data-price` - integer unit price
//! - the text of its first `<span>`, with inner markup dropped - product name
//!
//! Attribute values may be double-quoted, single-quoted or bare. Numbers are
//! read from their leading digits, so `data-price="10px"` is 10.
//!
//! Rows are added to the cart in document order, so a product that appears
//! twice ends up with quantity 2.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tidycart_core::{CartObserver, ObservedCart, Price, Product, ProductId};

/// Errors loading the seed document.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Regex for opening tags: captures the tag name and the attribute text.
static OPEN_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([a-zA-Z][a-zA-Z0-9]*)\b([^>]*)>").expect("Invalid regex"));

/// Regex for any tag; group 1 is the slash of a closing tag.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)\b[^>]*>").expect("Invalid regex"));

/// Regex for attributes: key="value", key='value' or key=value.
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([\w-]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#).expect("Invalid regex")
});

/// Regex for the first span's inner markup.
static SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<span\b[^>]*>(.*?)</span>").expect("Invalid regex"));

/// Regex for tags inside text content.
static MARKUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));

/// Read the seed document from disk.
///
/// # Errors
///
/// Returns [`SeedError::Io`] if the file cannot be read.
pub fn load_document(path: &Path) -> Result<String, SeedError> {
    std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Extract products from every cart row in `document`, in document order.
///
/// Rows with a missing or non-numeric `data-id` / `data-price`, or a
/// negative price, are skipped with a warning.
#[must_use]
pub fn parse_rows(document: &str) -> Vec<Product> {
    let rows = OPEN_TAG_RE.captures_iter(document).filter_map(|caps| {
        let whole = caps.get(0)?;
        let tag = caps.get(1)?.as_str();
        let attrs = caps.get(2)?.as_str();
        if !is_cart_row(attrs) {
            return None;
        }
        let body_end = element_end(document, tag, whole.end());
        Some((attrs, document.get(whole.end()..body_end).unwrap_or_default()))
    });

    let mut products = Vec::new();
    for (index, (attrs, body)) in rows.enumerate() {
        match parse_row(attrs, body) {
            Ok(product) => products.push(product),
            Err(reason) => tracing::warn!(row = index, %reason, "Skipping malformed cart row"),
        }
    }
    products
}

/// Add every row of `document` to the cart. Returns the number of rows added.
pub fn seed_cart<O: CartObserver>(cart: &mut ObservedCart<O>, document: &str) -> usize {
    let products = parse_rows(document);
    let count = products.len();
    for product in products {
        cart.add_item(product);
    }
    tracing::info!(rows = count, "Cart seeded from document");
    count
}

fn is_cart_row(attrs: &str) -> bool {
    attribute(attrs, "class")
        .is_some_and(|class| class.split_whitespace().any(|name| name == "cart-item"))
}

fn attribute<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    ATTR_RE
        .captures_iter(attrs)
        .find(|caps| caps.get(1).is_some_and(|key| key.as_str().eq_ignore_ascii_case(name)))
        .and_then(|caps| caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4)))
        .map(|value| value.as_str())
}

/// Offset of the closing tag matching a `tag` element whose content starts
/// at `body_start`. An unclosed element runs to the end of the document.
fn element_end(document: &str, tag: &str, body_start: usize) -> usize {
    let rest = document.get(body_start..).unwrap_or_default();
    let mut depth = 0usize;

    for caps in TAG_RE.captures_iter(rest) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        if !name.as_str().eq_ignore_ascii_case(tag) {
            continue;
        }
        let closing = caps.get(1).is_some_and(|slash| !slash.is_empty());
        if closing {
            if depth == 0 {
                return body_start + whole.start();
            }
            depth -= 1;
        } else if !whole.as_str().ends_with("/>") {
            depth += 1;
        }
    }
    document.len()
}

fn parse_row(attrs: &str, body: &str) -> Result<Product, String> {
    let raw_id = attribute(attrs, "data-id").ok_or("missing data-id")?;
    let id = leading_integer(raw_id)
        .and_then(|n| i32::try_from(n).ok())
        .map(ProductId::new)
        .ok_or_else(|| format!("invalid data-id: {raw_id:?}"))?;

    let raw_price = attribute(attrs, "data-price").ok_or("missing data-price")?;
    let price = leading_integer(raw_price)
        .ok_or_else(|| format!("invalid data-price: {raw_price:?}"))
        .and_then(|n| Price::new(n).map_err(|e| format!("invalid data-price: {e}")))?;

    let name = SPAN_RE
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| text_content(m.as_str()))
        .unwrap_or_default();

    Ok(Product::new(id, name, price))
}

/// The integer formed by the leading sign and digits of `text`.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let sign_len = usize::from(text.starts_with(['-', '+']));
    let digits = text
        .get(sign_len..)?
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    text.get(..sign_len + digits)?.parse().ok()
}

/// Text of a markup fragment: tags removed, entities decoded.
fn text_content(markup: &str) -> String {
    decode_entities(MARKUP_RE.replace_all(markup, "").trim())
}

/// Decode the handful of entities a template engine emits when escaping text.
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#34;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tidycart_core::Cart;

    use super::*;
    use crate::render::CartRenderer;

    const DOCUMENT: &str = r#"
        <div class="cart">
            <div class="cart-item" data-id="1" data-price="10">
                <span>Book</span>
                <div class="item-controls"><span class="quantity">1</span></div>
            </div>
            <div class="cart-item highlighted" data-id="2" data-price="5">
                <span>Pen &amp; Ink</span>
            </div>
        </div>
        <span id="total-price">15</span>
    "#;

    #[test]
    fn test_parse_rows_in_document_order() {
        let products = parse_rows(DOCUMENT);

        assert_eq!(products.len(), 2);
        let first = products.first().unwrap();
        assert_eq!(first.id(), ProductId::new(1));
        assert_eq!(first.name(), "Book");
        assert_eq!(first.price().amount(), 10);

        let second = products.last().unwrap();
        assert_eq!(second.name(), "Pen & Ink");
        assert_eq!(second.price().amount(), 5);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let document = r#"
            <div class="cart-item" data-id="abc" data-price="10"><span>Bad id</span></div>
            <div class="cart-item" data-id="3"><span>No price</span></div>
            <div class="cart-item" data-id="4" data-price="-1"><span>Negative</span></div>
            <div class="cart-item" data-id="5" data-price="7"><span>Good</span></div>
        "#;

        let products = parse_rows(document);
        assert_eq!(products.len(), 1);
        assert_eq!(products.first().unwrap().name(), "Good");
    }

    #[test]
    fn test_single_quoted_and_bare_attributes() {
        let document = "<div class='cart-item' data-id='1' data-price='10'><span>Book</span></div>\n\
                        <div class=cart-item data-id=2 data-price=5><span>Pen</span></div>";

        let products = parse_rows(document);

        assert_eq!(products.len(), 2);
        let first = products.first().unwrap();
        assert_eq!(first.id(), ProductId::new(1));
        assert_eq!(first.name(), "Book");
        let second = products.last().unwrap();
        assert_eq!(second.id(), ProductId::new(2));
        assert_eq!(second.price().amount(), 5);
    }

    #[test]
    fn test_row_without_span_does_not_borrow_later_text() {
        let document = r#"
            <div class="cart-item" data-id="1" data-price="10"><div><b>Book</b></div></div>
            <p>Total: $<span id="total-price">10</span></p>
        "#;

        let products = parse_rows(document);

        assert_eq!(products.len(), 1);
        assert_eq!(products.first().unwrap().name(), "");
    }

    #[test]
    fn test_span_text_drops_inner_markup() {
        let document = r#"
            <li class="cart-item" data-id="1" data-price="10">
                <span><b>Book</b> &amp; <i>Pen</i></span>
            </li>
        "#;

        let products = parse_rows(document);

        assert_eq!(products.first().unwrap().name(), "Book & Pen");
    }

    #[test]
    fn test_nested_rows_are_scoped_separately() {
        let document = r#"
            <div class="cart-item" data-id="1" data-price="10">
                <div class="cart-item" data-id="2" data-price="5"><span>Inner</span></div>
            </div>
        "#;

        let products = parse_rows(document);

        assert_eq!(products.len(), 2);
        assert_eq!(products.first().unwrap().name(), "Inner");
        assert_eq!(products.last().unwrap().name(), "Inner");
    }

    #[test]
    fn test_numbers_read_leading_digits() {
        let document = r#"
            <div class="cart-item" data-id=" 7th" data-price="10px"><span>Book</span></div>
            <div class="cart-item" data-id="8" data-price="3.5"><span>Pen</span></div>
        "#;

        let products = parse_rows(document);

        assert_eq!(products.len(), 2);
        assert_eq!(products.first().unwrap().id(), ProductId::new(7));
        assert_eq!(products.first().unwrap().price().amount(), 10);
        assert_eq!(products.last().unwrap().price().amount(), 3);
        assert_eq!(leading_integer("+4"), Some(4));
        assert_eq!(leading_integer("px10"), None);
        assert_eq!(leading_integer("-"), None);
    }

    #[test]
    fn test_similar_class_names_are_not_rows() {
        let document = r#"
            <div class="cart-items" data-id="1" data-price="1"><span>Wrapper</span></div>
            <div class="cart-item-extra" data-id="2" data-price="1"><span>Extra</span></div>
        "#;
        assert!(parse_rows(document).is_empty());
    }

    #[test]
    fn test_seed_cart_merges_repeated_ids() {
        let document = r#"
            <div class="cart-item" data-id="1" data-price="10"><span>Book</span></div>
            <div class="cart-item" data-id="1" data-price="10"><span>Book</span></div>
        "#;
        let mut cart = ObservedCart::new(Cart::new(), CartRenderer::new());

        let added = seed_cart(&mut cart, document);

        assert_eq!(added, 2);
        assert_eq!(cart.cart().len(), 1);
        assert_eq!(cart.cart().quantity_of(ProductId::new(1)), Some(2));
        assert_eq!(cart.observer().view().total_price, "20");
    }

    #[test]
    fn test_empty_document_seeds_nothing() {
        let mut cart = ObservedCart::new(Cart::new(), CartRenderer::new());
        assert_eq!(seed_cart(&mut cart, "<p>nothing here</p>"), 0);
        assert!(cart.cart().is_empty());
    }

    #[test]
    fn test_load_document_missing_file() {
        let err = load_document(Path::new("/definitely/not/here.html")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.html"));
    }
}
