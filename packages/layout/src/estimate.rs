//! Content-size estimation
//!
//! Used only until real content measurement arrives from the host: text
//! estimates width from character count, images derive height from their
//! aspect ratio when a width is known, link cards use a fixed box. Every
//! estimated dimension snaps up to the grid so unmeasured nodes still align.

use mindloom_common::{snap_up, Size};
use mindloom_document::{Node, NodePayload};

pub const MIN_NODE_WIDTH: f64 = 40.0;
pub const MIN_NODE_HEIGHT: f64 = 40.0;

const APPROX_CHAR_WIDTH: f64 = 8.0;
const TEXT_LINE_HEIGHT: f64 = 24.0;
const TEXT_PADDING: f64 = 8.0;
const MAX_TEXT_WIDTH: f64 = 320.0;

const IMAGE_FALLBACK_WIDTH: f64 = 200.0;
const IMAGE_FALLBACK_HEIGHT: f64 = 150.0;

const LINK_CARD_WIDTH: f64 = 240.0;
const LINK_CARD_HEIGHT: f64 = 80.0;

/// The size layout should use for a node right now
///
/// A fixed or already-measured size is authoritative; anything else falls
/// back to the estimation policy.
pub fn effective_size(node: &Node, grid: f64) -> Size {
    if node.fixed_size || node.size().is_measured() {
        return node.size();
    }
    estimate_size(&node.payload, node.width, grid)
}

/// Estimate a content box for an unmeasured payload
pub fn estimate_size(payload: &NodePayload, known_width: f64, grid: f64) -> Size {
    let raw = match payload {
        NodePayload::Text { text } => {
            let ideal = text.chars().count() as f64 * APPROX_CHAR_WIDTH + TEXT_PADDING * 2.0;
            let lines = (ideal / MAX_TEXT_WIDTH).ceil().max(1.0);
            Size::new(
                ideal.min(MAX_TEXT_WIDTH),
                lines * TEXT_LINE_HEIGHT + TEXT_PADDING * 2.0,
            )
        }

        NodePayload::Image { aspect_ratio, .. } => match aspect_ratio {
            Some(ratio) if known_width > 0.0 && *ratio > 0.0 => {
                Size::new(known_width, known_width / ratio)
            }
            _ => Size::new(IMAGE_FALLBACK_WIDTH, IMAGE_FALLBACK_HEIGHT),
        },

        NodePayload::Link { .. } => Size::new(LINK_CARD_WIDTH, LINK_CARD_HEIGHT),
    };

    Size::new(
        snap_up(raw.width.max(MIN_NODE_WIDTH), grid),
        snap_up(raw.height.max(MIN_NODE_HEIGHT), grid),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindloom_document::Node;

    #[test]
    fn test_measured_size_is_authoritative() {
        let node = Node::text("n", "hello").with_size(123.0, 45.0);
        assert_eq!(effective_size(&node, 10.0), Size::new(123.0, 45.0));
    }

    #[test]
    fn test_fixed_size_is_not_clamped_or_snapped() {
        let node = Node::text("n", "hello").with_fixed_size(81.0, 33.0);

        assert_eq!(effective_size(&node, 10.0), Size::new(81.0, 33.0));
    }

    #[test]
    fn test_text_estimate_scales_with_length_and_snaps() {
        let short = estimate_size(&NodePayload::text("hi"), 0.0, 10.0);
        let long = estimate_size(&NodePayload::text("a much longer topic title"), 0.0, 10.0);

        assert!(long.width > short.width);
        assert_eq!(short.width % 10.0, 0.0);
        assert_eq!(long.width % 10.0, 0.0);
    }

    #[test]
    fn test_long_text_wraps_instead_of_growing() {
        let text = "x".repeat(200);
        let size = estimate_size(&NodePayload::text(text), 0.0, 10.0);

        assert_eq!(size.width, MAX_TEXT_WIDTH);
        assert!(size.height > TEXT_LINE_HEIGHT * 2.0);
    }

    #[test]
    fn test_image_height_from_aspect_ratio() {
        let payload = NodePayload::Image {
            src: "assets/photo.png".to_string(),
            aspect_ratio: Some(2.0),
        };

        let size = estimate_size(&payload, 200.0, 10.0);
        assert_eq!(size, Size::new(200.0, 100.0));
    }

    #[test]
    fn test_image_without_ratio_uses_fallback_box() {
        let payload = NodePayload::image("assets/photo.png");
        let size = estimate_size(&payload, 0.0, 10.0);

        assert_eq!(size, Size::new(IMAGE_FALLBACK_WIDTH, IMAGE_FALLBACK_HEIGHT));
    }

    #[test]
    fn test_empty_text_gets_minimum_box() {
        let size = estimate_size(&NodePayload::text(""), 0.0, 10.0);

        assert!(size.width >= MIN_NODE_WIDTH);
        assert!(size.height >= MIN_NODE_HEIGHT);
    }
}
