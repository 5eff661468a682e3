//! Size hints: the only source of node extents a layout ever looks at.

use crate::model::{NodeLabel, Size, display_name};
use crate::options::LayoutOptions;

pub trait SizeHints {
    fn size(&self, id: &str, node: &NodeLabel, opts: &LayoutOptions) -> Size;
}

impl<F> SizeHints for F
where
    F: Fn(&str, &NodeLabel, &LayoutOptions) -> Size,
{
    fn size(&self, id: &str, node: &NodeLabel, opts: &LayoutOptions) -> Size {
        self(id, node, opts)
    }
}

/// Same size for every node.
#[derive(Debug, Clone, Copy)]
pub struct FixedSizeHints(pub Size);

impl SizeHints for FixedSizeHints {
    fn size(&self, _id: &str, _node: &NodeLabel, _opts: &LayoutOptions) -> Size {
        self.0
    }
}

/// Reads the node's style box and, when labels are included, grows it to fit a label drawn
/// under the node. Label extents are estimated from character counts so results do not depend
/// on installed fonts.
#[derive(Debug, Clone)]
pub struct StyleSizeHints {
    pub font_size: f64,
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl Default for StyleSizeHints {
    fn default() -> Self {
        Self {
            font_size: 8.0,
            char_width_factor: 0.6,
            line_height_factor: 1.2,
        }
    }
}

impl StyleSizeHints {
    pub fn label_size(&self, text: &str) -> Size {
        let lines: Vec<&str> = text.split('\n').collect();
        let longest = lines
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        Size {
            width: longest as f64 * self.font_size * self.char_width_factor,
            height: lines.len() as f64 * self.font_size * self.line_height_factor,
        }
    }
}

impl SizeHints for StyleSizeHints {
    fn size(&self, id: &str, node: &NodeLabel, opts: &LayoutOptions) -> Size {
        let base = Size {
            width: node.style.width.max(0.0),
            height: node.style.height.max(0.0),
        };
        if !opts.include_labels {
            return base;
        }
        let label = self.label_size(display_name(id, node));
        Size {
            width: base.width.max(label.width),
            height: base.height + label.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_size_ignores_labels_unless_asked() {
        let hints = StyleSizeHints::default();
        let node = NodeLabel::with_size(20.0, 10.0);
        let plain = LayoutOptions::default();
        assert_eq!(hints.size("productpage", &node, &plain), Size::new(20.0, 10.0));

        let labelled = LayoutOptions::default().with_labels(true);
        let s = hints.size("productpage", &node, &labelled);
        // 11 chars * 8 * 0.6
        assert!((s.width - 52.8).abs() < 1e-9);
        assert!((s.height - (10.0 + 9.6)).abs() < 1e-9);
    }

    #[test]
    fn closures_are_size_hints() {
        let hints = |id: &str, _: &NodeLabel, _: &LayoutOptions| {
            Size::new(id.len() as f64, 1.0)
        };
        let s = hints.size("abc", &NodeLabel::default(), &LayoutOptions::default());
        assert_eq!(s, Size::new(3.0, 1.0));
    }
}
