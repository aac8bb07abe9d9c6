use parley::{Alignment, AlignmentOptions, FontContext, LayoutContext, StyleProperty};
use vello::kurbo::Affine;
use vello::peniko::{Color, Fill};
use vello::{Glyph, Scene};

/// Label font size in pixels.
pub const FONT_SIZE: f32 = 16.0;

/// Per-run brush parameter required by parley. Label color is applied at
/// draw time, so a plain color tuple is enough here.
pub type LabelLayout = parley::Layout<[u8; 4]>;

/// Font collection and layout scratch state shared by all labels.
pub struct Fonts {
    font_cx: FontContext,
    layout_cx: LayoutContext<[u8; 4]>,
}

impl Fonts {
    pub fn new() -> Self {
        Self {
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
        }
    }

    /// Lay out `text` at the fixed label size with unconstrained line width.
    ///
    /// An empty string (or an environment with no usable fonts) yields an
    /// empty layout measuring zero; never an error.
    pub fn layout_label(&mut self, text: &str) -> LabelLayout {
        let mut builder = self
            .layout_cx
            .ranged_builder(&mut self.font_cx, text, 1.0, true);
        builder.push_default(StyleProperty::FontSize(FONT_SIZE));
        let mut layout = builder.build(text);
        layout.break_all_lines(None);
        layout.align(None, Alignment::Start, AlignmentOptions::default());
        layout
    }
}

impl Default for Fonts {
    fn default() -> Self {
        Self::new()
    }
}

/// Paint a laid-out label into `scene`, positioned by `transform`.
pub fn draw_label(scene: &mut Scene, transform: Affine, layout: &LabelLayout, color: Color) {
    for line in layout.lines() {
        for item in line.items() {
            let parley::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                continue;
            };
            let run = glyph_run.run();
            let mut x = glyph_run.offset();
            let y = glyph_run.baseline();
            scene
                .draw_glyphs(run.font())
                .font_size(run.font_size())
                .transform(transform)
                .brush(color)
                .hint(true)
                .draw(
                    Fill::NonZero,
                    glyph_run.glyphs().map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        Glyph {
                            id: glyph.id as u32,
                            x: gx,
                            y: gy,
                        }
                    }),
                );
        }
    }
}
