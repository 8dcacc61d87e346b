//! SVG rendering of a [`CardArrangement`], for export and print.
//!
//! Units are millimetres throughout; the root element carries physical
//! `width`/`height` so the file prints at true size.

use std::io::Cursor;

use prestige_core::{
  color::Rgb,
  model::{ContactInfo, Theme},
  render::{
    Align, Anchor, Block, CARD_HEIGHT_MM, CARD_WIDTH_MM, CardArrangement, Decoration, Edge,
    Mark, Palette, PrintSheet, RenderOptions, Row, Sidebar, Span, TextRole, arrange,
    font_stack,
  },
};
use quick_xml::{
  Writer,
  events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const PAD: f32 = 5.0;
const LINE_SPACING: f32 = 1.35;
const BAR_HEIGHT: f32 = 1.2;
const GRADIENT_ID: &str = "prestige-bar";

#[derive(Debug, thiserror::Error)]
#[error("svg write failed: {0}")]
pub struct SvgError(String);

type Result<T, E = SvgError> = std::result::Result<T, E>;

/// One card, 85 × 55 mm.
pub fn card_document(info: &ContactInfo, theme: &Theme) -> Result<String> {
  let card = arrange(info, theme, RenderOptions::print());
  let mut svg = Svg::new()?;
  svg.open("svg", &[
    ("xmlns", SVG_NS.to_owned()),
    ("width", format!("{}mm", num(CARD_WIDTH_MM))),
    ("height", format!("{}mm", num(CARD_HEIGHT_MM))),
    ("viewBox", format!("0 0 {} {}", num(CARD_WIDTH_MM), num(CARD_HEIGHT_MM))),
  ])?;
  svg.defs(&card.palette)?;
  svg.card(&card, 0.0, 0.0)?;
  svg.close("svg")?;
  svg.finish()
}

/// An A4 sheet filled with copies of one card.
pub fn sheet_document(info: &ContactInfo, theme: &Theme, sheet: &PrintSheet) -> Result<String> {
  let card = arrange(info, theme, RenderOptions::print());
  let mut svg = Svg::new()?;
  svg.open("svg", &[
    ("xmlns", SVG_NS.to_owned()),
    ("width", format!("{}mm", num(sheet.width_mm))),
    ("height", format!("{}mm", num(sheet.height_mm))),
    ("viewBox", format!("0 0 {} {}", num(sheet.width_mm), num(sheet.height_mm))),
  ])?;
  svg.defs(&card.palette)?;
  svg.empty("rect", &[
    ("width", num(sheet.width_mm)),
    ("height", num(sheet.height_mm)),
    ("fill", "#ffffff".to_owned()),
  ])?;
  for placement in sheet.placements() {
    svg.card(&card, placement.x_mm, placement.y_mm)?;
  }
  svg.close("svg")?;
  svg.finish()
}

/// Millimetres with at most two decimals and no trailing zeros.
fn num(v: f32) -> String {
  let s = format!("{v:.2}");
  s.trim_end_matches('0').trim_end_matches('.').to_owned()
}

fn font_size(role: TextRole) -> f32 {
  match role {
    TextRole::Name => 4.2,
    TextRole::Company => 3.2,
    TextRole::Title => 2.6,
    TextRole::Contact => 2.2,
    TextRole::Slogan => 2.0,
  }
}

fn mark_size(mark: &Mark) -> f32 {
  match mark {
    Mark::Logo(_) | Mark::Monogram(_) => 8.0,
    Mark::Square => 6.0,
    Mark::Dot => 3.0,
  }
}

fn row_height(row: &Row) -> f32 {
  let line = |span: &Span| font_size(span.role) * LINE_SPACING;
  match row {
    Row::Text(span) => line(span),
    Row::Inline(spans) => spans.iter().map(line).fold(0.0, f32::max),
    Row::Split(l, r) => line(l).max(line(r)),
    Row::Mark(mark) => mark_size(mark) + 1.5,
    Row::Divider(_) => 2.5,
    Row::Socials(_) | Row::Toggle { .. } => 3.5,
    Row::Bio(_) => font_size(TextRole::Slogan) * LINE_SPACING * 2.0,
  }
}

/// Horizontal extent available to blocks.
#[derive(Clone, Copy)]
struct Column {
  left:  f32,
  right: f32,
}

impl Column {
  fn x(&self, align: Align) -> f32 {
    match align {
      Align::Start => self.left,
      Align::Center => (self.left + self.right) / 2.0,
      Align::End => self.right,
    }
  }

  fn anchor(align: Align) -> &'static str {
    match align {
      Align::Start => "start",
      Align::Center => "middle",
      Align::End => "end",
    }
  }
}

struct Svg {
  writer: Writer<Cursor<Vec<u8>>>,
}

impl Svg {
  fn new() -> Result<Self> {
    let mut svg = Self { writer: Writer::new(Cursor::new(Vec::new())) };
    svg.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    Ok(svg)
  }

  fn finish(self) -> Result<String> {
    String::from_utf8(self.writer.into_inner().into_inner()).map_err(|e| SvgError(e.to_string()))
  }

  // ── Primitives ────────────────────────────────────────────────────────────

  fn write(&mut self, event: Event<'_>) -> Result<()> {
    self.writer.write_event(event).map_err(|e| SvgError(e.to_string()))
  }

  fn element<'a>(tag: &'a str, attrs: &[(&str, String)]) -> BytesStart<'a> {
    let mut el = BytesStart::new(tag);
    for (key, value) in attrs {
      el.push_attribute((*key, value.as_str()));
    }
    el
  }

  fn open(&mut self, tag: &str, attrs: &[(&str, String)]) -> Result<()> {
    self.write(Event::Start(Self::element(tag, attrs)))
  }

  fn close(&mut self, tag: &str) -> Result<()> { self.write(Event::End(BytesEnd::new(tag))) }

  fn empty(&mut self, tag: &str, attrs: &[(&str, String)]) -> Result<()> {
    self.write(Event::Empty(Self::element(tag, attrs)))
  }

  fn text(&mut self, tag: &str, attrs: &[(&str, String)], content: &str) -> Result<()> {
    self.open(tag, attrs)?;
    self.write(Event::Text(BytesText::new(content)))?;
    self.close(tag)
  }

  // ── Card ──────────────────────────────────────────────────────────────────

  fn defs(&mut self, palette: &Palette) -> Result<()> {
    self.open("defs", &[])?;
    self.open("linearGradient", &[("id", GRADIENT_ID.to_owned())])?;
    self.empty("stop", &[("offset", "0".into()), ("stop-color", palette.primary.to_hex())])?;
    self.empty("stop", &[("offset", "1".into()), ("stop-color", palette.secondary.to_hex())])?;
    self.close("linearGradient")?;
    self.close("defs")
  }

  fn card(&mut self, card: &CardArrangement, x: f32, y: f32) -> Result<()> {
    let palette = card.palette;
    let (w, h) = (CARD_WIDTH_MM, CARD_HEIGHT_MM);
    self.open("g", &[
      ("transform", format!("translate({} {})", num(x), num(y))),
      ("font-family", font_stack(card.font).to_owned()),
    ])?;
    self.empty("rect", &[
      ("width", num(w)),
      ("height", num(h)),
      ("fill", palette.background.to_hex()),
    ])?;

    for decoration in &card.decorations {
      self.decoration(*decoration, &palette)?;
    }

    let mut column = Column { left: PAD, right: w - PAD };
    if let Some(sidebar) = &card.sidebar {
      let width = w / 3.0;
      self.sidebar(sidebar, width, &palette)?;
      column.left = width + PAD;
    }

    for block in &card.blocks {
      self.block(block, column, &palette)?;
    }
    self.close("g")
  }

  fn decoration(&mut self, decoration: Decoration, palette: &Palette) -> Result<()> {
    let (w, h) = (CARD_WIDTH_MM, CARD_HEIGHT_MM);
    match decoration {
      Decoration::Frame(ink) => self.empty("rect", &[
        ("x", "2".into()),
        ("y", "2".into()),
        ("width", num(w - 4.0)),
        ("height", num(h - 4.0)),
        ("fill", "none".into()),
        ("stroke", palette.resolve(ink).to_hex()),
        ("stroke-width", "0.4".into()),
      ]),
      Decoration::CornerCircle => self.empty("circle", &[
        ("cx", num(w)),
        ("cy", "0".into()),
        ("r", "22".into()),
        ("fill", palette.primary.to_hex()),
        ("fill-opacity", "0.1".into()),
      ]),
      Decoration::DiagonalPanel => self.empty("polygon", &[
        (
          "points",
          format!("{},0 {},0 {},{} {},{}", num(w * 0.55), num(w), num(w), num(h), num(w * 0.4), num(h)),
        ),
        ("fill", palette.primary.to_hex()),
        ("fill-opacity", "0.12".into()),
      ]),
      Decoration::GradientBar(edge) => {
        let y = match edge {
          Edge::Top => 0.0,
          Edge::Bottom => h - BAR_HEIGHT,
        };
        self.empty("rect", &[
          ("y", num(y)),
          ("width", num(w)),
          ("height", num(BAR_HEIGHT)),
          ("fill", format!("url(#{GRADIENT_ID})")),
        ])
      }
    }
  }

  fn sidebar(&mut self, sidebar: &Sidebar, width: f32, palette: &Palette) -> Result<()> {
    let h = CARD_HEIGHT_MM;
    self.empty("rect", &[
      ("width", num(width)),
      ("height", num(h)),
      ("fill", palette.primary.to_hex()),
    ])?;
    match sidebar {
      Sidebar::Logo(url) => {
        let size = width - 8.0;
        self.empty("image", &[
          ("href", url.clone()),
          ("x", "4".into()),
          ("y", num((h - size) / 2.0)),
          ("width", num(size)),
          ("height", num(size)),
          ("preserveAspectRatio", "xMidYMid meet".into()),
        ])
      }
      Sidebar::Company(company) => self.text(
        "text",
        &[
          ("transform", format!("translate({} {}) rotate(-90)", num(width / 2.0 + 1.5), num(h / 2.0))),
          ("text-anchor", "middle".into()),
          ("font-size", "4".into()),
          ("font-weight", "bold".into()),
          ("letter-spacing", "0.6".into()),
          ("fill", Rgb::WHITE.to_hex()),
        ],
        &company.to_uppercase(),
      ),
    }
  }

  fn block(&mut self, block: &Block, column: Column, palette: &Palette) -> Result<()> {
    let height: f32 = block.rows.iter().map(row_height).sum();
    let mut y = match block.anchor {
      Anchor::Top => PAD,
      Anchor::Middle => (CARD_HEIGHT_MM - height) / 2.0,
      Anchor::Bottom => CARD_HEIGHT_MM - PAD - height,
    };
    for row in &block.rows {
      self.row(row, block.align, column, y, palette)?;
      y += row_height(row);
    }
    Ok(())
  }

  fn span_attrs(span: &Span, x: f32, y: f32, align: Align, palette: &Palette) -> Vec<(&'static str, String)> {
    let size = font_size(span.role);
    let mut attrs = vec![
      ("x", num(x)),
      ("y", num(y + size)),
      ("font-size", num(size)),
      ("text-anchor", Column::anchor(align).to_owned()),
      ("fill", palette.resolve(span.ink).to_hex()),
    ];
    if span.style.bold {
      attrs.push(("font-weight", "bold".into()));
    }
    if span.style.italic {
      attrs.push(("font-style", "italic".into()));
    }
    if span.style.mono {
      attrs.push(("font-family", "ui-monospace, Menlo, monospace".into()));
    }
    if span.style.muted {
      attrs.push(("fill-opacity", "0.7".into()));
    }
    attrs
  }

  fn row(&mut self, row: &Row, align: Align, column: Column, y: f32, palette: &Palette) -> Result<()> {
    match row {
      Row::Text(span) => {
        let attrs = Self::span_attrs(span, column.x(align), y, align, palette);
        self.text("text", &attrs, &span.display_text())
      }
      Row::Inline(spans) => {
        let Some(first) = spans.first() else { return Ok(()) };
        let attrs = Self::span_attrs(first, column.x(align), y, align, palette);
        self.open("text", &attrs)?;
        for (i, span) in spans.iter().enumerate() {
          let gap = if i == 0 { "0" } else { "3" };
          self.text("tspan", &[("dx", gap.to_owned())], &span.display_text())?;
        }
        self.close("text")
      }
      Row::Split(left, right) => {
        let attrs = Self::span_attrs(left, column.left, y, Align::Start, palette);
        self.text("text", &attrs, &left.display_text())?;
        let attrs = Self::span_attrs(right, column.right, y, Align::End, palette);
        self.text("text", &attrs, &right.display_text())
      }
      Row::Mark(mark) => self.mark(mark, align, column, y, palette),
      Row::Divider(ink) => {
        let width = 16.0;
        let x0 = match align {
          Align::Start => column.left,
          Align::Center => column.x(align) - width / 2.0,
          Align::End => column.right - width,
        };
        self.empty("line", &[
          ("x1", num(x0)),
          ("y1", num(y + 1.2)),
          ("x2", num(x0 + width)),
          ("y2", num(y + 1.2)),
          ("stroke", palette.resolve(*ink).to_hex()),
          ("stroke-width", "0.3".into()),
        ])
      }
      Row::Socials(links) => {
        let labels: Vec<&str> = links.iter().map(|l| l.network.glyph()).collect();
        self.text(
          "text",
          &[
            ("x", num(column.x(align))),
            ("y", num(y + 2.5)),
            ("font-size", "2.4".into()),
            ("font-weight", "bold".into()),
            ("text-anchor", Column::anchor(align).to_owned()),
            ("fill", palette.primary.to_hex()),
          ],
          &labels.join("  "),
        )
      }
      Row::Toggle { expanded } => self.text(
        "text",
        &[
          ("x", num(column.x(align))),
          ("y", num(y + 2.5)),
          ("font-size", "2.2".into()),
          ("text-anchor", Column::anchor(align).to_owned()),
          ("fill", palette.primary.to_hex()),
        ],
        Row::toggle_label(*expanded),
      ),
      Row::Bio(text) => self.text(
        "text",
        &[
          ("x", num(column.x(align))),
          ("y", num(y + font_size(TextRole::Slogan))),
          ("font-size", num(font_size(TextRole::Slogan))),
          ("text-anchor", Column::anchor(align).to_owned()),
          ("fill", palette.text.to_hex()),
        ],
        text,
      ),
    }
  }

  fn mark(&mut self, mark: &Mark, align: Align, column: Column, y: f32, palette: &Palette) -> Result<()> {
    let size = mark_size(mark);
    let x0 = match align {
      Align::Start => column.left,
      Align::Center => column.x(align) - size / 2.0,
      Align::End => column.right - size,
    };
    let (cx, cy) = (x0 + size / 2.0, y + size / 2.0);
    match mark {
      Mark::Logo(url) => self.empty("image", &[
        ("href", url.clone()),
        ("x", num(x0)),
        ("y", num(y)),
        ("width", num(size)),
        ("height", num(size)),
        ("preserveAspectRatio", "xMidYMid meet".into()),
      ]),
      Mark::Monogram(letter) => {
        self.empty("circle", &[
          ("cx", num(cx)),
          ("cy", num(cy)),
          ("r", num(size / 2.0 - 0.2)),
          ("fill", "none".into()),
          ("stroke", palette.primary.to_hex()),
          ("stroke-width", "0.3".into()),
        ])?;
        self.text(
          "text",
          &[
            ("x", num(cx)),
            ("y", num(cy + 1.4)),
            ("font-size", "4".into()),
            ("text-anchor", "middle".into()),
            ("fill", palette.primary.to_hex()),
          ],
          &letter.to_uppercase().to_string(),
        )
      }
      Mark::Dot => self.empty("circle", &[
        ("cx", num(cx)),
        ("cy", num(cy)),
        ("r", "1.5".into()),
        ("fill", palette.primary.to_hex()),
      ]),
      Mark::Square => {
        self.empty("rect", &[
          ("x", num(x0)),
          ("y", num(y)),
          ("width", num(size)),
          ("height", num(size)),
          ("rx", "1".into()),
          ("fill", palette.primary.to_hex()),
        ])?;
        self.empty("rect", &[
          ("x", num(cx - 1.2)),
          ("y", num(cy - 1.2)),
          ("width", "2.4".into()),
          ("height", "2.4".into()),
          ("fill", Rgb::WHITE.to_hex()),
        ])
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use prestige_core::{model::LayoutKind, proposal::fallback_themes};
  use strum::IntoEnumIterator;

  use super::*;

  fn info() -> ContactInfo {
    ContactInfo {
      full_name: "Jan Kowalski".into(),
      job_title: "CEO".into(),
      company_name: "Acme & Syn".into(),
      industry: "Tech".into(),
      email: "jan@acme.com".into(),
      phone: "+48 600 100 200".into(),
      ..ContactInfo::default()
    }
  }

  #[test]
  fn numbers_are_compact() {
    assert_eq!(num(85.0), "85");
    assert_eq!(num(0.0), "0");
    assert_eq!(num(1.25), "1.25");
    assert_eq!(num(2.5), "2.5");
  }

  #[test]
  fn card_has_physical_size_and_escaped_text() {
    let theme = fallback_themes().remove(1);
    let svg = card_document(&info(), &theme).unwrap();
    assert!(svg.starts_with("<?xml"));
    assert!(svg.contains(r#"width="85mm""#));
    assert!(svg.contains(r#"height="55mm""#));
    assert!(svg.contains("Acme &amp; Syn"));
    assert!(svg.contains("jan@acme.com"));
  }

  #[test]
  fn every_layout_renders() {
    let base = fallback_themes().remove(0);
    for layout in LayoutKind::iter() {
      let theme = Theme { layout, ..base.clone() };
      let svg = card_document(&info(), &theme).unwrap();
      assert!(svg.ends_with("</svg>"), "{layout}");
      assert!(svg.to_uppercase().contains("KOWALSKI"), "{layout}");
    }
  }

  #[test]
  fn print_output_has_no_toggle() {
    let theme = fallback_themes().remove(0);
    let info = ContactInfo { bio: Some("Biografia".into()), ..info() };
    let svg = card_document(&info, &theme).unwrap();
    assert!(!svg.contains(Row::toggle_label(false)));
    assert!(!svg.contains("Biografia"));
  }

  #[test]
  fn sheet_places_ten_cards() {
    let theme = fallback_themes().remove(0);
    let svg = sheet_document(&info(), &theme, &PrintSheet::A4).unwrap();
    assert!(svg.contains(r#"width="210mm""#));
    assert_eq!(svg.matches("translate(").count(), 10);
    assert!(svg.contains("translate(20 11)"));
    assert!(svg.contains("translate(105 231)"));
  }

  #[test]
  fn logo_is_embedded_as_image() {
    let mut theme = fallback_themes().remove(0);
    theme.layout = LayoutKind::Corporate;
    theme.logo_url = Some("data:image/png;base64,AA==".into());
    let svg = card_document(&info(), &theme).unwrap();
    assert!(svg.contains(r#"href="data:image/png;base64,AA==""#));
  }
}
