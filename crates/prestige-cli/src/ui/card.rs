//! Terminal preview of a card, drawn from its [`CardArrangement`].

use prestige_core::{
  color::Rgb,
  model::{ContactInfo, Theme},
  render::{
    Align, Anchor, CardArrangement, Decoration, Edge, Mark, Palette, RenderOptions, Row, Sidebar,
    Span as CardSpan, arrange,
  },
};
use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn color(rgb: Rgb) -> Color { Color::Rgb(rgb.r, rgb.g, rgb.b) }

/// Arrange and draw one card into `area`.
pub fn draw(f: &mut Frame, area: Rect, info: &ContactInfo, theme: &Theme, options: RenderOptions) {
  let card = arrange(info, theme, options);
  draw_arrangement(f, area, &card);
}

pub fn draw_arrangement(f: &mut Frame, area: Rect, card: &CardArrangement) {
  let palette = card.palette;
  let mut block = Block::default().style(
    Style::default()
      .bg(color(palette.background))
      .fg(color(palette.text)),
  );
  if let Some(Decoration::Frame(ink)) = card
    .decorations
    .iter()
    .find(|d| matches!(d, Decoration::Frame(_)))
  {
    block = block
      .borders(Borders::ALL)
      .border_style(Style::default().fg(color(palette.resolve(*ink))));
  }
  let mut inner = block.inner(area);
  f.render_widget(block, area);

  for decoration in &card.decorations {
    inner = draw_decoration(f, inner, *decoration, &palette);
  }

  if let Some(sidebar) = &card.sidebar {
    let cols = Layout::default()
      .direction(Direction::Horizontal)
      .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)])
      .split(inner);
    draw_sidebar(f, cols[0], sidebar, &palette);
    inner = cols[1];
  }

  let inner = Rect {
    x:      inner.x + 1,
    width:  inner.width.saturating_sub(2),
    ..inner
  };
  for block in &card.blocks {
    let lines: Vec<Line> = block
      .rows
      .iter()
      .map(|row| row_line(row, &palette, inner.width))
      .collect();
    let height = (lines.len() as u16).min(inner.height);
    let y = match block.anchor {
      Anchor::Top => inner.y,
      Anchor::Middle => inner.y + (inner.height - height) / 2,
      Anchor::Bottom => inner.y + inner.height - height,
    };
    let alignment = match block.align {
      Align::Start => Alignment::Left,
      Align::Center => Alignment::Center,
      Align::End => Alignment::Right,
    };
    f.render_widget(
      Paragraph::new(lines)
        .alignment(alignment)
        .wrap(Wrap { trim: true }),
      Rect { y, height, ..inner },
    );
  }
}

/// Draw a decoration and return what is left of `area` for content.
fn draw_decoration(f: &mut Frame, area: Rect, decoration: Decoration, palette: &Palette) -> Rect {
  let primary = Style::default().fg(color(palette.primary));
  match decoration {
    Decoration::GradientBar(edge) if area.height > 2 => {
      let y = match edge {
        Edge::Top => area.y,
        Edge::Bottom => area.y + area.height - 1,
      };
      let bar = Line::from(vec![
        Span::styled("▀".repeat(usize::from(area.width / 2)), primary),
        Span::styled(
          "▀".repeat(usize::from(area.width - area.width / 2)),
          Style::default().fg(color(palette.secondary)),
        ),
      ]);
      f.render_widget(Paragraph::new(bar), Rect { y, height: 1, ..area });
      match edge {
        Edge::Top => Rect { y: area.y + 1, height: area.height - 1, ..area },
        Edge::Bottom => Rect { height: area.height - 1, ..area },
      }
    }
    Decoration::CornerCircle if area.width > 2 => {
      let corner = Rect { x: area.x + area.width - 2, y: area.y, width: 2, height: 1 };
      f.render_widget(Paragraph::new(Span::styled("◜◝", primary)), corner);
      area
    }
    Decoration::DiagonalPanel if area.width > 4 => {
      let x = area.x + area.width - 3;
      for row in 0..area.height.min(3) {
        let cell = Rect { x: x + row, y: area.y + row, width: 1, height: 1 };
        if cell.x < area.x + area.width {
          f.render_widget(Paragraph::new(Span::styled("╲", primary)), cell);
        }
      }
      area
    }
    _ => area,
  }
}

fn draw_sidebar(f: &mut Frame, area: Rect, sidebar: &Sidebar, palette: &Palette) {
  let style = Style::default()
    .bg(color(palette.primary))
    .fg(Color::White)
    .add_modifier(Modifier::BOLD);
  let lines: Vec<Line> = match sidebar {
    Sidebar::Logo(_) => vec![Line::from("▣ logo")],
    // One letter per line reads as vertical text.
    Sidebar::Company(company) => company
      .to_uppercase()
      .chars()
      .filter(|c| !c.is_whitespace())
      .take(usize::from(area.height))
      .map(|c| Line::from(c.to_string()))
      .collect(),
  };
  let top = area.height.saturating_sub(lines.len() as u16) / 2;
  f.render_widget(Block::default().style(style), area);
  f.render_widget(
    Paragraph::new(lines).style(style).alignment(Alignment::Center),
    Rect { y: area.y + top, height: area.height - top, ..area },
  );
}

fn span_style(span: &CardSpan, palette: &Palette) -> Style {
  let mut style = Style::default().fg(color(palette.resolve(span.ink)));
  if span.style.bold {
    style = style.add_modifier(Modifier::BOLD);
  }
  if span.style.italic {
    style = style.add_modifier(Modifier::ITALIC);
  }
  if span.style.muted {
    style = style.add_modifier(Modifier::DIM);
  }
  style
}

fn styled(span: &CardSpan, palette: &Palette) -> Span<'static> {
  Span::styled(span.display_text(), span_style(span, palette))
}

/// One terminal line for a card row.
pub fn row_line(row: &Row, palette: &Palette, width: u16) -> Line<'static> {
  let primary = Style::default().fg(color(palette.primary));
  match row {
    Row::Text(span) => Line::from(styled(span, palette)),
    Row::Inline(spans) => {
      let mut out = Vec::new();
      for (i, span) in spans.iter().enumerate() {
        if i > 0 {
          out.push(Span::raw("  "));
        }
        out.push(styled(span, palette));
      }
      Line::from(out)
    }
    Row::Split(left, right) => {
      let (l, r) = (left.display_text(), right.display_text());
      let used = l.chars().count() + r.chars().count();
      let pad = usize::from(width).saturating_sub(used).max(1);
      Line::from(vec![
        Span::styled(l, span_style(left, palette)),
        Span::raw(" ".repeat(pad)),
        Span::styled(r, span_style(right, palette)),
      ])
    }
    Row::Mark(mark) => {
      let glyph = match mark {
        Mark::Logo(_) => "▣".to_owned(),
        Mark::Monogram(c) => format!("({c})"),
        Mark::Dot => "●".to_owned(),
        Mark::Square => "■".to_owned(),
      };
      Line::from(Span::styled(glyph, primary))
    }
    Row::Divider(ink) => Line::from(Span::styled(
      "────────",
      Style::default().fg(color(palette.resolve(*ink))),
    )),
    Row::Socials(links) => {
      let glyphs: Vec<&str> = links.iter().map(|l| l.network.glyph()).collect();
      Line::from(Span::styled(glyphs.join(" "), primary.add_modifier(Modifier::BOLD)))
    }
    Row::Toggle { expanded } => {
      let arrow = if *expanded { "▴" } else { "▾" };
      Line::from(Span::styled(
        format!("[ {} {arrow} ]", Row::toggle_label(*expanded)),
        primary,
      ))
    }
    Row::Bio(text) => Line::from(Span::styled(
      text.clone(),
      Style::default()
        .fg(color(palette.text))
        .add_modifier(Modifier::ITALIC),
    )),
  }
}

#[cfg(test)]
mod tests {
  use prestige_core::{
    model::{ContactInfo, LayoutKind},
    proposal::fallback_themes,
  };
  use ratatui::{Terminal, backend::TestBackend};

  use super::*;

  fn info() -> ContactInfo {
    ContactInfo {
      full_name: "Jan Kowalski".into(),
      job_title: "CEO".into(),
      company_name: "Acme".into(),
      email: "jan@acme.com".into(),
      bio: Some("Buduje chmury.".into()),
      ..ContactInfo::default()
    }
  }

  fn render(theme: &Theme, options: RenderOptions) -> String {
    let mut terminal = Terminal::new(TestBackend::new(48, 16)).unwrap();
    terminal
      .draw(|f| draw(f, f.area(), &info(), theme, options))
      .unwrap();
    terminal
      .backend()
      .buffer()
      .content()
      .iter()
      .map(|cell| cell.symbol())
      .collect()
  }

  #[test]
  fn luxury_preview_shows_uppercase_name() {
    let theme = fallback_themes().remove(0);
    let screen = render(&theme, RenderOptions::default());
    assert!(screen.contains("JAN KOWALSKI"), "{screen}");
    assert!(!screen.contains("Więcej"));
  }

  #[test]
  fn interactive_preview_offers_toggle_and_bio() {
    let theme = fallback_themes().remove(1);
    let closed = render(&theme, RenderOptions::interactive(false));
    assert!(closed.contains("Więcej"));
    assert!(!closed.contains("Buduje"));

    let open = render(&theme, RenderOptions::interactive(true));
    assert!(open.contains("Mniej"));
    assert!(open.contains("Buduje chmury."));
  }

  #[test]
  fn bold_preview_keeps_details_beside_sidebar() {
    let theme = Theme { layout: LayoutKind::Bold, ..fallback_themes().remove(1) };
    let screen = render(&theme, RenderOptions::default());
    assert!(screen.contains("Jan Kowalski"));
  }

  #[test]
  fn split_rows_fill_the_width() {
    let palette = Palette::of(&fallback_themes().remove(0));
    let row = Row::Split(
      CardSpan {
        text:  "a".into(),
        role:  prestige_core::render::TextRole::Contact,
        ink:   prestige_core::render::Ink::Text,
        style: Default::default(),
      },
      CardSpan {
        text:  "b".into(),
        role:  prestige_core::render::TextRole::Contact,
        ink:   prestige_core::render::Ink::Text,
        style: Default::default(),
      },
    );
    assert_eq!(row_line(&row, &palette, 10).width(), 10);
  }
}
