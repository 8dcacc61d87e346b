//! Layout strategies: which fields go where on a card, for each
//! [`LayoutKind`].
//!
//! [`arrange`] is pure. It turns content plus a theme into a
//! [`CardArrangement`], a device-independent description made of blocks of
//! rows. Front-ends (the terminal preview, the SVG exporter) decide how big a
//! row is; this module only decides what appears, in which order, with which
//! ink and alignment.

use crate::{
  color::Rgb,
  model::{AccentShape, ContactInfo, FontFamily, LayoutKind, Theme},
};

/// Card width in millimetres.
pub const CARD_WIDTH_MM: f32 = 85.0;
/// Card height in millimetres.
pub const CARD_HEIGHT_MM: f32 = 55.0;

// ─── Options ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
  #[default]
  Screen,
  Print,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
  pub mode:        RenderMode,
  /// The card sits in an editor and may be expanded to show the biography.
  pub interactive: bool,
  /// The user has toggled the biography open.
  pub expanded:    bool,
}

impl RenderOptions {
  pub fn print() -> Self { Self { mode: RenderMode::Print, ..Self::default() } }

  pub fn interactive(expanded: bool) -> Self {
    Self { mode: RenderMode::Screen, interactive: true, expanded }
  }

  fn shows_toggle(&self) -> bool { self.interactive && self.mode == RenderMode::Screen }
}

// ─── Arrangement ─────────────────────────────────────────────────────────────

/// Colour roles. Resolved against [`Palette`] by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
  Primary,
  Secondary,
  Text,
  /// White, for content drawn on a primary-coloured fill.
  OnPrimary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
  pub primary:    Rgb,
  pub secondary:  Rgb,
  pub background: Rgb,
  pub text:       Rgb,
}

impl Palette {
  /// Unparseable colours degrade to black ink on a white card.
  pub fn of(theme: &Theme) -> Self {
    let parse = |hex: &str, default| Rgb::parse_hex(hex).unwrap_or(default);
    Self {
      primary:    parse(&theme.primary_color, Rgb::BLACK),
      secondary:  parse(&theme.secondary_color, Rgb::BLACK),
      background: parse(&theme.background_color, Rgb::WHITE),
      text:       parse(&theme.text_color, Rgb::BLACK),
    }
  }

  pub fn resolve(&self, ink: Ink) -> Rgb {
    match ink {
      Ink::Primary => self.primary,
      Ink::Secondary => self.secondary,
      Ink::Text => self.text,
      Ink::OnPrimary => Rgb::WHITE,
    }
  }
}

/// What a piece of text is, which front-ends map to a size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
  Name,
  Title,
  Company,
  Contact,
  Slogan,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStyle {
  pub bold:      bool,
  pub italic:    bool,
  pub uppercase: bool,
  pub mono:      bool,
  /// Drawn at reduced opacity.
  pub muted:     bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
  pub text:  String,
  pub role:  TextRole,
  pub ink:   Ink,
  pub style: TextStyle,
}

impl Span {
  fn new(text: impl Into<String>, role: TextRole) -> Self {
    Self { text: text.into(), role, ink: Ink::Text, style: TextStyle::default() }
  }

  fn ink(mut self, ink: Ink) -> Self {
    self.ink = ink;
    self
  }

  fn bold(mut self) -> Self {
    self.style.bold = true;
    self
  }

  fn italic(mut self) -> Self {
    self.style.italic = true;
    self
  }

  fn upper(mut self) -> Self {
    self.style.uppercase = true;
    self
  }

  fn mono(mut self) -> Self {
    self.style.mono = true;
    self
  }

  fn muted(mut self) -> Self {
    self.style.muted = true;
    self
  }

  /// The text as it should be drawn.
  pub fn display_text(&self) -> String {
    if self.style.uppercase {
      self.text.to_uppercase()
    } else {
      self.text.clone()
    }
  }
}

/// A small graphic standing in for, or being, the company logo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mark {
  Logo(String),
  /// First letter of the company in a ring.
  Monogram(char),
  Dot,
  /// Filled rounded square with a white inset.
  Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialNetwork {
  Facebook,
  Twitter,
  Linkedin,
}

impl SocialNetwork {
  pub fn label(&self) -> &'static str {
    match self {
      Self::Facebook => "Facebook",
      Self::Twitter => "Twitter",
      Self::Linkedin => "LinkedIn",
    }
  }

  /// Short glyph for text front-ends.
  pub fn glyph(&self) -> &'static str {
    match self {
      Self::Facebook => "f",
      Self::Twitter => "x",
      Self::Linkedin => "in",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialLink {
  pub network: SocialNetwork,
  pub url:     String,
  /// Hover styling; never in print.
  pub hover:   bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
  Text(Span),
  /// Spans laid out side by side with a small gap.
  Inline(Vec<Span>),
  /// One span pushed left, one pushed right.
  Split(Span, Span),
  Mark(Mark),
  /// Short horizontal rule in the given ink.
  Divider(Ink),
  Socials(Vec<SocialLink>),
  /// "Więcej" / "Mniej" button.
  Toggle { expanded: bool },
  Bio(String),
}

impl Row {
  pub fn toggle_label(expanded: bool) -> &'static str {
    if expanded { "Mniej" } else { "Więcej" }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
  Start,
  Center,
  End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
  Top,
  Middle,
  Bottom,
}

/// Rows stacked vertically and anchored inside the content area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
  pub anchor: Anchor,
  pub align:  Align,
  pub rows:   Vec<Row>,
}

impl Block {
  fn new(anchor: Anchor, align: Align) -> Self { Self { anchor, align, rows: Vec::new() } }

  fn push(&mut self, row: Row) -> &mut Self {
    self.rows.push(row);
    self
  }

  /// Push a text row unless it is blank.
  fn text(&mut self, span: Span) -> &mut Self {
    if !span.text.trim().is_empty() {
      self.rows.push(Row::Text(span));
    }
    self
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
  Top,
  Bottom,
}

/// Background ornaments drawn beneath the blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
  /// Border around the whole card.
  Frame(Ink),
  /// Large faint circle bleeding off the top-right corner.
  CornerCircle,
  /// Faint slanted panel over the right half.
  DiagonalPanel,
  /// Thin primary-to-secondary bar along an edge.
  GradientBar(Edge),
}

/// Left third of the card filled with the primary colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sidebar {
  Logo(String),
  /// Company name running bottom-to-top.
  Company(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardArrangement {
  pub layout:      LayoutKind,
  pub font:        FontFamily,
  pub palette:     Palette,
  pub decorations: Vec<Decoration>,
  pub sidebar:     Option<Sidebar>,
  pub blocks:      Vec<Block>,
  /// The card grows past its fixed aspect ratio to fit the biography.
  pub grows:       bool,
}

impl CardArrangement {
  pub fn rows(&self) -> impl Iterator<Item = &Row> {
    self.blocks.iter().flat_map(|b| b.rows.iter())
  }

  pub fn has_toggle(&self) -> bool {
    self.rows().any(|r| matches!(r, Row::Toggle { .. }))
  }

  pub fn bio(&self) -> Option<&str> {
    self.rows().find_map(|r| match r {
      Row::Bio(text) => Some(text.as_str()),
      _ => None,
    })
  }
}

// ─── Strategies ──────────────────────────────────────────────────────────────

struct Ctx<'a> {
  info:     &'a ContactInfo,
  theme:    &'a Theme,
  options:  RenderOptions,
  show_bio: bool,
}

impl Ctx<'_> {
  fn logo(&self) -> Option<&str> { self.theme.logo_url.as_deref().filter(|u| !u.is_empty()) }

  fn contact(&self, text: &str) -> Span { Span::new(text, TextRole::Contact) }

  fn socials(&self) -> Option<Row> {
    let socials = self.info.socials()?;
    let hover = self.options.mode == RenderMode::Screen;
    let links = [
      (SocialNetwork::Facebook, &socials.facebook),
      (SocialNetwork::Twitter, &socials.twitter),
      (SocialNetwork::Linkedin, &socials.linkedin),
    ]
    .into_iter()
    .filter_map(|(network, url)| {
      url
        .as_deref()
        .filter(|u| !u.is_empty())
        .map(|url| SocialLink { network, url: url.to_owned(), hover })
    })
    .collect();
    Some(Row::Socials(links))
  }

  /// Toggle and biography rows, as gated by the options.
  fn expansion(&self, block: &mut Block) {
    if !self.options.shows_toggle() {
      return;
    }
    block.push(Row::Toggle { expanded: self.options.expanded });
    if self.show_bio {
      block.push(Row::Bio(self.info.bio_text().trim().to_owned()));
    }
  }

  fn with_socials(&self, block: &mut Block) {
    if let Some(row) = self.socials() {
      block.push(row);
    }
  }
}

/// Non-blank values only, in order.
fn present<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
  values.into_iter().filter(|v| !v.trim().is_empty()).collect()
}

fn luxury(cx: &Ctx<'_>) -> (Vec<Decoration>, Option<Sidebar>, Vec<Block>) {
  let (info, theme) = (cx.info, cx.theme);
  let mut main = Block::new(Anchor::Middle, Align::Center);

  let mark = match cx.logo() {
    Some(url) => Mark::Logo(url.to_owned()),
    None => Mark::Monogram(info.company_name.trim().chars().next().unwrap_or(' ')),
  };
  main
    .push(Row::Mark(mark))
    .text(Span::new(&info.full_name, TextRole::Name).ink(Ink::Primary).bold().upper())
    .text(Span::new(&info.job_title, TextRole::Title).upper().muted())
    .push(Row::Divider(Ink::Primary))
    .text(cx.contact(&present([info.phone.as_str(), info.email.as_str()]).join(" • ")))
    .text(cx.contact(&info.website))
    .text(cx.contact(&info.address));
  cx.with_socials(&mut main);

  let slogan = Span::new(&theme.slogan, TextRole::Slogan).ink(Ink::Secondary).upper().muted();
  let mut blocks = Vec::new();
  if cx.show_bio {
    main.text(slogan);
    cx.expansion(&mut main);
    blocks.push(main);
  } else {
    cx.expansion(&mut main);
    blocks.push(main);
    let mut foot = Block::new(Anchor::Bottom, Align::Center);
    foot.text(slogan);
    blocks.push(foot);
  }

  (vec![Decoration::Frame(Ink::Primary)], None, blocks)
}

fn bold(cx: &Ctx<'_>) -> (Vec<Decoration>, Option<Sidebar>, Vec<Block>) {
  let (info, theme) = (cx.info, cx.theme);
  let sidebar = match cx.logo() {
    Some(url) => Sidebar::Logo(url.to_owned()),
    None => Sidebar::Company(info.company_name.clone()),
  };

  let mut main = Block::new(Anchor::Middle, Align::End);
  if cx.logo().is_some() {
    main.text(Span::new(&info.company_name, TextRole::Company).bold().muted());
  }
  main
    .text(Span::new(&info.full_name, TextRole::Name).bold())
    .text(Span::new(&info.job_title, TextRole::Title).ink(Ink::Primary).bold());
  for line in present([&*info.phone, &*info.email, &*info.website, &*info.address]) {
    main.text(cx.contact(line));
  }
  cx.with_socials(&mut main);
  main
    .push(Row::Divider(Ink::Text))
    .text(Span::new(&theme.slogan, TextRole::Slogan).italic().muted());
  cx.expansion(&mut main);

  (Vec::new(), Some(sidebar), vec![main])
}

fn minimal(cx: &Ctx<'_>) -> (Vec<Decoration>, Option<Sidebar>, Vec<Block>) {
  let (info, theme) = (cx.info, cx.theme);
  let mut decorations = Vec::new();
  if theme.accent == AccentShape::Circle {
    decorations.push(Decoration::CornerCircle);
  }

  let mut header = Block::new(Anchor::Top, Align::Start);
  let mark = cx.logo().map_or(Mark::Dot, |url| Mark::Logo(url.to_owned()));
  header
    .push(Row::Mark(mark))
    .text(Span::new(&info.company_name, TextRole::Company).bold());

  let mut footer = Block::new(Anchor::Bottom, Align::Start);
  footer
    .text(Span::new(&info.full_name, TextRole::Name))
    .text(Span::new(&info.job_title, TextRole::Title).ink(Ink::Secondary).bold().upper());
  let contacts: Vec<Span> = present([&*info.phone, &*info.email, &*info.website])
    .into_iter()
    .map(|line| cx.contact(line).muted())
    .collect();
  if !contacts.is_empty() {
    footer.push(Row::Inline(contacts));
  }
  cx.with_socials(&mut footer);
  cx.expansion(&mut footer);

  (decorations, None, vec![header, footer])
}

fn creative(cx: &Ctx<'_>) -> (Vec<Decoration>, Option<Sidebar>, Vec<Block>) {
  let info = cx.info;
  let mut main = Block::new(Anchor::Middle, Align::Start);
  if let Some(url) = cx.logo() {
    main.push(Row::Mark(Mark::Logo(url.to_owned())));
  }

  let mut words = info.full_name.split_whitespace();
  let first = words.next().unwrap_or_default();
  let rest = words.collect::<Vec<_>>().join(" ");
  main
    .text(Span::new(first, TextRole::Name).bold())
    .text(Span::new(rest, TextRole::Name).ink(Ink::Primary).bold())
    .text(Span::new(&info.job_title, TextRole::Title));

  let company = if cx.logo().is_none() { info.company_name.as_str() } else { "" };
  let left = present([&*info.email, &*info.phone]);
  let rows = left.len().max(usize::from(!company.trim().is_empty()));
  for i in 0..rows {
    let l = left.get(i).copied().unwrap_or_default();
    let r = if i == 0 { company } else { "" };
    main.push(Row::Split(
      cx.contact(l).bold(),
      Span::new(r, TextRole::Company).bold(),
    ));
  }
  cx.with_socials(&mut main);
  cx.expansion(&mut main);

  (vec![Decoration::DiagonalPanel], None, vec![main])
}

fn corporate(cx: &Ctx<'_>) -> (Vec<Decoration>, Option<Sidebar>, Vec<Block>) {
  let (info, theme) = (cx.info, cx.theme);
  let mut header = Block::new(Anchor::Top, Align::Start);
  let mark = cx.logo().map_or(Mark::Square, |url| Mark::Logo(url.to_owned()));
  header
    .push(Row::Mark(mark))
    .text(Span::new(&info.company_name, TextRole::Company).bold().upper())
    .text(Span::new(&theme.slogan, TextRole::Slogan).muted());

  let mut footer = Block::new(Anchor::Bottom, Align::Start);
  footer
    .text(Span::new(&info.full_name, TextRole::Name).bold())
    .text(Span::new(&info.job_title, TextRole::Title).ink(Ink::Primary))
    .push(Row::Divider(Ink::Text));
  for (l, r) in [(&info.phone, &info.website), (&info.email, &info.address)] {
    if !(l.trim().is_empty() && r.trim().is_empty()) {
      footer.push(Row::Split(cx.contact(l), cx.contact(r)));
    }
  }
  cx.with_socials(&mut footer);
  cx.expansion(&mut footer);

  (Vec::new(), None, vec![header, footer])
}

fn tech(cx: &Ctx<'_>) -> (Vec<Decoration>, Option<Sidebar>, Vec<Block>) {
  let (info, theme) = (cx.info, cx.theme);
  let mut main = Block::new(Anchor::Middle, Align::Start);

  let brand = match cx.logo() {
    Some(url) => Row::Mark(Mark::Logo(url.to_owned())),
    None => Row::Text(Span::new(&info.company_name, TextRole::Company).bold().muted()),
  };
  main
    .text(Span::new(&info.full_name, TextRole::Name).bold().mono())
    .push(brand)
    .text(Span::new(format!("> {}", info.job_title), TextRole::Title).ink(Ink::Primary).mono());

  let labelled = |label: &str, value: &str| {
    let text = if value.trim().is_empty() { String::new() } else { format!("{label}: {value}") };
    cx.contact(&text).mono().muted()
  };
  main
    .push(Row::Split(labelled("M", &info.phone), labelled("E", &info.email)))
    .push(Row::Split(labelled("W", &info.website), labelled("A", &info.address)));
  cx.with_socials(&mut main);
  if !theme.slogan.trim().is_empty() {
    main.push(Row::Text(
      Span::new(format!("/* {} */", theme.slogan), TextRole::Slogan).mono().muted(),
    ));
  }
  cx.expansion(&mut main);

  let bars = vec![Decoration::GradientBar(Edge::Top), Decoration::GradientBar(Edge::Bottom)];
  (bars, None, vec![main])
}

/// Lay out one card. Every [`LayoutKind`] has exactly one strategy.
pub fn arrange(info: &ContactInfo, theme: &Theme, options: RenderOptions) -> CardArrangement {
  let cx = Ctx {
    info,
    theme,
    options,
    show_bio: options.shows_toggle() && options.expanded && !info.bio_text().trim().is_empty(),
  };

  let (decorations, sidebar, blocks) = match theme.layout {
    LayoutKind::Luxury => luxury(&cx),
    LayoutKind::Bold => bold(&cx),
    LayoutKind::Minimal => minimal(&cx),
    LayoutKind::Creative => creative(&cx),
    LayoutKind::Corporate => corporate(&cx),
    LayoutKind::Tech => tech(&cx),
  };

  CardArrangement {
    layout: theme.layout,
    font: theme.font,
    palette: Palette::of(theme),
    decorations,
    sidebar,
    blocks,
    grows: cx.show_bio,
  }
}

/// CSS `font-family` stack for vector output.
pub fn font_stack(font: FontFamily) -> &'static str {
  match font {
    FontFamily::Sans => "Inter, ui-sans-serif, system-ui, sans-serif",
    FontFamily::Serif => "'Playfair Display', Georgia, serif",
    FontFamily::Display => "'Cinzel', 'Times New Roman', serif",
    FontFamily::Modern => "Montserrat, Helvetica, Arial, sans-serif",
    FontFamily::Poppins => "Poppins, sans-serif",
    FontFamily::Cormorant => "'Cormorant Garamond', Garamond, serif",
    FontFamily::Raleway => "Raleway, sans-serif",
    FontFamily::Oswald => "Oswald, 'Arial Narrow', sans-serif",
    FontFamily::GreatVibes => "'Great Vibes', cursive",
    FontFamily::LibreBaskerville => "'Libre Baskerville', Baskerville, serif",
    FontFamily::SourceSans => "'Source Sans 3', 'Source Sans Pro', sans-serif",
    FontFamily::DmSerif => "'DM Serif Display', serif",
    FontFamily::Titillium => "'Titillium Web', sans-serif",
    FontFamily::SpaceGrotesk => "'Space Grotesk', monospace",
  }
}

// ─── Print sheet ─────────────────────────────────────────────────────────────

/// Where one card sits on the print sheet, in millimetres from the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
  pub column: usize,
  pub row:    usize,
  pub x_mm:   f32,
  pub y_mm:   f32,
}

/// An A4 portrait sheet of identical cards laid edge to edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintSheet {
  pub width_mm:  f32,
  pub height_mm: f32,
  pub columns:   usize,
  pub rows:      usize,
  pub left_mm:   f32,
  pub top_mm:    f32,
}

impl PrintSheet {
  pub const A4: PrintSheet = PrintSheet {
    width_mm:  210.0,
    height_mm: 297.0,
    columns:   2,
    rows:      5,
    left_mm:   20.0,
    top_mm:    11.0,
  };

  pub fn capacity(&self) -> usize { self.columns * self.rows }

  /// Row-major placements.
  pub fn placements(&self) -> Vec<Placement> {
    (0..self.rows)
      .flat_map(|row| (0..self.columns).map(move |column| (column, row)))
      .map(|(column, row)| Placement {
        column,
        row,
        x_mm: self.left_mm + column as f32 * CARD_WIDTH_MM,
        y_mm: self.top_mm + row as f32 * CARD_HEIGHT_MM,
      })
      .collect()
  }
}

impl Default for PrintSheet {
  fn default() -> Self { Self::A4 }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;
  use uuid::Uuid;

  use super::*;
  use crate::model::{Socials, ThemeDraft};

  fn info() -> ContactInfo {
    ContactInfo {
      full_name: "Jan Maria Kowalski".into(),
      job_title: "CEO".into(),
      company_name: "Acme".into(),
      industry: "Tech".into(),
      email: "jan@acme.com".into(),
      phone: "+48 600 100 200".into(),
      website: "acme.com".into(),
      bio: Some("Buduje chmury.".into()),
      socials: Some(Socials {
        linkedin: Some("https://linkedin.com/in/jan".into()),
        ..Socials::default()
      }),
      ..ContactInfo::default()
    }
  }

  fn theme(layout: LayoutKind) -> Theme {
    ThemeDraft {
      name: "Test".into(),
      layout,
      primary_color: "#C7A038".into(),
      secondary_color: "#1A1A1A".into(),
      background_color: "#0F0F0F".into(),
      text_color: "#FFFFFF".into(),
      font: FontFamily::Oswald,
      slogan: "Slogan".into(),
      accent: AccentShape::Circle,
    }
    .into_theme(Uuid::new_v4())
  }

  fn texts(card: &CardArrangement) -> Vec<String> {
    let mut out = Vec::new();
    for row in card.rows() {
      match row {
        Row::Text(s) => out.push(s.text.clone()),
        Row::Inline(spans) => out.extend(spans.iter().map(|s| s.text.clone())),
        Row::Split(l, r) => out.extend([l.text.clone(), r.text.clone()]),
        _ => {}
      }
    }
    out
  }

  #[test]
  fn every_layout_shows_name_and_title() {
    for layout in LayoutKind::iter() {
      let card = arrange(&info(), &theme(layout), RenderOptions::default());
      let all = texts(&card).join("\n");
      assert!(all.contains("Kowalski"), "{layout}: {all}");
      assert!(all.contains("CEO"), "{layout}: {all}");
      assert_eq!(card.layout, layout);
    }
  }

  #[test]
  fn toggle_needs_interactive_screen() {
    for layout in LayoutKind::iter() {
      let t = theme(layout);
      assert!(!arrange(&info(), &t, RenderOptions::default()).has_toggle());
      assert!(arrange(&info(), &t, RenderOptions::interactive(false)).has_toggle());
      let print = RenderOptions { mode: RenderMode::Print, interactive: true, expanded: true };
      let card = arrange(&info(), &t, print);
      assert!(!card.has_toggle());
      assert!(card.bio().is_none());
    }
  }

  #[test]
  fn bio_needs_expansion_and_content() {
    let t = theme(LayoutKind::Luxury);
    assert!(arrange(&info(), &t, RenderOptions::interactive(false)).bio().is_none());

    let card = arrange(&info(), &t, RenderOptions::interactive(true));
    assert_eq!(card.bio(), Some("Buduje chmury."));
    assert!(card.grows);

    let no_bio = ContactInfo { bio: Some("  ".into()), ..info() };
    assert!(arrange(&no_bio, &t, RenderOptions::interactive(true)).bio().is_none());
  }

  #[test]
  fn print_disables_social_hover() {
    let t = theme(LayoutKind::Corporate);
    let hover = |options| {
      arrange(&info(), &t, options).rows().find_map(|r| match r {
        Row::Socials(links) => Some(links.iter().all(|l| l.hover)),
        _ => None,
      })
    };
    assert_eq!(hover(RenderOptions::default()), Some(true));
    assert_eq!(hover(RenderOptions::print()), Some(false));
  }

  #[test]
  fn luxury_uses_monogram_without_logo() {
    let t = theme(LayoutKind::Luxury);
    let card = arrange(&info(), &t, RenderOptions::default());
    assert!(card.rows().any(|r| *r == Row::Mark(Mark::Monogram('A'))));
    assert_eq!(card.decorations, vec![Decoration::Frame(Ink::Primary)]);

    let mut with_logo = t.clone();
    with_logo.logo_url = Some("data:image/png;base64,AA==".into());
    let card = arrange(&info(), &with_logo, RenderOptions::default());
    assert!(card.rows().any(|r| matches!(r, Row::Mark(Mark::Logo(_)))));
  }

  #[test]
  fn bold_sidebar_carries_company_or_logo() {
    let t = theme(LayoutKind::Bold);
    let card = arrange(&info(), &t, RenderOptions::default());
    assert_eq!(card.sidebar, Some(Sidebar::Company("Acme".into())));
    assert_eq!(card.blocks[0].align, Align::End);
  }

  #[test]
  fn minimal_circle_follows_accent() {
    let mut t = theme(LayoutKind::Minimal);
    assert_eq!(
      arrange(&info(), &t, RenderOptions::default()).decorations,
      vec![Decoration::CornerCircle]
    );
    t.accent = AccentShape::Blob;
    assert!(arrange(&info(), &t, RenderOptions::default()).decorations.is_empty());
  }

  #[test]
  fn creative_splits_first_name() {
    let card = arrange(&info(), &theme(LayoutKind::Creative), RenderOptions::default());
    let all = texts(&card);
    assert_eq!(all[0], "Jan");
    assert_eq!(all[1], "Maria Kowalski");
    assert!(all.contains(&"Acme".to_owned()));
  }

  #[test]
  fn tech_labels_contacts() {
    let card = arrange(&info(), &theme(LayoutKind::Tech), RenderOptions::default());
    let all = texts(&card);
    assert!(all.contains(&"> CEO".to_owned()));
    assert!(all.contains(&"M: +48 600 100 200".to_owned()));
    assert!(all.contains(&"/* Slogan */".to_owned()));
    assert!(!all.iter().any(|t| t.starts_with("A:")));
  }

  #[test]
  fn invalid_colours_degrade() {
    let mut t = theme(LayoutKind::Minimal);
    t.background_color = "nope".into();
    assert_eq!(Palette::of(&t).background, Rgb::WHITE);
  }

  #[test]
  fn a4_sheet_holds_ten_cards() {
    let sheet = PrintSheet::A4;
    let placements = sheet.placements();
    assert_eq!(placements.len(), 10);
    assert_eq!(sheet.capacity(), 10);
    assert_eq!((placements[0].x_mm, placements[0].y_mm), (20.0, 11.0));
    assert_eq!((placements[1].x_mm, placements[1].y_mm), (105.0, 11.0));
    let last = placements[9];
    assert_eq!((last.column, last.row), (1, 4));
    assert!(last.x_mm + CARD_WIDTH_MM <= sheet.width_mm);
    assert!(last.y_mm + CARD_HEIGHT_MM <= sheet.height_mm);
  }
}
