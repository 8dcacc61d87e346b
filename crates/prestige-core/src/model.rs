//! Business-card content and visual themes.
//!
//! Everything here is plain value data. Identity (`id`) is only assigned when
//! a theme leaves the generator or a project/template is written to a store.
//! Serialised field names are camelCase to stay compatible with card data
//! exported from the browser version.

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::{Error, Result, color::is_hex_color, error::ValidationError};

/// Appended to a theme's display name when it is saved as a template.
pub const TEMPLATE_SUFFIX: &str = " (Szablon)";

// ─── Contact content ─────────────────────────────────────────────────────────

/// Optional social profile links shown as icons on the card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Socials {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub facebook: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub twitter:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub linkedin: Option<String>,
}

impl Socials {
  pub fn is_empty(&self) -> bool {
    [&self.facebook, &self.twitter, &self.linkedin]
      .iter()
      .all(|link| link.as_deref().is_none_or(str::is_empty))
  }
}

/// The content printed on one business card. No field is unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
  pub full_name:    String,
  pub job_title:    String,
  pub company_name: String,
  pub email:        String,
  pub phone:        String,
  pub website:      String,
  pub address:      String,
  /// Only used to steer generation; never printed.
  pub industry:     String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub bio:          Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub socials:      Option<Socials>,
}

impl ContactInfo {
  /// Fields that must be filled in before themes are requested.
  pub const REQUIRED_FOR_GENERATION: &[ContactField] = &[
    ContactField::FullName,
    ContactField::JobTitle,
    ContactField::CompanyName,
    ContactField::Industry,
    ContactField::Email,
  ];

  /// Fields that must be filled in before a biography is requested.
  pub const REQUIRED_FOR_BIO: &[ContactField] =
    &[ContactField::FullName, ContactField::Industry];

  pub fn validate_for_generation(&self) -> Result<(), ValidationError> {
    self.require(Self::REQUIRED_FOR_GENERATION)
  }

  pub fn validate_for_bio(&self) -> Result<(), ValidationError> {
    self.require(Self::REQUIRED_FOR_BIO)
  }

  fn require(&self, fields: &[ContactField]) -> Result<(), ValidationError> {
    let missing: Vec<ContactField> = fields
      .iter()
      .copied()
      .filter(|field| field.get(self).trim().is_empty())
      .collect();
    if missing.is_empty() {
      Ok(())
    } else {
      Err(ValidationError { missing })
    }
  }

  pub fn bio_text(&self) -> &str { self.bio.as_deref().unwrap_or_default() }

  /// Socials with at least one non-empty link.
  pub fn socials(&self) -> Option<&Socials> {
    self.socials.as_ref().filter(|s| !s.is_empty())
  }
}

/// Every editable [`ContactInfo`] field, in form order.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ContactField {
  FullName,
  JobTitle,
  CompanyName,
  Industry,
  Email,
  Phone,
  Website,
  Address,
  Bio,
  Facebook,
  Twitter,
  Linkedin,
}

impl ContactField {
  pub fn label(&self) -> &'static str {
    match self {
      Self::FullName => "Full name",
      Self::JobTitle => "Job title",
      Self::CompanyName => "Company",
      Self::Industry => "Industry",
      Self::Email => "Email",
      Self::Phone => "Phone",
      Self::Website => "Website",
      Self::Address => "Address",
      Self::Bio => "Bio",
      Self::Facebook => "Facebook URL",
      Self::Twitter => "Twitter URL",
      Self::Linkedin => "LinkedIn URL",
    }
  }

  pub fn get<'a>(&self, info: &'a ContactInfo) -> &'a str {
    let social = |pick: fn(&Socials) -> &Option<String>| {
      info
        .socials
        .as_ref()
        .and_then(|s| pick(s).as_deref())
        .unwrap_or_default()
    };
    match self {
      Self::FullName => &info.full_name,
      Self::JobTitle => &info.job_title,
      Self::CompanyName => &info.company_name,
      Self::Industry => &info.industry,
      Self::Email => &info.email,
      Self::Phone => &info.phone,
      Self::Website => &info.website,
      Self::Address => &info.address,
      Self::Bio => info.bio_text(),
      Self::Facebook => social(|s| &s.facebook),
      Self::Twitter => social(|s| &s.twitter),
      Self::Linkedin => social(|s| &s.linkedin),
    }
  }

  /// Overwrite the field. Optional fields are cleared by an empty value.
  pub fn set(&self, info: &mut ContactInfo, value: impl Into<String>) {
    let value = value.into();
    let optional = (!value.is_empty()).then(|| value.clone());
    match self {
      Self::FullName => info.full_name = value,
      Self::JobTitle => info.job_title = value,
      Self::CompanyName => info.company_name = value,
      Self::Industry => info.industry = value,
      Self::Email => info.email = value,
      Self::Phone => info.phone = value,
      Self::Website => info.website = value,
      Self::Address => info.address = value,
      Self::Bio => info.bio = optional,
      Self::Facebook => info.socials.get_or_insert_default().facebook = optional,
      Self::Twitter => info.socials.get_or_insert_default().twitter = optional,
      Self::Linkedin => info.socials.get_or_insert_default().linkedin = optional,
    }
  }
}

// ─── Theme enumerations ──────────────────────────────────────────────────────

/// Which visual arrangement a card uses. Does not change the data schema.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
pub enum LayoutKind {
  Minimal,
  Bold,
  Luxury,
  Creative,
  Corporate,
  Tech,
}

/// The closed set of typefaces a theme may select.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FontFamily {
  #[default]
  Sans,
  Serif,
  Display,
  Modern,
  Poppins,
  Cormorant,
  Raleway,
  Oswald,
  GreatVibes,
  LibreBaskerville,
  SourceSans,
  DmSerif,
  Titillium,
  SpaceGrotesk,
}

impl FontFamily {
  /// Human-readable typeface name.
  pub fn label(&self) -> &'static str {
    match self {
      Self::Sans => "Sans",
      Self::Serif => "Serif",
      Self::Display => "Display",
      Self::Modern => "Modern",
      Self::Poppins => "Poppins",
      Self::Cormorant => "Cormorant Garamond",
      Self::Raleway => "Raleway",
      Self::Oswald => "Oswald",
      Self::GreatVibes => "Great Vibes",
      Self::LibreBaskerville => "Libre Baskerville",
      Self::SourceSans => "Source Sans 3",
      Self::DmSerif => "DM Serif Display",
      Self::Titillium => "Titillium Web",
      Self::SpaceGrotesk => "Space Grotesk",
    }
  }

  /// The first four identifiers are generic families; the rest are named
  /// web fonts.
  pub fn is_premium(&self) -> bool {
    !matches!(self, Self::Sans | Self::Serif | Self::Display | Self::Modern)
  }
}

/// Geometric accent suggested by the generator.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AccentShape {
  Circle,
  Line,
  Blob,
  #[default]
  None,
}

// ─── Theme ───────────────────────────────────────────────────────────────────

/// A theme as produced by a generation backend, before it has an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeDraft {
  pub name:             String,
  #[serde(rename = "layoutStyle")]
  pub layout:           LayoutKind,
  pub primary_color:    String,
  pub secondary_color:  String,
  pub background_color: String,
  pub text_color:       String,
  #[serde(rename = "fontFamily")]
  pub font:             FontFamily,
  pub slogan:           String,
  #[serde(rename = "accentShape")]
  pub accent:           AccentShape,
}

impl ThemeDraft {
  /// Check the parts of the schema serde cannot: a display name and four
  /// parseable hex colours.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::EmptyThemeName);
    }
    for color in [
      &self.primary_color,
      &self.secondary_color,
      &self.background_color,
      &self.text_color,
    ] {
      if !is_hex_color(color) {
        return Err(Error::InvalidColor(color.clone()));
      }
    }
    Ok(())
  }

  pub fn into_theme(self, id: Uuid) -> Theme {
    Theme {
      id,
      name: self.name,
      layout: self.layout,
      primary_color: self.primary_color,
      secondary_color: self.secondary_color,
      background_color: self.background_color,
      text_color: self.text_color,
      font: self.font,
      slogan: self.slogan,
      accent: self.accent,
      logo_url: None,
    }
  }
}

/// A visual style. Every field except `id` may be edited after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
  pub id:               Uuid,
  pub name:             String,
  #[serde(rename = "layoutStyle")]
  pub layout:           LayoutKind,
  pub primary_color:    String,
  pub secondary_color:  String,
  pub background_color: String,
  pub text_color:       String,
  #[serde(rename = "fontFamily")]
  pub font:             FontFamily,
  pub slogan:           String,
  #[serde(rename = "accentShape")]
  pub accent:           AccentShape,
  /// Embedded `data:` URI or external URL.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub logo_url:         Option<String>,
}

impl Theme {
  /// A copy named for the template list. The id is replaced by the store.
  pub fn as_template(&self) -> Theme {
    Theme {
      name: format!("{}{TEMPLATE_SUFFIX}", self.name),
      ..self.clone()
    }
  }

  /// Embed raw image bytes as a base64 `data:` URI. No size or type checks.
  pub fn set_logo_bytes(&mut self, media_type: &str, bytes: &[u8]) {
    self.logo_url = Some(format!("data:{media_type};base64,{}", B64.encode(bytes)));
  }

  pub fn clear_logo(&mut self) { self.logo_url = None; }
}

/// Guess an image media type from a file extension.
pub fn logo_media_type(extension: &str) -> &'static str {
  match extension.to_ascii_lowercase().as_str() {
    "png" => "image/png",
    "jpg" | "jpeg" => "image/jpeg",
    "gif" => "image/gif",
    "webp" => "image/webp",
    "svg" => "image/svg+xml",
    _ => "application/octet-stream",
  }
}

/// The free-text theme fields a user edits by typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ThemeField {
  Name,
  Slogan,
  PrimaryColor,
  SecondaryColor,
  BackgroundColor,
  TextColor,
}

impl ThemeField {
  pub fn label(&self) -> &'static str {
    match self {
      Self::Name => "Theme name",
      Self::Slogan => "Slogan",
      Self::PrimaryColor => "Primary colour",
      Self::SecondaryColor => "Secondary colour",
      Self::BackgroundColor => "Background",
      Self::TextColor => "Text colour",
    }
  }

  pub fn is_color(&self) -> bool { !matches!(self, Self::Name | Self::Slogan) }

  pub fn get<'a>(&self, theme: &'a Theme) -> &'a str {
    match self {
      Self::Name => &theme.name,
      Self::Slogan => &theme.slogan,
      Self::PrimaryColor => &theme.primary_color,
      Self::SecondaryColor => &theme.secondary_color,
      Self::BackgroundColor => &theme.background_color,
      Self::TextColor => &theme.text_color,
    }
  }

  pub fn set(&self, theme: &mut Theme, value: impl Into<String>) {
    let slot = match self {
      Self::Name => &mut theme.name,
      Self::Slogan => &mut theme.slogan,
      Self::PrimaryColor => &mut theme.primary_color,
      Self::SecondaryColor => &mut theme.secondary_color,
      Self::BackgroundColor => &mut theme.background_color,
      Self::TextColor => &mut theme.text_color,
    };
    *slot = value.into();
  }
}

// ─── Project ─────────────────────────────────────────────────────────────────

/// A saved (content, theme) pair. `owner` and `created_at` never change after
/// creation; updates replace `info` and `theme` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
  pub id:         Uuid,
  /// Owner's email. Absent on legacy rows, which every viewer can see.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub owner:      Option<String>,
  pub info:       ContactInfo,
  pub theme:      Theme,
  #[serde(with = "chrono::serde::ts_milliseconds")]
  pub created_at: DateTime<Utc>,
}

impl Project {
  /// The current time truncated to the millisecond precision `created_at`
  /// is persisted with.
  pub fn timestamp_now() -> DateTime<Utc> { Utc::now().trunc_subsecs(3) }

  /// Admins see everything; everyone else sees unowned rows and their own.
  pub fn is_visible_to(&self, viewer: &User) -> bool {
    viewer.is_admin || self.owner.as_deref().is_none_or(|owner| owner == viewer.email)
  }
}

// ─── User ────────────────────────────────────────────────────────────────────

/// Session identity. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
  pub name:     String,
  pub email:    String,
  pub is_admin: bool,
}

impl User {
  pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
    Self { name: name.into(), email: email.into(), is_admin: false }
  }

  pub fn admin(name: impl Into<String>, email: impl Into<String>) -> Self {
    Self { name: name.into(), email: email.into(), is_admin: true }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn kowalski() -> ContactInfo {
    ContactInfo {
      full_name: "Jan Kowalski".into(),
      job_title: "CEO".into(),
      company_name: "Acme".into(),
      industry: "Tech".into(),
      email: "jan@acme.com".into(),
      ..ContactInfo::default()
    }
  }

  fn draft() -> ThemeDraft {
    ThemeDraft {
      name:             "Midnight Gold".into(),
      layout:           LayoutKind::Luxury,
      primary_color:    "#C7A038".into(),
      secondary_color:  "#1A1A1A".into(),
      background_color: "#0F0F0F".into(),
      text_color:       "#FFFFFF".into(),
      font:             FontFamily::Cormorant,
      slogan:           "Excellence.".into(),
      accent:           AccentShape::Line,
    }
  }

  #[test]
  fn generation_requires_five_fields() {
    let err = ContactInfo::default().validate_for_generation().unwrap_err();
    assert_eq!(err.missing, ContactInfo::REQUIRED_FOR_GENERATION.to_vec());
    assert!(kowalski().validate_for_generation().is_ok());
  }

  #[test]
  fn whitespace_only_counts_as_missing() {
    let mut info = kowalski();
    info.industry = "   ".into();
    let err = info.validate_for_bio().unwrap_err();
    assert_eq!(err.missing, vec![ContactField::Industry]);
  }

  #[test]
  fn social_fields_round_through_accessors() {
    let mut info = ContactInfo::default();
    ContactField::Linkedin.set(&mut info, "https://linkedin.com/in/jan");
    assert_eq!(ContactField::Linkedin.get(&info), "https://linkedin.com/in/jan");
    assert_eq!(ContactField::Twitter.get(&info), "");
    assert!(info.socials().is_some());

    ContactField::Linkedin.set(&mut info, "");
    assert!(info.socials().is_none());
  }

  #[test]
  fn theme_serialises_with_browser_field_names() {
    let theme = draft().into_theme(Uuid::nil());
    let json = serde_json::to_value(&theme).unwrap();
    assert_eq!(json["layoutStyle"], "Luxury");
    assert_eq!(json["fontFamily"], "cormorant");
    assert_eq!(json["accentShape"], "line");
    assert_eq!(json["primaryColor"], "#C7A038");
    assert!(json.get("logoUrl").is_none());
  }

  #[test]
  fn multiword_fonts_use_flat_lowercase_names() {
    let json = serde_json::to_string(&FontFamily::LibreBaskerville).unwrap();
    assert_eq!(json, "\"librebaskerville\"");
    let font: FontFamily = "spacegrotesk".parse().unwrap();
    assert_eq!(font, FontFamily::SpaceGrotesk);
  }

  #[test]
  fn unknown_layout_is_rejected() {
    let mut json = serde_json::to_value(draft()).unwrap();
    json["layoutStyle"] = "Baroque".into();
    assert!(serde_json::from_value::<ThemeDraft>(json).is_err());
  }

  #[test]
  fn draft_validation_catches_bad_colours() {
    assert!(draft().validate().is_ok());
    let mut bad = draft();
    bad.text_color = "white".into();
    assert!(matches!(bad.validate(), Err(Error::InvalidColor(c)) if c == "white"));
  }

  #[test]
  fn template_copy_gets_suffix() {
    let theme = draft().into_theme(Uuid::new_v4());
    let template = theme.as_template();
    assert_eq!(template.name, "Midnight Gold (Szablon)");
    assert_eq!(template.primary_color, theme.primary_color);
  }

  #[test]
  fn logo_bytes_become_data_uri() {
    let mut theme = draft().into_theme(Uuid::new_v4());
    theme.set_logo_bytes(logo_media_type("PNG"), b"abc");
    assert_eq!(theme.logo_url.as_deref(), Some("data:image/png;base64,YWJj"));
  }

  #[test]
  fn visibility_rule() {
    let project = Project {
      id:         Uuid::new_v4(),
      owner:      Some("jan@acme.com".into()),
      info:       kowalski(),
      theme:      draft().into_theme(Uuid::new_v4()),
      created_at: Utc::now(),
    };
    assert!(project.is_visible_to(&User::new("Jan", "jan@acme.com")));
    assert!(!project.is_visible_to(&User::new("Ewa", "ewa@acme.com")));
    assert!(project.is_visible_to(&User::admin("Administrator", "admin@prestige.com")));

    let legacy = Project { owner: None, ..project };
    assert!(legacy.is_visible_to(&User::new("Ewa", "ewa@acme.com")));
  }

  #[test]
  fn project_timestamp_is_epoch_millis() {
    let project = Project {
      id:         Uuid::nil(),
      owner:      None,
      info:       kowalski(),
      theme:      draft().into_theme(Uuid::nil()),
      created_at: DateTime::from_timestamp_millis(1_700_000_000_123).unwrap(),
    };
    let json = serde_json::to_value(&project).unwrap();
    assert_eq!(json["createdAt"], 1_700_000_000_123_i64);
    assert!(json.get("owner").is_none());
  }
}
