//! Quick-start industry presets offered on the content form.

use crate::model::ContactInfo;

/// A popular industry with a typical job title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndustryPreset {
  pub id:        &'static str,
  pub label:     &'static str,
  pub industry:  &'static str,
  pub job_title: &'static str,
}

impl IndustryPreset {
  /// Set the industry and, only if the user has not typed one yet, the job
  /// title.
  pub fn apply(&self, info: &mut ContactInfo) {
    info.industry = self.industry.to_owned();
    if info.job_title.trim().is_empty() {
      info.job_title = self.job_title.to_owned();
    }
  }

  pub fn is_selected(&self, info: &ContactInfo) -> bool { info.industry == self.industry }
}

const fn preset(
  id: &'static str,
  label: &'static str,
  industry: &'static str,
  job_title: &'static str,
) -> IndustryPreset {
  IndustryPreset { id, label, industry, job_title }
}

pub const INDUSTRY_PRESETS: &[IndustryPreset] = &[
  preset("fin", "Finanse & Prawo", "Finanse i Prawo", "Doradca Podatkowy"),
  preset("tech", "Technologie & IT", "Software Development", "Senior Developer"),
  preset("creative", "Design & Sztuka", "Sztuka i Design", "Art Director"),
  preset("med", "Medycyna", "Medycyna", "Lekarz Specjalista"),
  preset(
    "realestate",
    "Nieruchomości",
    "Nieruchomości",
    "Pośrednik w Obrocie Nieruchomościami",
  ),
  preset("beauty", "Beauty & SPA", "Beauty & Wellness", "Kosmetolog"),
  preset("food", "Gastronomia", "Gastronomia i Restauracje", "Szef Kuchni / Właściciel"),
  preset("edu", "Edukacja", "Edukacja i Nauka", "Wykładowca Akademicki"),
  preset("auto", "Motoryzacja", "Motoryzacja i Transport", "Manager Floty"),
  preset("arch", "Budownictwo", "Budownictwo i Architektura", "Główny Architekt"),
  preset("fitness", "Fitness & Sport", "Sport i Fitness", "Trener Personalny"),
  preset("photo", "Fotografia", "Fotografia i Video", "Fotograf Ślubny"),
  preset("marketing", "Marketing & PR", "Marketing i Reklama", "Social Media Manager"),
  preset("events", "Eventy & Śluby", "Organizacja Eventów", "Wedding Planner"),
  preset("barber", "Barber Shop", "Fryzjerstwo Męskie", "Master Barber"),
  preset("psych", "Psychologia", "Psychologia i Terapia", "Psychoterapeuta"),
  preset("services", "Usługi Domowe", "Usługi Techniczne", "Elektryk / Hydraulik"),
  preset("music", "Muzyka & DJ", "Muzyka i Rozrywka", "DJ / Producent Muzyczny"),
];

pub fn find_preset(id: &str) -> Option<&'static IndustryPreset> {
  INDUSTRY_PRESETS.iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn preset_ids_are_unique() {
    let mut ids: Vec<_> = INDUSTRY_PRESETS.iter().map(|p| p.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), INDUSTRY_PRESETS.len());
    assert_eq!(INDUSTRY_PRESETS.len(), 18);
  }

  #[test]
  fn apply_keeps_existing_job_title() {
    let mut info = ContactInfo { job_title: "CTO".into(), ..ContactInfo::default() };
    let tech = find_preset("tech").unwrap();
    tech.apply(&mut info);
    assert_eq!(info.industry, "Software Development");
    assert_eq!(info.job_title, "CTO");
    assert!(tech.is_selected(&info));
  }

  #[test]
  fn apply_fills_empty_job_title() {
    let mut info = ContactInfo::default();
    find_preset("barber").unwrap().apply(&mut info);
    assert_eq!(info.job_title, "Master Barber");
  }
}
