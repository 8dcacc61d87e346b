//! Prompt text and the theme response schema.

use prestige_core::{
  model::{AccentShape, FontFamily, LayoutKind},
  proposal::{BioRequest, DesignRequest},
};
use serde_json::{Value, json};
use strum::IntoEnumIterator;

fn names<E: IntoEnumIterator + ToString>() -> Vec<String> {
  E::iter().map(|v| v.to_string()).collect()
}

fn join_fonts(premium: bool) -> String {
  FontFamily::iter()
    .filter(|f| f.is_premium() == premium)
    .map(|f| f.to_string())
    .collect::<Vec<_>>()
    .join(", ")
}

pub fn design_prompt(request: &DesignRequest) -> String {
  let focus = request
    .style_hint
    .as_deref()
    .map(|hint| format!("Skup się na stylach typu: {hint}.\n"))
    .unwrap_or_default();

  format!(
    "Jesteś światowej klasy projektantem graficznym.\n\
     Użytkownik potrzebuje {count} różnych, premium projektów wizytówek.\n\
     Dane użytkownika:\n\
     Branża: {industry}\n\
     Stanowisko: {job_title}\n\
     Firma: {company}\n\
     \n\
     {focus}\
     Zasady:\n\
     1. Wygeneruj {count} unikalnych stylów.\n\
     2. Dobierz kolory (hex) pasujące do psychologii kolorów w tej branży.\n\
     3. Wymyśl krótki, profesjonalny slogan (tagline) pasujący do firmy.\n\
     4. layoutStyle musi być jednym z: {layouts}.\n\
     5. fontFamily wybierz jedno z:\n   \
        - Standardowe: {standard}\n   \
        - Premium: {premium}.\n\
     6. accentShape to sugestia geometryczna: {accents}.\n",
    count = request.count,
    industry = request.industry,
    job_title = request.job_title,
    company = request.company_name,
    layouts = names::<LayoutKind>().join(", "),
    standard = join_fonts(false),
    premium = join_fonts(true),
    accents = names::<AccentShape>().join(", "),
  )
}

pub fn bio_prompt(request: &BioRequest) -> String {
  format!(
    "Napisz krótkie, profesjonalne bio (maksymalnie 2-3 zdania) dla wizytówki.\n\
     Osoba: {}\n\
     Stanowisko: {}\n\
     Branża: {}\n\
     Styl: Profesjonalny, zaufany.\n\
     Język: Polski.\n\
     Nie używaj cudzysłowów.\n",
    request.full_name, request.job_title, request.industry,
  )
}

/// `responseSchema` for an array of theme drafts. Field names and enum
/// values match the serde representation of `ThemeDraft`.
pub fn theme_schema() -> Value {
  let hex = json!({ "type": "STRING", "description": "Hex color" });
  json!({
    "type": "ARRAY",
    "items": {
      "type": "OBJECT",
      "properties": {
        "name":            { "type": "STRING", "description": "Nazwa stylu np. 'Midnight Gold'" },
        "layoutStyle":     { "type": "STRING", "enum": names::<LayoutKind>() },
        "primaryColor":    hex,
        "secondaryColor":  hex,
        "backgroundColor": hex,
        "textColor":       hex,
        "fontFamily":      { "type": "STRING", "enum": names::<FontFamily>() },
        "slogan":          { "type": "STRING", "description": "Krótkie hasło reklamowe" },
        "accentShape":     { "type": "STRING", "enum": names::<AccentShape>() },
      },
      "required": [
        "name", "layoutStyle", "primaryColor", "secondaryColor",
        "backgroundColor", "textColor", "fontFamily", "slogan", "accentShape",
      ],
    },
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn request(hint: Option<&str>) -> DesignRequest {
    DesignRequest {
      industry:     "Tech".into(),
      job_title:    "CEO".into(),
      company_name: "Acme".into(),
      style_hint:   hint.map(str::to_owned),
      count:        6,
    }
  }

  #[test]
  fn design_prompt_mentions_context() {
    let prompt = design_prompt(&request(None));
    assert!(prompt.contains("Branża: Tech"));
    assert!(prompt.contains("Firma: Acme"));
    assert!(prompt.contains("Wygeneruj 6 unikalnych"));
    assert!(prompt.contains("Minimal, Bold, Luxury, Creative, Corporate, Tech"));
    assert!(prompt.contains("Standardowe: sans, serif, display, modern"));
    assert!(!prompt.contains("Skup się"));
  }

  #[test]
  fn style_hint_adds_focus_line() {
    let prompt = design_prompt(&request(Some("Futurystyczny")));
    assert!(prompt.contains("Skup się na stylach typu: Futurystyczny."));
  }

  #[test]
  fn schema_enums_follow_model() {
    let schema = theme_schema();
    let props = &schema["items"]["properties"];
    assert_eq!(props["fontFamily"]["enum"].as_array().unwrap().len(), 14);
    assert_eq!(props["fontFamily"]["enum"][8], "greatvibes");
    assert_eq!(props["accentShape"]["enum"][3], "none");
    assert_eq!(props["layoutStyle"]["enum"][0], "Minimal");
    assert_eq!(schema["items"]["required"].as_array().unwrap().len(), 9);
  }
}
