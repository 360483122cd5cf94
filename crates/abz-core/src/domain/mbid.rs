use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DraftError;

/// Acepta un MBID pelado o una URL de grabación de MusicBrainz (sitio normal o beta).
///
/// Versión 1..5 y variante 8/9/a/b. Solo se ancla el principio: lo que venga
/// tras el UUID (sufijos de URL, notas pegadas) se ignora.
static RECORDING_MBID_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(
    r"(?i)^(?:https?://(?:beta\.)?musicbrainz\.org/recording/)?([0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12})",
  )
  .unwrap()
});

/// Forma canónica de un UUID cualquiera, sin mirar versión ni variante.
static ANY_UUID_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap());

/// MusicBrainz Identifier de una grabación, siempre en minúsculas.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Mbid(String);

impl Mbid {
  /// Extrae y normaliza el MBID de la entrada del usuario.
  pub fn parse(input: &str) -> Result<Self, DraftError> {
    let caps = RECORDING_MBID_RE
      .captures(input.trim())
      .ok_or_else(|| DraftError::InvalidIdentifier(input.to_string()))?;

    Ok(Mbid(caps[1].to_ascii_lowercase()))
  }

  /// MBID que ya guardó el servidor. El servidor acepta cualquier UUID, así
  /// que aquí no se comprueban versión ni variante; solo se normaliza.
  pub fn from_server(value: &str) -> Result<Self, DraftError> {
    if ANY_UUID_RE.is_match(value) {
      Ok(Mbid(value.to_ascii_lowercase()))
    } else {
      Err(DraftError::InvalidIdentifier(value.to_string()))
    }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// URL canónica de la grabación en musicbrainz.org.
  pub fn recording_url(&self) -> String {
    format!("https://musicbrainz.org/recording/{}", self.0)
  }
}

impl FromStr for Mbid {
  type Err = DraftError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Mbid::parse(s)
  }
}

impl TryFrom<String> for Mbid {
  type Error = DraftError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Mbid::parse(&value)
  }
}

impl From<Mbid> for String {
  fn from(mbid: Mbid) -> Self {
    mbid.0
  }
}

impl AsRef<str> for Mbid {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Mbid {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const MBID: &str = "110e8400-e29b-41d4-a716-446655440000";

  #[test]
  fn parses_bare_and_url_forms_to_the_same_value() {
    let bare = Mbid::parse(MBID).unwrap();
    let url = Mbid::parse(&format!("https://musicbrainz.org/recording/{MBID}")).unwrap();
    let beta = Mbid::parse(&format!("http://beta.musicbrainz.org/recording/{MBID}")).unwrap();

    assert_eq!(bare, url);
    assert_eq!(bare, beta);
    assert_eq!(bare.as_str(), MBID);
  }

  #[test]
  fn lowercases_input() {
    let mbid = Mbid::parse("110E8400-E29B-41D4-A716-446655440000").unwrap();
    assert_eq!(mbid.as_str(), MBID);
  }

  #[test]
  fn accepts_url_suffixes() {
    let mbid = Mbid::parse(&format!("https://musicbrainz.org/recording/{MBID}/")).unwrap();
    assert_eq!(mbid.as_str(), MBID);
    let mbid = Mbid::parse(&format!("https://musicbrainz.org/recording/{MBID}?tab=details")).unwrap();
    assert_eq!(mbid.as_str(), MBID);
  }

  #[test]
  fn ignores_text_after_the_uuid() {
    for input in [format!("{MBID} (some song)"), format!("{MBID}abc"), format!("{MBID}0000")] {
      assert_eq!(Mbid::parse(&input).unwrap().as_str(), MBID, "{input:?}");
    }
  }

  #[test]
  fn server_values_skip_version_check() {
    let v0 = Mbid::from_server("110E8400-E29B-01D4-0716-446655440000").unwrap();
    assert_eq!(v0.as_str(), "110e8400-e29b-01d4-0716-446655440000");
    assert!(Mbid::parse(v0.as_str()).is_err());

    let url = format!("https://musicbrainz.org/recording/{MBID}");
    for bad in ["zz", "", MBID.trim_end_matches('0'), url.as_str()] {
      assert!(Mbid::from_server(bad).is_err(), "{bad:?}");
    }
  }

  #[test]
  fn rejects_malformed_input() {
    for bad in [
      "",
      "hello",
      "110e8400-e29b-41d4-a716",
      "110e8400e29b41d4a716446655440000",
      // versión 0 y 6
      "110e8400-e29b-01d4-a716-446655440000",
      "110e8400-e29b-61d4-a716-446655440000",
      // variante c y 7
      "110e8400-e29b-41d4-c716-446655440000",
      "110e8400-e29b-41d4-7716-446655440000",
      // texto antes del UUID
      " x110e8400-e29b-41d4-a716-446655440000",
      "https://musicbrainz.org/release/110e8400-e29b-41d4-a716-446655440000",
      "https://example.org/recording/110e8400-e29b-41d4-a716-446655440000",
    ] {
      assert!(
        matches!(Mbid::parse(bad), Err(DraftError::InvalidIdentifier(_))),
        "should reject {bad:?}"
      );
    }
  }

  #[test]
  fn deserializes_through_validation() {
    let ok: Mbid = serde_json::from_str(&format!("\"{MBID}\"")).unwrap();
    assert_eq!(ok.as_str(), MBID);
    assert!(serde_json::from_str::<Mbid>("\"nope\"").is_err());
  }
}
