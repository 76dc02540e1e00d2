use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Social context contributing one layer of contacts.
///
/// Serialized as its one-letter code (`H`, `S`, `W`, `C`); any other name is
/// kept as a custom layer. Parsing never yields an `Other` holding a built-in
/// name, but one can be constructed directly; such a value reads back as the
/// built-in setting and is rejected by [`Setting::is_canonical`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Setting {
    Household,
    School,
    Work,
    Community,
    Other(String),
}

impl Setting {
    pub fn code(&self) -> &str {
        match self {
            Setting::Household => "H",
            Setting::School => "S",
            Setting::Work => "W",
            Setting::Community => "C",
            Setting::Other(name) => name.as_str(),
        }
    }

    /// False for an `Other` whose name parses as a different setting, which
    /// would not survive a serde round trip.
    pub fn is_canonical(&self) -> bool {
        match self {
            Setting::Other(name) => name.parse::<Setting>().as_ref() == Ok(self),
            _ => true,
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Setting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.to_ascii_lowercase().as_str() {
            "" => return Err("setting name is empty".to_string()),
            "h" | "household" | "home" => Setting::Household,
            "s" | "school" => Setting::School,
            "w" | "work" | "workplace" => Setting::Work,
            "c" | "community" => Setting::Community,
            _ => Setting::Other(s.to_string()),
        })
    }
}

impl TryFrom<String> for Setting {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Setting> for String {
    fn from(s: Setting) -> Self {
        s.code().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_names() {
        assert_eq!("H".parse::<Setting>().unwrap(), Setting::Household);
        assert_eq!("workplace".parse::<Setting>().unwrap(), Setting::Work);
        assert_eq!(" c ".parse::<Setting>().unwrap(), Setting::Community);
        assert_eq!("LTCF".parse::<Setting>().unwrap(), Setting::Other("LTCF".into()));
        assert!("".parse::<Setting>().is_err());
    }

    #[test]
    fn serializes_as_code() {
        let custom = Setting::Other("LTCF".into());
        let json = serde_json::to_string(&vec![Setting::School, custom]).unwrap();
        assert_eq!(json, r#"["S","LTCF"]"#);
        let back: Vec<Setting> = serde_json::from_str(r#"["school","W"]"#).unwrap();
        assert_eq!(back, vec![Setting::School, Setting::Work]);
    }

    #[test]
    fn custom_setting_with_builtin_name_is_not_canonical() {
        assert!(Setting::Household.is_canonical());
        assert!(Setting::Other("LTCF".into()).is_canonical());
        assert!(!Setting::Other("school".into()).is_canonical());
        assert!(!Setting::Other("H".into()).is_canonical());
        assert!(!Setting::Other(" LTCF".into()).is_canonical());

        let json = serde_json::to_string(&Setting::Other("H".into())).unwrap();
        assert_eq!(serde_json::from_str::<Setting>(&json).unwrap(), Setting::Household);
    }
}
