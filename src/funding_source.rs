use serde::{de, Deserialize, Deserializer};

/// A bank account or other payment instrument linked to a Dwolla account
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FundingSource {
    id: String,
    name: String,
    #[serde(rename = "Type")]
    source_type: String,
    #[serde(deserialize_with = "bool_or_string")]
    verified: bool,
}

impl FundingSource {
    /// The opaque identifier of the funding source
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The display name, for example "Checking - My Bank"
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind of account, for example "Checking"
    #[must_use]
    pub fn source_type(&self) -> &str {
        &self.source_type
    }

    /// Whether the funding source has been verified
    #[must_use]
    pub fn verified(&self) -> bool {
        self.verified
    }
}

/// The API reports `Verified` either as a boolean or as `"true"`/`"false"`
fn bool_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        String(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(flag) => Ok(flag),
        Flag::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Flag::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        Flag::String(s) => Err(de::Error::invalid_value(
            de::Unexpected::Str(&s),
            &"a boolean",
        )),
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn deserialise() {
        let raw = r#"{
            "Id": "mE06khgHy9K/Ii9n5fbUEg==",
            "Name": "Checking - My Bank",
            "Type": "Checking",
            "Verified": "true"
        }"#;

        let source: FundingSource = serde_json::from_str(raw).unwrap();

        assert_eq!(source.id(), "mE06khgHy9K/Ii9n5fbUEg==");
        assert_eq!(source.name(), "Checking - My Bank");
        assert_eq!(source.source_type(), "Checking");
        assert!(source.verified());
    }

    #[test_case("true" => Some(true); "bool true")]
    #[test_case("false" => Some(false); "bool false")]
    #[test_case(r#""true""# => Some(true); "string true")]
    #[test_case(r#""False""# => Some(false); "string false")]
    #[test_case(r#""maybe""# => None; "garbage")]
    fn verified(flag: &str) -> Option<bool> {
        let raw = format!(
            r#"{{"Id": "1", "Name": "Savings", "Type": "Savings", "Verified": {}}}"#,
            flag
        );
        serde_json::from_str::<FundingSource>(&raw)
            .ok()
            .map(|source| source.verified())
    }
}
