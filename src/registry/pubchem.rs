use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

use super::CompoundLookup;
use crate::config::PubChemConfig;
use crate::models::CompoundInfo;

const PROPERTIES: &str = "MolecularFormula,MolecularWeight,IUPACName";

/// Client for the PubChem PUG REST API.
pub struct PubChemClient {
    client: Client,
    base_url: String,
}

impl PubChemClient {
    pub fn from_config(config: &PubChemConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("chemcheck/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(PubChemClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn property_url(&self, name: &str) -> String {
        format!(
            "{}/compound/name/{}/property/{}/JSON",
            self.base_url,
            encode_name(name),
            PROPERTIES
        )
    }
}

impl CompoundLookup for PubChemClient {
    async fn lookup(&self, name: &str) -> Result<Option<CompoundInfo>> {
        let response = self
            .client
            .get(self.property_url(name))
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let table: PropertyResponse = response.json().await?;
        Ok(first_compound(table))
    }
}

#[derive(Debug, Deserialize)]
struct PropertyResponse {
    #[serde(rename = "PropertyTable")]
    property_table: PropertyTable,
}

#[derive(Debug, Deserialize)]
struct PropertyTable {
    #[serde(rename = "Properties", default)]
    properties: Vec<Properties>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Properties {
    #[serde(rename = "CID")]
    cid: u64,
    molecular_formula: Option<String>,
    /// Sent as a string by current PubChem, as a number by older mirrors.
    molecular_weight: Option<serde_json::Value>,
    #[serde(rename = "IUPACName")]
    iupac_name: Option<String>,
}

fn first_compound(response: PropertyResponse) -> Option<CompoundInfo> {
    let props = response.property_table.properties.into_iter().next()?;
    let molecular_weight = props.molecular_weight.and_then(|w| match w {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    });
    Some(CompoundInfo {
        cid: props.cid,
        molecular_formula: props.molecular_formula,
        molecular_weight,
        iupac_name: props.iupac_name,
    })
}

/// Percent-encode the characters normalized names can contain.
fn encode_name(name: &str) -> String {
    name.replace('%', "%25")
        .replace(' ', "%20")
        .replace(',', "%2C")
        .replace('/', "%2F")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<CompoundInfo> {
        first_compound(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_parse_property_table() {
        let info = parse(
            r#"{"PropertyTable":{"Properties":[
                {"CID":7456,"MolecularFormula":"C8H8O3","MolecularWeight":"152.15","IUPACName":"methyl 4-hydroxybenzoate"},
                {"CID":1,"MolecularFormula":"X"}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(info.cid, 7456);
        assert_eq!(info.molecular_formula.as_deref(), Some("C8H8O3"));
        assert_eq!(info.molecular_weight.as_deref(), Some("152.15"));
        assert_eq!(info.iupac_name.as_deref(), Some("methyl 4-hydroxybenzoate"));
    }

    #[test]
    fn test_numeric_weight() {
        let info = parse(r#"{"PropertyTable":{"Properties":[{"CID":962,"MolecularWeight":18.015}]}}"#)
            .unwrap();
        assert_eq!(info.molecular_weight.as_deref(), Some("18.015"));
        assert!(info.molecular_formula.is_none());
    }

    #[test]
    fn test_empty_table() {
        assert!(parse(r#"{"PropertyTable":{"Properties":[]}}"#).is_none());
    }

    #[test]
    fn test_property_url_encodes_spaces() {
        let client = PubChemClient::from_config(&PubChemConfig {
            base_url: "https://example.test/rest/pug/".to_string(),
            ..PubChemConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.property_url("sodium benzoate"),
            "https://example.test/rest/pug/compound/name/sodium%20benzoate/property/MolecularFormula,MolecularWeight,IUPACName/JSON"
        );
    }
}
