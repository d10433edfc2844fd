//! IP observation extraction from probe response bodies

use crate::models::IpObservation;
use crate::types::IpFamily;
use serde::Deserialize;

/// Wire shape before usability checks; every field optional and nullable
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawObservation {
    ip: Option<String>,
    #[serde(rename = "type")]
    family: Option<String>,
    subtype: Option<String>,
    via: Option<String>,
    asn: Option<u32>,
    asn_name: Option<String>,
}

impl RawObservation {
    /// Usable when either the address or the family is present
    fn into_observation(self) -> Option<IpObservation> {
        let ip = self.ip.unwrap_or_default();
        let family = self.family.unwrap_or_default();
        if ip.is_empty() && family.is_empty() {
            return None;
        }

        Some(IpObservation {
            ip,
            family: IpFamily::from(family.as_str()),
            subtype: self.subtype.and_then(non_empty),
            via: self.via.and_then(non_empty),
            asn: self.asn.filter(|asn| *asn != 0),
            asn_name: self.asn_name.and_then(non_empty),
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn decode(bytes: &[u8]) -> Option<IpObservation> {
    serde_json::from_slice::<RawObservation>(bytes)
        .ok()
        .and_then(RawObservation::into_observation)
}

/// Extract an observation from a JSON or JSONP (`callback({...});`) body.
///
/// The whole body is tried first, then the span from the first `{` to the
/// last `}`. Anything unparseable yields `None`.
pub fn parse_ip_observation(body: &[u8]) -> Option<IpObservation> {
    if let Some(observation) = decode(body) {
        return Some(observation);
    }

    let open = body.iter().position(|&b| b == b'{')?;
    let close = body.iter().rposition(|&b| b == b'}')?;
    if close <= open {
        return None;
    }
    decode(&body[open..=close])
}
