use std::fmt;

use codee::{Decoder, string::JsonSerdeCodec};
use serde::{Deserialize, Serialize};

use crate::LoadError;

/// The kind of business relationship a partner has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartnerType {
    /// A content creator promoting to their audience.
    Influencer,
    /// A referral partner paid per conversion.
    Affiliate,
}

impl fmt::Display for PartnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartnerType::Influencer => write!(f, "Influencer"),
            PartnerType::Affiliate => write!(f, "Affiliate"),
        }
    }
}

/// One business partner and its performance metrics, as returned by the partner endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerRecord {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub partner_name: String,
    /// Influencer or affiliate.
    pub partner_type: PartnerType,
    /// Number of attributed conversions.
    pub conversions: u64,
    /// Commission amount paid out.
    pub commissions: f64,
    /// Gross sales attributed to the partner.
    #[serde(rename = "grosssales")]
    pub gross_sales: f64,
    /// Contract reference.
    pub contract: String,
}

/// Decode a partner endpoint body, a JSON array of partner objects.
pub fn decode_partners(body: &str) -> Result<Vec<PartnerRecord>, LoadError> {
    <JsonSerdeCodec as Decoder<Vec<PartnerRecord>>>::decode(body)
        .map_err(|err| LoadError::Malformed(err.to_string()))
}
