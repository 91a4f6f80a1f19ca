use portfolio_email_contracts::DeliveryReceipt;
use serde::Serialize;

pub mod contact;

/// Delivery outcome as exposed on the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEmailResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub simulated: bool,
}

impl From<DeliveryReceipt> for ApiEmailResult {
    fn from(receipt: DeliveryReceipt) -> Self {
        Self {
            success: true,
            message_id: receipt.message_id,
            simulated: receipt.simulated,
        }
    }
}
