use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Why money moved on the account
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionReason {
    PaymentsServiceFee,
    Refund,
    Adjustment,
}

impl TransactionReason {
    pub const ALL: [Self; 3] = [Self::PaymentsServiceFee, Self::Refund, Self::Adjustment];
}

/// Mexican identity document kinds
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    MxRfc,
    MxCurp,
}

impl DocumentType {
    pub const ALL: [Self; 2] = [Self::MxRfc, Self::MxCurp];
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalMethod {
    BankTransfer,
    CardRefund,
    CashPickup,
}

impl WithdrawalMethod {
    pub const ALL: [Self; 3] = [Self::BankTransfer, Self::CardRefund, Self::CashPickup];
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WithdrawalExtra {
    pub reference_id: String,
    pub withdrawal_method: WithdrawalMethod,
}

/// Full synthetic account movement, shaped like the upstream API response
///
/// Timestamps always satisfy
/// `withdrawal_created_date < created_date < last_updated_date`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: Uuid,
    pub created_date: DateTime<Utc>,
    pub last_updated_date: DateTime<Utc>,
    pub chargeback_date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub tx_type: super::TransactionType,
    pub reason: TransactionReason,
    pub amount: Decimal,
    pub currency: String,
    pub payment_request: Uuid,
    pub payment_request_reference: String,
    pub payment_request_display_reference: String,
    pub customer_name: String,
    pub customer_document_type: DocumentType,
    pub customer_document_number: String,
    pub payment_method_type: String,
    pub account_number: String,
    pub withdrawal_id: Uuid,
    pub withdrawal_created_date: DateTime<Utc>,
    pub withdrawal_extra: WithdrawalExtra,
}
