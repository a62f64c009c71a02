//! Play DTOs.

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use super::report_dto::{SessionDto, TransactionDto};
use crate::service::PlayReceipt;

/// Response body for `POST /players/{id}/play`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayResponse {
    /// The recorded game session.
    pub session: SessionDto,
    /// The stake debit.
    pub bet_transaction: TransactionDto,
    /// The payout credit, absent on a loss.
    pub win_transaction: Option<TransactionDto>,
    /// Balance after the play.
    #[schema(value_type = String, example = "1007.50")]
    pub balance: Decimal,
}

impl From<PlayReceipt> for PlayResponse {
    fn from(receipt: PlayReceipt) -> Self {
        Self {
            session: receipt.session.into(),
            bet_transaction: receipt.bet_transaction.into(),
            win_transaction: receipt.win_transaction.map(Into::into),
            balance: receipt.balance,
        }
    }
}
