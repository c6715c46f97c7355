use crate::allowance::AllowanceState;
use crate::err_custom_create;
use crate::error::AirdropError;
use crate::wallet::TxReceipt;
use chrono::{DateTime, Utc};
use serde::Serialize;
use web3::types::H256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmissionOutcome {
    ApprovalPending,
    ApprovalConfirmed,
    ApprovalFailed,
    TransferPending,
    TransferConfirmed,
    TransferFailed,
}

impl SubmissionOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionOutcome::ApprovalFailed
                | SubmissionOutcome::TransferConfirmed
                | SubmissionOutcome::TransferFailed
        )
    }

    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            SubmissionOutcome::ApprovalPending | SubmissionOutcome::TransferPending
        )
    }

    /// `None` stands for Idle
    fn can_follow(&self, previous: Option<SubmissionOutcome>) -> bool {
        use SubmissionOutcome::*;
        match previous {
            None => matches!(self, ApprovalPending | TransferPending),
            Some(ApprovalPending) => matches!(self, ApprovalConfirmed | ApprovalFailed),
            Some(ApprovalConfirmed) => matches!(self, TransferPending),
            Some(TransferPending) => matches!(self, TransferConfirmed | TransferFailed),
            Some(ApprovalFailed) | Some(TransferConfirmed) | Some(TransferFailed) => false,
        }
    }
}

/// Which side of a pending transaction the flow is waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PendingPhase {
    InWallet,
    Confirming,
}

/// UI observable submission state.
///
/// Idle -> ApprovalPending -> {ApprovalConfirmed -> TransferPending, ApprovalFailed -> Idle}
/// TransferPending -> {TransferConfirmed, TransferFailed} -> Idle
/// Idle -> TransferPending is valid when the allowance is already sufficient.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusMachine {
    current: Option<SubmissionOutcome>,
    phase: Option<PendingPhase>,
    history: Vec<SubmissionOutcome>,
}

impl StatusMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<SubmissionOutcome> {
        self.current
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    /// Submission is running, the submit control must stay disabled
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self.current,
            Some(outcome) if !outcome.is_terminal()
        )
    }

    /// Every state entered since the last reset, in order
    pub fn history(&self) -> &[SubmissionOutcome] {
        &self.history
    }

    pub fn advance(&mut self, next: SubmissionOutcome) -> Result<(), AirdropError> {
        if !next.can_follow(self.current) {
            return Err(err_custom_create!(
                "Invalid submission state transition {:?} -> {:?}",
                self.current,
                next
            ));
        }
        log::debug!("Submission state {:?} -> {:?}", self.current, next);
        self.current = Some(next);
        self.phase = if next.is_pending() {
            Some(PendingPhase::InWallet)
        } else {
            None
        };
        self.history.push(next);
        Ok(())
    }

    /// Transaction left the wallet, now waiting for inclusion
    pub fn mark_submitted(&mut self) {
        if self.phase.is_some() {
            self.phase = Some(PendingPhase::Confirming);
        }
    }

    /// Back to Idle. Allowed only when no submission is running.
    pub fn reset(&mut self) -> Result<(), AirdropError> {
        if self.is_in_flight() {
            return Err(err_custom_create!(
                "Cannot reset while submission is in flight ({:?})",
                self.current
            ));
        }
        self.current = None;
        self.phase = None;
        self.history.clear();
        Ok(())
    }

    pub fn button_label(&self) -> &'static str {
        match (self.current, self.phase) {
            (_, Some(PendingPhase::InWallet)) => "Confirming in wallet...",
            (_, Some(PendingPhase::Confirming)) => "Waiting for transaction to be included...",
            (Some(SubmissionOutcome::ApprovalFailed), _)
            | (Some(SubmissionOutcome::TransferFailed), _) => "Error, see console.",
            (Some(SubmissionOutcome::TransferConfirmed), _) => "Transaction confirmed.",
            _ => "Send Tokens",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TxKind {
    Approval,
    Transfer,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AirdropEventContent {
    AllowanceChecked(AllowanceState),
    StatusChanged(SubmissionOutcome),
    TransactionSent { kind: TxKind, tx_hash: H256 },
    ReceiptReceived { kind: TxKind, receipt: TxReceipt },
    Error(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct AirdropEvent {
    pub create_date: DateTime<Utc>,
    pub content: AirdropEventContent,
}

pub async fn send_airdrop_event(
    event_sender: &Option<tokio::sync::mpsc::Sender<AirdropEvent>>,
    event: AirdropEventContent,
) {
    if let Some(event_sender) = event_sender {
        let event = AirdropEvent {
            create_date: Utc::now(),
            content: event,
        };
        if let Err(e) = event_sender.send(event).await {
            log::error!("Error sending event: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SubmissionOutcome::*;
    use super::*;

    #[test]
    fn test_path_with_approval() {
        let mut sm = StatusMachine::new();
        assert_eq!(sm.button_label(), "Send Tokens");
        sm.advance(ApprovalPending).unwrap();
        assert_eq!(sm.button_label(), "Confirming in wallet...");
        sm.mark_submitted();
        assert_eq!(
            sm.button_label(),
            "Waiting for transaction to be included..."
        );
        sm.advance(ApprovalConfirmed).unwrap();
        assert!(sm.is_in_flight());
        sm.advance(TransferPending).unwrap();
        sm.advance(TransferConfirmed).unwrap();
        assert!(!sm.is_in_flight());
        assert_eq!(sm.button_label(), "Transaction confirmed.");
        assert_eq!(
            sm.history(),
            &[
                ApprovalPending,
                ApprovalConfirmed,
                TransferPending,
                TransferConfirmed
            ]
        );
        sm.reset().unwrap();
        assert!(sm.is_idle());
    }

    #[test]
    fn test_skip_approval() {
        let mut sm = StatusMachine::new();
        sm.advance(TransferPending).unwrap();
        sm.advance(TransferFailed).unwrap();
        assert_eq!(sm.button_label(), "Error, see console.");
    }

    #[test]
    fn test_invalid_transitions() {
        let mut sm = StatusMachine::new();
        assert!(sm.advance(ApprovalConfirmed).is_err());
        assert!(sm.advance(TransferConfirmed).is_err());

        sm.advance(ApprovalPending).unwrap();
        assert!(sm.advance(TransferPending).is_err());
        assert!(sm.reset().is_err());
        sm.advance(ApprovalFailed).unwrap();
        //failed approval never leads to transfer
        assert!(sm.advance(TransferPending).is_err());
        sm.reset().unwrap();
        sm.advance(TransferPending).unwrap();
    }
}
