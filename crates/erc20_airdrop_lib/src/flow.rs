use crate::allowance::{read_allowance, AllowanceState};
use crate::config::NetworkDirectory;
use crate::contracts::ContractCall;
use crate::error::*;
use crate::input::AirdropRequest;
use crate::status::{
    send_airdrop_event, AirdropEvent, AirdropEventContent, StatusMachine, SubmissionOutcome,
    TxKind,
};
use crate::wallet::{TxReceipt, WalletHandle};
use crate::{err_create, err_custom_create};
use tokio::sync::mpsc::Sender;
use web3::types::{Address, H256};

/// Everything one submission produced. Failures after the first wallet prompt end up in
/// `error` together with whatever already happened on chain. A confirmed approval stays in
/// place when the transfer fails, the user retries by submitting again.
#[derive(Debug)]
pub struct SubmissionReport {
    pub request: AirdropRequest,
    pub allowance: AllowanceState,
    pub approval_tx: Option<H256>,
    pub approval_receipt: Option<TxReceipt>,
    pub transfer_tx: Option<H256>,
    pub transfer_receipt: Option<TxReceipt>,
    pub outcome: SubmissionOutcome,
    pub error: Option<AirdropError>,
}

impl SubmissionReport {
    pub fn approval_requested(&self) -> bool {
        self.approval_tx.is_some()
    }

    pub fn is_confirmed(&self) -> bool {
        self.outcome == SubmissionOutcome::TransferConfirmed
    }
}

/// Allowance reconciliation, optional approval and batch transfer, run strictly in sequence
pub struct AirdropFlow {
    wallet: WalletHandle,
    directory: NetworkDirectory,
    event_sender: Option<Sender<AirdropEvent>>,
}

impl AirdropFlow {
    pub fn new(wallet: WalletHandle, directory: NetworkDirectory) -> Self {
        Self {
            wallet,
            directory,
            event_sender: None,
        }
    }

    pub fn with_event_sender(mut self, event_sender: Sender<AirdropEvent>) -> Self {
        self.event_sender = Some(event_sender);
        self
    }

    pub fn wallet(&self) -> &WalletHandle {
        &self.wallet
    }

    /// Spender for the current network, fails when no batch transfer contract is known
    pub fn spender(&self) -> Result<Address, AirdropError> {
        self.directory.tsender_for(self.wallet.session.chain_id())
    }

    /// Reads the allowance the batch transfer contract currently has over the owner's tokens.
    /// Nothing is sent to the wallet here.
    pub async fn reconcile_allowance(
        &self,
        token: Address,
    ) -> Result<AllowanceState, AirdropError> {
        let spender = self.spender()?;
        let owner = self
            .wallet
            .session
            .account()
            .ok_or(err_create!(ErrorBag::WalletNotConnected))?;
        let allowance = read_allowance(self.wallet.reader.as_ref(), token, owner, spender).await?;
        log::info!(
            "Allowance of {:#x} for spender {:#x} on token {:#x}: {}",
            owner,
            spender,
            token,
            allowance.approved
        );
        send_airdrop_event(
            &self.event_sender,
            AirdropEventContent::AllowanceChecked(allowance.clone()),
        )
        .await;
        Ok(allowance)
    }

    async fn enter(
        &self,
        status: &mut StatusMachine,
        outcome: SubmissionOutcome,
    ) -> Result<(), AirdropError> {
        status.advance(outcome)?;
        send_airdrop_event(
            &self.event_sender,
            AirdropEventContent::StatusChanged(outcome),
        )
        .await;
        Ok(())
    }

    async fn report_error(&self, err: &AirdropError) {
        log::error!("{}", err);
        send_airdrop_event(&self.event_sender, AirdropEventContent::Error(err.to_string())).await;
    }

    /// Runs one submission.
    ///
    /// Returns `Err` only for problems found before any transaction is requested
    /// (unsupported network, no account, allowance read failure, busy status).
    /// Everything after that is described by the returned report.
    pub async fn submit(
        &self,
        request: AirdropRequest,
        status: &mut StatusMachine,
    ) -> Result<SubmissionReport, AirdropError> {
        if !status.is_idle() {
            return Err(err_custom_create!(
                "Previous submission not finished: {:?}",
                status.current()
            ));
        }
        log::info!(
            "Submitting airdrop of token {:#x} to {} recipients, total {}",
            request.token_address,
            request.recipients.len(),
            request.total
        );

        let allowance = self.reconcile_allowance(request.token_address).await?;

        let mut report = SubmissionReport {
            request,
            allowance,
            approval_tx: None,
            approval_receipt: None,
            transfer_tx: None,
            transfer_receipt: None,
            outcome: SubmissionOutcome::TransferPending,
            error: None,
        };

        if report.allowance.needs_approval(report.request.total) {
            self.enter(status, SubmissionOutcome::ApprovalPending).await?;
            match self.approve(&mut report, status).await {
                Ok(()) => {
                    log::info!("Approval successful, proceeding to airdrop.");
                    self.enter(status, SubmissionOutcome::ApprovalConfirmed)
                        .await?;
                }
                Err(err) => {
                    self.report_error(&err).await;
                    self.enter(status, SubmissionOutcome::ApprovalFailed).await?;
                    report.outcome = SubmissionOutcome::ApprovalFailed;
                    report.error = Some(err);
                    return Ok(report);
                }
            }
        } else {
            log::info!("Sufficient allowance, proceeding directly to airdrop.");
        }

        self.enter(status, SubmissionOutcome::TransferPending).await?;
        let outcome = match self.transfer(&mut report, status).await {
            Ok(()) => {
                log::info!("Airdrop confirmed");
                SubmissionOutcome::TransferConfirmed
            }
            Err(err) => {
                if let Some(tx_hash) = report.transfer_tx {
                    log::warn!(
                        "Airdrop transaction {:#x} was already sent, it is not rolled back",
                        tx_hash
                    );
                }
                self.report_error(&err).await;
                report.error = Some(err);
                SubmissionOutcome::TransferFailed
            }
        };
        self.enter(status, outcome).await?;
        report.outcome = outcome;
        Ok(report)
    }

    async fn approve(
        &self,
        report: &mut SubmissionReport,
        status: &mut StatusMachine,
    ) -> Result<(), AirdropError> {
        let token = report.request.token_address;
        let spender = report.allowance.spender;
        let total = report.request.total;
        log::info!(
            "Allowance {} lower than total {}, requesting approval",
            report.allowance.approved,
            total
        );

        let tx_hash = self
            .wallet
            .writer
            .write(token, ContractCall::erc20_approve(spender, total))
            .await?;
        report.approval_tx = Some(tx_hash);
        status.mark_submitted();
        send_airdrop_event(
            &self.event_sender,
            AirdropEventContent::TransactionSent {
                kind: TxKind::Approval,
                tx_hash,
            },
        )
        .await;

        let receipt = self.wait_for_receipt(TxKind::Approval, tx_hash).await?;
        report.approval_receipt = Some(receipt.clone());
        if !receipt.is_success() {
            return Err(err_create!(TransactionFailedError::new(&format!(
                "Approval transaction {tx_hash:#x} failed"
            ))));
        }
        Ok(())
    }

    async fn transfer(
        &self,
        report: &mut SubmissionReport,
        status: &mut StatusMachine,
    ) -> Result<(), AirdropError> {
        let spender = report.allowance.spender;
        let request = &report.request;
        log::info!("Executing airdropERC20...");

        let tx_hash = self
            .wallet
            .writer
            .write(
                spender,
                ContractCall::airdrop_erc20(
                    request.token_address,
                    request.recipients.clone(),
                    request.amounts.clone(),
                    request.total,
                ),
            )
            .await?;
        log::info!("Airdrop transaction hash: {:#x}", tx_hash);
        report.transfer_tx = Some(tx_hash);
        status.mark_submitted();
        send_airdrop_event(
            &self.event_sender,
            AirdropEventContent::TransactionSent {
                kind: TxKind::Transfer,
                tx_hash,
            },
        )
        .await;

        log::info!("Waiting for airdrop confirmation...");
        let receipt = self.wait_for_receipt(TxKind::Transfer, tx_hash).await?;
        report.transfer_receipt = Some(receipt.clone());
        if !receipt.is_success() {
            return Err(err_create!(TransactionFailedError::new(&format!(
                "Airdrop transaction {tx_hash:#x} failed"
            ))));
        }
        Ok(())
    }

    async fn wait_for_receipt(
        &self,
        kind: TxKind,
        tx_hash: H256,
    ) -> Result<TxReceipt, AirdropError> {
        let receipt = self.wallet.waiter.wait(tx_hash).await?;
        log::debug!("{:?} receipt: {:?}", kind, receipt);
        send_airdrop_event(
            &self.event_sender,
            AirdropEventContent::ReceiptReceived {
                kind,
                receipt: receipt.clone(),
            },
        )
        .await;
        Ok(receipt)
    }
}
