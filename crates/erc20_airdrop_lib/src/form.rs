use crate::contracts::parse_address;
use crate::draft::{KeyValueStore, PersistedDraft};
use crate::err_custom_create;
use crate::error::AirdropError;
use crate::eth::{get_token_details, TokenDetails};
use crate::flow::{AirdropFlow, SubmissionReport};
use crate::input::calculate_total;
use crate::status::{StatusMachine, SubmissionOutcome};
use crate::utils::u256_to_decimal_string;
use serde::Serialize;
use web3::types::U256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    TokenAddress,
    Recipients,
    Amounts,
}

/// The "Transaction Details" card shown under the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    pub token_name: String,
    pub amount_wei: String,
    pub amount_tokens: String,
}

/// Controller behind the airdrop form: owns the field text, the draft store,
/// the submission status and the token metadata.
pub struct AirdropForm {
    draft: PersistedDraft,
    store: Box<dyn KeyValueStore>,
    flow: AirdropFlow,
    status: StatusMachine,
    token_details: TokenDetails,
    last_error: Option<String>,
}

impl AirdropForm {
    /// Restores the previously typed values from the store
    pub fn mount(flow: AirdropFlow, store: Box<dyn KeyValueStore>) -> Result<Self, AirdropError> {
        let draft = PersistedDraft::load(store.as_ref())?;
        log::debug!("Form mounted with draft {:?}", draft);
        Ok(Self {
            draft,
            store,
            flow,
            status: StatusMachine::new(),
            token_details: TokenDetails::default(),
            last_error: None,
        })
    }

    pub fn token_address(&self) -> &str {
        &self.draft.token_address
    }

    pub fn recipients(&self) -> &str {
        &self.draft.recipients_text
    }

    pub fn amounts(&self) -> &str {
        &self.draft.amounts_text
    }

    pub fn draft(&self) -> &PersistedDraft {
        &self.draft
    }

    pub fn status(&self) -> &StatusMachine {
        &self.status
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn token_details(&self) -> &TokenDetails {
        &self.token_details
    }

    /// Field edit, mirrored to the store right away
    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), AirdropError> {
        let target = match field {
            FormField::TokenAddress => &mut self.draft.token_address,
            FormField::Recipients => &mut self.draft.recipients_text,
            FormField::Amounts => &mut self.draft.amounts_text,
        };
        *target = value.to_string();
        if field == FormField::TokenAddress {
            self.token_details = TokenDetails::default();
        }
        self.draft.save(self.store.as_mut())
    }

    pub fn total(&self) -> U256 {
        calculate_total(&self.draft.amounts_text)
    }

    /// Reads name and decimals of the token currently typed in. Unparsable addresses
    /// leave the details empty.
    pub async fn refresh_token_details(&mut self) -> &TokenDetails {
        self.token_details = match parse_address(self.draft.token_address.trim()) {
            Ok(token) => get_token_details(self.flow.wallet().reader.as_ref(), token).await,
            Err(_) => TokenDetails::default(),
        };
        &self.token_details
    }

    pub fn transaction_details(&self) -> TransactionDetails {
        let total = self.total();
        let amount_tokens = match self.token_details.decimals {
            Some(decimals) if !total.is_zero() => {
                u256_to_decimal_string(total, decimals as u32)
            }
            _ => "0".to_string(),
        };
        TransactionDetails {
            token_name: self
                .token_details
                .name
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            amount_wei: total.to_string(),
            amount_tokens,
        }
    }

    pub fn button_label(&self) -> &'static str {
        if self.status.is_idle() && self.last_error.is_some() {
            "Error, see console."
        } else {
            self.status.button_label()
        }
    }

    /// Submit action. Input problems are reported before anything reaches the network.
    pub async fn submit(&mut self) -> Result<SubmissionReport, AirdropError> {
        if self.status.is_in_flight() {
            return Err(err_custom_create!(
                "Submission already in progress ({:?})",
                self.status.current()
            ));
        }
        self.status.reset()?;
        self.last_error = None;

        log::info!("Token Address: {}", self.draft.token_address);
        log::info!("Recipients: {}", self.draft.recipients_text);
        log::info!("Amounts: {}", self.draft.amounts_text);

        let result = match self.draft.to_request() {
            Ok(request) => self.flow.submit(request, &mut self.status).await,
            Err(err) => Err(err),
        };

        match &result {
            Ok(report) => {
                self.last_error = report.error.as_ref().map(|err| err.to_string());
                if report.outcome != SubmissionOutcome::TransferConfirmed {
                    log::warn!("Submission finished with {:?}", report.outcome);
                }
            }
            Err(err) => {
                log::error!("Submission rejected: {}", err);
                self.last_error = Some(err.to_string());
            }
        }
        result
    }
}
