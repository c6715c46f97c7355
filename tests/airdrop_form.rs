use erc20_airdrop_lib::draft::{JsonFileStore, PersistedDraft};
use erc20_airdrop_lib::form::{AirdropForm, FormField};
use erc20_airdrop_lib::status::SubmissionOutcome;
use erc20_airdrop_test::{
    create_test_flow, init_test_logger, MockWallet, SharedStore, RECIPIENT_A, RECIPIENT_B,
    TEST_TOKEN,
};
use std::sync::Arc;
use web3::types::U256;

fn fill_form(form: &mut AirdropForm, recipients: &str, amounts: &str) -> anyhow::Result<()> {
    form.set_field(FormField::TokenAddress, TEST_TOKEN)?;
    form.set_field(FormField::Recipients, recipients)?;
    form.set_field(FormField::Amounts, amounts)?;
    Ok(())
}

#[tokio::test]
async fn test_draft_survives_remount() -> anyhow::Result<()> {
    let store = SharedStore::new();
    let wallet = Arc::new(MockWallet::new());

    let mut form = AirdropForm::mount(create_test_flow(wallet.clone()), Box::new(store.clone()))?;
    assert_eq!(form.token_address(), "");
    assert_eq!(form.button_label(), "Send Tokens");
    fill_form(&mut form, &format!("{RECIPIENT_A}\n{RECIPIENT_B}"), "10, 20")?;
    drop(form);

    let form = AirdropForm::mount(create_test_flow(wallet.clone()), Box::new(store))?;
    assert_eq!(form.token_address(), TEST_TOKEN);
    assert_eq!(form.recipients(), format!("{RECIPIENT_A}\n{RECIPIENT_B}"));
    assert_eq!(form.amounts(), "10, 20");
    assert_eq!(form.total(), U256::from(30));
    //restoring the draft never talks to the wallet
    assert!(wallet.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_draft_file_survives_remount() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("airdrop-draft.json");
    let wallet = Arc::new(MockWallet::new());

    let mut form = AirdropForm::mount(
        create_test_flow(wallet.clone()),
        Box::new(JsonFileStore::open(&path)?),
    )?;
    //invalid values are stored as typed
    fill_form(&mut form, "not an address", "ten")?;
    drop(form);

    let draft = PersistedDraft::load(&JsonFileStore::open(&path)?)?;
    assert_eq!(draft.token_address, TEST_TOKEN);
    assert_eq!(draft.recipients_text, "not an address");
    assert_eq!(draft.amounts_text, "ten");
    Ok(())
}

#[tokio::test]
async fn test_mismatch_reported_before_network() -> anyhow::Result<()> {
    init_test_logger();
    let wallet = Arc::new(MockWallet::new());
    let mut form = AirdropForm::mount(
        create_test_flow(wallet.clone()),
        Box::new(SharedStore::new()),
    )?;
    fill_form(&mut form, &format!("{RECIPIENT_A}, {RECIPIENT_B}"), "10")?;

    let err = form.submit().await.unwrap_err();
    assert!(err.is_input_mismatch());
    assert!(wallet.calls().is_empty());
    assert!(form.status().is_idle());
    assert!(form.last_error().is_some());
    assert_eq!(form.button_label(), "Error, see console.");
    Ok(())
}

#[tokio::test]
async fn test_malformed_recipient_reported_before_network() -> anyhow::Result<()> {
    let wallet = Arc::new(MockWallet::new());
    let mut form = AirdropForm::mount(
        create_test_flow(wallet.clone()),
        Box::new(SharedStore::new()),
    )?;
    fill_form(&mut form, &format!("{RECIPIENT_A}, 0x1234"), "10, 20")?;

    let err = form.submit().await.unwrap_err();
    assert!(!err.is_input_mismatch());
    assert!(err.to_string().contains("0x1234"));
    assert!(wallet.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_submit_and_resubmit() -> anyhow::Result<()> {
    init_test_logger();
    let wallet = Arc::new(MockWallet::new());
    let mut form = AirdropForm::mount(
        create_test_flow(wallet.clone()),
        Box::new(SharedStore::new()),
    )?;
    fill_form(&mut form, &format!("{RECIPIENT_A}, {RECIPIENT_B}"), "10, 20")?;

    let report = form.submit().await?;
    assert!(report.is_confirmed());
    assert_eq!(form.button_label(), "Transaction confirmed.");
    assert!(form.last_error().is_none());
    assert_eq!(wallet.write_functions(), vec!["approve", "airdropERC20"]);

    //first transfer spent the allowance, so approval is requested again
    let report = form.submit().await?;
    assert!(report.is_confirmed());
    assert!(report.approval_requested());
    assert_eq!(
        wallet.write_functions(),
        vec!["approve", "airdropERC20", "approve", "airdropERC20"]
    );
    Ok(())
}

#[tokio::test]
async fn test_failed_submission_shows_error_label() -> anyhow::Result<()> {
    let wallet = Arc::new(MockWallet::new().reject_write("approve"));
    let mut form = AirdropForm::mount(
        create_test_flow(wallet.clone()),
        Box::new(SharedStore::new()),
    )?;
    fill_form(&mut form, &format!("{RECIPIENT_A}, {RECIPIENT_B}"), "10, 20")?;

    let report = form.submit().await?;
    assert_eq!(report.outcome, SubmissionOutcome::ApprovalFailed);
    assert_eq!(form.button_label(), "Error, see console.");
    assert!(form
        .last_error()
        .is_some_and(|err| err.contains("User rejected the request")));
    Ok(())
}

#[tokio::test]
async fn test_transaction_details() -> anyhow::Result<()> {
    let wallet = Arc::new(MockWallet::new().with_token(Some("Mock Token"), Some(18)));
    let mut form = AirdropForm::mount(
        create_test_flow(wallet.clone()),
        Box::new(SharedStore::new()),
    )?;
    fill_form(
        &mut form,
        &format!("{RECIPIENT_A} {RECIPIENT_B}"),
        "1000000000000000000, 500000000000000000",
    )?;

    let details = form.transaction_details();
    assert_eq!(details.token_name, "N/A");
    assert_eq!(details.amount_wei, "1500000000000000000");
    assert_eq!(details.amount_tokens, "0");

    form.refresh_token_details().await;
    let details = form.transaction_details();
    assert_eq!(details.token_name, "Mock Token");
    assert_eq!(details.amount_tokens, "1.5");

    //new token address drops the metadata of the previous one
    form.set_field(FormField::TokenAddress, RECIPIENT_A)?;
    assert_eq!(form.transaction_details().token_name, "N/A");
    Ok(())
}

#[tokio::test]
async fn test_transaction_details_without_metadata() -> anyhow::Result<()> {
    let wallet = Arc::new(MockWallet::new().with_token(None, None));
    let mut form = AirdropForm::mount(
        create_test_flow(wallet.clone()),
        Box::new(SharedStore::new()),
    )?;
    fill_form(&mut form, RECIPIENT_A, "abc")?;

    form.refresh_token_details().await;
    let details = form.transaction_details();
    assert_eq!(details.token_name, "N/A");
    //unparsable amounts count as zero while typing
    assert_eq!(details.amount_wei, "0");
    assert_eq!(details.amount_tokens, "0");
    Ok(())
}
