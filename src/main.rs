mod options;

use crate::options::{AirdropCommands, AirdropOptions, FormOptions};
use erc20_airdrop_lib::config::{Config, NetworkDirectory};
use erc20_airdrop_lib::contracts::parse_address;
use erc20_airdrop_lib::draft::{JsonFileStore, PersistedDraft};
use erc20_airdrop_lib::error::AirdropError;
use erc20_airdrop_lib::eth::get_token_details;
use erc20_airdrop_lib::flow::AirdropFlow;
use erc20_airdrop_lib::form::AirdropForm;
use erc20_airdrop_lib::misc::{display_private_keys, load_private_keys};
use erc20_airdrop_lib::signer::PrivateKeySigner;
use erc20_airdrop_lib::status::AirdropEvent;
use erc20_airdrop_lib::wallet::{WalletHandle, Web3Wallet};
use erc20_airdrop_lib::{err_custom_create, err_from};
use std::env;
use std::sync::Arc;
use structopt::StructOpt;
use tokio::sync::mpsc;

async fn create_flow(config: &Config, chain_name: &str) -> Result<AirdropFlow, AirdropError> {
    let (private_keys, public_addrs) =
        load_private_keys(&env::var("ETH_PRIVATE_KEYS").unwrap_or_default())?;
    display_private_keys(&private_keys);
    if public_addrs.len() > 1 {
        log::warn!("More than one account loaded, using the first one");
    }

    let chain = config.get_chain(chain_name)?;
    log::info!(
        "Using chain {} (id {}, currency {})",
        chain.chain_name,
        chain.chain_id,
        chain.currency_symbol
    );
    let wallet = Web3Wallet::new(
        chain,
        &config.engine,
        public_addrs.first().copied(),
        Arc::new(PrivateKeySigner::new(private_keys)),
    )?;
    wallet.verify_chain_id().await?;

    Ok(AirdropFlow::new(
        WalletHandle::from_wallet(Arc::new(wallet)),
        NetworkDirectory::from_config(config),
    ))
}

fn apply_form_options(draft: &mut PersistedDraft, options: FormOptions) {
    if let Some(token) = options.token {
        draft.token_address = token;
    }
    if let Some(recipients) = options.recipients {
        draft.recipients_text = recipients;
    }
    if let Some(amounts) = options.amounts {
        draft.amounts_text = amounts;
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AirdropError> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).map_err(err_from!())?
    );
    Ok(())
}

async fn main_internal() -> Result<(), AirdropError> {
    dotenv::dotenv().ok();
    env::set_var(
        "RUST_LOG",
        env::var("RUST_LOG").unwrap_or("info,web3=warn".to_string()),
    );

    env_logger::init();
    let cli: AirdropOptions = AirdropOptions::from_args();

    let config = Config::load(&cli.config_file).await?;

    match cli.commands {
        AirdropCommands::Submit { submit_options } => {
            let mut store = JsonFileStore::open(&config.engine.draft_file)?;
            let mut draft = PersistedDraft::load(&store)?;
            apply_form_options(&mut draft, submit_options.form);
            draft.save(&mut store)?;
            log::info!("Draft saved to {}", store.path().display());

            //input problems are reported before connecting to the node
            let request = draft.to_request()?;
            log::info!(
                "Airdrop of {} to {} recipients",
                request.total,
                request.recipients.len()
            );

            let mut flow = create_flow(&config, &submit_options.chain_name).await?;

            let event_printer = if submit_options.print_events {
                let (sender, mut receiver) = mpsc::channel::<AirdropEvent>(10);
                flow = flow.with_event_sender(sender);
                Some(tokio::spawn(async move {
                    while let Some(event) = receiver.recv().await {
                        match serde_json::to_string(&event) {
                            Ok(line) => println!("{line}"),
                            Err(e) => log::error!("Cannot serialize event: {}", e),
                        }
                    }
                }))
            } else {
                None
            };

            let mut form = AirdropForm::mount(flow, Box::new(store))?;

            form.refresh_token_details().await;
            print_json(&form.transaction_details())?;

            let result = form.submit().await;
            log::info!("Status: {}", form.button_label());
            //drop the flow so the event sender is closed
            drop(form);
            if let Some(event_printer) = event_printer {
                event_printer
                    .await
                    .map_err(|e| err_custom_create!("Event printer failed: {}", e))?;
            }

            let report = result?;
            print_json(&serde_json::json!({
                "outcome": report.outcome,
                "total": report.request.total.to_string(),
                "allowance": report.allowance.approved.to_string(),
                "approvalTx": report.approval_tx,
                "transferTx": report.transfer_tx,
            }))?;
            if let (Some(tx_hash), Some(explorer)) = (
                report.transfer_tx,
                &config.get_chain(&submit_options.chain_name)?.block_explorer_url,
            ) {
                log::info!("Airdrop transaction: {}/tx/{:#x}", explorer, tx_hash);
            }
            if let Some(err) = report.error {
                return Err(err);
            }
        }
        AirdropCommands::TokenInfo { token_info_options } => {
            let token = match token_info_options.token {
                Some(token) => token,
                None => {
                    let store = JsonFileStore::open(&config.engine.draft_file)?;
                    PersistedDraft::load(&store)?.token_address
                }
            };
            let token = parse_address(token.trim())?;
            let flow = create_flow(&config, &token_info_options.chain_name).await?;
            let details = get_token_details(flow.wallet().reader.as_ref(), token).await;
            let allowance = flow.reconcile_allowance(token).await?;
            print_json(&serde_json::json!({
                "token": format!("{token:#x}"),
                "name": details.name,
                "decimals": details.decimals,
                "spender": format!("{:#x}", allowance.spender),
                "allowance": allowance.approved.to_string(),
            }))?;
        }
        AirdropCommands::ShowDraft => {
            let store = JsonFileStore::open(&config.engine.draft_file)?;
            print_json(&PersistedDraft::load(&store)?)?;
        }
        AirdropCommands::EditDraft { form_options } => {
            let mut store = JsonFileStore::open(&config.engine.draft_file)?;
            let mut draft = PersistedDraft::load(&store)?;
            apply_form_options(&mut draft, form_options);
            draft.save(&mut store)?;
            log::info!("Draft saved to {}", store.path().display());
            print_json(&draft)?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AirdropError> {
    match main_internal().await {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("Error: {e}");
            Err(e)
        }
    }
}
