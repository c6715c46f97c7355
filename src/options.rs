use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(about = "Form field values, missing ones are taken from the saved draft")]
pub struct FormOptions {
    #[structopt(short = "t", long = "token", help = "ERC20 token address")]
    pub token: Option<String>,

    #[structopt(
        short = "r",
        long = "recipients",
        help = "Recipient addresses separated by commas or whitespace"
    )]
    pub recipients: Option<String>,

    #[structopt(
        short = "a",
        long = "amounts",
        help = "Amounts in smallest token units (wei), decimal or 0x hex, in recipient order"
    )]
    pub amounts: Option<String>,
}

#[derive(StructOpt)]
#[structopt(about = "Airdrop submission options")]
pub struct SubmitOptions {
    #[structopt(short = "c", long = "chain-name", default_value = "anvil")]
    pub chain_name: String,

    #[structopt(flatten)]
    pub form: FormOptions,

    #[structopt(
        long = "print-events",
        help = "Print every submission event as json line"
    )]
    pub print_events: bool,
}

#[derive(StructOpt)]
#[structopt(about = "Token and allowance lookup options")]
pub struct TokenInfoOptions {
    #[structopt(short = "c", long = "chain-name", default_value = "anvil")]
    pub chain_name: String,

    #[structopt(
        short = "t",
        long = "token",
        help = "ERC20 token address, saved draft value when missing"
    )]
    pub token: Option<String>,
}

#[derive(StructOpt)]
#[structopt(about = "Airdrop tool")]
pub enum AirdropCommands {
    #[structopt(about = "Approve (when needed) and send tokens to all recipients")]
    Submit {
        #[structopt(flatten)]
        submit_options: SubmitOptions,
    },
    #[structopt(about = "Show token name, decimals and current allowance")]
    TokenInfo {
        #[structopt(flatten)]
        token_info_options: TokenInfoOptions,
    },
    #[structopt(about = "Show the saved form draft")]
    ShowDraft,
    #[structopt(about = "Change fields of the saved form draft")]
    EditDraft {
        #[structopt(flatten)]
        form_options: FormOptions,
    },
}

#[derive(StructOpt)]
#[structopt(about = "Airdrop tool")]
pub struct AirdropOptions {
    #[structopt(
        long = "config-file",
        help = "Chain and engine configuration",
        default_value = "config-airdrop.toml"
    )]
    pub config_file: String,

    #[structopt(subcommand)]
    pub commands: AirdropCommands,
}
