use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "multisig-cli")]
#[command(about = "Command-line client for the multisig wallet dashboard", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Server version, chain and connection state
    Status,
    /// Show the connected accounts
    Session,
    /// Connect the signer, or a watch-only account
    Connect {
        #[arg(long)]
        account: Option<String>,
    },
    /// Disconnect the active account
    Disconnect,
    /// List wallets of the active account
    Wallets {
        #[arg(long)]
        page: Option<u64>,
    },
    /// Deploy a new wallet
    CreateWallet {
        #[arg(long)]
        name: String,
        /// Signer addresses
        #[arg(long, required = true, num_args = 1..)]
        signers: Vec<String>,
        #[arg(long)]
        minimum_approvals: u64,
        #[arg(long)]
        password: String,
        /// Generated by the server when omitted
        #[arg(long)]
        salt: Option<String>,
    },
    /// Show one wallet
    Wallet { wallet: String },
    /// Balance of a wallet in Ether or a token
    Balance {
        wallet: String,
        #[arg(long)]
        token: Option<String>,
    },
    /// Deposit Ether or a token
    Deposit {
        wallet: String,
        amount: String,
        /// wei, gwei, ether, or a decimal count
        #[arg(long, default_value = "ether")]
        unit: String,
        #[arg(long)]
        token: Option<String>,
    },
    /// Lock a USD amount of the wallet balance
    Lock { wallet: String, usd_amount: String },
    /// Unlock a USD amount with the wallet password
    Unlock {
        wallet: String,
        usd_amount: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        salt: String,
    },
    /// List the tokens of a wallet, or show one
    Tokens {
        wallet: String,
        #[arg(long)]
        token: Option<String>,
        #[arg(long)]
        page: Option<u64>,
    },
    /// Register a token with a wallet
    AddToken { wallet: String, token: String },
    /// Remove a token from a wallet
    RemoveToken { wallet: String, token: String },
    /// List the transactions of a wallet, or show one
    Transactions {
        wallet: String,
        #[arg(long)]
        hash: Option<String>,
        #[arg(long)]
        page: Option<u64>,
    },
    /// Propose a transfer out of a wallet
    Transfer {
        wallet: String,
        to: String,
        amount: String,
        #[arg(long, default_value = "ether")]
        unit: String,
        #[arg(long)]
        token: Option<String>,
    },
    /// Approve, revoke, cancel or execute a wallet transaction
    Act {
        wallet: String,
        hash: String,
        #[arg(value_parser = ["approve", "revoke", "cancel", "execute"])]
        action: String,
    },
    /// Recent activity of a wallet
    Events {
        wallet: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Name, symbol and decimals of tokens
    Metadata {
        #[arg(required = true, num_args = 1..)]
        addresses: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let api = format!("{}/api", cli.url.trim_end_matches('/'));

    let request = match cli.command {
        Commands::Status => client.get(format!("{api}/status")),
        Commands::Session => client.get(format!("{api}/session")),
        Commands::Connect { account } => client
            .post(format!("{api}/session/connect"))
            .json(&json!({ "account": account })),
        Commands::Disconnect => client.post(format!("{api}/session/disconnect")),
        Commands::Wallets { page } => with_page(client.get(format!("{api}/wallets")), page),
        Commands::CreateWallet {
            name,
            signers,
            minimum_approvals,
            password,
            salt,
        } => client.post(format!("{api}/wallets")).json(&json!({
            "name": name,
            "signers": signers,
            "minimum_approvals": minimum_approvals,
            "password": password,
            "salt": salt,
        })),
        Commands::Wallet { wallet } => client.get(format!("{api}/wallets/{wallet}")),
        Commands::Balance { wallet, token } => {
            let request = client.get(format!("{api}/wallets/{wallet}/balance"));
            match token {
                Some(token) => request.query(&[("token", token)]),
                None => request,
            }
        }
        Commands::Deposit {
            wallet,
            amount,
            unit,
            token,
        } => client
            .post(format!("{api}/wallets/{wallet}/deposit"))
            .json(&json!({ "token": token, "amount": amount, "unit": unit })),
        Commands::Lock { wallet, usd_amount } => client
            .post(format!("{api}/wallets/{wallet}/lock"))
            .json(&json!({ "usd_amount": usd_amount })),
        Commands::Unlock {
            wallet,
            usd_amount,
            password,
            salt,
        } => client
            .post(format!("{api}/wallets/{wallet}/unlock"))
            .json(&json!({ "usd_amount": usd_amount, "password": password, "salt": salt })),
        Commands::Tokens { wallet, token, page } => match token {
            Some(token) => client.get(format!("{api}/wallets/{wallet}/tokens/{token}")),
            None => with_page(client.get(format!("{api}/wallets/{wallet}/tokens")), page),
        },
        Commands::AddToken { wallet, token } => client
            .post(format!("{api}/wallets/{wallet}/tokens"))
            .json(&json!({ "token": token })),
        Commands::RemoveToken { wallet, token } => {
            client.delete(format!("{api}/wallets/{wallet}/tokens/{token}"))
        }
        Commands::Transactions { wallet, hash, page } => match hash {
            Some(hash) => client.get(format!("{api}/wallets/{wallet}/transactions/{hash}")),
            None => with_page(client.get(format!("{api}/wallets/{wallet}/transactions")), page),
        },
        Commands::Transfer {
            wallet,
            to,
            amount,
            unit,
            token,
        } => client
            .post(format!("{api}/wallets/{wallet}/transactions"))
            .json(&json!({ "token": token, "to": to, "amount": amount, "unit": unit })),
        Commands::Act {
            wallet,
            hash,
            action,
        } => client.post(format!("{api}/wallets/{wallet}/transactions/{hash}/{action}")),
        Commands::Events { wallet, limit } => {
            let request = client.get(format!("{api}/wallets/{wallet}/events"));
            match limit {
                Some(limit) => request.query(&[("limit", limit)]),
                None => request,
            }
        }
        Commands::Metadata { addresses } => client
            .get(format!("{api}/tokens/metadata"))
            .query(&[("addresses", addresses.join(","))]),
    };

    let res = request.send().await?;
    print_response(res).await
}

fn with_page(request: reqwest::RequestBuilder, page: Option<u64>) -> reqwest::RequestBuilder {
    match page {
        Some(page) => request.query(&[("page", page)]),
        None => request,
    }
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: dashboard API returned status {}", status);
        match serde_json::from_str::<Value>(&text) {
            Ok(json) => eprintln!("{}", serde_json::to_string_pretty(&json)?),
            Err(_) => eprintln!("Response: {}", text),
        }
        std::process::exit(1);
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
