use clap::{Parser, Subcommand};
use serde_json::json;

use forwarded_ip::forwarding::{header, resolve, ForwardChain};
use forwarded_ip::net::{classify, Address, PeerAddress};

#[derive(Parser)]
#[command(name = "xff-cli")]
#[command(about = "Offline client address resolution for forwarding headers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the client address from a peer and forwarding header lines
    Resolve {
        /// Transport peer, e.g. 10.0.0.1:443 or [::1]:443
        #[arg(short, long)]
        peer: String,

        /// Forwarding header line (repeat for multiple lines)
        #[arg(short, long = "forwarded")]
        forwarded: Vec<String>,
    },
    /// Build the outbound forwarding header value
    Header {
        #[arg(short, long)]
        peer: String,

        #[arg(short, long = "forwarded")]
        forwarded: Vec<String>,
    },
    /// Classify an address against the reserved ranges
    Classify {
        address: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Resolve { peer, forwarded } => {
            let peer = PeerAddress::parse(&peer)?;
            let chain = ForwardChain::from_values(&forwarded);
            let client_ip = resolve(&peer, &chain);
            json!({
                "client_ip": client_ip,
                "source": client_ip.source(),
                "peer": peer,
                "chain": chain.as_slice(),
            })
        }
        Commands::Header { peer, forwarded } => {
            let peer = PeerAddress::parse(&peer)?;
            json!({ "forwarded_for": header::build(&forwarded, &peer) })
        }
        Commands::Classify { address } => {
            let address = Address::parse(&address)?;
            let range = classify(&address);
            json!({
                "address": address,
                "private": range.is_some(),
                "range": range.map(|r| r.network.to_string()),
                "kind": range.map(|r| r.label),
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
