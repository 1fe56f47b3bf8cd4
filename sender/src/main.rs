use std::net::{Ipv4Addr, SocketAddrV4};
use std::process::ExitCode;

use clap::Parser;
use log::error;

use rawsyn_sender::error::Result;
use rawsyn_sender::packet::IpChecksumScope;
use rawsyn_sender::tcp_sender::{Sender, SenderConfig};
use rawsyn_sender::transport::{DryRun, RawSocket, Transmit};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Send a hand-built SYN and a data segment over a raw socket",
    long_about = None
)]
struct Cli {
    /// Source address written into the IP header
    #[arg(long, default_value_t = Ipv4Addr::new(11, 111, 1, 2))]
    source: Ipv4Addr,

    #[arg(long, default_value_t = Ipv4Addr::new(172, 17, 0, 2))]
    destination: Ipv4Addr,

    #[arg(long, default_value_t = 1234)]
    source_port: u16,

    #[arg(long, default_value_t = 1234)]
    destination_port: u16,

    /// IP identification, the same for both segments
    #[arg(long, default_value_t = 54321)]
    ip_id: u16,

    #[arg(long, default_value = "Hello, this is the payload!")]
    syn_payload: String,

    #[arg(long, default_value = "This is data after the handshake.")]
    data_payload: String,

    /// Sequence number asserted on the data segment
    #[arg(long, default_value_t = 1)]
    data_seq: u32,

    /// Acknowledgment number asserted on the data segment
    #[arg(long, default_value_t = 1)]
    data_ack: u32,

    #[arg(long, value_enum, default_value_t = IpChecksumScope::Header)]
    ip_checksum_scope: IpChecksumScope,

    /// Log the datagrams instead of sending them (no privileges needed)
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn sender_config(self) -> SenderConfig {
        SenderConfig {
            source: self.source,
            destination: SocketAddrV4::new(self.destination, self.destination_port),
            source_port: self.source_port,
            identification: self.ip_id,
            syn_payload: self.syn_payload.into_bytes(),
            data_payload: self.data_payload.into_bytes(),
            data_seq: self.data_seq,
            data_ack: self.data_ack,
            ip_checksum_scope: self.ip_checksum_scope,
        }
    }
}

fn run<T: Transmit>(transport: T, config: SenderConfig) -> Result<()> {
    let mut sender = Sender::new(transport, config);
    sender.start()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let dry_run = cli.dry_run;
    let config = cli.sender_config();

    let result = if dry_run {
        run(DryRun::default(), config)
    } else {
        RawSocket::open_with_header_inclusion().and_then(|socket| run(socket, config))
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
