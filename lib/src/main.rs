use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use slh_dsa_bridge::report::{run_self_test, SelfTestReport};
use slh_dsa_bridge::{Bridge, ParameterSet};
use tracing::{error, info};
use zeroize::Zeroizing;

#[derive(Parser)]
#[command(name = "slh-dsa")]
#[command(about = "SLH-DSA (FIPS 205) signatures with runtime-selectable parameter sets", long_about = None)]
struct Cli {
    /// Parameter set: canonical name, short form (shake-128f) or id
    #[arg(short, long, global = true, env = "SLH_DSA_SCHEME", default_value = "SLH-DSA-SHAKE-128f")]
    scheme: ParameterSet,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every supported parameter set
    List {
        #[arg(long)]
        json: bool,
    },

    /// Show the parameters of the selected scheme
    Params {
        #[arg(long)]
        json: bool,
    },

    /// Generate a keypair, writing <out>.pk and <out>.sk as hex
    Keygen {
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Sign a file with a hex private key
    Sign {
        #[arg(short, long)]
        key: PathBuf,

        #[arg(short, long)]
        message: PathBuf,

        #[arg(short, long, default_value = "")]
        context: String,

        /// Signature output file (hex); stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Verify a hex signature; exits with 1 when it does not verify
    Verify {
        #[arg(short, long)]
        key: PathBuf,

        #[arg(short, long)]
        message: PathBuf,

        #[arg(short = 'g', long)]
        signature: PathBuf,

        #[arg(short, long, default_value = "")]
        context: String,
    },

    /// Keygen/sign/verify round trip with timings
    Selftest {
        /// Run every parameter set instead of only the selected one
        #[arg(long)]
        all: bool,

        /// Output file for the JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let bridge = Bridge::new();
    let scheme = cli.scheme;

    match cli.command {
        Commands::List { json } => list_schemes(json)?,
        Commands::Params { json } => {
            bridge.initialize_config(scheme.id() as i32)?;
            let info = bridge
                .current_parameters()?
                .ok_or("no active parameter set")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                let labels = ["n", "h", "d", "h'", "a", "k", "lg_w", "m", "category", "pk bytes", "sig bytes"];
                println!("{} ({})", info.name, if info.is_shake { "SHAKE" } else { "SHA2" });
                for (label, value) in labels.iter().zip(info.numeric_fields()) {
                    println!("  {:<10} {}", label, value);
                }
            }
        }
        Commands::Keygen { out } => {
            bridge.initialize_config(scheme.id() as i32)?;
            let pair = bridge.keygen()?;
            let pk_path = with_suffix(&out, "pk");
            let sk_path = with_suffix(&out, "sk");
            fs::write(&pk_path, hex::encode(&pair.public_key))?;
            fs::write(&sk_path, Zeroizing::new(hex::encode(&pair.private_key)).as_bytes())?;
            info!("Keypair for {} written to {} / {}", scheme, pk_path.display(), sk_path.display());
        }
        Commands::Sign { key, message, context, out } => {
            let sk = Zeroizing::new(read_hex(&key)?);
            let message = fs::read(&message)?;
            let signature = bridge.sign(Some(message.as_slice()), Some(context.as_bytes()), Some(sk.as_slice()))?;
            let encoded = hex::encode(&signature);
            match out {
                Some(path) => {
                    fs::write(&path, encoded)?;
                    info!("Signature ({} bytes) written to {}", signature.len(), path.display());
                }
                None => println!("{}", encoded),
            }
        }
        Commands::Verify { key, message, signature, context } => {
            let pk = read_hex(&key)?;
            let message = fs::read(&message)?;
            let signature = read_hex(&signature)?;
            let valid = bridge.verify(
                Some(message.as_slice()),
                Some(signature.as_slice()),
                Some(context.as_bytes()),
                Some(pk.as_slice()),
            )?;
            println!("{}", if valid { "valid" } else { "invalid" });
            if !valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Selftest { all, output } => {
            let sets: Vec<ParameterSet> = if all { ParameterSet::ALL.to_vec() } else { vec![scheme] };
            let mut report = SelfTestReport::new();
            for set in sets {
                info!("Running self-test for {}", set);
                report.add_metrics(run_self_test(&bridge, set)?);
            }
            println!("{}", report.summary());

            if let Some(path) = output {
                report.save_json(&path)?;
                info!("Self-test report saved to {}", path.display());
            }
            if !report.all_verified() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn list_schemes(json: bool) -> Result<(), Box<dyn Error>> {
    let infos: Vec<_> = ParameterSet::ALL
        .iter()
        .map(|set| (set.id(), set.record().to_scheme_info()))
        .collect();

    if json {
        let entries: Vec<_> = infos
            .iter()
            .map(|(id, info)| serde_json::json!({ "id": id, "parameters": info }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{:>3}  {:<20} {:>9} {:>10}", "id", "name", "pk bytes", "sig bytes");
    for (id, info) in &infos {
        println!("{:>3}  {:<20} {:>9} {:>10}", id, info.name, info.pk_bytes, info.sig_bytes);
    }
    Ok(())
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut path = prefix.as_os_str().to_owned();
    path.push(".");
    path.push(suffix);
    PathBuf::from(path)
}

fn read_hex(path: &Path) -> Result<Vec<u8>, Box<dyn Error>> {
    let text = Zeroizing::new(fs::read_to_string(path)?);
    Ok(hex::decode(text.trim())?)
}
