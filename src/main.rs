//! cnikit - CNI configuration and result inspector
//!
//! Lists, loads and promotes network configuration files, and
//! re-encodes plugin results in the current layout.

mod cli;

use cli::{Cli, Commands};
use cnikit::conf::dir::parse_any;
use cnikit::{CniResult, Error, Result, conf_files, conf_from_file, load_conf};
use std::io::{self, Read, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "cnikit=debug" } else { "cnikit=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Files => {
            for path in conf_files(&cli.conf_dir, cli.extensions.as_slice())? {
                println!("{}", path.display());
            }
        }
        Commands::Load { name, summary } => {
            let list = load_conf(&cli.conf_dir, &name, cli.extensions.as_slice())?;
            if summary {
                let types: Vec<&str> = list.plugins().iter().map(|p| p.plugin_type()).collect();
                println!(
                    "{} (cniVersion {}): {}",
                    list.name(),
                    list.cni_version().unwrap_or("-"),
                    types.join(" -> ")
                );
            } else {
                write_bytes(list.bytes())?;
            }
        }
        Commands::Show { file } => {
            let bytes = read_input(&file)?;
            let (format, list) = parse_any(&bytes).map_err(Error::ConfigParse)?;
            println!("file:       {}", file.display());
            println!("format:     {}", format);
            println!("name:       {}", list.name());
            println!("cniVersion: {}", list.cni_version().unwrap_or("-"));
            for (i, plugin) in list.plugins().iter().enumerate() {
                println!("plugin {}:   {}", i, plugin.plugin_type());
            }
        }
        Commands::Promote { file } => {
            let conf = conf_from_file(&file)?;
            write_bytes(conf.promote()?.bytes())?;
        }
        Commands::Result { file } => {
            let bytes = read_input(&file)?;
            let result = CniResult::from_bytes(&bytes)?;
            tracing::debug!("Decoded {}", result);
            write_bytes(&result.to_bytes()?)?;
        }
        Commands::Completion { shell } => {
            Cli::generate_completion(shell);
        }
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_bytes(bytes: &[u8]) -> Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(bytes)?;
    if !bytes.ends_with(b"\n") {
        out.write_all(b"\n")?;
    }
    Ok(())
}
