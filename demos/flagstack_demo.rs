//! Resolves a handful of flags from the command line, `DEMO_*` environment
//! variables, an optional `.env` file and an optional config file, then prints
//! where each value came from.
//!
//! ```text
//! DEMO_WORKERS=8 cargo run --example flagstack_demo -- -config demo.toml -peer a -peer b
//! RUST_LOG=flagstack=debug cargo run --example flagstack_demo
//! ```

use std::time::Duration;

use flagstack::{ErrorHandling, EnvParser, FileParser, FlagSet, Mux, default_mapper, values};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut set = FlagSet::new("flagstack_demo", ErrorHandling::ExitOnError);
    let config = set.add("config", values::string("demo.toml"), "config `file` (.json, .toml, .yaml)");
    let env_file = set.add("env-file", values::string(".env"), "`path` to a .env file");
    let host = set.add("host", values::string("localhost"), "address to bind");
    let port = set.add("port", values::uint16(8080), "listen `port`");
    let workers = set.add("workers", values::uint(4), "number of workers");
    let timeout = set.add("timeout", values::duration(Duration::from_secs(30)), "request timeout");
    let peers = set.add("peer", values::strings(&["127.0.0.1:7000"]), "peer address, repeatable");
    let verbose = set.add("verbose", values::boolean(false), "chatty output");

    let env = EnvParser::new()
        .prefix("DEMO")
        .mapper(default_mapper(Some(",")))
        .dotenv(&env_file, true);
    let file = FileParser::new(&config, Mux::standard()).ignore_missing();

    // ExitOnError: failures print and exit before we get here.
    let _ = set.parse(std::env::args().skip(1), &[&env, &file]);

    set.set_output(std::io::stdout());
    set.print_values();

    if verbose.get() {
        println!();
        println!("binding {}:{} with {} workers", host.get(), port.get(), workers.get());
        println!("timeout {:?}, peers {:?}", timeout.get(), peers.get());
        println!("positional: {:?}", set.args());
    }
}
