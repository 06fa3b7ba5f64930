// snp-pylint - main entry point
use clap::Parser;
use snp_pylint::cli::Cli;
use std::process;

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e.user_message(cli.use_colors()));
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
