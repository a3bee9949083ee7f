use std::process::ExitCode;

fn main() -> ExitCode {
    ir_lookup_cli::main_entry()
}
