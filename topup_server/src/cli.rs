use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 10] = [
        "RUST_LOG",
        "TOPUP_HOST",
        "TOPUP_PORT",
        "TOPUP_ORDERS_FILE",
        "TOPUP_CATALOG_FILE",
        "TOPUP_USE_X_FORWARDED_FOR",
        "TOPUP_USE_FORWARDED",
        "TOPUP_EVENT_BUFFER_SIZE",
        "TOPUP_MIDTRANS_PRODUCTION",
        "TOPUP_MIDTRANS_BASE_URL",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    });
    let key_status = match env::var("TOPUP_MIDTRANS_SERVER_KEY") {
        Ok(s) if !s.trim().is_empty() => "Set",
        _ => "Not set",
    };
    println!("  {:<35} {key_status:<15}", "TOPUP_MIDTRANS_SERVER_KEY");
}
