/// Midtrans authenticates server-side calls with HTTP Basic auth, using the server key as the username and an empty
/// password.
pub fn basic_auth_header(server_key: &str) -> String {
    let encoded = base64::encode(format!("{server_key}:"));
    format!("Basic {encoded}")
}
