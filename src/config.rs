use clap::Parser;

use crate::error::ConfigError;

/// Generate an HTML report about current Nagios status.
#[derive(Parser, Debug)]
#[command(name = "nrg", version)]
pub struct Args {
    /// The base address of the Nagios web gui
    #[arg(short, long, value_name = "URL", default_value = "https://localhost:/nagios")]
    pub address: String,

    /// The username used to login to nagios
    #[arg(short, long, value_name = "USER", default_value = "digit")]
    pub username: String,

    /// The password used to login to nagios
    #[arg(short, long, value_name = "PASS", default_value = "")]
    pub password: String,

    /// The service statuses we are interested in, joined with `+`
    #[arg(
        short,
        long,
        value_name = "STATUS",
        default_value = "ok+warning+critical+unknown+pending"
    )]
    pub service_status: String,

    /// The mail address of the recipient of the report
    #[arg(short, long, value_name = "RECIPIENT", default_value = "digit@chalmers.it")]
    pub recipient: String,

    /// Disable printing of the mail headers
    #[arg(short, long)]
    pub disable_mail_header: bool,

    /// Verify the server TLS certificate instead of accepting any.
    /// Off by default since the typical target is an internal server
    /// with a self-signed certificate.
    #[arg(long)]
    pub tls_verify: bool,
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub address: String,
    pub username: String,
    pub password: String,
    pub service_status: String,
    pub recipient: String,
    pub mail_header: bool,
    pub tls_verify: bool,
}

impl ReportConfig {
    pub fn resolve(args: Args) -> Result<Self, ConfigError> {
        if args.username.is_empty() {
            return Err(ConfigError::MissingCredential("username"));
        }
        if args.password.is_empty() {
            return Err(ConfigError::MissingCredential("password"));
        }

        Ok(Self {
            address: args.address,
            username: args.username,
            password: args.password,
            service_status: args.service_status,
            recipient: args.recipient,
            mail_header: !args.disable_mail_header,
            tls_verify: args.tls_verify,
        })
    }
}
