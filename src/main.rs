use log::{error, info, warn};
use number_verification::{
    api::HttpApiResource,
    credentials::{Gnp, StaticToken},
    phone,
    webhook::Payload,
    Client,
};
use secrecy::SecretString;
use service::{
    config::{Command, Config},
    logging::Logger,
};
use std::process;

#[tokio::main]
async fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to start logger: {e}");
    }

    let Some(command) = config.command.clone() else {
        error!("No command given, run with --help for usage");
        process::exit(2);
    };

    match command {
        Command::IsHashed { phone_number } => {
            println!("{}", phone::is_hashed(&phone_number));
        }
        Command::AuthUrl {
            phone_number,
            state,
        } => {
            let client = ready_client(&config);
            let url =
                client.build_front_end_url(&phone_number, config.redirect_url(), state.as_deref());
            println!("{url}");
        }
        Command::Verify {
            phone_number,
            code,
            state,
            hash,
        } => {
            let phone_number = if hash {
                phone::hash(&phone_number)
            } else {
                phone_number
            };

            if config.access_token().unwrap_or_default().is_empty() {
                warn!("ACCESS_TOKEN is not set, the verification call will fail");
            }

            let mut client = ready_client(&config);
            let payload: Payload = code
                .map(|code| ("code", code))
                .into_iter()
                .chain(state.map(|state| ("state", state)))
                .collect();

            match client.verify_number(&phone_number, &payload).await {
                Ok(verified) => println!("verified: {verified}"),
                Err(e) => {
                    error!("Number verification failed: {e}");
                    process::exit(1);
                }
            }
        }
    }
}

/// Validates the configuration and builds the client, exiting on failure.
fn ready_client(config: &Config) -> Client<HttpApiResource> {
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {e}");
        process::exit(2);
    }

    match build_client(config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build number verification client: {e}");
            process::exit(1);
        }
    }
}

fn build_client(config: &Config) -> Result<Client<HttpApiResource>, Box<dyn std::error::Error>> {
    let application_id = config.application_id().unwrap_or_default();
    let access_token = config.access_token().unwrap_or_default();

    let resource = HttpApiResource::new(
        config.transport().client()?,
        config.api_base_url(),
        Box::new(StaticToken::new(SecretString::new(access_token.to_string()))),
    );

    info!(
        "Number verification client ready for application {} ({})",
        application_id,
        config.runtime_env()
    );

    Ok(Client::new(resource, Gnp::new(application_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_auth_url_needs_only_application_id() {
        let config = Config::try_parse_from([
            "number_verification_rs",
            "--application-id",
            "app-123",
            "auth-url",
            "--phone-number",
            "+15555550100",
        ])
        .unwrap();

        let client = build_client(&config).unwrap();
        let url = client.build_front_end_url("+15555550100", config.redirect_url(), None);

        assert!(url.contains("client_id=app-123"));
        assert!(url.contains("login_hint=%2B15555550100"));
    }
}
