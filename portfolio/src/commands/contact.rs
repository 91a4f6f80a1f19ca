use anyhow::bail;
use clap::Subcommand;
use portfolio_client::{
    http::HttpSubmitHandler, FormController, FormField, SubmitOutcome,
};
use portfolio_config::Config;
use portfolio_validation::contact_rules;
use url::Url;

#[derive(Debug, Subcommand)]
pub enum ContactCommand {
    /// Submit a contact message through a running server
    Send {
        /// Base url of the server; defaults to the configured http address
        #[arg(long)]
        url: Option<Url>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
    },
}

impl ContactCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            ContactCommand::Send {
                url,
                name,
                email,
                subject,
                message,
            } => send(config, url, name, email, subject, message).await,
        }
    }
}

async fn send(
    config: Config,
    url: Option<Url>,
    name: String,
    email: String,
    subject: String,
    message: String,
) -> anyhow::Result<()> {
    let base_url = match url {
        Some(url) => url,
        None => format!("http://{}:{}/", config.http.host, config.http.port).parse()?,
    };

    let handler = HttpSubmitHandler::new(base_url)?;
    let controller = FormController::new(contact_rules(), handler);

    controller.set_field(FormField::Name, name).await;
    controller.set_field(FormField::Email, email).await;
    controller.set_field(FormField::Subject, subject).await;
    controller.set_field(FormField::Message, message).await;

    match controller.submit().await {
        SubmitOutcome::Accepted(accepted) => {
            println!("{}", accepted.message);
            if accepted.simulated {
                println!("(delivery was simulated; the server has no smtp transport configured)");
            }
            Ok(())
        }
        SubmitOutcome::Invalid(report) => {
            for error in &report.errors {
                eprintln!("{}: {}", error.field, error.message);
            }
            bail!("Validation failed");
        }
        SubmitOutcome::Failed(error) => Err(anyhow::Error::new(error).context("Submission failed")),
        SubmitOutcome::InFlight => unreachable!(),
    }
}
