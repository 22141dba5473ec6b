use super::config::Config;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use log::debug;
use thiserror::Error;

/// Recoverable send-path failures. The watch loop logs these and moves on to
/// the next commit; they never terminate the run.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// One email out, success or failure back.
pub trait Notifier {
    fn send(&self, subject: &str, html_body: &str) -> Result<(), NotifyError>;
}

/// Delivers over SMTP with STARTTLS and LOGIN auth, one connection per
/// message, closed after the send.
pub struct SmtpNotifier {
    server: String,
    port: u16,
    username: String,
    password: String,
    from: String,
    to: String,
}

impl SmtpNotifier {
    pub fn from_config(config: &Config) -> SmtpNotifier {
        SmtpNotifier {
            server: config.smtp_server.clone(),
            port: config.smtp_port,
            username: config.gmail_username.clone(),
            password: config.gmail_password.clone(),
            from: config.smtp_from.clone(),
            to: config.smtp_to.clone(),
        }
    }
}

impl Notifier for SmtpNotifier {
    fn send(&self, subject: &str, html_body: &str) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.from.parse()?)
            .to(self.to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())?;

        debug!("Connecting to {}:{}", self.server, self.port);
        let transport = SmtpTransport::starttls_relay(&self.server)?
            .port(self.port)
            .credentials(Credentials::new(
                self.username.clone(),
                self.password.clone(),
            ))
            .build();
        transport.send(&message)?;
        Ok(())
    }
}
