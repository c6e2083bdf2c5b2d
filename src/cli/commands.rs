//! Command execution against the production adapters.

use color_eyre::eyre::{eyre, Result, WrapErr};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::adapters::appwrite::{
    AppwriteBlobs, AppwriteClient, AppwriteDocuments, AppwriteIdentity,
};
use crate::app::{App, Image};
use crate::cli::args::{CliCommand, USAGE};
use crate::config::BackendConfig;
use crate::models::{Contact, ContactDraft, ContactUpdate, Gender};
use crate::session_file::{SessionFile, StoredSession};

/// The CLI wired over the Appwrite adapters.
pub struct Cli {
    app: App<AppwriteIdentity, AppwriteDocuments, AppwriteBlobs>,
    client: Arc<AppwriteClient>,
    session_file: Option<SessionFile>,
}

impl Cli {
    /// Build the CLI from environment configuration.
    pub fn from_env() -> Result<Self> {
        let config = BackendConfig::from_env()?;
        Ok(Self::with_config(&config, SessionFile::new()))
    }

    /// Build the CLI over explicit configuration and session storage.
    pub fn with_config(config: &BackendConfig, session_file: Option<SessionFile>) -> Self {
        let client = Arc::new(AppwriteClient::new(&config.endpoint, &config.project_id));
        let identity = Arc::new(AppwriteIdentity::new(client.clone()));
        let documents = Arc::new(AppwriteDocuments::new(client.clone(), &config.database_id));
        let blobs = Arc::new(AppwriteBlobs::new(client.clone()));
        let app = App::new(
            identity,
            documents,
            blobs,
            &config.collection_id,
            &config.bucket_id,
        );
        Self {
            app,
            client,
            session_file,
        }
    }

    /// Execute one parsed command.
    pub async fn run(&mut self, command: CliCommand) -> Result<()> {
        match command {
            CliCommand::Version => {
                println!("rolodex {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            CliCommand::Help => {
                println!("{}", USAGE);
                Ok(())
            }
            CliCommand::Register { email, name } => self.register(&email, &name).await,
            CliCommand::Login { email } => self.login(&email).await,
            CliCommand::Logout => self.logout().await,
            CliCommand::Whoami => self.whoami().await,
            CliCommand::List => self.list().await,
            CliCommand::Add {
                name,
                address,
                phone,
                gender,
                image,
            } => self.add(name, address, phone, gender, image.as_deref()).await,
            CliCommand::Edit { id, changes, image } => {
                self.edit(&id, changes, image.as_deref()).await
            }
            CliCommand::Delete { id } => self.delete(&id).await,
        }
    }

    /// Install the persisted session secret, if one exists, and resume.
    async fn restore_session(&mut self) -> Result<()> {
        if let Some(file) = &self.session_file {
            if let Some(stored) = file.load() {
                debug!("found persisted session for {}", stored.user_id);
                self.client.set_session(Some(stored.secret));
            }
        }
        if self.app.bootstrap().await.is_none() {
            // A stale secret is as good as no secret.
            self.client.set_session(None);
        }
        Ok(())
    }

    /// Require a signed-in principal for the commands that need one.
    async fn require_session(&mut self) -> Result<String> {
        self.restore_session().await?;
        self.app
            .auth
            .session()
            .user_id()
            .map(str::to_string)
            .ok_or_else(|| eyre!("not signed in; run 'rolodex login' first"))
    }

    fn persist_session(&self) {
        let (Some(file), Some(secret)) = (&self.session_file, self.client.session_secret())
        else {
            return;
        };
        let Some(user_id) = self.app.auth.session().user_id() else {
            return;
        };
        let stored = StoredSession {
            secret,
            user_id: user_id.to_string(),
        };
        if !file.save(&stored) {
            warn!("could not persist the session; you will be signed out on exit");
        }
    }

    async fn register(&mut self, email: &str, name: &str) -> Result<()> {
        let password = prompt_new_password()?;
        self.app.auth.sign_up(email, &password, name).await?;
        self.persist_session();
        let principal = self.app.auth.session().principal.clone();
        if let Some(p) = principal {
            println!("Registered and signed in as {} <{}>", p.name, p.email);
        }
        Ok(())
    }

    async fn login(&mut self, email: &str) -> Result<()> {
        let password = rpassword::prompt_password("Password: ")
            .wrap_err("could not read the password")?;
        self.app.auth.log_in(email, &password).await?;
        self.persist_session();
        let principal = self.app.auth.session().principal.clone();
        if let Some(p) = principal {
            println!("Signed in as {} <{}>", p.name, p.email);
        }
        Ok(())
    }

    async fn logout(&mut self) -> Result<()> {
        self.restore_session().await?;
        self.app.log_out().await;
        if let Some(file) = &self.session_file {
            if !file.clear() {
                warn!("could not remove the session file at {:?}", file.path());
            }
        }
        if let Some(message) = &self.app.auth.state().error {
            println!("Signed out locally ({})", message);
        } else {
            println!("Signed out");
        }
        Ok(())
    }

    async fn whoami(&mut self) -> Result<()> {
        self.restore_session().await?;
        match &self.app.auth.session().principal {
            Some(p) => println!("{} <{}> ({})", p.name, p.email, p.id),
            None => println!("Not signed in"),
        }
        Ok(())
    }

    async fn list(&mut self) -> Result<()> {
        self.require_session().await?;
        self.app.refresh_contacts().await?;
        let contacts = self.app.contacts.contacts();
        if contacts.is_empty() {
            println!("No contacts yet");
            return Ok(());
        }
        for contact in contacts {
            print_contact(contact);
        }
        Ok(())
    }

    async fn add(
        &mut self,
        name: String,
        address: String,
        phone: String,
        gender: Gender,
        image: Option<&Path>,
    ) -> Result<()> {
        self.require_session().await?;
        let image = match image {
            Some(path) => Some(read_image(path).await?),
            None => None,
        };
        let draft = ContactDraft {
            name,
            address,
            phone,
            gender,
            image_url: None,
        };
        let contact = self.app.add_contact(draft, image).await?;
        println!("Added contact {}", contact.id);
        Ok(())
    }

    async fn edit(
        &mut self,
        id: &str,
        changes: ContactUpdate,
        image: Option<&Path>,
    ) -> Result<()> {
        self.require_session().await?;
        self.app.refresh_contacts().await?;
        let image = match image {
            Some(path) => Some(read_image(path).await?),
            None => None,
        };
        let contact = self.app.update_contact(id, changes, image).await?;
        println!("Updated contact {}", contact.id);
        Ok(())
    }

    async fn delete(&mut self, id: &str) -> Result<()> {
        self.require_session().await?;
        self.app.refresh_contacts().await?;
        self.app.delete_contact(id).await?;
        println!("Deleted contact {}", id);
        Ok(())
    }
}

/// Prompt for a new password twice and check the copies match.
fn prompt_new_password() -> Result<String> {
    let password =
        rpassword::prompt_password("Password: ").wrap_err("could not read the password")?;
    let repeat =
        rpassword::prompt_password("Repeat password: ").wrap_err("could not read the password")?;
    if password != repeat {
        return Err(eyre!("passwords do not match"));
    }
    Ok(password)
}

/// Read an image file into an upload payload.
async fn read_image(path: &Path) -> Result<Image> {
    let bytes = tokio::fs::read(path)
        .await
        .wrap_err_with(|| format!("could not read image {:?}", path))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();
    Ok(Image {
        filename,
        bytes: bytes.into(),
    })
}

fn print_contact(contact: &Contact) {
    println!(
        "{}  {}  {}  {}  {}",
        contact.id, contact.name, contact.phone, contact.address, contact.gender
    );
    if let Some(url) = &contact.image_url {
        println!("    image: {}", url);
    }
}
