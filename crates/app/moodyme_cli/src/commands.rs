use std::future::Future;

use moodyme_core::content::seed;
use moodyme_core::documents::firestore::FirestoreDocumentStore;
use moodyme_core::firebase::FirebaseConfig;
use moodyme_core::identity::admin;
use moodyme_core::identity::firebase::FirebaseIdentityProvider;
use moodyme_core::models::user::{NewUser, Role};
use moodyme_core::validation;

use crate::Error;
use crate::cli::CreateAdminArgs;

pub fn block_on<F: Future<Output = crate::Result<()>>>(task: F) -> crate::Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(task)
}

fn identity_provider() -> crate::Result<FirebaseIdentityProvider> {
    let config = FirebaseConfig::from_env()?;
    Ok(FirebaseIdentityProvider::new(reqwest::Client::new(), config)?)
}

pub async fn seed_content() -> crate::Result<()> {
    let config = FirebaseConfig::from_env()?;
    let documents = FirestoreDocumentStore::new(reqwest::Client::new(), &config)?;

    let report = seed::seed_content(&documents).await?;
    for kind in &report.created {
        log::info!("created {} ({})", kind.label(), kind.doc_name());
    }
    for kind in &report.skipped {
        log::info!("kept existing {} ({})", kind.label(), kind.doc_name());
    }
    log::info!(
        "content seeded: {} created, {} already present",
        report.created.len(),
        report.skipped.len()
    );
    Ok(())
}

pub async fn create_admin(args: &CreateAdminArgs) -> crate::Result<()> {
    let user = NewUser {
        email: args.email.trim().to_string(),
        first_name: args.first_name.trim().to_string(),
        last_name: args.last_name.trim().to_string(),
        password: args.password.clone(),
        role: Some(Role::Admin),
    };
    // Reject bad input before touching the provider.
    validation::into_result(validation::new_user_errors(&user)).map_err(Error::Custom)?;

    let identity = identity_provider()?;
    let created = admin::create_admin(&identity, user).await?;
    log::info!("admin created: {} (uid {})", created.email, created.id);
    Ok(())
}

pub async fn grant_admin(email: &str) -> crate::Result<()> {
    if let Some(problem) = validation::email_error(email) {
        return Err(Error::Custom(problem));
    }

    let identity = identity_provider()?;
    let granted = admin::grant_admin(&identity, email.trim()).await?;
    log::info!("{} (uid {}) is now an admin", granted.email, granted.id);
    Ok(())
}
