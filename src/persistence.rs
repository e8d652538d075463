use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use url::Url;

use crate::{
    app::{AppContext, Application},
    config::DatabaseSettings,
    error::BootstrapError,
};

/// Database extension bound to an [`Application`].
#[derive(Clone, Debug)]
pub struct Persistence {
    connection: DatabaseConnection,
}

impl Persistence {
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(settings.url.clone());
        options
            .max_connections(settings.max_connections.get())
            .sqlx_logging(settings.log_statements);

        let connection = Database::connect(options).await?;

        Ok(Persistence { connection })
    }

    /// Connects with the application's database settings and attaches the
    /// extension. Configuration has to be loaded first.
    pub async fn init_app(app: &mut Application) -> Result<(), BootstrapError> {
        let settings = app
            .settings()
            .ok_or(BootstrapError::NotConfigured("attaching the database"))?;

        let persistence = Self::connect(&settings.database)
            .await
            .map_err(BootstrapError::Connect)?;
        tracing::info!(url = %redact(&settings.database.url), "database attached");

        app.attach_persistence(persistence);
        Ok(())
    }

    /// Creates the schema objects of every known model.
    ///
    /// Tables that already exist and migrations that already ran are left
    /// alone, so this is safe on every start. `ctx` must belong to the
    /// application this extension is attached to.
    pub async fn create_all(&self, ctx: &AppContext<'_>) -> Result<(), BootstrapError> {
        match ctx.database() {
            Ok(attached) if std::ptr::eq(attached, self) => {}
            _ => return Err(BootstrapError::ForeignContext),
        }

        let pending = Migrator::get_pending_migrations(&self.connection)
            .await
            .map_err(BootstrapError::Schema)?;

        if pending.is_empty() {
            tracing::info!("database schema is up to date");
            return Ok(());
        }

        tracing::info!(pending = pending.len(), "creating database schema");
        Migrator::up(&self.connection, None)
            .await
            .map_err(BootstrapError::Schema)
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}

const MASK: &str = "***";

// Keep credentials out of the logs, including those passed as query parameters.
fn redact(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return "<unparsable url>".to_owned();
    };

    if url.password().is_some() {
        // Only fails for URLs that cannot carry credentials in the first place.
        let _ = url.set_password(Some(MASK));
    }

    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    if pairs.iter().any(|(key, _)| is_secret(key)) {
        url.query_pairs_mut().clear().extend_pairs(pairs.iter().map(|(key, value)| {
            let value = if is_secret(key) { MASK } else { value.as_str() };
            (key.as_str(), value)
        }));
    }

    url.into()
}

fn is_secret(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    ["password", "passwd", "secret", "token"]
        .iter()
        .any(|needle| key.contains(needle))
}
